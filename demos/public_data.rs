//! Example: Fetching public market data from Korbit.
//!
//! Tickers and orderbooks need no authentication.
//!
//! Run with: cargo run --example public_data

use korbit_api_client::rest::KorbitRestClient;
use korbit_api_client::types::ACTIVE_CURRENCY_PAIRS;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let client = KorbitRestClient::new();

    for pair in ACTIVE_CURRENCY_PAIRS {
        println!("=== Ticker ({pair}) ===");
        let ticker = client.get_ticker(pair).await?;
        println!("  Last: {}", ticker.last);
        println!("  Bid: {} Ask: {} (spread {})", ticker.bid, ticker.ask, ticker.spread());
        println!("  Low: {} High: {}", ticker.low, ticker.high);
        println!("  Volume: {}", ticker.volume);

        println!("=== Orderbook ({pair}) ===");
        let book = client.get_orderbook(pair).await?;
        println!("Asks:");
        for ask in book.asks.iter().take(3) {
            println!("  {} @ {}", ask.quantity, ask.price);
        }
        println!("Bids:");
        for bid in book.bids.iter().take(3) {
            println!("  {} @ {}", bid.quantity, bid.price);
        }
        println!();
    }

    println!("Done!");
    Ok(())
}
