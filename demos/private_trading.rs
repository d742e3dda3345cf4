//! Example: Korbit private endpoints.
//!
//! Needs KORBIT_CLIENT_ID, KORBIT_CLIENT_SECRET, KORBIT_USERNAME and
//! KORBIT_PASSWORD. Orders are only placed when KORBIT_PLACE_ORDER=1.
//!
//! Run with: cargo run --example private_trading

#[path = "../tests/support/mod.rs"]
mod support;

use std::env;
use std::str::FromStr;
use std::sync::Arc;

use korbit_api_client::rest::KorbitRestClient;
use korbit_api_client::rest::private::{
    OrderArgs, TransactionHistoryRequest, filter_transactions, total_buy_sell_history,
};
use korbit_api_client::types::{CurrencyPair, TransactionCategory};
use rust_decimal::Decimal;
use time::{Duration, OffsetDateTime};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let credentials = match support::credentials_from_env() {
        Some(creds) => Arc::new(creds),
        None => {
            println!("Set the KORBIT_* credential variables to run this example.");
            return Ok(());
        }
    };

    let client = KorbitRestClient::builder().credentials(credentials).build();
    let token = client.login().await?;
    println!("Logged in, token expires at {:?}", token.expires_at());

    let wallets = client.get_wallets().await?;
    for (pair, wallet) in wallets.iter() {
        let balance = wallets.coin_balance(*pair).unwrap_or_default();
        println!(
            "{pair} ({:?}): {} {} / {} krw",
            wallet.shape(),
            balance.coins,
            pair.coin(),
            balance.krw
        );
    }

    let open = client.list_open_orders(CurrencyPair::BtcKrw).await?;
    println!("Open BTC orders: {}", open.len());

    let request = TransactionHistoryRequest::new(CurrencyPair::BtcKrw, TransactionCategory::Fills)
        .limit(40);
    let records = client.get_transaction_history(&request).await?;
    let now = OffsetDateTime::now_utc();
    let recent = filter_transactions(&records, None, now - Duration::days(7), now);
    println!("Fills in the last week: {}", recent.len());
    let summary = total_buy_sell_history(&records, None, now - Duration::days(7), now);
    println!("Bought {} / sold {} krw", summary.buys, summary.sells);

    if env::var("KORBIT_PLACE_ORDER").ok().as_deref() == Some("1") {
        let args = OrderArgs::limit(CurrencyPair::BtcKrw, 1_000_000, Decimal::from_str("0.001")?);
        match client.buy(&args).await {
            Ok(order) => {
                println!("Placed order {:?}", order.order_id);
                if let Some(id) = order.order_id {
                    for result in client.cancel_open_orders(&[id], CurrencyPair::BtcKrw).await? {
                        println!("Cancel {}: {}", result.order_id, result.status);
                    }
                }
            }
            Err(err) => println!("Order failed: {err}"),
        }
    } else {
        println!("Set KORBIT_PLACE_ORDER=1 to place and cancel a small order.");
    }

    if client.should_refresh().await? {
        client.refresh_token().await?;
    }

    Ok(())
}
