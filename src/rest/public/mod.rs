//! Public REST API endpoints (no authentication required).

mod types;

pub use types::*;

use crate::error::KorbitError;
use crate::rest::KorbitRestClient;
use crate::rest::client::PairQuery;
use crate::rest::endpoints::public;
use crate::types::CurrencyPair;

impl KorbitRestClient {
    /// Get the detailed ticker for a pair.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use korbit_api_client::rest::KorbitRestClient;
    /// use korbit_api_client::types::CurrencyPair;
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let client = KorbitRestClient::new();
    ///     let ticker = client.get_ticker(CurrencyPair::EthKrw).await?;
    ///     println!("bid {} / ask {}", ticker.bid, ticker.ask);
    ///     Ok(())
    /// }
    /// ```
    #[tracing::instrument(skip(self))]
    pub async fn get_ticker(&self, currency_pair: CurrencyPair) -> Result<Ticker, KorbitError> {
        self.public_get("get_ticker", public::TICKER_DETAILED, &PairQuery { currency_pair })
            .await
    }

    /// Get the orderbook for a pair with numeric price levels.
    #[tracing::instrument(skip(self))]
    pub async fn get_orderbook(&self, currency_pair: CurrencyPair) -> Result<Orderbook, KorbitError> {
        let raw: RawOrderbook = self
            .public_get("get_orderbook", public::ORDERBOOK, &PairQuery { currency_pair })
            .await?;
        raw.transform()
    }
}
