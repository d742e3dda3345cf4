//! Private REST API endpoints (bearer token required).
//!
//! These endpoints need a token from [`KorbitRestClient::login`] or
//! [`KorbitRestClientBuilder::token`](crate::rest::KorbitRestClientBuilder::token).
//! An expired token is reported by the exchange as HTTP 401.

mod types;

pub use types::*;

use crate::error::KorbitError;
use crate::rest::KorbitRestClient;
use crate::rest::client::PairQuery;
use crate::rest::endpoints::private;
use crate::types::{CurrencyPair, Side, WalletShape};

impl KorbitRestClient {
    /// Place a bid.
    ///
    /// A non-success status is returned as [`KorbitError::Rejected`] carrying
    /// the result.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use korbit_api_client::rest::KorbitRestClient;
    /// use korbit_api_client::rest::private::OrderArgs;
    /// use korbit_api_client::types::CurrencyPair;
    /// use rust_decimal::Decimal;
    ///
    /// # async fn run(client: KorbitRestClient) -> Result<(), korbit_api_client::KorbitError> {
    /// let args = OrderArgs::limit(CurrencyPair::BtcKrw, 3_000_000, Decimal::new(1, 3));
    /// let order = client.buy(&args).await?;
    /// println!("placed order {:?}", order.order_id);
    /// # Ok(())
    /// # }
    /// ```
    #[tracing::instrument(skip(self))]
    pub async fn buy(&self, args: &OrderArgs) -> Result<OrderResult, KorbitError> {
        self.place_order("buy", private::ORDERS_BUY, args, Side::Buy)
            .await
    }

    /// Place an ask.
    #[tracing::instrument(skip(self))]
    pub async fn sell(&self, args: &OrderArgs) -> Result<OrderResult, KorbitError> {
        self.place_order("sell", private::ORDERS_SELL, args, Side::Sell)
            .await
    }

    async fn place_order(
        &self,
        operation: &'static str,
        endpoint: &str,
        args: &OrderArgs,
        side: Side,
    ) -> Result<OrderResult, KorbitError> {
        args.validate(side)?;
        let raw: RawOrderResponse = self
            .private_post(operation, endpoint, args.form(side))
            .await?;

        let result = OrderResult::enrich(raw, args, side);
        if !result.status.is_success() {
            tracing::warn!(operation, status = %result.status, "order not successful");
        }
        result.into_result()
    }

    /// Cancel open orders of one pair in a single request.
    ///
    /// Each returned entry has its own status; one failed cancellation does not
    /// hide the others.
    #[tracing::instrument(skip(self))]
    pub async fn cancel_open_orders(
        &self,
        order_ids: &[u64],
        currency_pair: CurrencyPair,
    ) -> Result<Vec<CancelResult>, KorbitError> {
        if order_ids.is_empty() {
            return Err(KorbitError::validation("at least one order id is required"));
        }

        let mut form = vec![("currency_pair", currency_pair.to_string())];
        form.extend(order_ids.iter().map(|id| ("id", id.to_string())));

        let results: Vec<CancelResult> = self
            .private_post("cancel_open_orders", private::ORDERS_CANCEL, form)
            .await?;

        for result in results.iter().filter(|r| !r.is_success()) {
            tracing::warn!(order_id = result.order_id, status = %result.status, "cancel not successful");
        }
        Ok(results)
    }

    /// List the account's open orders on a pair.
    #[tracing::instrument(skip(self))]
    pub async fn list_open_orders(
        &self,
        currency_pair: CurrencyPair,
    ) -> Result<Vec<OpenOrder>, KorbitError> {
        self.private_get(
            "list_open_orders",
            private::ORDERS_OPEN,
            &PairQuery { currency_pair },
        )
        .await
    }

    /// Get transaction history (fills, fiat or coin movements).
    ///
    /// Record ids are accepted quoted or bare, whatever the pair.
    #[tracing::instrument(skip(self))]
    pub async fn get_transaction_history(
        &self,
        request: &TransactionHistoryRequest,
    ) -> Result<Vec<TransactionRecord>, KorbitError> {
        self.private_get("get_transaction_history", private::TRANSACTIONS, request)
            .await
    }

    /// Get wallet balances for every configured pair, one request per pair.
    ///
    /// The first failing request aborts the whole call.
    #[tracing::instrument(skip(self))]
    pub async fn get_wallets(&self) -> Result<Wallets, KorbitError> {
        let mut wallets = Wallets::default();
        for &currency_pair in self.currency_pairs.iter() {
            let query = PairQuery { currency_pair };
            let wallet = match currency_pair.wallet_shape() {
                WalletShape::Primary => Wallet::Primary(
                    self.private_get("get_wallets", private::BALANCES, &query)
                        .await?,
                ),
                WalletShape::Secondary => Wallet::Secondary(
                    self.private_get("get_wallets", private::BALANCES, &query)
                        .await?,
                ),
            };
            wallets.insert(currency_pair, wallet);
        }
        Ok(wallets)
    }
}
