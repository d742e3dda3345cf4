//! Trait definition for the Korbit REST API client.
//!
//! The `KorbitClient` trait abstracts every REST operation so callers can
//! substitute mocks or wrap the client.
//!
//! # Example
//!
//! ```rust,ignore
//! use korbit_api_client::rest::{KorbitClient, KorbitRestClient};
//! use korbit_api_client::types::CurrencyPair;
//!
//! async fn best_bid<C: KorbitClient>(client: &C) -> Result<(), korbit_api_client::KorbitError> {
//!     let book = client.get_orderbook(CurrencyPair::BtcKrw).await?;
//!     println!("{:?}", book.best_bid());
//!     Ok(())
//! }
//! ```

use std::future::Future;

use crate::auth::Token;
use crate::error::KorbitError;
use crate::rest::KorbitRestClient;
use crate::rest::private::{
    CancelResult, OpenOrder, OrderArgs, OrderResult, TransactionHistoryRequest,
    TransactionRecord, Wallets,
};
use crate::rest::public::{Orderbook, Ticker};
use crate::types::CurrencyPair;

/// Trait defining all Korbit REST API operations.
///
/// All methods are async and return `Result<T, KorbitError>`.
pub trait KorbitClient: Send + Sync {
    // ========== Token lifecycle ==========

    /// Log in with the password grant.
    fn login(&self) -> impl Future<Output = Result<Token, KorbitError>> + Send;

    /// Exchange the refresh token for a new token.
    fn refresh_token(&self) -> impl Future<Output = Result<Token, KorbitError>> + Send;

    /// Check if the held token is due for refresh.
    fn should_refresh(&self) -> impl Future<Output = Result<bool, KorbitError>> + Send;

    // ========== Public Endpoints ==========

    /// Get the detailed ticker for a pair.
    fn get_ticker(
        &self,
        currency_pair: CurrencyPair,
    ) -> impl Future<Output = Result<Ticker, KorbitError>> + Send;

    /// Get the orderbook for a pair.
    fn get_orderbook(
        &self,
        currency_pair: CurrencyPair,
    ) -> impl Future<Output = Result<Orderbook, KorbitError>> + Send;

    // ========== Private Endpoints ==========

    /// Place a bid.
    fn buy(&self, args: &OrderArgs) -> impl Future<Output = Result<OrderResult, KorbitError>> + Send;

    /// Place an ask.
    fn sell(&self, args: &OrderArgs)
    -> impl Future<Output = Result<OrderResult, KorbitError>> + Send;

    /// Cancel open orders of one pair.
    fn cancel_open_orders(
        &self,
        order_ids: &[u64],
        currency_pair: CurrencyPair,
    ) -> impl Future<Output = Result<Vec<CancelResult>, KorbitError>> + Send;

    /// List open orders on a pair.
    fn list_open_orders(
        &self,
        currency_pair: CurrencyPair,
    ) -> impl Future<Output = Result<Vec<OpenOrder>, KorbitError>> + Send;

    /// Get transaction history.
    fn get_transaction_history(
        &self,
        request: &TransactionHistoryRequest,
    ) -> impl Future<Output = Result<Vec<TransactionRecord>, KorbitError>> + Send;

    /// Get wallet balances for every configured pair.
    fn get_wallets(&self) -> impl Future<Output = Result<Wallets, KorbitError>> + Send;
}

impl KorbitClient for KorbitRestClient {
    async fn login(&self) -> Result<Token, KorbitError> {
        KorbitRestClient::login(self).await
    }

    async fn refresh_token(&self) -> Result<Token, KorbitError> {
        KorbitRestClient::refresh_token(self).await
    }

    async fn should_refresh(&self) -> Result<bool, KorbitError> {
        KorbitRestClient::should_refresh(self).await
    }

    async fn get_ticker(&self, currency_pair: CurrencyPair) -> Result<Ticker, KorbitError> {
        KorbitRestClient::get_ticker(self, currency_pair).await
    }

    async fn get_orderbook(&self, currency_pair: CurrencyPair) -> Result<Orderbook, KorbitError> {
        KorbitRestClient::get_orderbook(self, currency_pair).await
    }

    async fn buy(&self, args: &OrderArgs) -> Result<OrderResult, KorbitError> {
        KorbitRestClient::buy(self, args).await
    }

    async fn sell(&self, args: &OrderArgs) -> Result<OrderResult, KorbitError> {
        KorbitRestClient::sell(self, args).await
    }

    async fn cancel_open_orders(
        &self,
        order_ids: &[u64],
        currency_pair: CurrencyPair,
    ) -> Result<Vec<CancelResult>, KorbitError> {
        KorbitRestClient::cancel_open_orders(self, order_ids, currency_pair).await
    }

    async fn list_open_orders(
        &self,
        currency_pair: CurrencyPair,
    ) -> Result<Vec<OpenOrder>, KorbitError> {
        KorbitRestClient::list_open_orders(self, currency_pair).await
    }

    async fn get_transaction_history(
        &self,
        request: &TransactionHistoryRequest,
    ) -> Result<Vec<TransactionRecord>, KorbitError> {
        KorbitRestClient::get_transaction_history(self, request).await
    }

    async fn get_wallets(&self) -> Result<Wallets, KorbitError> {
        KorbitRestClient::get_wallets(self).await
    }
}
