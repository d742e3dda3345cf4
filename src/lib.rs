//! # Korbit Client
//!
//! An async Rust client library for the Korbit exchange REST API.
//!
//! ## Features
//!
//! - OAuth2 password login and refresh with expiry tracking
//! - Order placement and cancellation, open orders, transaction history
//! - Ticker, orderbook and wallet balances
//! - Strong typing for all request/response types
//! - Financial precision with `rust_decimal`
//!
//! Tokens are never refreshed implicitly: check
//! [`KorbitRestClient::should_refresh`](rest::KorbitRestClient::should_refresh)
//! between calls.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use korbit_api_client::rest::KorbitRestClient;
//! use korbit_api_client::types::CurrencyPair;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = KorbitRestClient::new();
//!     let book = client.get_orderbook(CurrencyPair::BtcKrw).await?;
//!     println!("Best bid: {:?}", book.best_bid());
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod error;
pub mod rest;
pub mod types;

// Re-export commonly used types at crate root
pub use error::KorbitError;
pub use rest::KorbitRestClient;
pub use types::common::{CurrencyPair, OrderKind, ResponseStatus, Side};

/// Result type alias using KorbitError
pub type Result<T> = std::result::Result<T, KorbitError>;
