//! Korbit REST API client.
//!
//! # Trait-based API
//!
//! The [`KorbitClient`] trait abstracts all REST API operations, enabling
//! mock implementations for testing and wrappers around the real client.
//!
//! ```rust,ignore
//! use korbit_api_client::rest::{KorbitClient, KorbitRestClient};
//! use korbit_api_client::types::CurrencyPair;
//!
//! async fn use_client<C: KorbitClient>(client: &C) -> Result<(), korbit_api_client::KorbitError> {
//!     let ticker = client.get_ticker(CurrencyPair::BtcKrw).await?;
//!     println!("Last: {}", ticker.last);
//!     Ok(())
//! }
//! ```

mod client;
mod endpoints;
mod oauth;
pub mod private;
pub mod public;
mod traits;

pub use client::{KorbitRestClient, KorbitRestClientBuilder};
pub use endpoints::*;
pub use traits::KorbitClient;
