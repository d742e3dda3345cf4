//! Authentication module for the Korbit API.
//!
//! This module provides:
//! - Credential management with secure secret storage
//! - OAuth2 access tokens with expiry tracking
//! - Nonce generation for replay protection on writes

mod credentials;
mod nonce;
mod token;

pub use credentials::{Credentials, CredentialsProvider, StaticCredentials};
pub use nonce::{IncreasingNonce, NonceProvider};
pub use token::{REFRESH_MARGIN_SECS, Token};

pub(crate) use token::TokenResponse;
