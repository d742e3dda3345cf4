//! Error types for the Korbit client library.

use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use thiserror::Error;

use crate::rest::private::OrderResult;
use crate::types::{BookSide, ResponseStatus};

/// The main error type for all Korbit client operations.
#[derive(Error, Debug)]
pub enum KorbitError {
    /// The request never produced a response (connect, TLS, DNS) or the body
    /// could not be read.
    #[error("{operation}: HTTP request failed: {source}")]
    Transport {
        /// The client operation that issued the request
        operation: &'static str,
        /// The underlying transport error
        #[source]
        source: reqwest_middleware::Error,
    },

    /// The exchange answered with a non-success HTTP status.
    #[error("{operation}: unexpected HTTP status {status}, headers: {headers:?}")]
    HttpStatus {
        /// The client operation that issued the request
        operation: &'static str,
        /// Status code returned by the exchange
        status: StatusCode,
        /// Response headers, kept for diagnosis
        headers: HeaderMap,
    },

    /// The response body did not match the expected shape.
    #[error("{operation}: failed to decode response (HTTP {status}): {source}")]
    Decode {
        /// The client operation that issued the request
        operation: &'static str,
        /// Status code of the undecodable response
        status: StatusCode,
        /// The JSON error
        #[source]
        source: serde_json::Error,
    },

    /// The exchange accepted the request but reported a non-success order status.
    ///
    /// The decoded result is kept so callers can inspect it.
    #[error("order not successful: {status}")]
    Rejected {
        /// Status reported by the exchange
        status: ResponseStatus,
        /// The enriched order result
        order: Box<OrderResult>,
    },

    /// An orderbook level could not be converted to numbers.
    #[error("invalid {side} {field} in orderbook: {value:?}")]
    Orderbook {
        /// Which side of the book failed
        side: BookSide,
        /// Which field of the level failed (`price`, `quantity` or `level`)
        field: &'static str,
        /// The offending wire text
        value: String,
    },

    /// Local input was rejected before any network I/O.
    #[error("invalid input: {0}")]
    Validation(String),

    /// An authenticated request was attempted before a token was obtained.
    #[error("no access token: login must complete before calling private endpoints")]
    MissingToken,

    /// Login or token refresh failed.
    #[error("authentication failed: {0}")]
    Auth(#[source] Box<KorbitError>),

    /// URL parsing error
    #[error("URL parsing error: {0}")]
    Url(#[from] url::ParseError),

    /// Form or query string encoding error
    #[error("form encoding error: {0}")]
    Encode(#[from] serde_urlencoded::ser::Error),
}

impl KorbitError {
    pub(crate) fn transport(
        operation: &'static str,
        source: impl Into<reqwest_middleware::Error>,
    ) -> Self {
        Self::Transport {
            operation,
            source: source.into(),
        }
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Check if this error was raised locally, before any request was sent.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::MissingToken | Self::Url(_) | Self::Encode(_)
        )
    }

    /// Check if the exchange refused the access token.
    ///
    /// Expired tokens are not detected locally; the exchange answers with 401.
    pub fn is_unauthorized(&self) -> bool {
        match self {
            Self::HttpStatus { status, .. } => *status == StatusCode::UNAUTHORIZED,
            Self::Auth(inner) => inner.is_unauthorized(),
            _ => false,
        }
    }

    /// The order result attached to a rejection, if any.
    pub fn rejected_order(&self) -> Option<&OrderResult> {
        match self {
            Self::Rejected { order, .. } => Some(&**order),
            _ => None,
        }
    }
}
