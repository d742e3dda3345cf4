//! OAuth2 access tokens and their expiry policy.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use time::{Duration, OffsetDateTime};

/// Seconds before expiry at which a token is considered due for refresh.
pub const REFRESH_MARGIN_SECS: i64 = 600;

/// An access token issued by the Korbit OAuth2 endpoint.
///
/// Tokens are never edited in place; login and refresh produce a new one.
#[derive(Clone)]
pub struct Token {
    access_token: SecretString,
    /// Scheme used in the `Authorization` header (normally `Bearer`)
    pub token_type: String,
    /// Lifetime in seconds, counted from `issued_at`
    pub expires_in: u64,
    /// Local time the token was received
    pub issued_at: OffsetDateTime,
    refresh_token: SecretString,
}

/// Token fields as returned by the token endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub refresh_token: String,
}

impl Token {
    /// Create a token that was issued at `issued_at`.
    pub fn new(
        access_token: impl Into<String>,
        token_type: impl Into<String>,
        expires_in: u64,
        refresh_token: impl Into<String>,
        issued_at: OffsetDateTime,
    ) -> Self {
        Self {
            access_token: SecretString::from(access_token.into()),
            token_type: token_type.into(),
            expires_in,
            issued_at,
            refresh_token: SecretString::from(refresh_token.into()),
        }
    }

    pub(crate) fn issued(response: TokenResponse, issued_at: OffsetDateTime) -> Self {
        Self::new(
            response.access_token,
            response.token_type,
            response.expires_in,
            response.refresh_token,
            issued_at,
        )
    }

    /// The raw access token.
    pub fn expose_access_token(&self) -> &str {
        self.access_token.expose_secret()
    }

    /// The refresh token to present on the next refresh.
    pub fn expose_refresh_token(&self) -> &str {
        self.refresh_token.expose_secret()
    }

    /// Value of the `Authorization` header: `<token_type> <access_token>`.
    pub fn authorization(&self) -> String {
        format!("{} {}", self.token_type, self.expose_access_token())
    }

    /// Instant after which the exchange stops accepting the token.
    ///
    /// `None` when the lifetime reaches past what `OffsetDateTime` can hold.
    pub fn expires_at(&self) -> Option<OffsetDateTime> {
        self.lifetime_end(0)
    }

    /// Check if the token is past its lifetime at `now`.
    pub fn is_expired(&self, now: OffsetDateTime) -> bool {
        self.expires_at().is_some_and(|at| now >= at)
    }

    /// Check if fewer than [`REFRESH_MARGIN_SECS`] remain at `now`.
    ///
    /// A lifetime too large to represent is never due.
    pub fn needs_refresh(&self, now: OffsetDateTime) -> bool {
        self.lifetime_end(REFRESH_MARGIN_SECS)
            .is_some_and(|due| now >= due)
    }

    fn lifetime_end(&self, margin_secs: i64) -> Option<OffsetDateTime> {
        let secs = i64::try_from(self.expires_in).ok()?.checked_sub(margin_secs)?;
        self.issued_at.checked_add(Duration::seconds(secs))
    }
}

impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Token")
            .field("access_token", &"[REDACTED]")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .field("issued_at", &self.issued_at)
            .field("refresh_token", &"[REDACTED]")
            .finish()
    }
}
