//! OAuth2 token lifecycle: login, refresh and expiry checks.
//!
//! Nothing here runs implicitly. Callers check [`KorbitRestClient::should_refresh`]
//! between operations and call [`KorbitRestClient::refresh_token`] themselves.

use time::OffsetDateTime;

use crate::auth::{Credentials, Token, TokenResponse};
use crate::error::KorbitError;
use crate::rest::KorbitRestClient;
use crate::rest::endpoints::ACCESS_TOKEN;

impl KorbitRestClient {
    /// Log in with the password grant and store the issued token.
    ///
    /// Failures of the token endpoint (transport, HTTP status, undecodable
    /// body) are wrapped in [`KorbitError::Auth`]. A client built without
    /// credentials fails with [`KorbitError::Validation`] before sending.
    #[tracing::instrument(skip(self))]
    pub async fn login(&self) -> Result<Token, KorbitError> {
        let credentials = self.credentials()?;
        let form = [
            ("client_id", credentials.client_id.clone()),
            ("client_secret", credentials.expose_client_secret().to_string()),
            ("username", credentials.username.clone()),
            ("password", credentials.expose_password().to_string()),
            ("grant_type", "password".to_string()),
        ];
        self.request_token("login", &form).await
    }

    /// Exchange the held refresh token for a new token.
    ///
    /// The held token is replaced only once the new one has been decoded.
    #[tracing::instrument(skip(self))]
    pub async fn refresh_token(&self) -> Result<Token, KorbitError> {
        let credentials = self.credentials()?;
        let refresh_token = self
            .token
            .read()
            .await
            .as_ref()
            .map(|token| token.expose_refresh_token().to_string())
            .ok_or(KorbitError::MissingToken)?;

        let form = [
            ("client_id", credentials.client_id.clone()),
            ("client_secret", credentials.expose_client_secret().to_string()),
            ("refresh_token", refresh_token),
            ("grant_type", "refresh_token".to_string()),
        ];
        self.request_token("refresh_token", &form).await
    }

    /// A copy of the currently held token.
    pub async fn token(&self) -> Option<Token> {
        self.token.read().await.clone()
    }

    /// Replace the held token, e.g. with one persisted by the caller.
    pub async fn set_token(&self, token: Token) {
        *self.token.write().await = Some(token);
    }

    /// Check if the held token is within the refresh margin of its expiry.
    ///
    /// Fails with [`KorbitError::MissingToken`] before login.
    pub async fn should_refresh(&self) -> Result<bool, KorbitError> {
        self.needs_refresh_at(OffsetDateTime::now_utc()).await
    }

    /// Like [`should_refresh`](Self::should_refresh) with an explicit clock.
    pub async fn needs_refresh_at(&self, now: OffsetDateTime) -> Result<bool, KorbitError> {
        self.token
            .read()
            .await
            .as_ref()
            .map(|token| token.needs_refresh(now))
            .ok_or(KorbitError::MissingToken)
    }

    fn credentials(&self) -> Result<&Credentials, KorbitError> {
        self.credentials
            .as_ref()
            .map(|provider| provider.get_credentials())
            .ok_or_else(|| KorbitError::validation("credentials are required to obtain a token"))
    }

    async fn request_token(
        &self,
        operation: &'static str,
        form: &[(&str, String)],
    ) -> Result<Token, KorbitError> {
        let response: TokenResponse = self
            .public_post(operation, ACCESS_TOKEN, form)
            .await
            .map_err(|e| KorbitError::Auth(Box::new(e)))?;

        let token = Token::issued(response, OffsetDateTime::now_utc());
        tracing::debug!(
            operation,
            expires_in = token.expires_in,
            "access token issued"
        );

        *self.token.write().await = Some(token.clone());
        Ok(token)
    }
}
