//! Korbit REST API client implementation.

use std::sync::Arc;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Method, Request};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_tracing::TracingMiddleware;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;
use url::Url;

use crate::auth::{CredentialsProvider, IncreasingNonce, NonceProvider, Token};
use crate::error::KorbitError;
use crate::rest::endpoints::KORBIT_BASE_URL;
use crate::types::{ACTIVE_CURRENCY_PAIRS, CurrencyPair};

const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// Key/value pairs of a form body. Keys may repeat.
/// Query carrying only the market, shared by the per-pair endpoints.
#[derive(Debug, Serialize)]
pub(crate) struct PairQuery {
    pub currency_pair: CurrencyPair,
}

pub(crate) type Form = Vec<(&'static str, String)>;

/// The Korbit REST API client.
///
/// Cloning is cheap; clones share the token and the nonce counter.
///
/// # Example
///
/// ```rust,no_run
/// use korbit_api_client::rest::KorbitRestClient;
/// use korbit_api_client::types::CurrencyPair;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     // Public endpoints need no login
///     let client = KorbitRestClient::new();
///     let ticker = client.get_ticker(CurrencyPair::BtcKrw).await?;
///     println!("Last: {}", ticker.last);
///     Ok(())
/// }
/// ```
///
/// For private endpoints, provide credentials and log in:
///
/// ```rust,no_run
/// use korbit_api_client::rest::KorbitRestClient;
/// use korbit_api_client::auth::StaticCredentials;
/// use std::sync::Arc;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let credentials = Arc::new(StaticCredentials::new(
///         "client_id",
///         "client_secret",
///         "me@example.com",
///         "password",
///     ));
///     let client = KorbitRestClient::builder()
///         .credentials(credentials)
///         .build();
///
///     client.login().await?;
///     let wallets = client.get_wallets().await?;
///     println!("Wallets: {:?}", wallets);
///
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct KorbitRestClient {
    http_client: ClientWithMiddleware,
    base_url: String,
    pub(crate) credentials: Option<Arc<dyn CredentialsProvider>>,
    nonce_provider: Arc<dyn NonceProvider>,
    pub(crate) token: Arc<RwLock<Option<Token>>>,
    pub(crate) currency_pairs: Arc<[CurrencyPair]>,
}

impl KorbitRestClient {
    /// Create a new client with default settings.
    ///
    /// This client can only access public endpoints.
    /// Use [`KorbitRestClient::builder()`] to configure credentials for private endpoints.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Create a new client builder.
    pub fn builder() -> KorbitRestClientBuilder {
        KorbitRestClientBuilder::new()
    }

    /// Pairs queried by [`get_wallets`](Self::get_wallets).
    pub fn currency_pairs(&self) -> &[CurrencyPair] {
        &self.currency_pairs
    }

    /// Resolve an endpoint path and optional query parameters into a URL.
    pub(crate) fn endpoint_url<Q>(&self, endpoint: &str, query: Option<&Q>) -> Result<Url, KorbitError>
    where
        Q: Serialize + ?Sized,
    {
        let mut url = Url::parse(&format!("{}{}", self.base_url, endpoint))?;
        if let Some(query) = query {
            let query_string = serde_urlencoded::to_string(query)?;
            if !query_string.is_empty() {
                url.set_query(Some(&query_string));
            }
        }
        Ok(url)
    }

    /// Build a request carrying the current access token.
    ///
    /// POST requests get a form-encoded body; other methods ignore `form`.
    /// Fails with [`KorbitError::MissingToken`] before login.
    pub async fn authorized_request(
        &self,
        method: Method,
        url: Url,
        form: Option<&[(&str, String)]>,
    ) -> Result<Request, KorbitError> {
        let authorization = {
            let token = self.token.read().await;
            token
                .as_ref()
                .ok_or(KorbitError::MissingToken)?
                .authorization()
        };
        let authorization = HeaderValue::from_str(&authorization)
            .map_err(|_| KorbitError::validation("access token is not a valid header value"))?;

        let mut request = Request::new(method, url);
        request.headers_mut().insert(AUTHORIZATION, authorization);
        if *request.method() == Method::POST {
            Self::attach_form(&mut request, form.unwrap_or_default())?;
        }
        Ok(request)
    }

    fn attach_form(request: &mut Request, form: &[(&str, String)]) -> Result<(), KorbitError> {
        let body = serde_urlencoded::to_string(form)?;
        request
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static(FORM_URLENCODED));
        *request.body_mut() = Some(body.into());
        Ok(())
    }

    /// Make an unauthenticated GET request.
    pub(crate) async fn public_get<T, Q>(
        &self,
        operation: &'static str,
        endpoint: &str,
        query: &Q,
    ) -> Result<T, KorbitError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let url = self.endpoint_url(endpoint, Some(query))?;
        let request = Request::new(Method::GET, url);
        self.execute(operation, request).await
    }

    /// Make an unauthenticated form POST (used by the token endpoint).
    pub(crate) async fn public_post<T>(
        &self,
        operation: &'static str,
        endpoint: &str,
        form: &[(&str, String)],
    ) -> Result<T, KorbitError>
    where
        T: DeserializeOwned,
    {
        let url = self.endpoint_url::<()>(endpoint, None)?;
        let mut request = Request::new(Method::POST, url);
        Self::attach_form(&mut request, form)?;
        self.execute(operation, request).await
    }

    /// Make an authenticated GET request.
    pub(crate) async fn private_get<T, Q>(
        &self,
        operation: &'static str,
        endpoint: &str,
        query: &Q,
    ) -> Result<T, KorbitError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let url = self.endpoint_url(endpoint, Some(query))?;
        let request = self.authorized_request(Method::GET, url, None).await?;
        self.execute(operation, request).await
    }

    /// Make an authenticated POST request with a fresh nonce in the body.
    pub(crate) async fn private_post<T>(
        &self,
        operation: &'static str,
        endpoint: &str,
        mut form: Form,
    ) -> Result<T, KorbitError>
    where
        T: DeserializeOwned,
    {
        let url = self.endpoint_url::<()>(endpoint, None)?;
        // Fail on a missing token before consuming a nonce.
        if self.token.read().await.is_none() {
            return Err(KorbitError::MissingToken);
        }
        form.push(("nonce", self.nonce_provider.next_nonce().to_string()));
        let request = self
            .authorized_request(Method::POST, url, Some(form.as_slice()))
            .await?;
        self.execute(operation, request).await
    }

    /// Send a request and decode a successful JSON response.
    async fn execute<T>(&self, operation: &'static str, request: Request) -> Result<T, KorbitError>
    where
        T: DeserializeOwned,
    {
        tracing::debug!(operation, method = %request.method(), url = %request.url(), "sending request");

        let response = self
            .http_client
            .execute(request)
            .await
            .map_err(|e| KorbitError::transport(operation, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(KorbitError::HttpStatus {
                operation,
                status,
                headers: response.headers().clone(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| KorbitError::transport(operation, e))?;

        serde_json::from_str(&body).map_err(|source| {
            tracing::warn!(operation, %status, %body, "failed to decode response");
            KorbitError::Decode {
                operation,
                status,
                source,
            }
        })
    }
}

impl Default for KorbitRestClient {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for KorbitRestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KorbitRestClient")
            .field("base_url", &self.base_url)
            .field("has_credentials", &self.credentials.is_some())
            .field("currency_pairs", &self.currency_pairs)
            .finish()
    }
}

/// Builder for [`KorbitRestClient`].
pub struct KorbitRestClientBuilder {
    base_url: String,
    credentials: Option<Arc<dyn CredentialsProvider>>,
    nonce_provider: Option<Arc<dyn NonceProvider>>,
    token: Option<Token>,
    user_agent: Option<String>,
    currency_pairs: Vec<CurrencyPair>,
}

impl KorbitRestClientBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            base_url: KORBIT_BASE_URL.to_string(),
            credentials: None,
            nonce_provider: None,
            token: None,
            user_agent: None,
            currency_pairs: ACTIVE_CURRENCY_PAIRS.to_vec(),
        }
    }

    /// Set the base URL (useful for testing with a mock server).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the credentials provider used by login and refresh.
    pub fn credentials(mut self, credentials: Arc<dyn CredentialsProvider>) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Set a custom nonce provider.
    pub fn nonce_provider(mut self, provider: Arc<dyn NonceProvider>) -> Self {
        self.nonce_provider = Some(provider);
        self
    }

    /// Start with a previously issued token instead of logging in.
    pub fn token(mut self, token: Token) -> Self {
        self.token = Some(token);
        self
    }

    /// Set a custom user agent.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Set the pairs whose wallets are collected by `get_wallets`.
    ///
    /// Duplicates are dropped; the first occurrence keeps its position.
    pub fn currency_pairs(mut self, pairs: impl IntoIterator<Item = CurrencyPair>) -> Self {
        let mut unique = Vec::new();
        for pair in pairs {
            if !unique.contains(&pair) {
                unique.push(pair);
            }
        }
        self.currency_pairs = unique;
        self
    }

    /// Build the client.
    pub fn build(self) -> KorbitRestClient {
        let mut headers = HeaderMap::new();
        let user_agent = self
            .user_agent
            .unwrap_or_else(|| format!("korbit-api-client/{}", env!("CARGO_PKG_VERSION")));
        let header_value = HeaderValue::from_str(&user_agent)
            .unwrap_or_else(|_| HeaderValue::from_static("korbit-api-client"));
        headers.insert(USER_AGENT, header_value);

        let reqwest_client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        let client = ClientBuilder::new(reqwest_client)
            .with(TracingMiddleware::default())
            .build();

        let nonce_provider = self
            .nonce_provider
            .unwrap_or_else(|| Arc::new(IncreasingNonce::new()));

        KorbitRestClient {
            http_client: client,
            base_url: self.base_url,
            credentials: self.credentials,
            nonce_provider,
            token: Arc::new(RwLock::new(self.token)),
            currency_pairs: self.currency_pairs.into(),
        }
    }
}

impl Default for KorbitRestClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    fn token() -> Token {
        Token::new("abc", "Bearer", 3600, "def", OffsetDateTime::now_utc())
    }

    #[tokio::test]
    async fn test_authorized_request_requires_token() {
        let client = KorbitRestClient::new();
        let url = Url::parse("https://example.com/v1/user/orders/open").unwrap();
        let result = client.authorized_request(Method::GET, url, None).await;
        assert!(matches!(result, Err(KorbitError::MissingToken)));
    }

    #[tokio::test]
    async fn test_authorized_get_has_header_and_no_body() {
        let client = KorbitRestClient::builder().token(token()).build();
        let url = Url::parse("https://example.com/v1/user/orders/open").unwrap();
        let request = client
            .authorized_request(Method::GET, url, None)
            .await
            .unwrap();

        assert_eq!(request.headers()[AUTHORIZATION], "Bearer abc");
        assert!(request.headers().get(CONTENT_TYPE).is_none());
        assert!(request.body().is_none());
    }

    #[tokio::test]
    async fn test_authorized_post_is_form_encoded() {
        let client = KorbitRestClient::builder().token(token()).build();
        let url = Url::parse("https://example.com/v1/user/orders/cancel").unwrap();
        let form = vec![("id", "1".to_string()), ("id", "2".to_string())];
        let request = client
            .authorized_request(Method::POST, url, Some(form.as_slice()))
            .await
            .unwrap();

        assert_eq!(request.headers()[AUTHORIZATION], "Bearer abc");
        assert_eq!(request.headers()[CONTENT_TYPE], FORM_URLENCODED);
        let body = request.body().and_then(|b| b.as_bytes()).unwrap();
        assert_eq!(body, b"id=1&id=2");
    }

    #[test]
    fn test_endpoint_url_with_query() {
        let client = KorbitRestClient::builder()
            .base_url("http://localhost:1234/")
            .build();
        let url = client
            .endpoint_url("/v1/orderbook", Some(&[("currency_pair", "btc_krw")][..]))
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:1234/v1/orderbook?currency_pair=btc_krw"
        );
    }

    #[test]
    fn test_currency_pairs_deduplicated() {
        let client = KorbitRestClient::builder()
            .currency_pairs([
                CurrencyPair::XrpKrw,
                CurrencyPair::BtcKrw,
                CurrencyPair::XrpKrw,
            ])
            .build();
        assert_eq!(
            client.currency_pairs(),
            &[CurrencyPair::XrpKrw, CurrencyPair::BtcKrw]
        );
    }

    #[test]
    fn test_default_pairs_are_active_set() {
        let client = KorbitRestClient::new();
        assert_eq!(client.currency_pairs(), &ACTIVE_CURRENCY_PAIRS);
    }
}
