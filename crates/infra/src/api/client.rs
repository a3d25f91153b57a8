//! Authenticated API client
//!
//! Single choke point for every call to the case-management backend. Attaches
//! the session's bearer token, turns non-success statuses into
//! [`VisadeskError::Api`], and answers a 401 with exactly one refresh and one
//! retransmission.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};
use url::Url;
use visadesk_common::privacy::redact_token;
use visadesk_core::Session;
use visadesk_domain::constants::{
    is_public_path, DEFAULT_API_BASE_URL, DEFAULT_REQUEST_TIMEOUT_SECS, HEALTH_CHECK_TIMEOUT_SECS,
};
use visadesk_domain::{ApiConfig, Result, VisadeskError};

use super::errors::error_from_response;
use crate::errors::InfraError;
use crate::http::{HttpRequest, HttpResponse, ProgressReporter, RequestBody, Transport, UploadPayload};

/// Configuration for API client
#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    /// Base URL every path is appended to (e.g. "http://localhost:3001/api")
    pub base_url: String,
    /// Timeout for requests that do not carry their own
    pub timeout: Duration,
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

impl From<&ApiConfig> for ApiClientConfig {
    fn from(config: &ApiConfig) -> Self {
        Self { base_url: config.base_url.clone(), timeout: Duration::from_secs(config.timeout_secs) }
    }
}

/// Per-call options
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Overrides the client's default timeout
    pub timeout: Option<Duration>,
    /// Resolves the call to `Cancelled` when triggered
    pub cancel: Option<CancellationToken>,
    /// Send without requiring credentials, even if the path is not listed
    /// as public
    pub public: bool,
    /// Query-string pairs appended to the URL
    pub query: Vec<(String, String)>,
}

impl RequestOptions {
    /// Options with the client defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Give up on the call after `timeout`
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Abort the call when `token` is cancelled
    #[must_use]
    pub fn cancel(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Send without an `Authorization` header
    #[must_use]
    pub fn public(mut self) -> Self {
        self.public = true;
        self
    }

    /// Append query-string pairs, keeping their order
    #[must_use]
    pub fn query<K: Into<String>, V: Into<String>>(
        mut self,
        pairs: impl IntoIterator<Item = (K, V)>,
    ) -> Self {
        self.query.extend(pairs.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }
}

/// Build an API path from raw segments, percent-encoding each one
///
/// `api_path(&["cases", "a/b"])` is `/cases/a%2Fb`.
pub fn api_path(segments: &[&str]) -> String {
    segments.iter().map(|segment| format!("/{}", urlencoding::encode(segment))).collect()
}

/// HTTP client bound to one backend and one session
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    session: Arc<Session>,
    config: ApiClientConfig,
}

impl ApiClient {
    /// Create a new API client
    ///
    /// # Errors
    /// Returns `Config` if the base URL cannot be parsed
    pub fn new(
        config: ApiClientConfig,
        transport: Arc<dyn Transport>,
        session: Arc<Session>,
    ) -> Result<Self> {
        Url::parse(&config.base_url).map_err(|err| VisadeskError::from(InfraError::from(err)))?;
        Ok(Self { transport, session, config })
    }

    /// Create a builder for fluent configuration
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    /// Session whose credentials authorize protected calls
    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Configuration the client was built with
    pub fn config(&self) -> &ApiClientConfig {
        &self.config
    }

    /// Send a JSON request and return the parsed response body
    ///
    /// # Errors
    /// `Api` for non-success statuses, `Network`/`Timeout` when no response
    /// arrived, `AuthExpired` when credentials are missing or the refresh
    /// failed, `Cancelled` when the cancel token fired.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        options: RequestOptions,
    ) -> Result<Value> {
        self.request_as(method, path, body, options).await
    }

    /// Like [`ApiClient::request`], deserializing into `T`
    ///
    /// # Errors
    /// As [`ApiClient::request`], plus `Decode` when the body does not match `T`
    pub async fn request_as<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        options: RequestOptions,
    ) -> Result<T> {
        let body = body.map_or(RequestBody::Empty, RequestBody::Json);
        let response = self.execute(method, path, body, &options).await?;
        Ok(response.parse()?)
    }

    /// # Errors
    /// See [`ApiClient::request`]
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.request_as(Method::GET, path, None, RequestOptions::default()).await
    }

    /// # Errors
    /// See [`ApiClient::request`]
    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let body = serde_json::to_value(body)?;
        self.request_as(Method::POST, path, Some(body), RequestOptions::default()).await
    }

    /// # Errors
    /// See [`ApiClient::request`]
    pub async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let body = serde_json::to_value(body)?;
        self.request_as(Method::PUT, path, Some(body), RequestOptions::default()).await
    }

    /// # Errors
    /// See [`ApiClient::request`]
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.request_as(Method::DELETE, path, None, RequestOptions::default()).await
    }

    /// Upload a file as `multipart/form-data`
    ///
    /// `on_progress` receives non-decreasing fractions and ends at `1.0` when
    /// the upload succeeds.
    ///
    /// # Errors
    /// See [`ApiClient::request`]
    #[instrument(skip(self, file, on_progress, options), fields(path = %path, bytes = file.len()))]
    pub async fn upload<T: DeserializeOwned>(
        &self,
        path: &str,
        file: UploadPayload,
        on_progress: Option<ProgressReporter>,
        options: RequestOptions,
    ) -> Result<T> {
        let file = match on_progress.clone() {
            Some(progress) => file.with_progress(progress),
            None => file,
        };
        let response = self.execute(Method::POST, path, RequestBody::Multipart(file), &options).await?;
        let parsed = response.parse()?;
        if let Some(progress) = on_progress {
            progress.finish();
        }
        info!(path = %path, "upload completed");
        Ok(parsed)
    }

    /// Health check for API
    ///
    /// Returns `false` when the backend answers with a non-success status.
    ///
    /// # Errors
    /// Returns an error if no response arrives within 5 seconds
    #[instrument(skip(self))]
    pub async fn health_check(&self) -> Result<bool> {
        let options =
            RequestOptions::new().public().timeout(Duration::from_secs(HEALTH_CHECK_TIMEOUT_SECS));
        let request = self.build(Method::GET, "/health", RequestBody::Empty, &options, None)?;

        match self.send(request, None).await {
            Ok(response) if response.is_success() => {
                info!("API is healthy");
                Ok(true)
            }
            Ok(response) => {
                warn!(status = %response.status, "API returned non-success status");
                Ok(false)
            }
            Err(err) => {
                warn!(error = %err, "Health check failed");
                Err(err)
            }
        }
    }

    #[instrument(skip(self, body, options), fields(%method, path = %path))]
    async fn execute(
        &self,
        method: Method,
        path: &str,
        body: RequestBody,
        options: &RequestOptions,
    ) -> Result<HttpResponse> {
        let public = options.public || is_public_path(path);
        let token = if public {
            self.session.current_access_token()
        } else {
            match self.session.access_token().await {
                Some(token) => Some(token),
                None => {
                    debug!("protected call without credentials");
                    return Err(VisadeskError::AuthExpired);
                }
            }
        };

        let request = self.build(method.clone(), path, body.clone(), options, token.as_deref())?;
        let response = self.send(request, options.cancel.as_ref()).await?;

        if response.status != StatusCode::UNAUTHORIZED || public {
            return Self::check(response);
        }
        let Some(rejected) = token else {
            return Err(VisadeskError::AuthExpired);
        };

        // The exchange is shared with other waiters, so it is not abandoned
        // when this call is cancelled.
        let fresh = self.session.refresh_after_rejection(&rejected).await?;
        debug!(token = %redact_token(&fresh), "retransmitting after refresh");

        let retry = self.build(method, path, body, options, Some(&fresh))?;
        let response = self.send(retry, options.cancel.as_ref()).await?;
        Self::check(response)
    }

    fn build(
        &self,
        method: Method,
        path: &str,
        body: RequestBody,
        options: &RequestOptions,
        token: Option<&str>,
    ) -> Result<HttpRequest> {
        let mut url = self.url(path)?;
        if !options.query.is_empty() {
            url.query_pairs_mut().extend_pairs(options.query.iter());
        }

        let timeout = options.timeout.unwrap_or(self.config.timeout);
        let mut request = HttpRequest::new(method, url, timeout);
        if let Some(token) = token {
            let mut value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| {
                VisadeskError::Internal("access token is not a valid header value".into())
            })?;
            value.set_sensitive(true);
            request.headers.insert(AUTHORIZATION, value);
        }
        request.body = body;
        Ok(request)
    }

    fn url(&self, path: &str) -> Result<Url> {
        let base = self.config.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Url::parse(&format!("{base}/{path}")).map_err(|err| InfraError::from(err).into())
    }

    async fn send(
        &self,
        request: HttpRequest,
        cancel: Option<&CancellationToken>,
    ) -> Result<HttpResponse> {
        debug!(method = %request.method, url = %request.url, "sending request");
        let outcome = match cancel {
            Some(cancel) => {
                tokio::select! {
                    biased;
                    () = cancel.cancelled() => return Err(VisadeskError::Cancelled),
                    outcome = self.transport.send(request) => outcome,
                }
            }
            None => self.transport.send(request).await,
        };
        outcome.map_err(|err| InfraError::from(err).into())
    }

    fn check(response: HttpResponse) -> Result<HttpResponse> {
        if response.is_success() {
            Ok(response)
        } else {
            Err(error_from_response(response.status, &response.body))
        }
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("config", &self.config)
            .field("session", &self.session.state())
            .finish_non_exhaustive()
    }
}

/// Builder for API client
#[derive(Default)]
pub struct ApiClientBuilder {
    config: Option<ApiClientConfig>,
    transport: Option<Arc<dyn Transport>>,
    session: Option<Arc<Session>>,
}

impl ApiClientBuilder {
    /// Set the API configuration
    pub fn config(mut self, config: ApiClientConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Set the session supplying and refreshing credentials
    pub fn session(mut self, session: Arc<Session>) -> Self {
        self.session = Some(session);
        self
    }

    /// Build the API client
    ///
    /// # Errors
    /// Returns `Config` if the transport or session is missing, or the base
    /// URL is invalid
    pub fn build(self) -> Result<ApiClient> {
        let config = self.config.unwrap_or_default();
        let transport =
            self.transport.ok_or_else(|| VisadeskError::Config("Transport not set".into()))?;
        let session =
            self.session.ok_or_else(|| VisadeskError::Config("Session not set".into()))?;

        ApiClient::new(config, transport, session)
    }
}
