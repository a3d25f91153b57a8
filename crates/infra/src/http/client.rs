use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream;
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client as ReqwestClient};
use tracing::debug;
use visadesk_domain::constants::{DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_USER_AGENT, UPLOAD_CHUNK_BYTES};

use super::progress::{chunks, ProgressReporter};
use super::transport::{
    HttpRequest, HttpResponse, RequestBody, Transport, TransportError, UploadPayload,
};

/// Transport backed by a pooled reqwest client
///
/// Sends each request exactly once. Retries belong to callers.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: ReqwestClient,
}

impl ReqwestTransport {
    /// Start building a new transport.
    pub fn builder() -> ReqwestTransportBuilder {
        ReqwestTransportBuilder::default()
    }

    /// Convenience constructor with default configuration.
    ///
    /// # Errors
    /// Returns `TransportError::Build` if the TLS backend cannot be initialized
    pub fn new() -> Result<Self, TransportError> {
        Self::builder().build()
    }

    fn multipart(payload: UploadPayload) -> Result<Form, TransportError> {
        let UploadPayload { field_name, file_name, content_type, bytes, progress } = payload;
        let len = bytes.len() as u64;
        let part = Part::stream_with_length(progress_body(bytes, progress), len)
            .file_name(file_name)
            .mime_str(&content_type)
            .map_err(|err| TransportError::Build(format!("invalid content type: {err}")))?;
        Ok(Form::new().part(field_name, part))
    }
}

/// Stream `bytes` in fixed-size chunks, reporting progress as each chunk is
/// pulled by the connection
fn progress_body(bytes: Bytes, progress: Option<ProgressReporter>) -> Body {
    let total = bytes.len();
    let mut sent = 0usize;
    let parts = chunks(&bytes, UPLOAD_CHUNK_BYTES).into_iter().map(move |chunk| {
        sent += chunk.len();
        if let Some(progress) = &progress {
            progress.bytes(sent, total);
        }
        Ok::<Bytes, std::io::Error>(chunk)
    });
    Body::wrap_stream(stream::iter(parts))
}

fn classify(err: &reqwest::Error, timeout: Duration) -> TransportError {
    if err.is_timeout() {
        return TransportError::Timeout(timeout);
    }
    if err.is_builder() {
        return TransportError::Build(err.to_string());
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        if err.is_connect() {
            return TransportError::Connect(err.to_string());
        }
    }
    TransportError::Io(err.to_string())
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let HttpRequest { method, url, headers, body, timeout } = request;
        debug!(%method, %url, "sending HTTP request");

        let mut builder =
            self.client.request(method.clone(), url.clone()).headers(headers).timeout(timeout);
        builder = match body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Multipart(payload) => builder.multipart(Self::multipart(payload)?),
        };

        let response = builder.send().await.map_err(|err| {
            debug!(%method, %url, error = %err, "HTTP request failed");
            classify(&err, timeout)
        })?;
        let status = response.status();
        let body = response.bytes().await.map_err(|err| classify(&err, timeout))?;
        debug!(%method, %url, %status, "received HTTP response");

        Ok(HttpResponse { status, body })
    }
}

/// Builder for [`ReqwestTransport`].
#[derive(Debug)]
pub struct ReqwestTransportBuilder {
    timeout: Duration,
    connect_timeout: Duration,
    user_agent: Option<String>,
    default_headers: Option<reqwest::header::HeaderMap>,
}

impl Default for ReqwestTransportBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(10),
            user_agent: None,
            default_headers: None,
        }
    }
}

impl ReqwestTransportBuilder {
    /// Upper bound for requests that do not carry their own timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    pub fn default_headers(mut self, headers: reqwest::header::HeaderMap) -> Self {
        self.default_headers = Some(headers);
        self
    }

    /// # Errors
    /// Returns `TransportError::Build` if the reqwest client cannot be built
    pub fn build(self) -> Result<ReqwestTransport, TransportError> {
        let mut builder = ReqwestClient::builder()
            .timeout(self.timeout)
            .connect_timeout(self.connect_timeout)
            .user_agent(self.user_agent.unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()))
            .no_proxy();

        if let Some(headers) = self.default_headers {
            builder = builder.default_headers(headers);
        }

        let client = builder.build().map_err(|err| TransportError::Build(err.to_string()))?;
        Ok(ReqwestTransport { client })
    }
}
