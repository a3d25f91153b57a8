use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

use super::progress::ProgressReporter;

/// Failures where no HTTP response was obtained
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("connection failed: {0}")]
    Connect(String),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("transport failure: {0}")]
    Io(String),

    /// The request could not be built (bad header, bad MIME type)
    #[error("invalid request: {0}")]
    Build(String),
}

/// A file to send as `multipart/form-data`
#[derive(Clone)]
pub struct UploadPayload {
    /// Form field carrying the file
    pub field_name: String,
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
    /// Receives the fraction of file bytes handed to the wire
    pub progress: Option<ProgressReporter>,
}

impl UploadPayload {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        Self {
            field_name: "file".to_string(),
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
            progress: None,
        }
    }

    #[must_use]
    pub fn with_progress(mut self, progress: ProgressReporter) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for UploadPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadPayload")
            .field("field_name", &self.field_name)
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub enum RequestBody {
    Empty,
    Json(serde_json::Value),
    Multipart(UploadPayload),
}

/// A fully resolved outbound request
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: RequestBody,
    pub timeout: Duration,
}

impl HttpRequest {
    pub fn new(method: Method, url: Url, timeout: Duration) -> Self {
        Self { method, url, headers: HeaderMap::new(), body: RequestBody::Empty, timeout }
    }

    /// Value of the `Authorization` header, if any
    pub fn authorization(&self) -> Option<&str> {
        self.headers.get(reqwest::header::AUTHORIZATION).and_then(|v| v.to_str().ok())
    }

    /// Token carried by a `Bearer` authorization header
    pub fn bearer_token(&self) -> Option<&str> {
        self.authorization().and_then(|v| v.strip_prefix("Bearer "))
    }

    /// JSON body, if any
    pub fn json_body(&self) -> Option<&serde_json::Value> {
        match &self.body {
            RequestBody::Json(value) => Some(value),
            _ => None,
        }
    }
}

/// Status and raw body of a received response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub body: Bytes,
}

impl HttpResponse {
    pub fn new(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self { status, body: body.into() }
    }

    pub fn json(status: StatusCode, value: &serde_json::Value) -> Self {
        Self::new(status, value.to_string())
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Body as text, lossy on invalid UTF-8
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Deserialize the body
    ///
    /// 204/205 and blank bodies deserialize from JSON `null`.
    ///
    /// # Errors
    /// Returns the serde error when the body does not match `T`
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        let blank = self.body.iter().all(u8::is_ascii_whitespace);
        if self.status == StatusCode::NO_CONTENT || self.status == StatusCode::RESET_CONTENT || blank
        {
            serde_json::from_value(serde_json::Value::Null)
        } else {
            serde_json::from_slice(&self.body)
        }
    }
}

/// Sends one request and returns the response, whatever its status
///
/// Implementations never interpret statuses; only failures that produced no
/// response at all are errors.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}
