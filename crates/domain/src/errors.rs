//! Error types used throughout the application
//!
//! Every failure a caller can observe is one of the [`VisadeskError`]
//! variants. Presentation (toast, inline field error, redirect to login) is
//! decided by callers from the variant and its [`ErrorCategory`].

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single field-level validation failure raised before any network call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field: field.into(), message: message.into(), code: None }
    }

    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Main error type for Visadesk
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "details")]
pub enum VisadeskError {
    /// Refresh failed, or a protected call was made without credentials.
    #[error("Session expired: sign in again")]
    AuthExpired,

    /// The server answered with a non-success status.
    #[error("API error {status}: {message}")]
    Api { status: u16, code: Option<String>, message: String },

    /// No response could be obtained from the server.
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Request cancelled")]
    Cancelled,

    #[error("Validation failed: {}", join_field_errors(.0))]
    Validation(Vec<FieldError>),

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Credential storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

fn join_field_errors(errors: &[FieldError]) -> String {
    errors.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
}

/// Coarse classification used for presentation and retry decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Credentials are gone; the caller must send the user to login
    Authentication,
    /// 4xx other than 401
    Client,
    /// 5xx
    Server,
    /// Unreachable host, timeouts
    Network,
    /// Client-side validation, never reached the network
    Validation,
    Config,
    Internal,
}

impl VisadeskError {
    /// Build an API error from a status and message
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api { status, code: None, message: message.into() }
    }

    /// Build a validation error for a single field
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation(vec![FieldError::new(field, message)])
    }

    /// Get the error category for this error
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::AuthExpired => ErrorCategory::Authentication,
            Self::Api { status, .. } if *status >= 500 => ErrorCategory::Server,
            Self::Api { .. } => ErrorCategory::Client,
            Self::Network(_) | Self::Timeout(_) => ErrorCategory::Network,
            Self::Validation(_) => ErrorCategory::Validation,
            Self::Config(_) => ErrorCategory::Config,
            Self::Cancelled | Self::Decode(_) | Self::Storage(_) | Self::Internal(_) => {
                ErrorCategory::Internal
            }
        }
    }

    /// Whether the server was never reached
    pub fn is_network(&self) -> bool {
        self.category() == ErrorCategory::Network
    }

    /// Check if a caller-side retry policy may retry this error
    pub fn is_retryable(&self) -> bool {
        matches!(self.category(), ErrorCategory::Network | ErrorCategory::Server)
    }

    /// HTTP status carried by the error, if the server responded
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Field errors for inline display
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            Self::Validation(errors) => errors,
            _ => &[],
        }
    }
}

impl From<serde_json::Error> for VisadeskError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

/// Result type alias for Visadesk operations
pub type Result<T> = std::result::Result<T, VisadeskError>;
