//! Error body parsing
//!
//! Turns a non-success response into [`VisadeskError::Api`], keeping the
//! server's status, code and message.

use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use visadesk_domain::VisadeskError;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum MessageField {
    One(String),
    Many(Vec<String>),
}

impl MessageField {
    fn into_text(self) -> String {
        match self {
            Self::One(message) => message,
            Self::Many(messages) => messages.join("; "),
        }
    }
}

/// `{message, code|error, statusCode}` as sent by the backend
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    #[serde(default)]
    message: Option<MessageField>,
    #[serde(default)]
    code: Option<Value>,
    #[serde(default)]
    error: Option<String>,
}

fn code_text(code: Value) -> Option<String> {
    match code {
        Value::String(code) if !code.trim().is_empty() => Some(code),
        Value::Number(code) => Some(code.to_string()),
        _ => None,
    }
}

/// Build the error for a non-success response
///
/// Unparseable or empty bodies fall back to the canonical reason phrase.
pub fn error_from_response(status: StatusCode, body: &[u8]) -> VisadeskError {
    let parsed: ErrorBody = serde_json::from_slice(body).unwrap_or_default();

    let code = parsed
        .code
        .and_then(code_text)
        .or_else(|| parsed.error.clone().filter(|e| !e.trim().is_empty()));
    let message = parsed
        .message
        .map(MessageField::into_text)
        .filter(|m| !m.trim().is_empty())
        .or(parsed.error)
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown error").to_string());

    VisadeskError::Api { status: status.as_u16(), code, message }
}
