//! Failure body returned by the task API on non-success responses.

use serde::{Deserialize, Serialize};

/// JSON body of a failed request: `{"detail": ...}`.
///
/// `detail` is usually a human-readable string, but validation failures
/// may carry structured data (a list of field errors). Only string details
/// are surfaced to users; see [`ErrorDetail::message`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Raw `detail` value as sent by the server.
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl ErrorDetail {
    /// Parses a response body, returning `None` if it is not a JSON object
    /// with the expected shape.
    #[must_use]
    pub fn parse(body: &[u8]) -> Option<Self> {
        serde_json::from_slice(body).ok()
    }

    /// The server-supplied message, if `detail` is a non-empty string.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match &self.detail {
            Some(serde_json::Value::String(s)) if !s.trim().is_empty() => Some(s),
            _ => None,
        }
    }
}
