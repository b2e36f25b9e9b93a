//! Error types for the transport layer.

use serde_json::Value;
use thiserror::Error;

/// Errors a transport can report for a single request.
///
/// These are raw transport outcomes. `axabsent_core` folds them into its
/// smaller client-facing taxonomy and never shows them to callers directly.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TransportError {
    /// No response within the configured client timeout
    #[error("Timeout after {0}ms")]
    Timeout(u64),

    /// Connection refused, DNS failure, reset, redirect loop, etc.
    #[error("Network error: {0}")]
    Network(String),

    /// The backend answered with a non-2xx status.
    ///
    /// `body` is the decoded payload (`Value::Null` when the body was empty).
    #[error("HTTP status {status}")]
    Status { status: u16, body: Value },

    /// Response body could not be read
    #[error("Decode error: {0}")]
    Decode(String),

    /// The request could not be built (bad URL, bad header)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl TransportError {
    /// Creates a network error.
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Creates a status error carrying a response body.
    pub fn status(status: u16, body: Value) -> Self {
        Self::Status { status, body }
    }
}
