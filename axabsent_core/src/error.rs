//! Client-facing error taxonomy.

use axabsent_env::TransportError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Stable machine-readable error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Precondition failed locally; nothing was sent
    ValidationError,
    Timeout,
    NetworkError,
    /// Backend answered but without a usable payload
    InvalidResponse,
    Unknown,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::Timeout => "TIMEOUT",
            ErrorCode::NetworkError => "NETWORK_ERROR",
            ErrorCode::InvalidResponse => "INVALID_RESPONSE",
            ErrorCode::Unknown => "UNKNOWN",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Every failure the API client can report.
///
/// Raw transport errors never reach callers; they are folded into this
/// enum by the `From<TransportError>` impl below.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApiError {
    /// Local precondition failed before any request was attempted
    #[error("{0}")]
    Validation(String),

    #[error("TIMEOUT")]
    Timeout { after_ms: u64 },

    #[error("NETWORK_ERROR")]
    Network(String),

    /// Error status with a body; shows the backend's message when it sent one
    #[error("{}", .message.as_deref().unwrap_or("INVALID_RESPONSE"))]
    Backend { status: u16, message: Option<String> },

    /// Success status but the payload did not have the expected shape
    #[error("INVALID_RESPONSE")]
    InvalidResponse(String),

    #[error("Unknown API error.")]
    Unknown(String),
}

impl ApiError {
    /// Creates a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Creates an invalid-response error.
    pub fn invalid_response(detail: impl Into<String>) -> Self {
        Self::InvalidResponse(detail.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            ApiError::Validation(_) => ErrorCode::ValidationError,
            ApiError::Timeout { .. } => ErrorCode::Timeout,
            ApiError::Network(_) => ErrorCode::NetworkError,
            ApiError::Backend { .. } | ApiError::InvalidResponse(_) => ErrorCode::InvalidResponse,
            ApiError::Unknown(_) => ErrorCode::Unknown,
        }
    }

    /// True when the request never left the process.
    pub fn is_local(&self) -> bool {
        matches!(self, ApiError::Validation(_))
    }
}

/// Pulls a human-readable message out of an error body.
///
/// The dashboard routes send `{"message": ...}`; FastAPI handlers send
/// `{"detail": ...}`. Empty strings count as absent.
fn backend_message(body: &Value) -> Option<String> {
    ["message", "detail"]
        .iter()
        .filter_map(|key| body.get(*key).and_then(Value::as_str))
        .find(|msg| !msg.is_empty())
        .map(str::to_string)
}

fn has_payload(body: &Value) -> bool {
    match body {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

impl From<TransportError> for ApiError {
    /// Priority: timeout, connectivity, error body, anything else.
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Timeout(after_ms) => ApiError::Timeout { after_ms },
            TransportError::Network(detail) => ApiError::Network(detail),
            TransportError::Status { status, body } if has_payload(&body) => ApiError::Backend {
                status,
                message: backend_message(&body),
            },
            TransportError::Status { status, .. } => {
                ApiError::Unknown(format!("HTTP status {} with empty body", status))
            }
            TransportError::Decode(detail) | TransportError::InvalidRequest(detail) => {
                ApiError::Unknown(detail)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_timeout_and_network_are_distinct() {
        let timeout = ApiError::from(TransportError::Timeout(10_000));
        let network = ApiError::from(TransportError::network("connection refused"));

        assert_eq!(timeout.to_string(), "TIMEOUT");
        assert_eq!(timeout.code(), ErrorCode::Timeout);
        assert_eq!(network.to_string(), "NETWORK_ERROR");
        assert_eq!(network.code(), ErrorCode::NetworkError);
    }

    #[test]
    fn test_backend_message_passthrough() {
        let err = ApiError::from(TransportError::status(
            400,
            json!({"message": "Signature rank exceeds 6"}),
        ));
        assert_eq!(err.to_string(), "Signature rank exceeds 6");
        assert_eq!(err.code(), ErrorCode::InvalidResponse);

        let err = ApiError::from(TransportError::status(404, json!({"detail": "Not Found"})));
        assert_eq!(err.to_string(), "Not Found");
    }

    #[test]
    fn test_backend_without_message() {
        let err = ApiError::from(TransportError::status(500, json!({"error_code": "X"})));
        assert_eq!(err.to_string(), "INVALID_RESPONSE");

        let err = ApiError::from(TransportError::status(502, json!("<html>Bad Gateway</html>")));
        assert_eq!(err.to_string(), "INVALID_RESPONSE");

        let err = ApiError::from(TransportError::status(422, json!({"detail": [{"loc": ["body"]}]})));
        assert_eq!(err.to_string(), "INVALID_RESPONSE");
    }

    #[test]
    fn test_empty_body_is_unknown() {
        let err = ApiError::from(TransportError::status(503, Value::Null));
        assert_eq!(err.to_string(), "Unknown API error.");
        assert_eq!(err.code(), ErrorCode::Unknown);

        let err = ApiError::from(TransportError::Decode("truncated body".into()));
        assert_eq!(err.code(), ErrorCode::Unknown);
    }

    #[test]
    fn test_validation_is_local() {
        let err = ApiError::validation("Invalid Interaction Payload.");
        assert!(err.is_local());
        assert_eq!(err.code().as_str(), "VALIDATION_ERROR");
        assert_eq!(err.to_string(), "Invalid Interaction Payload.");
        assert!(!ApiError::Timeout { after_ms: 1 }.is_local());
    }

    #[test]
    fn test_error_code_serializes_screaming() {
        assert_eq!(
            serde_json::to_value(ErrorCode::InvalidResponse).unwrap(),
            json!("INVALID_RESPONSE")
        );
    }
}
