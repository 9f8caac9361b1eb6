//! Unified error type for backend calls.
//!
//! Every backend failure, whatever its cause, surfaces as one [`ApiError`]
//! carrying a human-readable message. The message is the backend's own
//! `message` field when the response body has one, and the operation's
//! generic fallback (e.g. "Failed to create order") otherwise. There is no
//! transient/permanent split. The only automatic retry is the single replay
//! after a token refresh.

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// A backend request failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ApiError {
    status: Option<StatusCode>,
    message: String,
}

/// Body shape the backend uses for errors.
#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

impl ApiError {
    /// A failure with no HTTP response (connection refused, timeout, bad URL).
    #[must_use]
    pub fn without_response(fallback: &str) -> Self {
        Self {
            status: None,
            message: fallback.to_string(),
        }
    }

    /// A failure reported by the backend with `status` and raw `body`.
    #[must_use]
    pub fn from_response(status: StatusCode, body: &str, fallback: &str) -> Self {
        Self {
            status: Some(status),
            message: extract_message(body).unwrap_or_else(|| fallback.to_string()),
        }
    }

    /// The message to show the user.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// HTTP status, if the backend answered at all.
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        self.status
    }
}

/// The non-empty `message` field of a JSON error body.
fn extract_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
}

/// Result type alias for `ApiError`.
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_message_wins() {
        let err = ApiError::from_response(
            StatusCode::BAD_REQUEST,
            r#"{"message":"Product is out of stock"}"#,
            "Failed to create order",
        );
        assert_eq!(err.to_string(), "Product is out of stock");
        assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));
    }

    #[test]
    fn test_fallback_for_non_json_body() {
        let err = ApiError::from_response(
            StatusCode::BAD_GATEWAY,
            "<html>bad gateway</html>",
            "Failed to fetch products",
        );
        assert_eq!(err.message(), "Failed to fetch products");
    }

    #[test]
    fn test_fallback_for_blank_message() {
        let err = ApiError::from_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            r#"{"message":"  "}"#,
            "Failed to create order",
        );
        assert_eq!(err.message(), "Failed to create order");
    }

    #[test]
    fn test_without_response() {
        let err = ApiError::without_response("Failed to fetch product details");
        assert_eq!(err.status(), None);
        assert_eq!(err.to_string(), "Failed to fetch product details");
    }
}
