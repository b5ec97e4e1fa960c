//! Caller-visible errors
//!
//! Delivery failures are not errors: they come back as unsuccessful outcomes.
//! [`MailerError`] covers what stops an operation before any delivery is
//! attempted, and maps onto HTTP status codes for the API.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

/// Mailer error type
#[derive(Debug, Error)]
pub enum MailerError {
    /// Input rejected before any work was done (400)
    #[error("{0}")]
    Validation(String),

    /// Credentials or settings missing or unreadable (500)
    #[error("{0}")]
    Config(String),

    /// Operation deliberately not available (501)
    #[error("{0}")]
    NotImplemented(String),

    /// Request body over the configured limit (413)
    #[error("Request too large: {0}")]
    PayloadTooLarge(String),

    /// Filesystem failure outside the history log (500)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Encoding or decoding failure (500)
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl MailerError {
    /// Shorthand for a validation error
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Shorthand for a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// HTTP status this error is reported with
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotImplemented(_) => StatusCode::NOT_IMPLEMENTED,
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Config(_) | Self::Io(_) | Self::Serialization(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for MailerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() && status != StatusCode::NOT_IMPLEMENTED {
            error!(error = %self, "Request failed");
        } else {
            warn!(error = %self, status = status.as_u16(), "Request rejected");
        }

        let body = Json(json!({
            "success": false,
            "message": self.to_string(),
        }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(MailerError::validation("x").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(MailerError::config("x").status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            MailerError::NotImplemented("x".into()).status_code(),
            StatusCode::NOT_IMPLEMENTED
        );
        assert_eq!(
            MailerError::PayloadTooLarge("length limit exceeded".into()).status_code(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
    }

    #[test]
    fn test_messages_are_unprefixed() {
        let error = MailerError::validation("At least one recipient address is required");
        assert_eq!(error.to_string(), "At least one recipient address is required");
    }

    #[test]
    fn test_into_response_status() {
        let response = MailerError::config("no account").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
