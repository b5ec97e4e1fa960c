//! Email error types

use thiserror::Error;

/// Errors that can occur while building or delivering an envelope
#[derive(Debug, Error)]
pub enum EmailError {
    /// Email has no recipients
    #[error("email must have at least one recipient")]
    NoRecipients,

    /// Email has no sender
    #[error("email must have a from address")]
    NoSender,

    /// Email has no subject
    #[error("email must have a subject")]
    NoSubject,

    /// Invalid email address format
    #[error("invalid email address: {0}")]
    InvalidAddress(String),

    /// Attachment could not be encoded
    #[error("invalid attachment {name}: {reason}")]
    InvalidAttachment {
        /// Attachment display name
        name: String,
        /// Why the attachment was rejected
        reason: String,
    },

    /// SMTP transport error (connection, TLS, authentication, rejection)
    #[error("SMTP error: {0}")]
    SmtpError(String),

    /// Transport configuration error
    #[error("email configuration error: {0}")]
    ConfigError(String),
}

impl EmailError {
    /// Create an SMTP error from a string message
    #[must_use]
    pub fn smtp<T: Into<String>>(msg: T) -> Self {
        Self::SmtpError(msg.into())
    }

    /// Create a configuration error from a string message
    #[must_use]
    pub fn config<T: Into<String>>(msg: T) -> Self {
        Self::ConfigError(msg.into())
    }
}
