//! Transport trait abstraction
//!
//! This module defines the `EmailTransport` trait that the dispatcher uses to
//! deliver one envelope, along with the connection parameters it is given.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{Email, EmailError};

/// SMTP connection parameters for a single delivery
///
/// The password is never serialized and is redacted from `Debug` output.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmtpCredentials {
    /// SMTP server hostname
    pub host: String,

    /// SMTP server port (usually 587 for STARTTLS, 465 for implicit TLS)
    pub port: u16,

    /// SMTP username
    pub username: String,

    /// SMTP password
    #[serde(skip_serializing, default)]
    pub password: String,
}

impl SmtpCredentials {
    /// Create a new set of connection parameters
    #[must_use]
    pub fn new(
        host: impl Into<String>,
        port: u16,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            username: username.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for SmtpCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpCredentials")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"[redacted]")
            .finish()
    }
}

/// Trait for delivering one envelope over a connection
///
/// Implemented by [`SmtpBackend`](super::SmtpBackend) in production and by
/// test doubles in tests.
///
/// # Examples
///
/// ```rust,no_run
/// use acton_mailer::email::{Email, EmailTransport, SmtpBackend, SmtpCredentials};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let transport = SmtpBackend::default();
/// let credentials = SmtpCredentials::new("smtp.example.com", 587, "user", "app-password");
///
/// let email = Email::new()
///     .to("user@example.com")
///     .from("noreply@myapp.com")
///     .subject("Hello!")
///     .text("Hello, World!");
///
/// transport.send(credentials, email).await?;
/// # Ok(())
/// # }
/// ```
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmailTransport: Send + Sync {
    /// Deliver an email
    ///
    /// # Errors
    ///
    /// Returns `EmailError` if the envelope is invalid or the server refuses
    /// the connection, the credentials, or any address
    async fn send(&self, credentials: SmtpCredentials, email: Email) -> Result<(), EmailError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_password() {
        let credentials = SmtpCredentials::new("smtp.example.com", 587, "user", "hunter2");

        let debug = format!("{credentials:?}");
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("[redacted]"));
    }

    #[test]
    fn test_serialize_skips_password() {
        let credentials = SmtpCredentials::new("smtp.example.com", 587, "user", "hunter2");

        let json = serde_json::to_string(&credentials).unwrap();
        assert!(!json.contains("hunter2"));
        assert!(!json.contains("password"));
    }
}
