//! Envelope construction and SMTP delivery
//!
//! This module is the transport port of the mailer:
//! - [`Email`] is the fully assembled envelope
//! - [`EmailTransport`] delivers one envelope given [`SmtpCredentials`]
//! - [`SmtpBackend`] is the `lettre`-based production transport
//!
//! # Examples
//!
//! ```rust,no_run
//! use acton_mailer::email::{Email, EmailTransport, SmtpBackend, SmtpCredentials};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let backend = SmtpBackend::default();
//! let credentials = SmtpCredentials::new("smtp.gmail.com", 587, "me@gmail.com", "app-password");
//!
//! let email = Email::new()
//!     .to("user@example.com")
//!     .from("me@gmail.com")
//!     .subject("Welcome!")
//!     .text("Welcome to our app!");
//!
//! backend.send(credentials, email).await?;
//! # Ok(())
//! # }
//! ```

mod backend;
mod builder;
mod error;
mod transport;

pub use backend::smtp::{SmtpBackend, SmtpConfig, IMPLICIT_TLS_PORT};
pub use builder::{Attachment, Email, DEFAULT_ATTACHMENT_TYPE};
pub use error::EmailError;
pub use transport::{EmailTransport, SmtpCredentials};

#[cfg(test)]
pub use transport::MockEmailTransport;
