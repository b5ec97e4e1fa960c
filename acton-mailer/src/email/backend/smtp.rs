//! SMTP backend for sending emails
//!
//! Uses the `lettre` crate to deliver envelopes to SMTP servers. A new
//! transport is built for every delivery from the caller-supplied
//! [`SmtpCredentials`], so one backend serves any number of accounts.

use std::time::Duration;

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Attachment as MimeAttachment, Mailbox, MultiPart, SinglePart},
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters},
    },
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::debug;

use crate::email::{Email, EmailError, EmailTransport, SmtpCredentials};

/// Port that expects TLS from the first byte instead of STARTTLS
pub const IMPLICIT_TLS_PORT: u16 = 465;

/// SMTP email backend configuration
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    /// Require TLS (implicit on port 465, STARTTLS elsewhere)
    pub use_tls: bool,

    /// Connection and command timeout
    pub timeout: Duration,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            use_tls: true,
            timeout: Duration::from_secs(30),
        }
    }
}

/// SMTP email backend
///
/// Sends emails via SMTP using the `lettre` crate.
#[derive(Debug, Clone, Default)]
pub struct SmtpBackend {
    config: SmtpConfig,
}

impl SmtpBackend {
    /// Create a new SMTP backend with the given configuration
    #[must_use]
    pub const fn new(config: SmtpConfig) -> Self {
        Self { config }
    }

    /// Build lettre Message from Email
    fn build_message(email: &Email) -> Result<Message, EmailError> {
        email.validate()?;

        let from_addr = email.from.as_ref().ok_or(EmailError::NoSender)?;
        let mut builder = Message::builder().from(parse_mailbox(from_addr)?);

        for to_addr in &email.to {
            builder = builder.to(parse_mailbox(to_addr)?);
        }

        for cc_addr in &email.cc {
            builder = builder.cc(parse_mailbox(cc_addr)?);
        }

        for bcc_addr in &email.bcc {
            builder = builder.bcc(parse_mailbox(bcc_addr)?);
        }

        let subject = email.subject.as_ref().ok_or(EmailError::NoSubject)?;
        builder = builder.subject(subject);

        let message = if email.attachments.is_empty() {
            builder
                .header(ContentType::TEXT_PLAIN)
                .body(email.text.clone())
                .map_err(|e| EmailError::smtp(e.to_string()))?
        } else {
            let mut parts = MultiPart::mixed().singlepart(SinglePart::plain(email.text.clone()));
            for attachment in &email.attachments {
                let content_type = ContentType::parse(&attachment.content_type).map_err(|e| {
                    EmailError::InvalidAttachment {
                        name: attachment.filename.clone(),
                        reason: e.to_string(),
                    }
                })?;
                parts = parts.singlepart(
                    MimeAttachment::new(attachment.filename.clone())
                        .body(attachment.data.clone(), content_type),
                );
            }
            builder
                .multipart(parts)
                .map_err(|e| EmailError::smtp(e.to_string()))?
        };

        Ok(message)
    }

    /// Create SMTP transport for one set of credentials
    fn create_transport(
        &self,
        credentials: &SmtpCredentials,
    ) -> Result<AsyncSmtpTransport<Tokio1Executor>, EmailError> {
        if credentials.host.trim().is_empty() {
            return Err(EmailError::config("SMTP host must not be empty"));
        }

        let auth = Credentials::new(credentials.username.clone(), credentials.password.clone());

        let transport = if !self.config.use_tls {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&credentials.host)
        } else if credentials.port == IMPLICIT_TLS_PORT {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&credentials.host)
                .map_err(|e| EmailError::smtp(e.to_string()))?
        } else {
            let tls_parameters = TlsParameters::new(credentials.host.clone())
                .map_err(|e| EmailError::smtp(format!("TLS parameters error: {e}")))?;

            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&credentials.host)
                .map_err(|e| EmailError::smtp(e.to_string()))?
                .tls(Tls::Required(tls_parameters))
        };

        Ok(transport
            .credentials(auth)
            .port(credentials.port)
            .timeout(Some(self.config.timeout))
            .build())
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, EmailError> {
    address
        .parse()
        .map_err(|_| EmailError::InvalidAddress(address.to_string()))
}

#[async_trait]
impl EmailTransport for SmtpBackend {
    async fn send(&self, credentials: SmtpCredentials, email: Email) -> Result<(), EmailError> {
        let message = Self::build_message(&email)?;
        let transport = self.create_transport(&credentials)?;

        debug!(
            host = %credentials.host,
            port = credentials.port,
            to = ?email.to,
            "Delivering email over SMTP"
        );

        transport
            .send(message)
            .await
            .map_err(|e| EmailError::smtp(e.to_string()))?;

        Ok(())
    }
}
