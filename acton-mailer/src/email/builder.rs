//! Envelope builder with fluent API
//!
//! Provides a convenient builder pattern for constructing the message that is
//! handed to an [`EmailTransport`](super::EmailTransport).

use super::EmailError;

/// MIME type used when an attachment arrives without one
pub const DEFAULT_ATTACHMENT_TYPE: &str = "application/octet-stream";

/// A file attached to an outgoing email
///
/// Only the display name is ever persisted to the send history; the content
/// lives for the duration of a single request.
#[derive(Clone, PartialEq, Eq)]
pub struct Attachment {
    /// Display name shown to recipients
    pub filename: String,

    /// MIME type of the content
    pub content_type: String,

    /// Raw file content
    pub data: Vec<u8>,
}

impl Attachment {
    /// Create a new attachment
    ///
    /// An empty content type falls back to [`DEFAULT_ATTACHMENT_TYPE`].
    #[must_use]
    pub fn new(filename: impl Into<String>, content_type: impl Into<String>, data: Vec<u8>) -> Self {
        let content_type = content_type.into();
        Self {
            filename: filename.into(),
            content_type: if content_type.trim().is_empty() {
                DEFAULT_ATTACHMENT_TYPE.to_string()
            } else {
                content_type
            },
            data,
        }
    }

    /// Size of the content in bytes
    #[must_use]
    pub fn size(&self) -> usize {
        self.data.len()
    }
}

impl std::fmt::Debug for Attachment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Attachment")
            .field("filename", &self.filename)
            .field("content_type", &self.content_type)
            .field("size", &self.data.len())
            .finish()
    }
}

/// An email envelope
///
/// ```rust
/// use acton_mailer::email::Email;
///
/// let email = Email::new()
///     .to("user@example.com")
///     .from("noreply@myapp.com")
///     .cc("  ")
///     .subject("Welcome!")
///     .text("Welcome to our app!");
///
/// assert!(email.cc.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Email {
    /// Email recipients (To)
    pub to: Vec<String>,

    /// Email sender (From)
    pub from: Option<String>,

    /// CC recipients
    pub cc: Vec<String>,

    /// BCC recipients
    pub bcc: Vec<String>,

    /// Email subject
    pub subject: Option<String>,

    /// Plain text body
    pub text: String,

    /// File attachments
    pub attachments: Vec<Attachment>,
}

impl Email {
    /// Create a new empty email
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a recipient (To)
    #[must_use]
    pub fn to(mut self, address: &str) -> Self {
        self.to.push(address.trim().to_string());
        self
    }

    /// Set the sender (From)
    #[must_use]
    pub fn from(mut self, address: &str) -> Self {
        self.from = Some(address.trim().to_string());
        self
    }

    /// Add a CC recipient
    ///
    /// Empty or whitespace-only addresses are ignored.
    #[must_use]
    pub fn cc(mut self, address: &str) -> Self {
        if let Some(address) = non_blank(address) {
            self.cc.push(address);
        }
        self
    }

    /// Add a BCC recipient
    ///
    /// Empty or whitespace-only addresses are ignored.
    #[must_use]
    pub fn bcc(mut self, address: &str) -> Self {
        if let Some(address) = non_blank(address) {
            self.bcc.push(address);
        }
        self
    }

    /// Set the email subject
    #[must_use]
    pub fn subject(mut self, subject: &str) -> Self {
        self.subject = Some(subject.to_string());
        self
    }

    /// Set the plain text body
    #[must_use]
    pub fn text(mut self, body: &str) -> Self {
        self.text = body.to_string();
        self
    }

    /// Attach a file
    #[must_use]
    pub fn attach(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    /// Display names of all attachments, in order
    #[must_use]
    pub fn attachment_names(&self) -> Vec<String> {
        self.attachments.iter().map(|a| a.filename.clone()).collect()
    }

    /// Validate the email
    ///
    /// Checks that all required fields are present
    ///
    /// # Errors
    ///
    /// Returns errors if:
    /// - No recipients
    /// - No sender
    /// - No subject
    pub fn validate(&self) -> Result<(), EmailError> {
        if self.to.iter().all(|to| to.is_empty()) && self.cc.is_empty() && self.bcc.is_empty() {
            return Err(EmailError::NoRecipients);
        }

        if self.from.as_deref().is_none_or(str::is_empty) {
            return Err(EmailError::NoSender);
        }

        if self.subject.is_none() {
            return Err(EmailError::NoSubject);
        }

        Ok(())
    }
}

fn non_blank(address: &str) -> Option<String> {
    let trimmed = address.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
