//! Inputs and outcomes of dispatch operations.

use serde::Serialize;

use crate::email::{Attachment, Email};

/// Message content shared by every recipient of a send
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageContent {
    /// Sender address. Quick sends replace it with the default account.
    pub from: String,
    /// Subject line
    pub subject: String,
    /// Plain text body
    pub body: String,
    /// CC recipients; blank entries are dropped when the envelope is built
    pub cc: Vec<String>,
    /// BCC recipients; blank entries are dropped when the envelope is built
    pub bcc: Vec<String>,
    /// Files attached to every message
    pub attachments: Vec<Attachment>,
}

impl MessageContent {
    /// Content with a subject and body and nothing else
    #[must_use]
    pub fn new(subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            body: body.into(),
            ..Self::default()
        }
    }

    /// Set the sender address
    #[must_use]
    pub fn with_from(mut self, from: impl Into<String>) -> Self {
        self.from = from.into();
        self
    }

    /// Set the CC list
    #[must_use]
    pub fn with_cc(mut self, cc: Vec<String>) -> Self {
        self.cc = cc;
        self
    }

    /// Set the BCC list
    #[must_use]
    pub fn with_bcc(mut self, bcc: Vec<String>) -> Self {
        self.bcc = bcc;
        self
    }

    /// Set the attachments
    #[must_use]
    pub fn with_attachments(mut self, attachments: Vec<Attachment>) -> Self {
        self.attachments = attachments;
        self
    }

    /// Envelope with everything but the primary recipient
    pub(crate) fn envelope(&self) -> Email {
        let mut email = Email::new()
            .from(&self.from)
            .subject(&self.subject)
            .text(&self.body);

        for cc in &self.cc {
            email = email.cc(cc);
        }
        for bcc in &self.bcc {
            email = email.bcc(bcc);
        }
        for attachment in &self.attachments {
            email = email.attach(attachment.clone());
        }

        email
    }
}

/// Result of a single send
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendOutcome {
    /// Whether the transport accepted the message
    pub success: bool,
    /// Id of the history record written for this send
    pub email_id: String,
    /// Human-readable result
    pub message: String,
}

/// Aggregate result of a bulk send
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkOutcome {
    /// True iff at least one recipient succeeded
    #[serde(rename = "success")]
    pub overall_success: bool,
    /// Human-readable result
    pub message: String,
    /// Batch id, also the id of the history record
    pub bulk_email_id: String,
    /// Entries in the submitted recipient list
    pub total_count: usize,
    /// Recipients the transport accepted
    pub success_count: usize,
    /// Blank entries that were never attempted
    pub skipped_count: usize,
    /// Recipients whose delivery failed, in input order
    pub failed_recipients: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_drops_blank_copies() {
        let content = MessageContent::new("Hi", "Body")
            .with_from("me@example.com")
            .with_cc(vec![String::new(), "cc@example.com".into()])
            .with_bcc(vec!["   ".into()]);

        let email = content.envelope();

        assert!(email.to.is_empty());
        assert_eq!(email.cc, vec!["cc@example.com"]);
        assert!(email.bcc.is_empty());
        assert_eq!(email.from.as_deref(), Some("me@example.com"));
    }

    #[test]
    fn test_bulk_outcome_wire_shape() {
        let outcome = BulkOutcome {
            overall_success: true,
            message: "Bulk send completed: 1/2 succeeded".into(),
            bulk_email_id: "batch".into(),
            total_count: 2,
            success_count: 1,
            skipped_count: 0,
            failed_recipients: vec!["b@x.com".into()],
        };

        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["bulkEmailId"], "batch");
        assert_eq!(json["failedRecipients"][0], "b@x.com");
    }
}
