//! Send attempt records and history summaries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::email::{Email, SmtpCredentials};

/// Number of recipients spelled out in a bulk record's `to` summary.
pub const SUMMARY_RECIPIENTS: usize = 3;

/// One durable row per dispatch operation, single or bulk.
///
/// There is no password field: connection data is limited to host, port and
/// user, so no serialized form can ever carry the secret.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendAttemptRecord {
    /// Unique record identifier. For bulk sends, the batch identifier.
    pub id: String,
    /// When the record was finalized.
    pub timestamp: DateTime<Utc>,
    /// Sender address.
    pub from: String,
    /// Recipient address, or a truncated recipient summary for bulk sends.
    pub to: String,
    /// CC recipients, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cc: Option<Vec<String>>,
    /// BCC recipients, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bcc: Option<Vec<String>>,
    /// Message subject.
    pub subject: String,
    /// Message body.
    pub body: String,
    /// Attachment display names, in order.
    #[serde(default)]
    pub attachment_names: Vec<String>,
    /// SMTP host used.
    pub smtp_host: String,
    /// SMTP port used.
    pub smtp_port: u16,
    /// SMTP user used.
    pub smtp_user: String,
    /// Outcome of the operation.
    pub is_success: bool,
    /// Failure reason; present iff `is_success` is false.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    /// Whether this record summarizes a bulk send.
    #[serde(default)]
    pub is_bulk_email: bool,
    /// Full recipient list exactly as submitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bulk_recipients: Option<Vec<String>>,
    /// Recipients the transport accepted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success_count: Option<usize>,
    /// Entries in the submitted recipient list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_count: Option<usize>,
    /// Blank entries that were never attempted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skipped_count: Option<usize>,
    /// Recipients whose delivery failed, in order of failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failed_recipients: Option<Vec<String>>,
}

impl SendAttemptRecord {
    /// Start a record for a single send.
    ///
    /// The record is not successful until [`complete`](Self::complete) says so.
    #[must_use]
    pub fn single(credentials: &SmtpCredentials, email: &Email) -> Self {
        Self::base(Uuid::new_v4().to_string(), credentials, email, email.to.join(", "))
    }

    /// Start the consolidated record for a bulk send.
    #[must_use]
    pub fn bulk(
        id: impl Into<String>,
        credentials: &SmtpCredentials,
        recipients: &[String],
        template: &Email,
    ) -> Self {
        let mut record = Self::base(id.into(), credentials, template, summarize_recipients(recipients));
        record.is_bulk_email = true;
        record.bulk_recipients = Some(recipients.to_vec());
        record.total_count = Some(recipients.len());
        record
    }

    fn base(id: String, credentials: &SmtpCredentials, email: &Email, to: String) -> Self {
        Self {
            id,
            timestamp: Utc::now(),
            from: email.from.clone().unwrap_or_default(),
            to,
            cc: non_empty(&email.cc),
            bcc: non_empty(&email.bcc),
            subject: email.subject.clone().unwrap_or_default(),
            body: email.text.clone(),
            attachment_names: email.attachment_names(),
            smtp_host: credentials.host.clone(),
            smtp_port: credentials.port,
            smtp_user: credentials.username.clone(),
            is_success: false,
            error_message: None,
            is_bulk_email: false,
            bulk_recipients: None,
            success_count: None,
            total_count: None,
            skipped_count: None,
            failed_recipients: None,
        }
    }

    /// Finalize the record: `None` marks success, `Some(reason)` failure.
    pub fn complete(&mut self, error: Option<String>) {
        self.is_success = error.is_none();
        self.error_message = error;
        self.timestamp = Utc::now();
    }

    /// Finalize a bulk record with its per-recipient tallies.
    pub fn complete_bulk(
        &mut self,
        success_count: usize,
        skipped_count: usize,
        failed_recipients: Vec<String>,
        error: Option<String>,
    ) {
        self.success_count = Some(success_count);
        self.skipped_count = Some(skipped_count);
        self.failed_recipients = Some(failed_recipients);
        self.complete(error);
    }
}

/// Human-readable summary of a recipient list: the first few non-blank
/// addresses, then how many more follow.
#[must_use]
pub fn summarize_recipients(recipients: &[String]) -> String {
    let addresses: Vec<&str> = recipients
        .iter()
        .map(|r| r.trim())
        .filter(|r| !r.is_empty())
        .collect();

    let shown = addresses
        .iter()
        .take(SUMMARY_RECIPIENTS)
        .copied()
        .collect::<Vec<_>>()
        .join(", ");

    match addresses.len().saturating_sub(SUMMARY_RECIPIENTS) {
        0 => shown,
        more => format!("{shown} and {more} more"),
    }
}

fn non_empty(addresses: &[String]) -> Option<Vec<String>> {
    (!addresses.is_empty()).then(|| addresses.to_vec())
}

/// Full history, newest first, with derived totals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistorySummary {
    /// Records ordered newest-first.
    pub records: Vec<SendAttemptRecord>,
    /// Number of records.
    pub total_count: usize,
    /// Number of successful records.
    pub success_count: usize,
    /// Number of failed records.
    pub failure_count: usize,
}

impl HistorySummary {
    /// Build a summary from records in log order.
    #[must_use]
    pub fn from_records(mut records: Vec<SendAttemptRecord>) -> Self {
        // Stable sort: records sharing a timestamp keep reverse log order.
        records.reverse();
        records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        let success_count = records.iter().filter(|r| r.is_success).count();
        Self {
            total_count: records.len(),
            success_count,
            failure_count: records.len() - success_count,
            records,
        }
    }
}
