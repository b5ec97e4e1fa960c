use tracing::{info, warn};

use super::{Dispatcher, MessageContent, SendOutcome};
use crate::email::SmtpCredentials;
use crate::history::SendAttemptRecord;

impl Dispatcher {
    /// Send one message to one recipient
    ///
    /// Delivery failures come back as an unsuccessful outcome, never as an
    /// error. One history record is appended either way.
    pub async fn send_single(
        &self,
        credentials: &SmtpCredentials,
        to: &str,
        content: &MessageContent,
    ) -> SendOutcome {
        let email = content.envelope().to(to);
        let mut record = SendAttemptRecord::single(credentials, &email);
        let email_id = record.id.clone();

        let outcome = match self.deliver(credentials, email).await {
            Ok(()) => {
                info!(email_id = %email_id, %to, "Email sent");
                record.complete(None);
                SendOutcome {
                    success: true,
                    email_id,
                    message: "Email sent successfully".to_string(),
                }
            }
            Err(e) => {
                warn!(email_id = %email_id, %to, error = %e, "Email delivery failed");
                let reason = e.to_string();
                record.complete(Some(reason.clone()));
                SendOutcome {
                    success: false,
                    email_id,
                    message: format!("Failed to send email: {reason}"),
                }
            }
        };

        self.record(record).await;
        outcome
    }
}
