use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{BulkOutcome, Dispatcher, MessageContent, NO_RECIPIENTS};
use crate::email::SmtpCredentials;
use crate::error::MailerError;
use crate::history::SendAttemptRecord;

impl Dispatcher {
    /// Send the same message to each recipient individually
    ///
    /// Recipients are processed in order. Blank entries are skipped, one
    /// failure never stops the batch, and the batch succeeds when at least
    /// one recipient was accepted. One consolidated history record is
    /// appended after the last recipient.
    ///
    /// # Errors
    ///
    /// Returns `MailerError::Validation` for an empty recipient list; nothing
    /// is sent or recorded in that case.
    pub async fn send_bulk(
        &self,
        credentials: &SmtpCredentials,
        recipients: &[String],
        content: &MessageContent,
    ) -> Result<BulkOutcome, MailerError> {
        if recipients.is_empty() {
            return Err(MailerError::validation(NO_RECIPIENTS));
        }

        let bulk_email_id = Uuid::new_v4().to_string();
        let template = content.envelope();
        let mut record =
            SendAttemptRecord::bulk(bulk_email_id.clone(), credentials, recipients, &template);

        let total_count = recipients.len();
        let mut success_count = 0;
        let mut skipped_count = 0;
        let mut failed_recipients = Vec::new();

        info!(bulk_email_id = %bulk_email_id, total_count, "Starting bulk send");

        for recipient in recipients {
            let address = recipient.trim();
            if address.is_empty() {
                debug!(bulk_email_id = %bulk_email_id, "Skipping blank recipient");
                skipped_count += 1;
                continue;
            }

            match self.deliver(credentials, template.clone().to(address)).await {
                Ok(()) => success_count += 1,
                Err(e) => {
                    warn!(bulk_email_id = %bulk_email_id, recipient = %address, error = %e, "Bulk delivery failed");
                    failed_recipients.push(address.to_string());
                }
            }
        }

        let overall_success = success_count > 0;
        let error = if overall_success {
            None
        } else if failed_recipients.is_empty() {
            Some("No deliverable recipients".to_string())
        } else {
            Some("All deliveries failed".to_string())
        };

        record.complete_bulk(success_count, skipped_count, failed_recipients.clone(), error);
        self.record(record).await;

        info!(
            bulk_email_id = %bulk_email_id,
            total_count,
            success_count,
            skipped_count,
            failed_count = failed_recipients.len(),
            "Bulk send finished"
        );

        Ok(BulkOutcome {
            overall_success,
            message: format!("Bulk send completed: {success_count}/{total_count} succeeded"),
            bulk_email_id,
            total_count,
            success_count,
            skipped_count,
            failed_recipients,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use proptest::prelude::*;
    use tempfile::TempDir;

    use crate::dispatch::test_support::{credentials, dispatcher, strings};
    use crate::dispatch::{MessageContent, NO_RECIPIENTS};
    use crate::email::{EmailError, MockEmailTransport};
    use crate::error::MailerError;

    fn content() -> MessageContent {
        MessageContent::new("Newsletter", "Hello all").with_from("sender@example.com")
    }

    /// Transport that rejects every address in `failing`.
    fn transport_failing(failing: &[&str]) -> MockEmailTransport {
        let failing: HashSet<String> = failing.iter().map(ToString::to_string).collect();
        let mut transport = MockEmailTransport::new();
        transport.expect_send().returning(move |_, email| {
            if failing.contains(&email.to[0]) {
                Err(EmailError::smtp("550 mailbox unavailable"))
            } else {
                Ok(())
            }
        });
        transport
    }

    #[tokio::test]
    async fn test_mixed_outcomes_with_blank_entry() {
        let dir = TempDir::new().unwrap();
        let dispatcher = dispatcher(transport_failing(&["b@x.com"]), &dir);

        let outcome = dispatcher
            .send_bulk(&credentials(), &strings(&["a@x.com", "", "b@x.com"]), &content())
            .await
            .unwrap();

        assert!(outcome.overall_success);
        assert_eq!(outcome.total_count, 3);
        assert_eq!(outcome.success_count, 1);
        assert_eq!(outcome.skipped_count, 1);
        assert_eq!(outcome.failed_recipients, vec!["b@x.com"]);
        assert_eq!(outcome.message, "Bulk send completed: 1/3 succeeded");

        let history = dispatcher.history().list().await;
        assert_eq!(history.total_count, 1);
        let record = &history.records[0];
        assert_eq!(record.id, outcome.bulk_email_id);
        assert!(record.is_bulk_email);
        assert!(record.is_success);
        assert_eq!(record.success_count, Some(1));
        assert_eq!(record.skipped_count, Some(1));
        assert_eq!(record.total_count, Some(3));
        assert_eq!(record.failed_recipients, Some(strings(&["b@x.com"])));
        assert_eq!(record.bulk_recipients, Some(strings(&["a@x.com", "", "b@x.com"])));
    }

    #[tokio::test]
    async fn test_recipients_are_sent_in_order_and_trimmed() {
        let dir = TempDir::new().unwrap();
        let mut seq = mockall::Sequence::new();
        let mut transport = MockEmailTransport::new();
        for expected in ["first@x.com", "second@x.com", "third@x.com"] {
            transport
                .expect_send()
                .withf(move |_, email| email.to == vec![expected])
                .times(1)
                .in_sequence(&mut seq)
                .returning(|_, _| Ok(()));
        }
        let dispatcher = dispatcher(transport, &dir);

        let outcome = dispatcher
            .send_bulk(
                &credentials(),
                &strings(&[" first@x.com", "second@x.com ", "third@x.com"]),
                &content(),
            )
            .await
            .unwrap();

        assert_eq!(outcome.success_count, 3);
        assert!(outcome.failed_recipients.is_empty());
    }

    #[tokio::test]
    async fn test_empty_list_is_rejected_without_side_effects() {
        let dir = TempDir::new().unwrap();
        let mut transport = MockEmailTransport::new();
        transport.expect_send().never();
        let dispatcher = dispatcher(transport, &dir);

        let result = dispatcher.send_bulk(&credentials(), &[], &content()).await;

        assert!(matches!(result, Err(MailerError::Validation(msg)) if msg == NO_RECIPIENTS));
        assert_eq!(dispatcher.history().list().await.total_count, 0);
    }

    #[tokio::test]
    async fn test_all_failures_report_overall_failure() {
        let dir = TempDir::new().unwrap();
        let dispatcher = dispatcher(transport_failing(&["a@x.com", "b@x.com"]), &dir);

        let outcome = dispatcher
            .send_bulk(&credentials(), &strings(&["a@x.com", "b@x.com"]), &content())
            .await
            .unwrap();

        assert!(!outcome.overall_success);
        assert_eq!(outcome.failed_recipients, vec!["a@x.com", "b@x.com"]);
        let record = &dispatcher.history().list().await.records[0];
        assert!(!record.is_success);
        assert_eq!(record.error_message.as_deref(), Some("All deliveries failed"));
    }

    #[tokio::test]
    async fn test_only_blank_entries_report_no_deliverable_recipients() {
        let dir = TempDir::new().unwrap();
        let mut transport = MockEmailTransport::new();
        transport.expect_send().never();
        let dispatcher = dispatcher(transport, &dir);

        let outcome = dispatcher
            .send_bulk(&credentials(), &strings(&["", "  "]), &content())
            .await
            .unwrap();

        assert!(!outcome.overall_success);
        assert_eq!(outcome.skipped_count, 2);
        let record = &dispatcher.history().list().await.records[0];
        assert_eq!(record.error_message.as_deref(), Some("No deliverable recipients"));
    }

    #[tokio::test]
    async fn test_large_batch_summarizes_recipients() {
        let dir = TempDir::new().unwrap();
        let dispatcher = dispatcher(transport_failing(&[]), &dir);
        let recipients: Vec<String> = (1..=5).map(|i| format!("r{i}@x.com")).collect();

        dispatcher.send_bulk(&credentials(), &recipients, &content()).await.unwrap();

        let record = &dispatcher.history().list().await.records[0];
        assert_eq!(record.to, "r1@x.com, r2@x.com, r3@x.com and 2 more");
    }

    fn recipient() -> impl Strategy<Value = String> {
        prop_oneof![
            Just(String::new()),
            Just("   ".to_string()),
            "[a-z]{1,6}@x\\.com",
            "fail[a-z]{1,4}@x\\.com",
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_counts_always_add_up(recipients in prop::collection::vec(recipient(), 1..16)) {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();

            runtime.block_on(async {
                let dir = TempDir::new().unwrap();
                let mut transport = MockEmailTransport::new();
                transport.expect_send().returning(|_, email| {
                    if email.to[0].starts_with("fail") {
                        Err(EmailError::smtp("550 rejected"))
                    } else {
                        Ok(())
                    }
                });
                let dispatcher = dispatcher(transport, &dir);

                let outcome = dispatcher
                    .send_bulk(&credentials(), &recipients, &content())
                    .await
                    .unwrap();

                let blanks = recipients.iter().filter(|r| r.trim().is_empty()).count();
                prop_assert_eq!(outcome.total_count, recipients.len());
                prop_assert_eq!(outcome.skipped_count, blanks);
                prop_assert_eq!(
                    outcome.success_count + outcome.failed_recipients.len() + outcome.skipped_count,
                    outcome.total_count
                );
                prop_assert_eq!(outcome.overall_success, outcome.success_count > 0);

                let history = dispatcher.history().list().await;
                prop_assert_eq!(history.total_count, 1);
                Ok(())
            })?;
        }
    }
}
