use tracing::debug;

use super::{BulkOutcome, Dispatcher, MessageContent, SendOutcome, NO_RECIPIENTS};
use crate::credentials::CredentialResolver;
use crate::error::MailerError;

impl Dispatcher {
    /// Send one message from the default account
    ///
    /// The resolved account address replaces `content.from`.
    ///
    /// # Errors
    ///
    /// Returns `MailerError::Config` when no default account can be
    /// resolved. Nothing is sent or recorded in that case.
    pub async fn quick_send(
        &self,
        resolver: &CredentialResolver,
        to: &str,
        content: MessageContent,
    ) -> Result<SendOutcome, MailerError> {
        let credentials = resolver.resolve().await?;
        let content = content.with_from(credentials.username.clone());

        debug!(from = %content.from, %to, "Quick send");
        Ok(self.send_single(&credentials, to, &content).await)
    }

    /// Bulk send from the default account
    ///
    /// # Errors
    ///
    /// Returns `MailerError::Validation` for an empty recipient list (checked
    /// before credentials are resolved) and `MailerError::Config` when no
    /// default account can be resolved.
    pub async fn quick_send_bulk(
        &self,
        resolver: &CredentialResolver,
        recipients: &[String],
        content: MessageContent,
    ) -> Result<BulkOutcome, MailerError> {
        if recipients.is_empty() {
            return Err(MailerError::validation(NO_RECIPIENTS));
        }

        let credentials = resolver.resolve().await?;
        let content = content.with_from(credentials.username.clone());

        debug!(from = %content.from, recipients = recipients.len(), "Quick bulk send");
        self.send_bulk(&credentials, recipients, &content).await
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use tempfile::TempDir;

    use crate::config::SmtpSettings;
    use crate::credentials::{CredentialResolver, PASSWORD_OVERRIDE, USER_OVERRIDE};
    use crate::dispatch::test_support::{dispatcher, strings};
    use crate::dispatch::MessageContent;
    use crate::email::MockEmailTransport;
    use crate::error::MailerError;

    fn resolver(dir: &TempDir, overrides: HashMap<String, String>) -> CredentialResolver {
        CredentialResolver::new(dir.path().join("account.json"), &SmtpSettings::default())
            .with_overrides(overrides)
    }

    fn env_account() -> HashMap<String, String> {
        HashMap::from([
            (USER_OVERRIDE.to_string(), "default@example.com".to_string()),
            (PASSWORD_OVERRIDE.to_string(), "pw".to_string()),
        ])
    }

    #[tokio::test]
    async fn test_quick_send_without_account_sends_nothing() {
        let dir = TempDir::new().unwrap();
        let mut transport = MockEmailTransport::new();
        transport.expect_send().never();
        let dispatcher = dispatcher(transport, &dir);

        let result = dispatcher
            .quick_send(&resolver(&dir, HashMap::new()), "to@x.com", MessageContent::new("s", "b"))
            .await;

        assert!(matches!(result, Err(MailerError::Config(_))));
        assert_eq!(dispatcher.history().list().await.total_count, 0);
    }

    #[tokio::test]
    async fn test_quick_send_uses_default_account_as_sender() {
        let dir = TempDir::new().unwrap();
        let mut transport = MockEmailTransport::new();
        transport
            .expect_send()
            .withf(|creds, email| {
                creds.username == "default@example.com"
                    && creds.host == "smtp.gmail.com"
                    && email.from.as_deref() == Some("default@example.com")
            })
            .times(1)
            .returning(|_, _| Ok(()));
        let dispatcher = dispatcher(transport, &dir);

        let outcome = dispatcher
            .quick_send(
                &resolver(&dir, env_account()),
                "to@x.com",
                MessageContent::new("s", "b").with_from("ignored@example.com"),
            )
            .await
            .unwrap();

        assert!(outcome.success);
        let record = &dispatcher.history().list().await.records[0];
        assert_eq!(record.from, "default@example.com");
        assert_eq!(record.smtp_user, "default@example.com");
    }

    #[tokio::test]
    async fn test_quick_bulk_validates_before_resolving() {
        let dir = TempDir::new().unwrap();
        let mut transport = MockEmailTransport::new();
        transport.expect_send().never();
        let dispatcher = dispatcher(transport, &dir);

        let result = dispatcher
            .quick_send_bulk(&resolver(&dir, HashMap::new()), &[], MessageContent::new("s", "b"))
            .await;

        assert!(matches!(result, Err(MailerError::Validation(_))));
    }

    #[tokio::test]
    async fn test_quick_bulk_without_account_sends_nothing() {
        let dir = TempDir::new().unwrap();
        let mut transport = MockEmailTransport::new();
        transport.expect_send().never();
        let dispatcher = dispatcher(transport, &dir);

        let result = dispatcher
            .quick_send_bulk(
                &resolver(&dir, HashMap::new()),
                &strings(&["a@x.com"]),
                MessageContent::new("s", "b"),
            )
            .await;

        assert!(matches!(result, Err(MailerError::Config(_))));
        assert_eq!(dispatcher.history().list().await.total_count, 0);
    }

    #[tokio::test]
    async fn test_quick_bulk_runs_normal_bulk_path() {
        let dir = TempDir::new().unwrap();
        let mut transport = MockEmailTransport::new();
        transport.expect_send().times(2).returning(|_, _| Ok(()));
        let dispatcher = dispatcher(transport, &dir);

        let outcome = dispatcher
            .quick_send_bulk(
                &resolver(&dir, env_account()),
                &strings(&["a@x.com", "b@x.com"]),
                MessageContent::new("s", "b"),
            )
            .await
            .unwrap();

        assert_eq!(outcome.success_count, 2);
        assert!(dispatcher.history().list().await.records[0].is_bulk_email);
    }
}
