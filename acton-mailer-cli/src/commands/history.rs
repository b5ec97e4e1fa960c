//! History command

use std::fmt::Write as _;

use acton_mailer::config::MailerConfig;
use acton_mailer::history::{HistoryStore, HistorySummary, SendAttemptRecord};
use anyhow::Result;
use clap::Args;
use console::style;

use super::{FAILURE, SUCCESS};

/// Show the send history
#[derive(Debug, Args)]
pub struct HistoryArgs {
    /// Maximum number of records to show
    #[arg(short, long, default_value = "20")]
    pub limit: usize,

    /// Print the history as JSON
    #[arg(long)]
    pub json: bool,
}

impl HistoryArgs {
    /// Execute the history command
    ///
    /// # Errors
    ///
    /// Returns an error if the history cannot be encoded as JSON.
    pub async fn execute(&self, config: &MailerConfig) -> Result<()> {
        let store = HistoryStore::new(config.storage.history_path.clone());
        let mut summary = store.list().await;
        summary.records.truncate(self.limit);

        if self.json {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        } else {
            print!("{}", render(&summary));
        }

        Ok(())
    }
}

fn render(summary: &HistorySummary) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "{} records: {} succeeded, {} failed",
        style(summary.total_count).bold(),
        style(summary.success_count).green(),
        style(summary.failure_count).red()
    );
    let _ = writeln!(out, "{}", "─".repeat(80));

    if summary.records.is_empty() {
        let _ = writeln!(out, "  {}", style("(No sends recorded)").dim());
    }

    for record in &summary.records {
        let _ = writeln!(out, "{}", render_record(record));
    }

    out
}

fn render_record(record: &SendAttemptRecord) -> String {
    let marker = if record.is_success { SUCCESS } else { FAILURE };
    let mut line = format!(
        "{}{}  {}  {}",
        marker,
        style(record.timestamp.format("%Y-%m-%d %H:%M:%S")).dim(),
        style(&record.to).cyan(),
        record.subject
    );

    if record.is_bulk_email {
        let _ = write!(
            line,
            "  [bulk {}/{}]",
            record.success_count.unwrap_or_default(),
            record.total_count.unwrap_or_default()
        );
    }
    if !record.attachment_names.is_empty() {
        let _ = write!(line, "  +{} attachment(s)", record.attachment_names.len());
    }
    if let Some(error) = &record.error_message {
        let _ = write!(line, "\n      {}", style(error).red());
    }

    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use acton_mailer::email::{Email, SmtpCredentials};

    fn record(to: &str, error: Option<&str>) -> SendAttemptRecord {
        let credentials = SmtpCredentials::new("smtp.example.com", 587, "me@example.com", "pw");
        let email = Email::new().from("me@example.com").to(to).subject("Status update");
        let mut record = SendAttemptRecord::single(&credentials, &email);
        record.complete(error.map(ToString::to_string));
        record
    }

    #[test]
    fn test_render_empty_history() {
        let out = render(&HistorySummary::default());

        assert!(out.contains("No sends recorded"));
    }

    #[test]
    fn test_render_lists_records_and_errors() {
        let summary = HistorySummary::from_records(vec![
            record("ok@example.com", None),
            record("bad@example.com", Some("550 mailbox unavailable")),
        ]);

        let out = render(&summary);

        assert!(out.contains("ok@example.com"));
        assert!(out.contains("bad@example.com"));
        assert!(out.contains("550 mailbox unavailable"));
        assert!(out.contains("Status update"));
    }

    #[tokio::test]
    async fn test_execute_reads_configured_history() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut config = MailerConfig::default();
        config.storage.history_path = dir.path().join("history.json");
        HistoryStore::new(config.storage.history_path.clone())
            .append(record("a@example.com", None))
            .await
            .unwrap();

        let args = HistoryArgs { limit: 10, json: true };
        assert!(args.execute(&config).await.is_ok());
    }
}
