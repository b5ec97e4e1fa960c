//! Quick send commands

use std::path::PathBuf;

use acton_mailer::config::MailerConfig;
use acton_mailer::dispatch::MessageContent;
use acton_mailer::email::Attachment;
use acton_mailer::state::MailerState;
use anyhow::{bail, Context, Result};
use clap::Args;
use console::style;
use tracing::debug;

use super::{FAILURE, INFO, SUCCESS};

/// Message options shared by `send` and `bulk`
#[derive(Debug, Args)]
pub struct MessageArgs {
    /// Subject line
    #[arg(short, long)]
    pub subject: String,

    /// Plain text body
    #[arg(short, long, default_value = "")]
    pub body: String,

    /// CC recipient (repeatable)
    #[arg(long)]
    pub cc: Vec<String>,

    /// BCC recipient (repeatable)
    #[arg(long)]
    pub bcc: Vec<String>,

    /// File to attach (repeatable)
    #[arg(long = "attach", value_name = "PATH")]
    pub attachments: Vec<PathBuf>,
}

impl MessageArgs {
    async fn content(&self) -> Result<MessageContent> {
        let mut attachments = Vec::with_capacity(self.attachments.len());
        for path in &self.attachments {
            let data = tokio::fs::read(path)
                .await
                .with_context(|| format!("Failed to read attachment {}", path.display()))?;
            let filename = path
                .file_name()
                .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());

            debug!(%filename, size = data.len(), "Attaching file");
            attachments.push(Attachment::new(filename, "", data));
        }

        Ok(MessageContent::new(self.subject.clone(), self.body.clone())
            .with_cc(self.cc.clone())
            .with_bcc(self.bcc.clone())
            .with_attachments(attachments))
    }
}

/// Send one message from the default account
#[derive(Debug, Args)]
pub struct SendArgs {
    /// Recipient
    #[arg(long)]
    pub to: String,

    #[command(flatten)]
    pub message: MessageArgs,
}

impl SendArgs {
    /// Execute the send command
    ///
    /// # Errors
    ///
    /// Returns an error if no default account is configured, an attachment
    /// cannot be read, or delivery fails.
    pub async fn execute(&self, config: MailerConfig) -> Result<()> {
        let content = self.message.content().await?;
        let state = MailerState::new(config);

        let outcome = state
            .dispatcher()
            .quick_send(state.resolver(), &self.to, content)
            .await?;

        if !outcome.success {
            println!("{}{}", FAILURE, style(&outcome.message).red());
            bail!("Delivery to {} failed", self.to);
        }

        println!("{}{}", SUCCESS, outcome.message);
        println!("  {} {}", style("Record:").dim(), outcome.email_id);
        Ok(())
    }
}

/// Send one message per recipient from the default account
#[derive(Debug, Args)]
pub struct BulkArgs {
    /// Recipient (repeatable)
    #[arg(long = "to", required = true)]
    pub recipients: Vec<String>,

    #[command(flatten)]
    pub message: MessageArgs,
}

impl BulkArgs {
    /// Execute the bulk command
    ///
    /// # Errors
    ///
    /// Returns an error if no default account is configured, an attachment
    /// cannot be read, or no recipient was accepted.
    pub async fn execute(&self, config: MailerConfig) -> Result<()> {
        let content = self.message.content().await?;
        let state = MailerState::new(config);

        let outcome = state
            .dispatcher()
            .quick_send_bulk(state.resolver(), &self.recipients, content)
            .await?;

        let marker = if outcome.overall_success { SUCCESS } else { FAILURE };
        println!("{}{}", marker, outcome.message);
        if outcome.skipped_count > 0 {
            println!("{}Skipped {} blank recipient(s)", INFO, outcome.skipped_count);
        }
        for recipient in &outcome.failed_recipients {
            println!("  {} {}", style("failed:").red(), recipient);
        }
        println!("  {} {}", style("Batch:").dim(), outcome.bulk_email_id);

        if !outcome.overall_success {
            bail!("No recipient accepted the message");
        }
        Ok(())
    }
}
