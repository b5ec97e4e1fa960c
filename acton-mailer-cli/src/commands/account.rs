//! Default account commands

use acton_mailer::config::MailerConfig;
use acton_mailer::credentials::{CredentialResolver, USER_OVERRIDE};
use anyhow::{Context, Result};
use clap::Subcommand;
use console::style;
use dialoguer::Password;

use super::{INFO, SUCCESS};

/// Default account commands
#[derive(Debug, Subcommand)]
pub enum AccountCommand {
    /// Store the default account, replacing any existing one
    Set {
        /// Sender address, also used as the SMTP user
        #[arg(long)]
        address: String,

        /// SMTP password (prompted for when omitted)
        #[arg(long)]
        password: Option<String>,
    },

    /// Show the stored account address
    Show,
}

impl AccountCommand {
    /// Execute the account command
    ///
    /// # Errors
    ///
    /// Returns an error if the password prompt fails or the account file
    /// cannot be read or written.
    pub async fn execute(&self, config: &MailerConfig) -> Result<()> {
        let resolver = CredentialResolver::from_config(config);

        match self {
            Self::Set { address, password } => set(&resolver, address, password.as_deref()).await,
            Self::Show => show(&resolver).await,
        }
    }
}

async fn set(resolver: &CredentialResolver, address: &str, password: Option<&str>) -> Result<()> {
    let password = match password {
        Some(password) => password.to_string(),
        None => Password::new()
            .with_prompt(format!("SMTP password for {address}"))
            .interact()
            .context("Failed to read password")?,
    };

    resolver.save_account(address, &password).await?;

    println!(
        "{}Default account {} saved to {}",
        SUCCESS,
        style(address.trim()).cyan(),
        style(resolver.account_path().display()).dim()
    );
    Ok(())
}

async fn show(resolver: &CredentialResolver) -> Result<()> {
    match resolver.stored_address().await? {
        Some(address) => println!("{}Default account: {}", INFO, style(address).cyan()),
        None => {
            println!("{}No default account configured", INFO);
            println!("  Run {}", style("mailer account set --address <ADDRESS>").bold());
        }
    }

    if let Ok(address) = std::env::var(USER_OVERRIDE) {
        println!(
            "  {} {} is set: quick sends use {}",
            style("Note:").yellow(),
            USER_OVERRIDE,
            style(address).cyan()
        );
    }

    Ok(())
}
