//! mailer: command-line companion to the acton-mailer API

#![forbid(unsafe_code)]
#![deny(clippy::all, clippy::pedantic, clippy::nursery)]
#![warn(clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

mod commands;

use std::path::PathBuf;

use acton_mailer::{config::MailerConfig, observability};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use commands::{AccountCommand, BulkArgs, HistoryArgs, SendArgs};

#[derive(Parser)]
#[command(name = "mailer")]
#[command(version)]
#[command(about = "Send email and inspect the acton-mailer send history", long_about = None)]
struct Cli {
    /// Configuration file (default: standard locations)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the default account used by quick sends
    Account {
        #[command(subcommand)]
        command: AccountCommand,
    },
    /// Show the send history, newest first
    History(HistoryArgs),
    /// Send one message from the default account
    Send(SendArgs),
    /// Send one message per recipient from the default account
    Bulk(BulkArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    observability::init_cli(cli.verbose)?;

    let config =
        MailerConfig::resolve(cli.config.as_deref()).context("Failed to load configuration")?;

    match cli.command {
        Commands::Account { command } => command.execute(&config).await,
        Commands::History(args) => args.execute(&config).await,
        Commands::Send(args) => args.execute(config).await,
        Commands::Bulk(args) => args.execute(config).await,
    }
}
