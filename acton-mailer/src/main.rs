//! acton-mailer HTTP server

#![forbid(unsafe_code)]
#![deny(clippy::all, clippy::pedantic, clippy::nursery)]
#![warn(clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::path::PathBuf;

use acton_mailer::prelude::*;
use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

#[derive(Parser)]
#[command(name = "acton-mailer")]
#[command(version)]
#[command(about = "HTTP API for single and bulk email dispatch", long_about = None)]
struct Args {
    /// Configuration file (default: standard locations)
    #[arg(value_name = "PATH")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    observability::init()?;

    let config = MailerConfig::resolve(args.config.as_deref())
        .context("Failed to load configuration")?;

    let address = config.server.address();
    info!(
        %address,
        history = %config.storage.history_path.display(),
        account = %config.storage.account_path.display(),
        "Starting acton-mailer"
    );

    let app = router(MailerState::new(config));
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
