//! Logging setup
//!
//! Structured logging through `tracing`, with pretty output in debug builds
//! and JSON in release builds. `RUST_LOG` overrides the default filter.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize logging for the server
///
/// # Example
///
/// ```rust,no_run
/// use acton_mailer::observability;
///
/// # fn main() -> anyhow::Result<()> {
/// observability::init()?;
/// tracing::info!("Application started");
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init() -> anyhow::Result<()> {
    let env_filter = filter(if cfg!(debug_assertions) {
        "debug,acton_mailer=trace"
    } else {
        "info"
    });

    #[cfg(debug_assertions)]
    {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().pretty())
            .try_init()?;
    }

    #[cfg(not(debug_assertions))]
    {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()?;
    }

    Ok(())
}

/// Initialize logging for command-line use
///
/// Compact output on stderr so it never mixes with command output.
/// Quiet (warnings only) unless `verbose` is set or `RUST_LOG` says otherwise.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_cli(verbose: bool) -> anyhow::Result<()> {
    let env_filter = filter(if verbose { "debug" } else { "warn" });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .try_init()?;

    Ok(())
}

fn filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}
