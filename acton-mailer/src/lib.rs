//! acton-mailer: single and bulk email dispatch with a durable send history
//!
//! Callers supply SMTP credentials per request (or rely on a stored default
//! account for quick sends). Every send attempt, single or bulk, is appended
//! to a JSON history log that can be queried newest-first.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use acton_mailer::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     observability::init()?;
//!
//!     let config = MailerConfig::load()?;
//!     let address = config.server.address();
//!     let app = router(MailerState::new(config));
//!
//!     let listener = tokio::net::TcpListener::bind(address).await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! - [`email`]: envelope builder and the SMTP transport
//! - [`history`]: send attempt records and the file-backed log
//! - [`dispatch`]: single, bulk and quick sends
//! - [`credentials`]: default account resolution
//! - [`handlers`]: the HTTP API

pub mod config;
pub mod credentials;
pub mod dispatch;
pub mod email;
pub mod error;
pub mod handlers;
pub mod health;
pub mod history;
pub mod observability;
pub mod state;

pub mod prelude {
    //! Convenience re-exports for common types and traits
    //!
    //! ```rust
    //! use acton_mailer::prelude::*;
    //! ```

    pub use crate::config::MailerConfig;
    pub use crate::credentials::{CredentialResolver, EnvOverrides, OverrideSource};
    pub use crate::dispatch::{BulkOutcome, Dispatcher, MessageContent, SendOutcome};
    pub use crate::email::{Attachment, Email, EmailError, EmailTransport, SmtpBackend, SmtpCredentials};
    pub use crate::error::MailerError;
    pub use crate::handlers::router;
    pub use crate::history::{HistoryStore, HistorySummary, SendAttemptRecord};
    pub use crate::observability;
    pub use crate::state::MailerState;
}
