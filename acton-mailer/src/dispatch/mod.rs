//! Single and bulk dispatch
//!
//! The [`Dispatcher`] owns the transport and the history store. Every public
//! operation that reaches the transport appends exactly one history record,
//! whatever the delivery outcome. History failures are logged and never
//! change what the caller sees.

mod bulk;
mod quick;
mod schedule;
mod single;
mod types;

use std::sync::Arc;

use tracing::error;

use crate::email::{Email, EmailError, EmailTransport, SmtpCredentials};
use crate::history::{HistoryStore, SendAttemptRecord};

pub use schedule::{validate_schedule, SCHEDULE_NOT_IMPLEMENTED, SCHEDULE_IN_PAST};
pub use types::{BulkOutcome, MessageContent, SendOutcome};

/// Message for an empty bulk recipient list
pub const NO_RECIPIENTS: &str = "At least one recipient address is required";

/// Sends email and records every attempt
#[derive(Clone)]
pub struct Dispatcher {
    transport: Arc<dyn EmailTransport>,
    history: Arc<HistoryStore>,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("history", &self.history.path())
            .finish_non_exhaustive()
    }
}

impl Dispatcher {
    /// Create a dispatcher over a transport and a shared history store
    #[must_use]
    pub fn new(transport: Arc<dyn EmailTransport>, history: Arc<HistoryStore>) -> Self {
        Self { transport, history }
    }

    /// The history store attempts are recorded in
    #[must_use]
    pub const fn history(&self) -> &Arc<HistoryStore> {
        &self.history
    }

    async fn deliver(&self, credentials: &SmtpCredentials, email: Email) -> Result<(), EmailError> {
        self.transport.send(credentials.clone(), email).await
    }

    async fn record(&self, record: SendAttemptRecord) {
        let id = record.id.clone();
        if let Err(e) = self.history.append(record).await {
            error!(record_id = %id, error = %e, "Failed to append send history");
        }
    }
}
