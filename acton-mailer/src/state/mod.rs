//! Application state shared by all handlers

use std::sync::Arc;

use crate::{
    config::MailerConfig,
    credentials::CredentialResolver,
    dispatch::Dispatcher,
    email::{EmailTransport, SmtpBackend, SmtpConfig},
    history::HistoryStore,
};

/// Application state
///
/// Cheap to clone: the configuration and history store are shared, so every
/// request in the process appends to the same log through the same lock.
///
/// # Example
///
/// ```rust
/// use acton_mailer::{config::MailerConfig, state::MailerState};
///
/// let state = MailerState::new(MailerConfig::default());
/// let app = acton_mailer::handlers::router(state);
/// # let _ = app;
/// ```
#[derive(Clone, Debug)]
pub struct MailerState {
    config: Arc<MailerConfig>,
    dispatcher: Dispatcher,
    resolver: CredentialResolver,
}

impl MailerState {
    /// State delivering over SMTP
    #[must_use]
    pub fn new(config: MailerConfig) -> Self {
        let transport = Arc::new(SmtpBackend::new(SmtpConfig::from(&config.smtp)));
        Self::with_transport(config, transport)
    }

    /// State delivering through the given transport
    #[must_use]
    pub fn with_transport(config: MailerConfig, transport: Arc<dyn EmailTransport>) -> Self {
        let history = Arc::new(HistoryStore::new(config.storage.history_path.clone()));
        let resolver = CredentialResolver::from_config(&config);

        Self {
            config: Arc::new(config),
            dispatcher: Dispatcher::new(transport, history),
            resolver,
        }
    }

    /// Replace the credential resolver
    #[must_use]
    pub fn with_resolver(mut self, resolver: CredentialResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Loaded configuration
    #[must_use]
    pub fn config(&self) -> &MailerConfig {
        &self.config
    }

    /// Dispatcher for all sends
    #[must_use]
    pub const fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Resolver for quick sends
    #[must_use]
    pub const fn resolver(&self) -> &CredentialResolver {
        &self.resolver
    }
}
