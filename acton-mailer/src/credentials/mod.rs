//! Default account resolution for quick sends
//!
//! Each connection field is resolved independently: an override (normally an
//! environment variable) wins, otherwise the value comes from the account
//! file or the configured SMTP defaults.
//!
//! | Field    | Override                 | Fallback              |
//! |----------|--------------------------|-----------------------|
//! | host     | `DEFAULT_SMTP_HOST`      | `smtp.default_host`   |
//! | port     | `DEFAULT_SMTP_PORT`      | `smtp.default_port`   |
//! | user     | `DEFAULT_EMAIL`          | account file address  |
//! | password | `DEFAULT_EMAIL_PASSWORD` | account file password |

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::{debug, info, warn};

use crate::config::{MailerConfig, SmtpSettings};
use crate::email::SmtpCredentials;
use crate::error::MailerError;

/// Override for the SMTP host
pub const HOST_OVERRIDE: &str = "DEFAULT_SMTP_HOST";
/// Override for the SMTP port
pub const PORT_OVERRIDE: &str = "DEFAULT_SMTP_PORT";
/// Override for the account address
pub const USER_OVERRIDE: &str = "DEFAULT_EMAIL";
/// Override for the account password
pub const PASSWORD_OVERRIDE: &str = "DEFAULT_EMAIL_PASSWORD";

/// Source of per-field overrides
pub trait OverrideSource: Send + Sync {
    /// Value for `key`, if set
    fn get(&self, key: &str) -> Option<String>;
}

/// Reads overrides from the process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvOverrides;

impl OverrideSource for EnvOverrides {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl OverrideSource for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}

/// Contents of the account file
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredAccount {
    /// Sender address, also used as the SMTP user
    #[serde(default)]
    pub address: String,

    /// SMTP password
    #[serde(default)]
    pub password: String,
}

impl std::fmt::Debug for StoredAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoredAccount")
            .field("address", &self.address)
            .field("password", &"[redacted]")
            .finish()
    }
}

/// Resolves SMTP credentials for quick sends
#[derive(Clone)]
pub struct CredentialResolver {
    account_path: PathBuf,
    default_host: String,
    default_port: u16,
    overrides: Arc<dyn OverrideSource>,
}

impl std::fmt::Debug for CredentialResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialResolver")
            .field("account_path", &self.account_path)
            .field("default_host", &self.default_host)
            .field("default_port", &self.default_port)
            .finish_non_exhaustive()
    }
}

impl CredentialResolver {
    /// Resolver reading overrides from the environment
    #[must_use]
    pub fn new(account_path: impl Into<PathBuf>, smtp: &SmtpSettings) -> Self {
        Self {
            account_path: account_path.into(),
            default_host: smtp.default_host.clone(),
            default_port: smtp.default_port,
            overrides: Arc::new(EnvOverrides),
        }
    }

    /// Resolver built from the loaded configuration
    #[must_use]
    pub fn from_config(config: &MailerConfig) -> Self {
        Self::new(config.storage.account_path.clone(), &config.smtp)
    }

    /// Replace the override source
    #[must_use]
    pub fn with_overrides(mut self, overrides: impl OverrideSource + 'static) -> Self {
        self.overrides = Arc::new(overrides);
        self
    }

    /// Location of the account file
    #[must_use]
    pub fn account_path(&self) -> &Path {
        &self.account_path
    }

    /// Resolve the default account's connection parameters
    ///
    /// The account file is only read when the user or password override is
    /// missing.
    ///
    /// # Errors
    ///
    /// Returns `MailerError::Config` when the user or password cannot be
    /// resolved from either source.
    pub async fn resolve(&self) -> Result<SmtpCredentials, MailerError> {
        let host = self
            .override_value(HOST_OVERRIDE)
            .unwrap_or_else(|| self.default_host.clone());
        let port = self.resolve_port();

        let (username, password) = match (
            self.override_value(USER_OVERRIDE),
            self.override_value(PASSWORD_OVERRIDE),
        ) {
            (Some(user), Some(password)) => (user, password),
            (user, password) => {
                let account = self.load_account().await?;
                (
                    user.unwrap_or(account.address),
                    password.unwrap_or(account.password),
                )
            }
        };

        if username.trim().is_empty() {
            return Err(MailerError::config("Default account address is not configured"));
        }
        if password.is_empty() {
            return Err(MailerError::config("Default account password is not configured"));
        }

        debug!(%host, port, user = %username, "Resolved default account");
        Ok(SmtpCredentials::new(host, port, username.trim(), password))
    }

    /// Replace the stored account
    ///
    /// # Errors
    ///
    /// Returns `MailerError::Validation` for a blank address or password and
    /// `MailerError::Io` if the file cannot be written.
    pub async fn save_account(&self, address: &str, password: &str) -> Result<(), MailerError> {
        let address = address.trim();
        if address.is_empty() {
            return Err(MailerError::validation("Account address must not be empty"));
        }
        if password.is_empty() {
            return Err(MailerError::validation("Account password must not be empty"));
        }

        let account = StoredAccount {
            address: address.to_string(),
            password: password.to_string(),
        };

        if let Some(parent) = self.account_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&self.account_path, serde_json::to_string_pretty(&account)?).await?;

        info!(path = %self.account_path.display(), %address, "Default account saved");
        Ok(())
    }

    /// Address of the stored account, if there is one
    ///
    /// # Errors
    ///
    /// Returns `MailerError::Config` if the account file exists but cannot be
    /// read or parsed.
    pub async fn stored_address(&self) -> Result<Option<String>, MailerError> {
        match self.load_account().await {
            Ok(account) if account.address.trim().is_empty() => Ok(None),
            Ok(account) => Ok(Some(account.address)),
            Err(_) if !self.account_path.exists() => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn override_value(&self, key: &str) -> Option<String> {
        self.overrides.get(key).filter(|value| !value.trim().is_empty())
    }

    fn resolve_port(&self) -> u16 {
        let Some(raw) = self.override_value(PORT_OVERRIDE) else {
            return self.default_port;
        };

        raw.trim().parse().unwrap_or_else(|_| {
            warn!(value = %raw, fallback = self.default_port, "Ignoring unparsable {PORT_OVERRIDE}");
            self.default_port
        })
    }

    async fn load_account(&self) -> Result<StoredAccount, MailerError> {
        let path = self.account_path.display();
        let content = fs::read_to_string(&self.account_path).await.map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                MailerError::config(format!("No default account configured ({path} not found)"))
            } else {
                MailerError::config(format!("Cannot read account file {path}: {e}"))
            }
        })?;

        serde_json::from_str(&content)
            .map_err(|e| MailerError::config(format!("Invalid account file {path}: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn overrides(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    fn resolver(dir: &TempDir, pairs: &[(&str, &str)]) -> CredentialResolver {
        CredentialResolver::new(dir.path().join("account.json"), &SmtpSettings::default())
            .with_overrides(overrides(pairs))
    }

    fn write_account(dir: &TempDir, json: &str) {
        std::fs::write(dir.path().join("account.json"), json).unwrap();
    }

    #[tokio::test]
    async fn test_resolve_from_account_file_with_defaults() {
        let dir = TempDir::new().unwrap();
        write_account(&dir, r#"{"address": "me@example.com", "password": "app-pw"}"#);

        let credentials = resolver(&dir, &[]).resolve().await.unwrap();

        assert_eq!(credentials.host, "smtp.gmail.com");
        assert_eq!(credentials.port, 587);
        assert_eq!(credentials.username, "me@example.com");
        assert_eq!(credentials.password, "app-pw");
    }

    #[tokio::test]
    async fn test_overrides_take_precedence() {
        let dir = TempDir::new().unwrap();
        write_account(&dir, r#"{"address": "file@example.com", "password": "file-pw"}"#);

        let credentials = resolver(
            &dir,
            &[
                (HOST_OVERRIDE, "mail.example.com"),
                (PORT_OVERRIDE, "2525"),
                (USER_OVERRIDE, "env@example.com"),
            ],
        )
        .resolve()
        .await
        .unwrap();

        assert_eq!(credentials.host, "mail.example.com");
        assert_eq!(credentials.port, 2525);
        assert_eq!(credentials.username, "env@example.com");
        assert_eq!(credentials.password, "file-pw");
    }

    #[tokio::test]
    async fn test_full_overrides_need_no_account_file() {
        let dir = TempDir::new().unwrap();

        let credentials = resolver(&dir, &[(USER_OVERRIDE, "env@example.com"), (PASSWORD_OVERRIDE, "pw")])
            .resolve()
            .await
            .unwrap();

        assert_eq!(credentials.username, "env@example.com");
    }

    #[tokio::test]
    async fn test_unparsable_port_falls_back_to_default() {
        let dir = TempDir::new().unwrap();

        let credentials = resolver(
            &dir,
            &[(PORT_OVERRIDE, "not-a-port"), (USER_OVERRIDE, "a@x.com"), (PASSWORD_OVERRIDE, "pw")],
        )
        .resolve()
        .await
        .unwrap();

        assert_eq!(credentials.port, 587);
    }

    #[tokio::test]
    async fn test_blank_override_is_ignored() {
        let dir = TempDir::new().unwrap();
        write_account(&dir, r#"{"address": "file@example.com", "password": "pw"}"#);

        let credentials = resolver(&dir, &[(USER_OVERRIDE, "  ")]).resolve().await.unwrap();

        assert_eq!(credentials.username, "file@example.com");
    }

    #[tokio::test]
    async fn test_missing_account_is_config_error() {
        let dir = TempDir::new().unwrap();

        let result = resolver(&dir, &[]).resolve().await;

        assert!(matches!(result, Err(MailerError::Config(msg)) if msg.contains("not found")));
    }

    #[tokio::test]
    async fn test_corrupt_account_is_config_error() {
        let dir = TempDir::new().unwrap();
        write_account(&dir, "{ broken");

        let result = resolver(&dir, &[]).resolve().await;

        assert!(matches!(result, Err(MailerError::Config(_))));
    }

    #[tokio::test]
    async fn test_empty_password_is_config_error() {
        let dir = TempDir::new().unwrap();
        write_account(&dir, r#"{"address": "me@example.com", "password": ""}"#);

        let result = resolver(&dir, &[]).resolve().await;

        assert!(matches!(result, Err(MailerError::Config(msg)) if msg.contains("password")));
    }

    #[tokio::test]
    async fn test_save_account_overwrites_and_round_trips() {
        let dir = TempDir::new().unwrap();
        let resolver = resolver(&dir, &[]);

        resolver.save_account("first@example.com", "one").await.unwrap();
        resolver.save_account(" second@example.com ", "two").await.unwrap();

        let credentials = resolver.resolve().await.unwrap();
        assert_eq!(credentials.username, "second@example.com");
        assert_eq!(credentials.password, "two");
        assert_eq!(
            resolver.stored_address().await.unwrap().as_deref(),
            Some("second@example.com")
        );
    }

    #[tokio::test]
    async fn test_save_account_rejects_blank_values() {
        let dir = TempDir::new().unwrap();
        let resolver = resolver(&dir, &[]);

        assert!(matches!(
            resolver.save_account("  ", "pw").await,
            Err(MailerError::Validation(_))
        ));
        assert!(matches!(
            resolver.save_account("a@x.com", "").await,
            Err(MailerError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_stored_address_without_file() {
        let dir = TempDir::new().unwrap();

        assert_eq!(resolver(&dir, &[]).stored_address().await.unwrap(), None);
    }

    #[test]
    fn test_debug_redacts_password() {
        let account = StoredAccount {
            address: "me@example.com".into(),
            password: "hunter2".into(),
        };

        assert!(!format!("{account:?}").contains("hunter2"));
    }
}
