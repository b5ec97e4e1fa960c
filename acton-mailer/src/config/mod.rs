//! Configuration management for acton-mailer
//!
//! Configuration is loaded from multiple sources with clear precedence:
//!
//! 1. Environment variables (highest priority, `MAILER_` prefix, `__` for nesting)
//! 2. `./config.toml` (development)
//! 3. `~/.config/acton-mailer/config.toml` (user config, XDG)
//! 4. `/etc/acton-mailer/config.toml` (system config)
//! 5. Hardcoded defaults (fallback)
//!
//! # Example Configuration
//!
//! ```toml
//! [server]
//! bind = "0.0.0.0"
//! port = 5000
//! max_body_bytes = 26214400
//!
//! [storage]
//! history_path = "/var/lib/acton-mailer/email_history.json"
//! account_path = "/var/lib/acton-mailer/account.json"
//!
//! [smtp]
//! default_host = "smtp.gmail.com"
//! default_port = 587
//! timeout_secs = 30
//! use_tls = true
//! ```
//!
//! Override a single value with e.g. `MAILER_SERVER__PORT=8080`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::email::SmtpConfig;

/// Name used for configuration directories
pub const SERVICE_NAME: &str = "acton-mailer";

/// Prefix of configuration environment variables
pub const ENV_PREFIX: &str = "MAILER_";

/// HTTP server settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Address to bind
    pub bind: String,

    /// Port to listen on
    pub port: u16,

    /// Largest accepted request body, attachments included
    pub max_body_bytes: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 5000,
            max_body_bytes: 25 * 1024 * 1024,
        }
    }
}

impl ServerSettings {
    /// `bind:port` string suitable for a TCP listener
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}

/// File locations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Send history log
    pub history_path: PathBuf,

    /// Default account used by quick sends
    pub account_path: PathBuf,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            history_path: PathBuf::from("email_history.json"),
            account_path: PathBuf::from("account.json"),
        }
    }
}

/// SMTP defaults and transport tuning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmtpSettings {
    /// Host used by quick sends when no override is set
    pub default_host: String,

    /// Port used by quick sends when no override is set
    pub default_port: u16,

    /// Connection and command timeout in seconds
    pub timeout_secs: u64,

    /// Require TLS on every connection
    pub use_tls: bool,
}

impl Default for SmtpSettings {
    fn default() -> Self {
        Self {
            default_host: "smtp.gmail.com".to_string(),
            default_port: 587,
            timeout_secs: 30,
            use_tls: true,
        }
    }
}

impl From<&SmtpSettings> for SmtpConfig {
    fn from(settings: &SmtpSettings) -> Self {
        Self {
            use_tls: settings.use_tls,
            timeout: Duration::from_secs(settings.timeout_secs),
        }
    }
}

/// Complete acton-mailer configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailerConfig {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerSettings,

    /// File locations
    #[serde(default)]
    pub storage: StorageSettings,

    /// SMTP settings
    #[serde(default)]
    pub smtp: SmtpSettings,
}

impl MailerConfig {
    /// Load configuration from the standard locations
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Default configuration cannot be serialized to TOML
    /// - A configuration file contains invalid TOML syntax
    /// - A value fails type conversion
    pub fn load() -> anyhow::Result<Self> {
        let mut figment = Figment::new().merge(Toml::string(&toml::to_string(&Self::default())?));

        let system_config = PathBuf::from("/etc").join(SERVICE_NAME).join("config.toml");
        if system_config.exists() {
            figment = figment.merge(Toml::file(&system_config));
        }

        let user_config = Self::recommended_path();
        if user_config.exists() {
            figment = figment.merge(Toml::file(&user_config));
        }

        let local_config = PathBuf::from("./config.toml");
        if local_config.exists() {
            figment = figment.merge(Toml::file(&local_config));
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__").lowercase(true));

        Ok(figment.extract()?)
    }

    /// Load configuration from a specific file
    ///
    /// Environment variables still take precedence over the file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file contains invalid TOML or a value fails
    /// type conversion. A missing file yields the defaults.
    pub fn load_from(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let config = Figment::new()
            .merge(Toml::string(&toml::to_string(&Self::default())?))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__").lowercase(true))
            .extract()?;

        Ok(config)
    }

    /// Load from `path` when given, otherwise from the standard locations
    ///
    /// # Errors
    ///
    /// See [`load`](Self::load) and [`load_from`](Self::load_from).
    pub fn resolve(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::load_from(path),
            None => Self::load(),
        }
    }

    /// Recommended XDG config path
    #[must_use]
    pub fn recommended_path() -> PathBuf {
        dirs::config_dir().map_or_else(
            || PathBuf::from("./config.toml"),
            |config_dir| config_dir.join(SERVICE_NAME).join("config.toml"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = MailerConfig::default();

        assert_eq!(config.server.port, 5000);
        assert_eq!(config.server.max_body_bytes, 25 * 1024 * 1024);
        assert_eq!(config.storage.history_path, PathBuf::from("email_history.json"));
        assert_eq!(config.storage.account_path, PathBuf::from("account.json"));
        assert_eq!(config.smtp.default_host, "smtp.gmail.com");
        assert_eq!(config.smtp.default_port, 587);
    }

    #[test]
    fn test_server_address() {
        let server = ServerSettings {
            bind: "0.0.0.0".into(),
            port: 8080,
            ..ServerSettings::default()
        };
        assert_eq!(server.address(), "0.0.0.0:8080");
    }

    #[test]
    fn test_smtp_config_from_settings() {
        let settings = SmtpSettings {
            timeout_secs: 5,
            use_tls: false,
            ..SmtpSettings::default()
        };

        let config = SmtpConfig::from(&settings);
        assert!(!config.use_tls);
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_recommended_path() {
        let path = MailerConfig::recommended_path();
        let path = path.to_string_lossy();

        assert!(path.ends_with("config.toml"));
    }

    #[test]
    fn test_load_from_nonexistent_file() {
        let config = MailerConfig::load_from("/nonexistent/path/config.toml").unwrap();

        assert_eq!(config.smtp.default_port, 587);
    }

    #[test]
    fn test_load_from_file_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[server]\nport = 8025\n\n[storage]\nhistory_path = \"/tmp/h.json\"\n\n[smtp]\ndefault_host = \"mail.example.com\""
        )
        .unwrap();

        let config = MailerConfig::load_from(file.path()).unwrap();

        assert_eq!(config.server.port, 8025);
        assert_eq!(config.server.bind, "127.0.0.1");
        assert_eq!(config.storage.history_path, PathBuf::from("/tmp/h.json"));
        assert_eq!(config.storage.account_path, PathBuf::from("account.json"));
        assert_eq!(config.smtp.default_host, "mail.example.com");
        assert_eq!(config.smtp.default_port, 587);
    }

    #[test]
    fn test_load_from_invalid_toml_fails() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server\nport = ").unwrap();

        assert!(MailerConfig::load_from(file.path()).is_err());
    }
}
