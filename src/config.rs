//! Configuration management for outreach-chat
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::error::{OutreachError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Main configuration structure for outreach-chat
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Backend server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Where the access token lives
    #[serde(default)]
    pub session: SessionConfig,
    /// Orchestration behavior
    #[serde(default)]
    pub client: ClientConfig,
    /// Terminal rendering
    #[serde(default)]
    pub display: DisplayConfig,
}

/// Backend server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Base URL of the backend, without the `/api` suffix
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Optional per-request timeout in seconds
    ///
    /// Unset means requests never time out, matching the browser client.
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: None,
        }
    }
}

impl ServerConfig {
    /// Request timeout as a `Duration`, if one is configured
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }
}

/// Credential storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Keyring service name the access token is stored under
    #[serde(default = "default_keyring_service")]
    pub keyring_service: String,

    /// Keyring account name, one token per account
    #[serde(default = "default_account")]
    pub account: String,

    /// Backend holding the token when `OUTREACH_TOKEN` is unset
    #[serde(default)]
    pub credential_store: CredentialBackend,
}

/// Where the access token is persisted
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum CredentialBackend {
    /// OS keyring
    #[default]
    Keyring,
    /// Process memory; nothing survives the process
    Memory,
}

impl FromStr for CredentialBackend {
    type Err = OutreachError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "keyring" => Ok(Self::Keyring),
            "memory" => Ok(Self::Memory),
            other => Err(OutreachError::Config(format!(
                "Invalid credential store: {}. Must be one of: keyring, memory",
                other
            ))),
        }
    }
}

fn default_keyring_service() -> String {
    "outreach-chat".to_string()
}

fn default_account() -> String {
    "default".to_string()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            keyring_service: default_keyring_service(),
            account: default_account(),
            credential_store: CredentialBackend::default(),
        }
    }
}

/// Client orchestration configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ClientConfig {
    /// What to do when a backend request fails
    #[serde(default)]
    pub failure_policy: FailurePolicy,
}

/// Failure handling for backend requests
///
/// `Swallow` logs the failure and leaves all state untouched; `Propagate`
/// hands the error back to the caller.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Log and continue; the view simply does not update
    #[default]
    Swallow,
    /// Return the error from the orchestration call
    Propagate,
}

impl FromStr for FailurePolicy {
    type Err = OutreachError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "swallow" => Ok(Self::Swallow),
            "propagate" => Ok(Self::Propagate),
            other => Err(OutreachError::Config(format!(
                "Invalid failure policy: {}. Must be one of: swallow, propagate",
                other
            ))),
        }
    }
}

/// Terminal display configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// `chrono` format string used for chat creation dates
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Colorize terminal output
    #[serde(default = "default_color")]
    pub color: bool,
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_color() -> bool {
    true
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            date_format: default_date_format(),
            color: default_color(),
        }
    }
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// A missing file is not an error; defaults are used instead.
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| OutreachError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| OutreachError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(base_url) = std::env::var("OUTREACH_BASE_URL") {
            self.server.base_url = base_url;
        }

        if let Ok(timeout) = std::env::var("OUTREACH_TIMEOUT_SECONDS") {
            if let Ok(value) = timeout.parse() {
                self.server.timeout_seconds = Some(value);
            } else {
                tracing::warn!("Invalid OUTREACH_TIMEOUT_SECONDS: {}", timeout);
            }
        }

        if let Ok(policy) = std::env::var("OUTREACH_FAILURE_POLICY") {
            match policy.parse() {
                Ok(value) => self.client.failure_policy = value,
                Err(e) => tracing::warn!("Ignoring OUTREACH_FAILURE_POLICY: {}", e),
            }
        }

        if let Ok(backend) = std::env::var("OUTREACH_CREDENTIAL_STORE") {
            match backend.parse() {
                Ok(value) => self.session.credential_store = value,
                Err(e) => tracing::warn!("Ignoring OUTREACH_CREDENTIAL_STORE: {}", e),
            }
        }

        if let Ok(date_format) = std::env::var("OUTREACH_DATE_FORMAT") {
            self.display.date_format = date_format;
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if let Some(base_url) = &cli.base_url {
            tracing::debug!("Using base URL override from CLI: {}", base_url);
            self.server.base_url = base_url.clone();
        }
        if cli.no_color {
            self.display.color = false;
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns error if any validation check fails
    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.server.base_url).map_err(|e| {
            OutreachError::Config(format!(
                "Invalid server.base_url {}: {}",
                self.server.base_url, e
            ))
        })?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(OutreachError::Config(format!(
                "server.base_url must use http or https, got {}",
                url.scheme()
            ))
            .into());
        }

        if self.server.timeout_seconds == Some(0) {
            return Err(OutreachError::Config(
                "server.timeout_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        if self.session.keyring_service.is_empty() {
            return Err(OutreachError::Config(
                "session.keyring_service cannot be empty".to_string(),
            )
            .into());
        }

        if self.display.date_format.trim().is_empty() {
            return Err(
                OutreachError::Config("display.date_format cannot be empty".to_string()).into(),
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.base_url, "http://localhost:8000");
        assert_eq!(config.server.timeout_seconds, None);
        assert_eq!(config.client.failure_policy, FailurePolicy::Swallow);
        assert_eq!(config.display.date_format, "%Y-%m-%d");
    }

    #[test]
    fn test_config_validation_success() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_config_validation_bad_url() {
        let mut config = Config::default();
        config.server.base_url = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_non_http_scheme() {
        let mut config = Config::default();
        config.server.base_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_zero_timeout() {
        let mut config = Config::default();
        config.server.timeout_seconds = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_empty_date_format() {
        let mut config = Config::default();
        config.display.date_format = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_yaml() {
        let yaml = r#"
server:
  base_url: https://outreach.example.com
  timeout_seconds: 30
session:
  account: work
client:
  failure_policy: propagate
display:
  date_format: "%d/%m/%Y"
  color: false
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.server.base_url, "https://outreach.example.com");
        assert_eq!(config.server.timeout(), Some(Duration::from_secs(30)));
        assert_eq!(config.session.account, "work");
        assert_eq!(config.session.keyring_service, "outreach-chat");
        assert_eq!(config.client.failure_policy, FailurePolicy::Propagate);
        assert_eq!(config.display.date_format, "%d/%m/%Y");
        assert!(!config.display.color);
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config: Config = serde_yaml::from_str("server:\n  base_url: http://h:1\n").unwrap();
        assert_eq!(config.server.base_url, "http://h:1");
        assert_eq!(config.client.failure_policy, FailurePolicy::Swallow);
        assert!(config.display.color);
    }

    #[test]
    fn test_failure_policy_from_str() {
        assert_eq!(
            "Propagate".parse::<FailurePolicy>().unwrap(),
            FailurePolicy::Propagate
        );
        assert_eq!(
            " swallow ".parse::<FailurePolicy>().unwrap(),
            FailurePolicy::Swallow
        );
        assert!("retry".parse::<FailurePolicy>().is_err());
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        std::env::set_var("OUTREACH_BASE_URL", "http://env-host:9000");
        std::env::set_var("OUTREACH_TIMEOUT_SECONDS", "12");
        std::env::set_var("OUTREACH_FAILURE_POLICY", "propagate");

        let mut config = Config::default();
        config.apply_env_vars();

        std::env::remove_var("OUTREACH_BASE_URL");
        std::env::remove_var("OUTREACH_TIMEOUT_SECONDS");
        std::env::remove_var("OUTREACH_FAILURE_POLICY");

        assert_eq!(config.server.base_url, "http://env-host:9000");
        assert_eq!(config.server.timeout_seconds, Some(12));
        assert_eq!(config.client.failure_policy, FailurePolicy::Propagate);
    }

    #[test]
    #[serial]
    fn test_invalid_env_values_are_ignored() {
        std::env::set_var("OUTREACH_TIMEOUT_SECONDS", "soon");
        std::env::set_var("OUTREACH_FAILURE_POLICY", "retry");

        let mut config = Config::default();
        config.apply_env_vars();

        std::env::remove_var("OUTREACH_TIMEOUT_SECONDS");
        std::env::remove_var("OUTREACH_FAILURE_POLICY");

        assert_eq!(config.server.timeout_seconds, None);
        assert_eq!(config.client.failure_policy, FailurePolicy::Swallow);
    }

    #[test]
    #[serial]
    fn test_load_missing_file_uses_defaults() {
        let cli = crate::cli::Cli::default();
        let config = Config::load("/nonexistent/outreach.yaml", &cli).unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    #[serial]
    fn test_credential_store_from_yaml_and_env() {
        let yaml = "session:\n  credential_store: memory\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.session.credential_store, CredentialBackend::Memory);
        assert_eq!(config.session.account, "default");

        std::env::set_var("OUTREACH_CREDENTIAL_STORE", "keyring");
        let mut config = config;
        config.apply_env_vars();
        std::env::remove_var("OUTREACH_CREDENTIAL_STORE");
        assert_eq!(config.session.credential_store, CredentialBackend::Keyring);

        assert!("vault".parse::<CredentialBackend>().is_err());
    }

    #[test]
    fn test_shipped_config_has_no_timeout() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config/config.yaml");
        let config = Config::from_file(path).unwrap();
        assert_eq!(config.server.timeout_seconds, None);
        assert_eq!(config.session.credential_store, CredentialBackend::Keyring);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_cli_base_url_override() {
        let mut cli = crate::cli::Cli::default();
        cli.base_url = Some("http://cli-host:7000".to_string());
        let mut config = Config::default();
        config.apply_cli_overrides(&cli);
        assert_eq!(config.server.base_url, "http://cli-host:7000");
    }
}
