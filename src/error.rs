//! Error types for outreach-chat
//!
//! This module defines all error types used throughout the client,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for outreach-chat operations
///
/// Covers configuration loading, credential storage, transport failures,
/// and non-success responses from the backend API.
#[derive(Error, Debug)]
pub enum OutreachError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Backend answered with a non-success HTTP status
    #[error("API error: {operation} returned {status}: {message}")]
    Api {
        /// Logical operation name (e.g. `list_chats`)
        operation: &'static str,
        /// HTTP status code returned by the backend
        status: u16,
        /// Response body, if any, for diagnostics
        message: String,
    },

    /// No access token is stored for the session
    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    /// Authentication errors (e.g., 401 Unauthorized during login)
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Unknown subscription plan name
    #[error("Invalid plan: {0}. Must be one of: FREE, PRO, ULTRA, BUSINESS")]
    InvalidPlan(String),

    /// Message text was blank after trimming
    #[error("Message text cannot be empty")]
    EmptyMessage,

    /// Argument is not an http(s) profile URL
    #[error("Invalid profile URL: {0}")]
    InvalidProfileUrl(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP transport errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Keyring/credential storage errors
    #[error("Keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    /// URL parsing errors
    #[error("URL error: {0}")]
    UrlParse(#[from] url::ParseError),
}

/// Result type alias for outreach-chat operations
///
/// Uses `anyhow::Error` so that callers can attach context while still
/// being able to downcast to [`OutreachError`].
pub type Result<T> = anyhow::Result<T>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let error = OutreachError::Config("invalid format".to_string());
        assert_eq!(error.to_string(), "Configuration error: invalid format");
    }

    #[test]
    fn test_api_error_display() {
        let error = OutreachError::Api {
            operation: "get_quota",
            status: 503,
            message: "unavailable".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "API error: get_quota returned 503: unavailable"
        );
    }

    #[test]
    fn test_missing_credentials_error_display() {
        let error = OutreachError::MissingCredentials("no token stored".to_string());
        assert_eq!(error.to_string(), "Missing credentials: no token stored");
    }

    #[test]
    fn test_invalid_plan_error_display() {
        let error = OutreachError::InvalidPlan("GOLD".to_string());
        assert!(error.to_string().starts_with("Invalid plan: GOLD"));
    }

    #[test]
    fn test_empty_message_error_display() {
        assert_eq!(
            OutreachError::EmptyMessage.to_string(),
            "Message text cannot be empty"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error: OutreachError = io_error.into();
        assert!(matches!(error, OutreachError::Io(_)));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_error = serde_json::from_str::<serde_json::Value>("{invalid json}").unwrap_err();
        let error: OutreachError = json_error.into();
        assert!(matches!(error, OutreachError::Serialization(_)));
    }

    #[test]
    fn test_url_error_conversion() {
        let url_error = url::Url::parse("not a url").unwrap_err();
        let error: OutreachError = url_error.into();
        assert!(matches!(error, OutreachError::UrlParse(_)));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<OutreachError>();
    }
}
