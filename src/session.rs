//! Access token persistence and session bootstrap
//!
//! The token is stored in the operating system's native credential store
//! (Keychain on macOS, Secret Service on Linux, Windows Credential Manager
//! on Windows). [`MemoryStore`] stands in for it when the token comes from
//! the environment, and in tests.

use std::sync::{Arc, Mutex};

use crate::config::{Config, CredentialBackend};
use crate::error::{OutreachError, Result};
use crate::view::ChatView;

/// Environment variable that supplies a token and bypasses the keyring
pub const TOKEN_ENV_VAR: &str = "OUTREACH_TOKEN";

/// Bearer credential for the authenticated endpoints
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    access_token: String,
}

impl Session {
    /// Wrap an access token
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
        }
    }

    /// The raw bearer token
    pub fn access_token(&self) -> &str {
        &self.access_token
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &"<redacted>")
            .finish()
    }
}

/// Persistent storage for the access token
pub trait CredentialStore: Send + Sync {
    /// Stored token, or `None` if nobody is logged in
    fn load(&self) -> Result<Option<String>>;

    /// Persist `token`, replacing any previous one
    fn save(&self, token: &str) -> Result<()>;

    /// Forget the stored token; succeeds when nothing is stored
    fn clear(&self) -> Result<()>;
}

/// Token stored in the OS keyring under `service`/`account`
#[derive(Debug, Clone)]
pub struct KeyringStore {
    service: String,
    account: String,
}

impl KeyringStore {
    /// Accessor for the given keyring entry
    pub fn new(service: impl Into<String>, account: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            account: account.into(),
        }
    }

    fn entry(&self) -> Result<keyring::Entry> {
        Ok(keyring::Entry::new(&self.service, &self.account).map_err(OutreachError::Keyring)?)
    }
}

impl CredentialStore for KeyringStore {
    fn load(&self) -> Result<Option<String>> {
        match self.entry()?.get_password() {
            Ok(token) => Ok(Some(token)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(OutreachError::Keyring(e).into()),
        }
    }

    fn save(&self, token: &str) -> Result<()> {
        self.entry()?
            .set_password(token)
            .map_err(OutreachError::Keyring)?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match self.entry()?.delete_password() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(OutreachError::Keyring(e).into()),
        }
    }
}

/// Process-local token store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    token: Arc<Mutex<Option<String>>>,
}

impl MemoryStore {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-loaded with `token`
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Arc::new(Mutex::new(Some(token.into()))),
        }
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.token.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl CredentialStore for MemoryStore {
    fn load(&self) -> Result<Option<String>> {
        Ok(self.slot().clone())
    }

    fn save(&self, token: &str) -> Result<()> {
        *self.slot() = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.slot() = None;
        Ok(())
    }
}

/// Pick the credential store for `config`
///
/// `OUTREACH_TOKEN` wins over the configured backend so scripts and CI can
/// run without a desktop credential service.
pub fn credential_store(config: &Config) -> Box<dyn CredentialStore> {
    match std::env::var(TOKEN_ENV_VAR) {
        Ok(token) if !token.trim().is_empty() => {
            tracing::debug!("Using access token from {}", TOKEN_ENV_VAR);
            Box::new(MemoryStore::with_token(token.trim()))
        }
        _ => match config.session.credential_store {
            CredentialBackend::Keyring => Box::new(KeyringStore::new(
                &config.session.keyring_service,
                &config.session.account,
            )),
            CredentialBackend::Memory => {
                tracing::debug!("Using in-memory credential store");
                Box::new(MemoryStore::new())
            }
        },
    }
}

/// Read the stored credential, or redirect the view to login
///
/// Returns `Ok(None)` after calling [`ChatView::redirect_to_login`] when no
/// token is stored; the caller must then stop without issuing requests.
///
/// # Errors
///
/// Returns error if the credential store itself fails
pub fn bootstrap<V: ChatView + ?Sized>(
    store: &dyn CredentialStore,
    view: &mut V,
) -> Result<Option<Session>> {
    match store.load()? {
        Some(token) if !token.trim().is_empty() => {
            tracing::debug!("Found stored access token");
            Ok(Some(Session::new(token)))
        }
        _ => {
            tracing::info!("No stored access token, redirecting to login");
            view.redirect_to_login();
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::recording::{RecordingView, ViewEvent};
    use serial_test::serial;

    #[test]
    fn test_session_debug_redacts_token() {
        let session = Session::new("secret-jwt");
        assert!(!format!("{:?}", session).contains("secret-jwt"));
        assert_eq!(session.access_token(), "secret-jwt");
    }

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryStore::new();
        assert_eq!(store.load().unwrap(), None);
        store.save("tok").unwrap();
        assert_eq!(store.load().unwrap(), Some("tok".to_string()));
        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_bootstrap_without_token_redirects() {
        let store = MemoryStore::new();
        let mut view = RecordingView::new();
        let session = bootstrap(&store, &mut view).unwrap();
        assert!(session.is_none());
        assert_eq!(view.events(), &[ViewEvent::RedirectToLogin]);
    }

    #[test]
    fn test_bootstrap_blank_token_redirects() {
        let store = MemoryStore::with_token("   ");
        let mut view = RecordingView::new();
        assert!(bootstrap(&store, &mut view).unwrap().is_none());
        assert!(view.redirected());
    }

    #[test]
    fn test_bootstrap_with_token_returns_session() {
        let store = MemoryStore::with_token("tok");
        let mut view = RecordingView::new();
        let session = bootstrap(&store, &mut view).unwrap();
        assert_eq!(session, Some(Session::new("tok")));
        assert!(view.events().is_empty());
    }

    #[test]
    #[serial]
    fn test_credential_store_prefers_env_token() {
        std::env::set_var(TOKEN_ENV_VAR, "env-token");
        let store = credential_store(&Config::default());
        std::env::remove_var(TOKEN_ENV_VAR);
        assert_eq!(store.load().unwrap(), Some("env-token".to_string()));
    }

    #[test]
    #[serial]
    fn test_memory_backend_starts_empty() {
        std::env::remove_var(TOKEN_ENV_VAR);
        let mut config = Config::default();
        config.session.credential_store = CredentialBackend::Memory;

        let store = credential_store(&config);
        let mut view = RecordingView::new();

        assert_eq!(store.load().unwrap(), None);
        assert!(bootstrap(store.as_ref(), &mut view).unwrap().is_none());
        assert!(view.redirected());
    }
}
