//! Login, registration and logout
//!
//! A successful login or registration stores the returned access token in
//! the credential store; every other command reads it from there.

use colored::Colorize;
use rustyline::DefaultEditor;

use crate::api::public::{Credentials, PublicApi};
use crate::config::{Config, CredentialBackend};
use crate::error::{OutreachError, Result};
use crate::session::{credential_store, CredentialStore, TOKEN_ENV_VAR};

/// Which auth endpoint to call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthAction {
    /// Existing account
    Login,
    /// New account
    Register,
}

/// Prompt for missing credentials, authenticate and store the token
///
/// # Errors
///
/// Returns [`OutreachError::Authentication`] when the backend rejects the
/// credentials.
pub async fn authenticate(
    config: &Config,
    action: AuthAction,
    email: Option<String>,
    password: Option<String>,
) -> Result<()> {
    if std::env::var(TOKEN_ENV_VAR).is_ok() {
        tracing::warn!(
            "{} is set; the stored token will be ignored until it is unset",
            TOKEN_ENV_VAR
        );
    }
    if config.session.credential_store == CredentialBackend::Memory {
        tracing::warn!(
            "session.credential_store is memory; the token is lost when this command exits"
        );
    }

    let email = match email {
        Some(email) => email,
        None => prompt_line("Email: ")?,
    };
    let password = match password {
        Some(password) => password,
        None => rpassword::prompt_password("Password: ")?,
    };
    let credentials = validate_credentials(email, password)?;

    let api = PublicApi::new(&config.server)?;
    let response = match action {
        AuthAction::Login => api.login(&credentials).await?,
        AuthAction::Register => api.register(&credentials).await?,
    };

    let store = credential_store(config);
    store_token(store.as_ref(), &response.access_token)?;
    tracing::info!("Stored access token for {}", credentials.email);

    let plan = response
        .user
        .and_then(|u| u.plan)
        .unwrap_or_else(|| "FREE".to_string());
    println!(
        "{} Logged in as {} ({} plan)",
        "✓".green(),
        credentials.email.cyan(),
        plan
    );
    Ok(())
}

/// Forget the stored token
pub fn logout(config: &Config) -> Result<()> {
    credential_store(config).clear()?;
    println!("{}", "Logged out".green());
    Ok(())
}

fn prompt_line(prompt: &str) -> Result<String> {
    let mut rl = DefaultEditor::new()?;
    Ok(rl.readline(prompt)?)
}

fn validate_credentials(email: String, password: String) -> Result<Credentials> {
    let email = email.trim().to_string();
    if email.is_empty() || !email.contains('@') {
        return Err(OutreachError::Authentication(format!("Invalid email: {:?}", email)).into());
    }
    if password.is_empty() {
        return Err(OutreachError::Authentication("Password cannot be empty".to_string()).into());
    }
    Ok(Credentials { email, password })
}

fn store_token(store: &dyn CredentialStore, token: &str) -> Result<()> {
    if token.trim().is_empty() {
        return Err(
            OutreachError::Authentication("Backend returned an empty token".to_string()).into(),
        );
    }
    store.save(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemoryStore;

    #[test]
    fn test_validate_credentials_trims_email() {
        let creds = validate_credentials(" ada@example.com ".to_string(), "pw".to_string()).unwrap();
        assert_eq!(creds.email, "ada@example.com");
    }

    #[test]
    fn test_validate_credentials_rejects_bad_input() {
        assert!(validate_credentials("not-an-email".to_string(), "pw".to_string()).is_err());
        assert!(validate_credentials("ada@example.com".to_string(), String::new()).is_err());
    }

    #[test]
    fn test_store_token() {
        let store = MemoryStore::new();
        store_token(&store, "jwt").unwrap();
        assert_eq!(store.load().unwrap(), Some("jwt".to_string()));
        assert!(store_token(&store, " ").is_err());
    }
}
