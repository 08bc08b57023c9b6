//! Unauthenticated backend endpoints
//!
//! Login and registration produce the access token every other request
//! needs; the plan catalogue is public.

use crate::api::http::{build_client, dispatch, endpoint, read_json};
use crate::api::{PlanCatalogue, PlanInfo};
use crate::config::ServerConfig;
use crate::error::{OutreachError, Result};

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

/// Email and password pair sent to the auth endpoints
#[derive(Clone, Serialize)]
pub struct Credentials {
    /// Account email
    pub email: String,
    /// Account password
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Account details returned next to a fresh token
#[derive(Debug, Clone, Deserialize)]
pub struct AccountInfo {
    /// Account email
    pub email: String,
    /// Plan the account is on
    #[serde(default)]
    pub plan: Option<String>,
}

/// Response of the login and register endpoints
#[derive(Clone, Deserialize)]
pub struct TokenResponse {
    /// Bearer token for authenticated requests
    pub access_token: String,
    /// Always `bearer`
    #[serde(default = "default_token_type")]
    pub token_type: String,
    /// Account the token belongs to
    #[serde(default)]
    pub user: Option<AccountInfo>,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

impl std::fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenResponse")
            .field("access_token", &"<redacted>")
            .field("token_type", &self.token_type)
            .field("user", &self.user)
            .finish()
    }
}

/// Client for endpoints that do not require a session
#[derive(Debug, Clone)]
pub struct PublicApi {
    client: Client,
    base_url: String,
}

impl PublicApi {
    /// Create a client for `server`
    ///
    /// # Errors
    ///
    /// Returns error if the underlying HTTP client cannot be built
    pub fn new(server: &ServerConfig) -> Result<Self> {
        Ok(Self {
            client: build_client(server)?,
            base_url: server.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// `POST /api/auth/login`
    ///
    /// # Errors
    ///
    /// Returns [`OutreachError::Authentication`] on 401, other errors as usual
    pub async fn login(&self, credentials: &Credentials) -> Result<TokenResponse> {
        self.authenticate("login", "/api/auth/login", credentials)
            .await
    }

    /// `POST /api/auth/register`
    ///
    /// # Errors
    ///
    /// Returns [`OutreachError::Authentication`] when the backend refuses the
    /// registration (e.g. the email is taken)
    pub async fn register(&self, credentials: &Credentials) -> Result<TokenResponse> {
        self.authenticate("register", "/api/auth/register", credentials)
            .await
    }

    /// `GET /api/billing/plans`
    pub async fn list_plans(&self) -> Result<Vec<PlanInfo>> {
        let url = endpoint(&self.base_url, "/api/billing/plans");
        let response = dispatch("list_plans", self.client.get(url)).await?;
        let catalogue: PlanCatalogue = read_json("list_plans", response).await?;
        Ok(catalogue.plans)
    }

    async fn authenticate(
        &self,
        operation: &'static str,
        path: &str,
        credentials: &Credentials,
    ) -> Result<TokenResponse> {
        let url = endpoint(&self.base_url, path);
        let request = self.client.post(url).json(credentials);
        let response = match dispatch(operation, request).await {
            Ok(response) => response,
            Err(e) => return Err(rejection_to_auth_error(e)),
        };
        read_json(operation, response).await
    }
}

/// 400/401 from the auth endpoints mean bad credentials, not a broken backend
fn rejection_to_auth_error(err: anyhow::Error) -> anyhow::Error {
    match err.downcast::<OutreachError>() {
        Ok(OutreachError::Api {
            status, message, ..
        }) if status == StatusCode::UNAUTHORIZED.as_u16()
            || status == StatusCode::BAD_REQUEST.as_u16() =>
        {
            OutreachError::Authentication(detail_of(&message)).into()
        }
        Ok(other) => other.into(),
        Err(other) => other,
    }
}

/// Pull `detail` out of a FastAPI-style error body
fn detail_of(body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        detail: String,
    }

    serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.detail)
        .unwrap_or_else(|_| body.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_debug_redacts_password() {
        let creds = Credentials {
            email: "ada@example.com".to_string(),
            password: "hunter2".to_string(),
        };
        let debug = format!("{:?}", creds);
        assert!(debug.contains("ada@example.com"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_token_response_debug_redacts_token() {
        let token: TokenResponse =
            serde_json::from_str(r#"{"access_token":"secret-jwt","token_type":"bearer"}"#).unwrap();
        assert!(!format!("{:?}", token).contains("secret-jwt"));
    }

    #[test]
    fn test_detail_of_fastapi_body() {
        assert_eq!(
            detail_of(r#"{"detail":"Invalid email or password"}"#),
            "Invalid email or password"
        );
        assert_eq!(detail_of("plain text"), "plain text");
    }

    #[test]
    fn test_unauthorized_maps_to_authentication_error() {
        let err: anyhow::Error = OutreachError::Api {
            operation: "login",
            status: 401,
            message: r#"{"detail":"Invalid email or password"}"#.to_string(),
        }
        .into();
        let mapped = rejection_to_auth_error(err);
        assert!(matches!(
            mapped.downcast_ref::<OutreachError>(),
            Some(OutreachError::Authentication(msg)) if msg == "Invalid email or password"
        ));
    }

    #[test]
    fn test_server_error_is_not_authentication_error() {
        let err: anyhow::Error = OutreachError::Api {
            operation: "login",
            status: 500,
            message: String::new(),
        }
        .into();
        let mapped = rejection_to_auth_error(err);
        assert!(matches!(
            mapped.downcast_ref::<OutreachError>(),
            Some(OutreachError::Api { status: 500, .. })
        ));
    }
}
