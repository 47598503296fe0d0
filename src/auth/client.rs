use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::UserProfile;

use super::{AuthError, Session};

/// Login endpoint path, relative to the configured base URL
const LOGIN_PATH: &str = "/api/auth/login";

/// HTTP request timeout in seconds.
/// 30s allows for slow responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: String,
    #[serde(default)]
    user: Option<UserProfile>,
}

/// HTTP client for the login endpoint.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct AuthClient {
    client: Client,
    base_url: String,
}

impl AuthClient {
    /// Create a client against the given base URL, e.g. `http://127.0.0.1:8000`
    pub fn new(base_url: impl Into<String>) -> Result<Self, AuthError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Ok(Self { client, base_url })
    }

    /// Submit credentials and return the resulting session.
    ///
    /// This is the only network operation in the crate and has no other
    /// side effects; persisting the session is the caller's job (see
    /// [`sign_in`](super::sign_in)).
    pub async fn login(&self, username: &str, password: &str) -> Result<Session, AuthError> {
        if username.is_empty() || password.is_empty() {
            return Err(AuthError::Rejected(
                "username and password are required".to_string(),
            ));
        }

        let url = format!("{}{}", self.base_url, LOGIN_PATH);
        debug!(url = %url, username = %username, "Submitting credentials");

        let response = self
            .client
            .post(&url)
            .json(&LoginRequest { username, password })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(AuthError::from_status(status, &body));
        }

        let parsed: LoginResponse = serde_json::from_str(&body)
            .map_err(|e| AuthError::MalformedResponse(e.to_string()))?;

        if parsed.token.is_empty() {
            return Err(AuthError::MalformedResponse(
                "response token was empty".to_string(),
            ));
        }

        debug!(username = %username, "Login accepted");
        Ok(Session {
            token: parsed.token,
            user: parsed.user,
        })
    }
}
