//! Identity provider client for the session relay.
//!
//! The provider hands out an authorization URL in no-redirect mode, the
//! browser-native auth flow produces a callback URL, and the token
//! endpoint exchanges codes and refresh tokens for sessions.

use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use serde::Deserialize;

use crate::types::errors::SessionError;
use crate::types::session::Session;

/// The identity provider's endpoints and client registration.
#[derive(Debug, Clone)]
pub struct IdentityConfig {
    pub auth_endpoint: String,
    pub token_endpoint: String,
    pub client_id: String,
    pub redirect_uri: String,
}

/// The identity provider round trips, injectable so tests substitute fakes.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Obtains the interactive authorization URL in no-redirect mode.
    async fn authorize_url(&self) -> Result<String, SessionError>;
    /// Exchanges an authorization code for a session.
    async fn exchange_code(&self, code: &str) -> Result<Session, SessionError>;
    /// Exchanges a refresh token for a fresh session.
    async fn refresh(&self, refresh_token: &str) -> Result<Session, SessionError>;
}

/// The browser-native interactive hop: given an authorization URL, runs
/// the system auth flow and resolves to the callback URL it landed on.
#[async_trait]
pub trait AuthFlow: Send + Sync {
    async fn launch(&self, auth_url: &str) -> Result<String, SessionError>;
}

#[derive(Deserialize)]
struct AuthUrlResponse {
    url: String,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: Option<String>,
    expires_in: i64,
}

fn now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}

/// HTTP identity provider client.
pub struct HttpIdentityProvider {
    http: reqwest::Client,
    config: IdentityConfig,
}

impl HttpIdentityProvider {
    pub fn new(config: IdentityConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    async fn token_request(
        &self,
        form: &[(&str, &str)],
        prior_refresh: Option<&str>,
    ) -> Result<Session, SessionError> {
        let response = self
            .http
            .post(&self.config.token_endpoint)
            .form(form)
            .send()
            .await
            .map_err(|e| SessionError::ProviderError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SessionError::ProviderError(format!(
                "token endpoint returned {}",
                response.status()
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| SessionError::ProviderError(e.to_string()))?;

        // A refresh response may omit the refresh token; keep the old one.
        let refresh_token = match token.refresh_token {
            Some(t) => t,
            None => prior_refresh
                .map(str::to_string)
                .ok_or_else(|| SessionError::ProviderError("no refresh token issued".to_string()))?,
        };

        Ok(Session {
            access_token: token.access_token,
            refresh_token,
            expires_at: now() + token.expires_in,
        })
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn authorize_url(&self) -> Result<String, SessionError> {
        let response = self
            .http
            .get(&self.config.auth_endpoint)
            .query(&[
                ("client_id", self.config.client_id.as_str()),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("redirect", "false"),
            ])
            .send()
            .await
            .map_err(|e| SessionError::ProviderError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SessionError::ProviderError(format!(
                "auth endpoint returned {}",
                response.status()
            )));
        }

        let auth: AuthUrlResponse = response
            .json()
            .await
            .map_err(|e| SessionError::ProviderError(e.to_string()))?;
        Ok(auth.url)
    }

    async fn exchange_code(&self, code: &str) -> Result<Session, SessionError> {
        self.token_request(
            &[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("client_id", self.config.client_id.as_str()),
                ("redirect_uri", self.config.redirect_uri.as_str()),
            ],
            None,
        )
        .await
    }

    async fn refresh(&self, refresh_token: &str) -> Result<Session, SessionError> {
        self.token_request(
            &[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
                ("client_id", self.config.client_id.as_str()),
            ],
            Some(refresh_token),
        )
        .await
    }
}
