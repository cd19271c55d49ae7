//! Session Relay for ClipNote.
//!
//! Maintains the one authenticated-session slot: interactive login,
//! near-expiry refresh, logout, and acceptance of sessions pushed in by
//! the external sync surface. The slot is the only copy — the relay keeps
//! nothing in memory, so a restarted coordinator picks up where the last
//! one stopped.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use url::Url;

use crate::services::identity::{AuthFlow, IdentityProvider};
use crate::storage::{SlotKey, SlotStore};
use crate::types::errors::SessionError;
use crate::types::session::Session;

/// Refresh when the session expires within this margin.
pub const REFRESH_MARGIN_SECS: i64 = 5 * 60;

/// Credentials extracted from the auth callback URL.
#[derive(Debug, PartialEq)]
enum CallbackCredentials {
    /// Authorization-code flow: exchange the code at the token endpoint.
    Code(String),
    /// Implicit-flow fallback: the tokens arrived in the fragment.
    Tokens(Session),
}

/// The one-slot session relay.
#[derive(Clone)]
pub struct SessionRelay {
    slots: SlotStore,
    provider: Arc<dyn IdentityProvider>,
    flow: Arc<dyn AuthFlow>,
}

impl SessionRelay {
    pub fn new(slots: SlotStore, provider: Arc<dyn IdentityProvider>, flow: Arc<dyn AuthFlow>) -> Self {
        Self {
            slots,
            provider,
            flow,
        }
    }

    fn now() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64
    }

    fn read_slot(&self) -> Result<Option<Session>, SessionError> {
        self.slots
            .read(&SlotKey::Session)
            .map_err(|e| SessionError::Storage(e.to_string()))
    }

    fn write_slot(&self, session: &Session) -> Result<(), SessionError> {
        self.slots
            .write(&SlotKey::Session, session)
            .map_err(|e| SessionError::Storage(e.to_string()))
    }

    /// Interactive login: authorization URL → system auth flow → code (or
    /// implicit-flow tokens) → session, persisted into the slot.
    pub async fn login(&self) -> Result<Session, SessionError> {
        let auth_url = self.provider.authorize_url().await?;
        let callback = self.flow.launch(&auth_url).await?;
        let session = match extract_callback(&callback)? {
            CallbackCredentials::Code(code) => self.provider.exchange_code(&code).await?,
            CallbackCredentials::Tokens(session) => session,
        };
        self.write_slot(&session)?;
        Ok(session)
    }

    /// Destroys the session slot.
    pub fn logout(&self) -> Result<(), SessionError> {
        self.slots
            .remove(&SlotKey::Session)
            .map_err(|e| SessionError::Storage(e.to_string()))
    }

    /// Returns a session guaranteed usable for the next few minutes.
    ///
    /// Within [`REFRESH_MARGIN_SECS`] of expiry the stored refresh token
    /// is exchanged before returning; a failed refresh clears the slot
    /// and yields `None` rather than a stale session.
    pub async fn get_valid(&self) -> Result<Option<Session>, SessionError> {
        let Some(session) = self.read_slot()? else {
            return Ok(None);
        };

        if !session.expires_within(REFRESH_MARGIN_SECS, Self::now()) {
            return Ok(Some(session));
        }

        match self.provider.refresh(&session.refresh_token).await {
            Ok(fresh) => {
                self.write_slot(&fresh)?;
                Ok(Some(fresh))
            }
            Err(e) => {
                tracing::warn!(error = %e, "session refresh failed, clearing slot");
                self.slots
                    .remove(&SlotKey::Session)
                    .map_err(|se| SessionError::Storage(se.to_string()))?;
                Ok(None)
            }
        }
    }

    /// Accepts a session pushed in by the external sync surface. The
    /// caller acknowledges receipt so the sender stops retrying.
    pub fn accept_push(&self, session: &Session) -> Result<(), SessionError> {
        self.write_slot(session)
    }
}

/// Pulls credentials out of the auth callback URL: the `code` query
/// parameter, or implicit-flow tokens from the fragment as fallback.
fn extract_callback(callback_url: &str) -> Result<CallbackCredentials, SessionError> {
    let url =
        Url::parse(callback_url).map_err(|e| SessionError::CallbackParse(e.to_string()))?;

    if let Some((_, code)) = url.query_pairs().find(|(k, _)| k == "code") {
        if !code.is_empty() {
            return Ok(CallbackCredentials::Code(code.into_owned()));
        }
    }

    if let Some(fragment) = url.fragment() {
        let mut access_token = None;
        let mut refresh_token = None;
        let mut expires_in = None;
        for (k, v) in url::form_urlencoded::parse(fragment.as_bytes()) {
            match k.as_ref() {
                "access_token" => access_token = Some(v.into_owned()),
                "refresh_token" => refresh_token = Some(v.into_owned()),
                "expires_in" => expires_in = v.parse::<i64>().ok(),
                _ => {}
            }
        }
        if let (Some(access_token), Some(refresh_token)) = (access_token, refresh_token) {
            let expires_in = expires_in.unwrap_or(3600);
            return Ok(CallbackCredentials::Tokens(Session {
                access_token,
                refresh_token,
                expires_at: SessionRelay::now() + expires_in,
            }));
        }
    }

    Err(SessionError::CallbackParse(format!(
        "no code or tokens in callback: {}",
        callback_url
    )))
}
