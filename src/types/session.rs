use serde::{Deserialize, Serialize};

/// The one process-wide authenticated session.
///
/// Created by interactive login or an external sync push, refreshed near
/// expiry, destroyed on logout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    /// Unix seconds at which the access token expires.
    pub expires_at: i64,
}

impl Session {
    /// True when the session is already expired or expires within
    /// `margin_secs` of `now`.
    pub fn expires_within(&self, margin_secs: i64, now: i64) -> bool {
        self.expires_at - now <= margin_secs
    }
}
