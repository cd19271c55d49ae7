//! Thin client for the remote note backend.
//!
//! The backend itself is out of scope; this is the one call the overlay's
//! save path needs, kept behind a trait so router tests run against a
//! fake instead of the network.

use async_trait::async_trait;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::types::errors::BackendError;
use crate::types::note::NotePayload;
use crate::types::session::Session;

/// The note backend save surface.
#[async_trait]
pub trait NoteBackend: Send + Sync {
    /// Persists a note remotely; returns the backend's record of it.
    async fn save_note(&self, note: &NotePayload, session: &Session) -> Result<Value, BackendError>;
}

/// HTTP note backend client.
pub struct HttpNoteBackend {
    http: reqwest::Client,
    base_url: String,
}

impl HttpNoteBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl NoteBackend for HttpNoteBackend {
    async fn save_note(&self, note: &NotePayload, session: &Session) -> Result<Value, BackendError> {
        let submission_id = Uuid::new_v4().to_string();
        let response = self
            .http
            .post(format!("{}/notes", self.base_url))
            .bearer_auth(&session.access_token)
            .json(&json!({
                "id": submission_id,
                "title": note.title,
                "body": note.body,
                "source_url": note.source_url,
                "capture": note.capture,
            }))
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(BackendError::Unauthorized(
                "backend rejected the session".to_string(),
            ));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Api(format!("{}: {}", status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| BackendError::Api(e.to_string()))
    }
}
