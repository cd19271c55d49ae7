//! Message Router for the ClipNote coordinator.
//!
//! The single addressable entry point in the long-lived background
//! context. Requests are a closed tagged union dispatched by exhaustive
//! match; every handler's errors are caught here and converted to a
//! `{success:false, error}` response, so one failing handler can never
//! take the coordinator down or stall another tab's flow.
//!
//! The coordinator may be evicted between any two messages. Nothing here
//! keeps cross-request state in memory — every handler goes through the
//! persisted store.

use std::sync::{Arc, Mutex};

use serde_json::{json, Value};

use crate::capture::crop_screenshot;
use crate::managers::note_store::{NoteStore, NoteStoreTrait};
use crate::managers::shortcut_manager::{ShortcutManager, ShortcutManagerTrait};
use crate::services::backend_client::NoteBackend;
use crate::services::page_bridge::PageBridge;
use crate::services::screenshot::ScreenCapturer;
use crate::services::session_relay::SessionRelay;
use crate::types::capture::CaptureRect;
use crate::types::errors::RouterError;
use crate::types::message::{MessageSender, PageMessage, Request, Response};
use crate::types::note::{NoteMode, NotePatch, NotePayload};
use crate::types::session::Session;
use crate::types::shortcuts::ShortcutAction;

/// The coordinator's dispatch core.
///
/// Every collaborator is an explicit handle passed in at construction, so
/// tests substitute fakes without touching process-wide globals.
pub struct Router {
    notes: NoteStore,
    relay: SessionRelay,
    bridge: PageBridge,
    screen: Arc<dyn ScreenCapturer>,
    backend: Arc<dyn NoteBackend>,
    shortcuts: Arc<Mutex<ShortcutManager>>,
}

impl Router {
    pub fn new(
        notes: NoteStore,
        relay: SessionRelay,
        bridge: PageBridge,
        screen: Arc<dyn ScreenCapturer>,
        backend: Arc<dyn NoteBackend>,
        shortcuts: Arc<Mutex<ShortcutManager>>,
    ) -> Self {
        Self {
            notes,
            relay,
            bridge,
            screen,
            backend,
            shortcuts,
        }
    }

    /// Dispatches one request and always answers with a structured result.
    pub async fn handle(&self, request: Request, sender: &MessageSender) -> Response {
        tracing::debug!(?sender, request = ?request, "dispatching request");
        let result = match request {
            Request::OpenOverlay { tab_id, mode } => self.open_overlay(&tab_id, mode).await,
            Request::StartCapture { tab_id } => self.start_capture(&tab_id).await,
            Request::CaptureArea {
                tab_id,
                area,
                page_url,
            } => self.capture_area(&tab_id, area, page_url).await,
            Request::SaveNote { tab_id, note } => self.save_note(&tab_id, note).await,
            Request::GetTabNote { tab_id } => self.get_tab_note(&tab_id),
            Request::ClearTabNote { tab_id } => self.clear_tab_note(&tab_id),
            Request::Login => self.login().await,
            Request::Logout => self.logout(),
            Request::GetSession => self.get_session().await,
            Request::SyncSession { session } => self.sync_session(session),
            Request::GetShortcuts => self.get_shortcuts(),
            Request::SetShortcut { shortcut, keys } => self.set_shortcut(shortcut, &keys),
            Request::RelayToPage { tab_id, message } => self.relay_to_page(&tab_id, message).await,
        };

        match result {
            Ok(data) => Response::ok(data),
            Err(e) => {
                tracing::error!(error = %e, "handler failed");
                Response::err(e)
            }
        }
    }

    async fn open_overlay(&self, tab_id: &str, mode: NoteMode) -> Result<Value, RouterError> {
        self.notes.update(
            tab_id,
            NotePatch {
                mode: Some(mode),
                ..NotePatch::default()
            },
        )?;
        let reply = self
            .bridge
            .send(
                tab_id,
                &PageMessage::OpenOverlay {
                    tab_id: tab_id.to_string(),
                    mode,
                },
            )
            .await?;
        Ok(json!(reply))
    }

    async fn start_capture(&self, tab_id: &str) -> Result<Value, RouterError> {
        self.bridge.send(tab_id, &PageMessage::StartCapture).await?;
        Ok(Value::Null)
    }

    /// The router-side continuation of a finalized drag.
    ///
    /// Strictly sequenced inside this one invocation: the loading write
    /// lands before the screenshot request, the asset write after the
    /// crop. No yield point lets a competing flow's write interleave for
    /// this tab.
    async fn capture_area(
        &self,
        tab_id: &str,
        area: CaptureRect,
        page_url: String,
    ) -> Result<Value, RouterError> {
        self.notes.update(
            tab_id,
            NotePatch {
                loading: Some(true),
                mode: Some(NoteMode::Capture),
                source_url: Some(page_url),
                ..NotePatch::default()
            },
        )?;

        // Progress feedback; the capture itself does not depend on it.
        if let Err(e) = self
            .bridge
            .send(
                tab_id,
                &PageMessage::OpenOverlay {
                    tab_id: tab_id.to_string(),
                    mode: NoteMode::Capture,
                },
            )
            .await
        {
            tracing::warn!(tab_id, error = %e, "could not open overlay for capture progress");
        }

        let asset = match self.screen.capture_visible(tab_id).await {
            Ok(screenshot) => crop_screenshot(&screenshot, &area),
            Err(e) => Err(e),
        };

        match asset {
            Ok(asset) => {
                self.notes.update(
                    tab_id,
                    NotePatch {
                        loading: Some(false),
                        capture: Some(asset),
                        ..NotePatch::default()
                    },
                )?;
                Ok(Value::Null)
            }
            Err(e) => {
                self.notes.update(
                    tab_id,
                    NotePatch {
                        loading: Some(false),
                        ..NotePatch::default()
                    },
                )?;
                Err(e.into())
            }
        }
    }

    async fn save_note(&self, tab_id: &str, note: NotePayload) -> Result<Value, RouterError> {
        let Some(session) = self.relay.get_valid().await? else {
            return Err(RouterError::Unauthorized("no active session".to_string()));
        };
        let data = self.backend.save_note(&note, &session).await?;
        self.notes.clear(tab_id)?;
        Ok(data)
    }

    fn get_tab_note(&self, tab_id: &str) -> Result<Value, RouterError> {
        let state = self.notes.get(tab_id)?;
        Ok(json!(state))
    }

    fn clear_tab_note(&self, tab_id: &str) -> Result<Value, RouterError> {
        self.notes.clear(tab_id)?;
        Ok(Value::Null)
    }

    async fn login(&self) -> Result<Value, RouterError> {
        let session = self.relay.login().await?;
        Ok(json!(session))
    }

    fn logout(&self) -> Result<Value, RouterError> {
        self.relay.logout()?;
        Ok(Value::Null)
    }

    async fn get_session(&self) -> Result<Value, RouterError> {
        let session = self.relay.get_valid().await?;
        Ok(json!(session))
    }

    fn sync_session(&self, session: Session) -> Result<Value, RouterError> {
        self.relay.accept_push(&session)?;
        Ok(json!({ "type": "sync_ack" }))
    }

    fn get_shortcuts(&self) -> Result<Value, RouterError> {
        let shortcuts = self
            .shortcuts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(json!(shortcuts.bindings()))
    }

    fn set_shortcut(&self, action: ShortcutAction, keys: &str) -> Result<Value, RouterError> {
        let mut shortcuts = self
            .shortcuts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        shortcuts.register(action, keys)?;
        Ok(Value::Null)
    }

    async fn relay_to_page(
        &self,
        tab_id: &str,
        message: PageMessage,
    ) -> Result<Value, RouterError> {
        let reply = self.bridge.send(tab_id, &message).await?;
        Ok(json!(reply))
    }
}
