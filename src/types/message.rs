//! The cross-context message contract.
//!
//! Requests are a closed tagged union dispatched by exhaustive match in the
//! router; unknown actions fail to decode and are dropped at the boundary
//! instead of raising. Every response is a structured result object.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::capture::CaptureRect;
use super::note::{NoteMode, NotePayload, PageMetadata};
use super::session::Session;
use super::shortcuts::ShortcutAction;

/// A request addressed to the background coordinator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "action", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Request {
    OpenOverlay {
        tab_id: String,
        mode: NoteMode,
    },
    StartCapture {
        tab_id: String,
    },
    CaptureArea {
        tab_id: String,
        area: CaptureRect,
        page_url: String,
    },
    SaveNote {
        tab_id: String,
        note: NotePayload,
    },
    GetTabNote {
        tab_id: String,
    },
    ClearTabNote {
        tab_id: String,
    },
    Login,
    Logout,
    GetSession,
    SyncSession {
        session: Session,
    },
    GetShortcuts,
    SetShortcut {
        shortcut: ShortcutAction,
        keys: String,
    },
    RelayToPage {
        tab_id: String,
        message: PageMessage,
    },
}

impl Request {
    /// Decodes a raw message into a request.
    ///
    /// Returns `None` for unknown actions and malformed payloads; the
    /// coordinator ignores those rather than raising across the message
    /// boundary.
    pub fn decode(value: Value) -> Option<Request> {
        serde_json::from_value(value).ok()
    }
}

/// Which context sent a request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ContextKind {
    Page,
    Overlay,
    Popup,
    External,
}

/// The origin of a request, as seen by the router.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MessageSender {
    pub context: ContextKind,
    pub tab_id: Option<String>,
}

impl MessageSender {
    pub fn new(context: ContextKind, tab_id: Option<&str>) -> Self {
        Self {
            context,
            tab_id: tab_id.map(str::to_string),
        }
    }
}

/// A message the coordinator pushes into a page's content script.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "action", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PageMessage {
    StartCapture,
    OpenOverlay { tab_id: String, mode: NoteMode },
    GetMetadata,
    GetSelection,
}

/// The content script's answer to a pushed [`PageMessage`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PageReply {
    Ack { status: String },
    Metadata { page: PageMetadata },
    Selection { text: String },
}

/// The structured result every coordinator handler returns.
///
/// Success carries `data`, failure carries `error`, never both.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Response {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Response {
    pub fn ok(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn ok_empty() -> Self {
        Self {
            success: true,
            data: None,
            error: None,
        }
    }

    pub fn err(error: impl std::fmt::Display) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.to_string()),
        }
    }
}

/// The page ↔ companion-surface session handshake.
///
/// A surface outside the extension pushes a fresh session in; the content
/// script forwards it to the coordinator and answers with the ack that
/// stops the sender's retry loop.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SyncMessage {
    SyncSession { session: Session },
    SyncAck,
}
