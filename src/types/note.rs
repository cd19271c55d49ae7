use serde::{Deserialize, Serialize};

use super::capture::CaptureAsset;

/// Which editor surface the overlay should present for a draft.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum NoteMode {
    #[default]
    Menu,
    Text,
    Image,
    Capture,
    Bookmark,
}

/// Metadata scraped from the source page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PageMetadata {
    pub title: String,
    pub description: Option<String>,
    pub preview_image: Option<String>,
    pub favicon: Option<String>,
}

/// The draft capture/note for one tab.
///
/// At most one live slot exists per tab. Every write stamps a fresh
/// timestamp; the slot is destroyed when the tab closes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct TabNoteState {
    pub body: String,
    pub source_url: Option<String>,
    pub capture: Option<CaptureAsset>,
    pub page: Option<PageMetadata>,
    pub mode: NoteMode,
    pub loading: bool,
    pub updated_at: Option<i64>,
}

/// A typed merge-partial for [`TabNoteState`].
///
/// Absent fields leave the current value untouched; fields that need to be
/// reset to nothing go through `set` or `clear` on the store instead.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct NotePatch {
    pub body: Option<String>,
    pub source_url: Option<String>,
    pub capture: Option<CaptureAsset>,
    pub page: Option<PageMetadata>,
    pub mode: Option<NoteMode>,
    pub loading: Option<bool>,
}

impl NotePatch {
    /// Merges the patch into `state`, leaving absent fields as they are.
    pub fn apply(self, state: &mut TabNoteState) {
        if let Some(body) = self.body {
            state.body = body;
        }
        if let Some(source_url) = self.source_url {
            state.source_url = Some(source_url);
        }
        if let Some(capture) = self.capture {
            state.capture = Some(capture);
        }
        if let Some(page) = self.page {
            state.page = Some(page);
        }
        if let Some(mode) = self.mode {
            state.mode = mode;
        }
        if let Some(loading) = self.loading {
            state.loading = loading;
        }
    }
}

/// What the overlay submits when the user saves a note.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NotePayload {
    pub title: String,
    pub body: String,
    pub source_url: Option<String>,
    pub capture: Option<CaptureAsset>,
}
