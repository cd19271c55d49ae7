use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// The closed set of clipper actions a shortcut can trigger.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ShortcutAction {
    OpenMenu,
    ClipSelection,
    CaptureRegion,
    BookmarkPage,
    CloseOverlay,
}

impl ShortcutAction {
    pub const ALL: [ShortcutAction; 5] = [
        ShortcutAction::OpenMenu,
        ShortcutAction::ClipSelection,
        ShortcutAction::CaptureRegion,
        ShortcutAction::BookmarkPage,
        ShortcutAction::CloseOverlay,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ShortcutAction::OpenMenu => "open_menu",
            ShortcutAction::ClipSelection => "clip_selection",
            ShortcutAction::CaptureRegion => "capture_region",
            ShortcutAction::BookmarkPage => "bookmark_page",
            ShortcutAction::CloseOverlay => "close_overlay",
        }
    }
}

impl fmt::Display for ShortcutAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User-visible key bindings for the clipper actions.
///
/// Persisted in its own slot and synchronized to the other contexts
/// through the same change-notification channel as tab notes. Only
/// overrides are stored; lookups fall back to the defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ShortcutSettings {
    pub bindings: HashMap<ShortcutAction, String>,
}
