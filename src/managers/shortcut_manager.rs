//! Shortcut Manager for ClipNote.
//!
//! Manages the clipper's keyboard shortcut bindings with conflict
//! detection and platform-specific modifier key adaptation. Overrides are
//! persisted in their own slot and fan out to the other contexts through
//! the store's change notifications; defaults are supplied whenever the
//! slot is absent.

use std::collections::HashMap;

use crate::storage::{SlotKey, SlotStore};
use crate::types::errors::ShortcutError;
use crate::types::shortcuts::{ShortcutAction, ShortcutSettings};

/// Trait defining shortcut management operations.
pub trait ShortcutManagerTrait {
    fn register(&mut self, action: ShortcutAction, keys: &str) -> Result<(), ShortcutError>;
    fn unregister(&mut self, action: ShortcutAction) -> Result<(), ShortcutError>;
    /// The effective binding: the user's override, or the default.
    fn binding(&self, action: ShortcutAction) -> String;
    fn bindings(&self) -> HashMap<ShortcutAction, String>;
    fn reset_to_defaults(&mut self) -> Result<(), ShortcutError>;
    fn has_conflict(&self, keys: &str, exclude: Option<ShortcutAction>) -> Option<ShortcutAction>;
}

/// Shortcut manager with persisted overrides and platform adaptation.
pub struct ShortcutManager {
    slots: SlotStore,
    overrides: HashMap<ShortcutAction, String>,
}

impl ShortcutManager {
    /// Creates a manager, loading any persisted overrides. A missing or
    /// unreadable slot means no overrides.
    pub fn new(slots: SlotStore) -> Self {
        let overrides = slots
            .read::<ShortcutSettings>(&SlotKey::Shortcuts)
            .ok()
            .flatten()
            .map(|s| s.bindings)
            .unwrap_or_default();
        Self { slots, overrides }
    }

    /// Adapts modifier keys for the current platform.
    fn adapt_for_platform(keys: &str) -> String {
        if cfg!(target_os = "macos") {
            keys.replace("Ctrl+", "Cmd+")
        } else {
            keys.to_string()
        }
    }

    fn default_binding(action: ShortcutAction) -> &'static str {
        match action {
            ShortcutAction::OpenMenu => "Ctrl+Shift+Space",
            ShortcutAction::ClipSelection => "Ctrl+Shift+C",
            ShortcutAction::CaptureRegion => "Ctrl+Shift+X",
            ShortcutAction::BookmarkPage => "Ctrl+Shift+B",
            ShortcutAction::CloseOverlay => "Escape",
        }
    }

    /// Persists the effective map (overrides merged over defaults) so the
    /// overlay and popup can read the slot without knowing the defaults.
    fn persist(&self) -> Result<(), ShortcutError> {
        let settings = ShortcutSettings {
            bindings: self.bindings(),
        };
        self.slots
            .write(&SlotKey::Shortcuts, &settings)
            .map_err(|e| ShortcutError::Storage(e.to_string()))
    }
}

impl ShortcutManagerTrait for ShortcutManager {
    fn register(&mut self, action: ShortcutAction, keys: &str) -> Result<(), ShortcutError> {
        if keys.is_empty() {
            return Err(ShortcutError::InvalidKeys("Keys cannot be empty".to_string()));
        }

        if let Some(conflicting) = self.has_conflict(keys, Some(action)) {
            return Err(ShortcutError::Conflict(format!(
                "'{}' is already bound to '{}'",
                keys, conflicting
            )));
        }

        let adapted = Self::adapt_for_platform(keys);
        self.overrides.insert(action, adapted);
        self.persist()
    }

    fn unregister(&mut self, action: ShortcutAction) -> Result<(), ShortcutError> {
        if self.overrides.remove(&action).is_none() {
            return Err(ShortcutError::NotFound(action.to_string()));
        }
        self.persist()
    }

    fn binding(&self, action: ShortcutAction) -> String {
        self.overrides
            .get(&action)
            .cloned()
            .unwrap_or_else(|| Self::adapt_for_platform(Self::default_binding(action)))
    }

    fn bindings(&self) -> HashMap<ShortcutAction, String> {
        ShortcutAction::ALL
            .iter()
            .map(|a| (*a, self.binding(*a)))
            .collect()
    }

    fn reset_to_defaults(&mut self) -> Result<(), ShortcutError> {
        self.overrides.clear();
        self.persist()
    }

    fn has_conflict(&self, keys: &str, exclude: Option<ShortcutAction>) -> Option<ShortcutAction> {
        let adapted = Self::adapt_for_platform(keys);
        for action in ShortcutAction::ALL {
            if exclude == Some(action) {
                continue;
            }
            if self.binding(action) == adapted {
                return Some(action);
            }
        }
        None
    }
}
