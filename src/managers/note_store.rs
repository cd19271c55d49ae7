//! Tab-State Store for ClipNote.
//!
//! One draft note slot per tab, over the persisted slot store. The router
//! is the sole writer during a capture flow and sequences its writes
//! inside a single handler invocation; `update` itself is not atomic
//! across processes.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::storage::{SlotKey, SlotStore, SlotSubscription};
use crate::types::errors::StoreError;
use crate::types::note::{NotePatch, TabNoteState};

/// Trait defining the tab-note store interface.
pub trait NoteStoreTrait {
    /// Replaces the tab's slot wholesale, stamping the current time when
    /// the state carries no timestamp.
    fn set(&self, tab_id: &str, state: TabNoteState) -> Result<TabNoteState, StoreError>;
    /// Merges `patch` into the current value (or a fresh default) and
    /// stamps the current time.
    fn update(&self, tab_id: &str, patch: NotePatch) -> Result<TabNoteState, StoreError>;
    fn get(&self, tab_id: &str) -> Result<Option<TabNoteState>, StoreError>;
    /// Deletes the slot; called when the tab closes.
    fn clear(&self, tab_id: &str) -> Result<(), StoreError>;
}

/// Tab-note store backed by the slot store.
#[derive(Clone)]
pub struct NoteStore {
    slots: SlotStore,
}

impl NoteStore {
    pub fn new(slots: SlotStore) -> Self {
        Self { slots }
    }

    fn now() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64
    }

    /// Subscribes to this tab's slot. The overlay relies on this instead
    /// of polling; changes to other tabs' slots are filtered out.
    pub fn subscribe(&self, tab_id: &str) -> SlotSubscription<TabNoteState> {
        self.slots.subscribe(&SlotKey::TabNote(tab_id.to_string()))
    }
}

impl NoteStoreTrait for NoteStore {
    fn set(&self, tab_id: &str, mut state: TabNoteState) -> Result<TabNoteState, StoreError> {
        if state.updated_at.is_none() {
            state.updated_at = Some(Self::now());
        }
        self.slots
            .write(&SlotKey::TabNote(tab_id.to_string()), &state)?;
        Ok(state)
    }

    fn update(&self, tab_id: &str, patch: NotePatch) -> Result<TabNoteState, StoreError> {
        let key = SlotKey::TabNote(tab_id.to_string());
        let mut state: TabNoteState = self.slots.read(&key)?.unwrap_or_default();
        patch.apply(&mut state);
        state.updated_at = Some(Self::now());
        self.slots.write(&key, &state)?;
        Ok(state)
    }

    fn get(&self, tab_id: &str) -> Result<Option<TabNoteState>, StoreError> {
        self.slots.read(&SlotKey::TabNote(tab_id.to_string()))
    }

    fn clear(&self, tab_id: &str) -> Result<(), StoreError> {
        self.slots.remove(&SlotKey::TabNote(tab_id.to_string()))
    }
}
