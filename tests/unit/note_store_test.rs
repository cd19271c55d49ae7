//! Unit tests for the tab-note store: per-tab isolation, merge semantics,
//! timestamping, and tab-close cleanup.

use std::sync::Arc;

use clipnote::managers::note_store::{NoteStore, NoteStoreTrait};
use clipnote::storage::{Database, SlotStore};
use clipnote::types::note::{NoteMode, NotePatch, TabNoteState};

fn note_store() -> NoteStore {
    let slots = SlotStore::new(Arc::new(Database::open_in_memory().unwrap()));
    NoteStore::new(slots)
}

#[test]
fn get_unknown_tab_returns_none() {
    let store = note_store();
    assert!(store.get("t1").unwrap().is_none());
}

#[test]
fn set_stamps_timestamp_when_omitted() {
    let store = note_store();
    let stored = store.set("t1", TabNoteState::default()).unwrap();
    assert!(stored.updated_at.is_some());
}

#[test]
fn set_keeps_explicit_timestamp() {
    let store = note_store();
    let state = TabNoteState {
        updated_at: Some(12345),
        ..TabNoteState::default()
    };
    let stored = store.set("t1", state).unwrap();
    assert_eq!(stored.updated_at, Some(12345));
}

#[test]
fn update_merges_into_existing_state() {
    let store = note_store();
    store
        .set(
            "t1",
            TabNoteState {
                body: "first draft".to_string(),
                source_url: Some("https://example.com".to_string()),
                ..TabNoteState::default()
            },
        )
        .unwrap();

    let updated = store
        .update(
            "t1",
            NotePatch {
                mode: Some(NoteMode::Text),
                ..NotePatch::default()
            },
        )
        .unwrap();

    // Untouched fields survive the merge.
    assert_eq!(updated.body, "first draft");
    assert_eq!(updated.source_url.as_deref(), Some("https://example.com"));
    assert_eq!(updated.mode, NoteMode::Text);
}

#[test]
fn update_on_empty_slot_starts_from_default() {
    let store = note_store();
    let updated = store
        .update(
            "t1",
            NotePatch {
                body: Some("from scratch".to_string()),
                ..NotePatch::default()
            },
        )
        .unwrap();
    assert_eq!(updated.body, "from scratch");
    assert_eq!(updated.mode, NoteMode::Menu);
    assert!(updated.updated_at.is_some());
}

#[test]
fn update_always_stamps_fresh_timestamp() {
    let store = note_store();
    store
        .set(
            "t1",
            TabNoteState {
                updated_at: Some(1),
                ..TabNoteState::default()
            },
        )
        .unwrap();
    let updated = store.update("t1", NotePatch::default()).unwrap();
    assert!(updated.updated_at.unwrap() > 1);
}

#[test]
fn writes_to_one_tab_never_affect_another() {
    let store = note_store();
    store
        .set(
            "t1",
            TabNoteState {
                body: "tab one".to_string(),
                ..TabNoteState::default()
            },
        )
        .unwrap();
    store
        .set(
            "t2",
            TabNoteState {
                body: "tab two".to_string(),
                ..TabNoteState::default()
            },
        )
        .unwrap();

    store
        .update(
            "t1",
            NotePatch {
                body: Some("tab one edited".to_string()),
                ..NotePatch::default()
            },
        )
        .unwrap();

    assert_eq!(store.get("t2").unwrap().unwrap().body, "tab two");
    assert_eq!(store.get("t1").unwrap().unwrap().body, "tab one edited");
}

#[test]
fn clear_on_tab_close_destroys_the_slot() {
    let store = note_store();
    store.set("t1", TabNoteState::default()).unwrap();
    store.clear("t1").unwrap();
    assert!(store.get("t1").unwrap().is_none());
}

#[test]
fn clear_unknown_tab_is_not_an_error() {
    let store = note_store();
    assert!(store.clear("never-seen").is_ok());
}

#[tokio::test]
async fn overlay_subscription_sees_only_its_tab() {
    let store = note_store();
    let mut sub = store.subscribe("t1");

    store
        .set(
            "t2",
            TabNoteState {
                body: "noise".to_string(),
                ..TabNoteState::default()
            },
        )
        .unwrap();
    store
        .set(
            "t1",
            TabNoteState {
                body: "signal".to_string(),
                ..TabNoteState::default()
            },
        )
        .unwrap();

    let change = sub.changed().await.unwrap().unwrap();
    assert_eq!(change.body, "signal");
}
