//! Unit tests for the overlay lifecycle: idempotent mount, close/Escape
//! teardown, and no leak across repeated open/close cycles.

use clipnote::managers::overlay_manager::{OverlayHost, OverlayManager, OVERLAY_FRAME_ID};
use clipnote::types::note::NoteMode;

#[derive(Default)]
struct RecordingHost {
    mounts: usize,
    unmounts: usize,
    last_tab: Option<String>,
    last_mode: Option<NoteMode>,
}

impl OverlayHost for &mut RecordingHost {
    fn mount_frame(&mut self, tab_id: &str, mode: NoteMode) {
        self.mounts += 1;
        self.last_tab = Some(tab_id.to_string());
        self.last_mode = Some(mode);
    }
    fn unmount_frame(&mut self) {
        self.unmounts += 1;
    }
}

#[test]
fn frame_identifier_is_stable() {
    // The mount point's tag is a fixed contract with the page script that
    // finds and removes it; renaming it silently breaks old pages.
    assert_eq!(OVERLAY_FRAME_ID, "clipnote-overlay-frame");
}

#[test]
fn mount_creates_one_frame_with_tab_and_mode() {
    let mut host = RecordingHost::default();
    let mut mgr = OverlayManager::new(&mut host);
    assert!(mgr.mount("tab-1", NoteMode::Text));
    assert!(mgr.is_mounted());
    drop(mgr);
    assert_eq!(host.mounts, 1);
    assert_eq!(host.last_tab.as_deref(), Some("tab-1"));
    assert_eq!(host.last_mode, Some(NoteMode::Text));
}

#[test]
fn mount_twice_yields_exactly_one_frame() {
    let mut host = RecordingHost::default();
    let mut mgr = OverlayManager::new(&mut host);
    assert!(mgr.mount("tab-1", NoteMode::Text));
    // Re-invocation while open must not duplicate or reset state.
    assert!(!mgr.mount("tab-1", NoteMode::Capture));
    drop(mgr);
    assert_eq!(host.mounts, 1);
    assert_eq!(host.last_mode, Some(NoteMode::Text));
}

#[test]
fn close_signal_tears_down() {
    let mut host = RecordingHost::default();
    let mut mgr = OverlayManager::new(&mut host);
    mgr.mount("tab-1", NoteMode::Menu);
    mgr.handle_close_signal();
    assert!(!mgr.is_mounted());
    drop(mgr);
    assert_eq!(host.unmounts, 1);
}

#[test]
fn escape_tears_down() {
    let mut host = RecordingHost::default();
    let mut mgr = OverlayManager::new(&mut host);
    mgr.mount("tab-1", NoteMode::Menu);
    mgr.handle_escape();
    assert!(!mgr.is_mounted());
}

#[test]
fn teardown_without_mount_is_a_no_op() {
    let mut host = RecordingHost::default();
    let mut mgr = OverlayManager::new(&mut host);
    mgr.handle_close_signal();
    mgr.handle_escape();
    drop(mgr);
    assert_eq!(host.unmounts, 0);
}

#[test]
fn repeated_cycles_balance_mounts_and_unmounts() {
    let mut host = RecordingHost::default();
    let mut mgr = OverlayManager::new(&mut host);

    for i in 0..5 {
        assert!(mgr.mount("tab-1", NoteMode::Menu), "cycle {} must mount", i);
        mgr.handle_close_signal();
        // A second close in the same cycle must not double-unmount.
        mgr.handle_close_signal();
    }

    drop(mgr);
    assert_eq!(host.mounts, 5);
    assert_eq!(host.unmounts, 5, "no leaked frame across open/close cycles");
}
