//! Overlay Lifecycle Manager for ClipNote.
//!
//! Owns the single embedded-editor mount point in a page. Mounting is
//! idempotent; the close signal posted by the embedded document and the
//! Escape key both tear the frame down completely, so repeated open/close
//! cycles never leak a frame or a listener.

use crate::types::note::NoteMode;

/// The fixed identifier the mount point is tagged with in the page.
pub const OVERLAY_FRAME_ID: &str = "clipnote-overlay-frame";

/// The DOM-side effects of mounting and unmounting the editor frame.
///
/// The real implementation inserts an iframe pointed at the extension's
/// packaged editor document, with the tab identifier passed so the editor
/// can resolve its note slot; tests substitute a recording fake.
pub trait OverlayHost {
    fn mount_frame(&mut self, tab_id: &str, mode: NoteMode);
    fn unmount_frame(&mut self);
}

/// Lifecycle state for the one overlay a page may show.
pub struct OverlayManager<H: OverlayHost> {
    host: H,
    mounted: bool,
}

impl<H: OverlayHost> OverlayManager<H> {
    pub fn new(host: H) -> Self {
        Self {
            host,
            mounted: false,
        }
    }

    /// Mounts the editor frame.
    ///
    /// A no-op while a frame is already mounted — re-invocation must not
    /// duplicate the frame or reset the editor's state. Returns whether a
    /// mount actually happened.
    pub fn mount(&mut self, tab_id: &str, mode: NoteMode) -> bool {
        if self.mounted {
            return false;
        }
        self.host.mount_frame(tab_id, mode);
        self.mounted = true;
        true
    }

    /// Handles the cross-context close signal posted by the embedded document.
    pub fn handle_close_signal(&mut self) {
        self.teardown();
    }

    /// Handles Escape pressed while the overlay is open.
    pub fn handle_escape(&mut self) {
        self.teardown();
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    fn teardown(&mut self) {
        if self.mounted {
            self.host.unmount_frame();
            self.mounted = false;
        }
    }
}
