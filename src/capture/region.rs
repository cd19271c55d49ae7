//! Drag-to-select state machine for screen-region capture.
//!
//! Runs entirely in the page's content script. Arming hides the cursor
//! and inserts a transparent full-viewport surface; dragging grows a
//! normalized selection box; pointer-up finalizes or silently discards;
//! Escape cancels from any armed state. All coordinates are page pixels
//! until finalization.

use crate::types::capture::{CaptureRect, PagePoint};

/// Selections narrower or shorter than this many page pixels are treated
/// as accidental clicks and discarded.
pub const MIN_REGION_SIZE: f64 = 10.0;

/// The DOM-side effects of the selection surface.
///
/// `begin` hides the cursor and inserts the transparent full-viewport
/// layer; `update_box` repositions the visible rectangle; `end` removes
/// everything inserted and restores the cursor.
pub trait SelectionSurface {
    fn begin(&mut self);
    fn update_box(&mut self, rect: &CaptureRect);
    fn end(&mut self);
}

/// Where the selector is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionPhase {
    Idle,
    Armed,
    Dragging,
}

/// The result of a pointer-up.
#[derive(Debug, Clone, PartialEq)]
pub enum DragOutcome {
    /// A usable region was selected, in page pixels.
    Selected(CaptureRect),
    /// The box was below the minimum size, or no drag was in progress.
    Discarded,
}

/// The in-page drag-to-select state machine.
pub struct RegionSelector<S: SelectionSurface> {
    surface: S,
    phase: SelectionPhase,
    anchor: Option<PagePoint>,
    rect: Option<CaptureRect>,
}

impl<S: SelectionSurface> RegionSelector<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            phase: SelectionPhase::Idle,
            anchor: None,
            rect: None,
        }
    }

    pub fn phase(&self) -> SelectionPhase {
        self.phase
    }

    /// Idle → Armed. A no-op while a selection is already in progress.
    pub fn arm(&mut self) {
        if self.phase != SelectionPhase::Idle {
            return;
        }
        self.surface.begin();
        self.phase = SelectionPhase::Armed;
    }

    /// Pointer-down while armed anchors a zero-size box.
    pub fn pointer_down(&mut self, x: f64, y: f64) {
        if self.phase != SelectionPhase::Armed {
            return;
        }
        let anchor = PagePoint { x, y };
        let rect = CaptureRect::from_corners(anchor, anchor);
        self.surface.update_box(&rect);
        self.anchor = Some(anchor);
        self.rect = Some(rect);
        self.phase = SelectionPhase::Dragging;
    }

    /// Pointer-move while dragging grows/repositions the box, normalized
    /// from the min/max of the anchor and the current point.
    pub fn pointer_move(&mut self, x: f64, y: f64) {
        if self.phase != SelectionPhase::Dragging {
            return;
        }
        let Some(anchor) = self.anchor else { return };
        let rect = CaptureRect::from_corners(anchor, PagePoint { x, y });
        self.surface.update_box(&rect);
        self.rect = Some(rect);
    }

    /// Pointer-up finalizes the drag.
    ///
    /// The inserted surface is removed either way. A box under
    /// [`MIN_REGION_SIZE`] in either dimension is discarded silently —
    /// no message is sent for an accidental click.
    pub fn pointer_up(&mut self) -> DragOutcome {
        if self.phase != SelectionPhase::Dragging {
            return DragOutcome::Discarded;
        }
        self.surface.end();
        let rect = self.rect.take();
        self.anchor = None;
        self.phase = SelectionPhase::Idle;

        match rect {
            Some(rect) if rect.width >= MIN_REGION_SIZE && rect.height >= MIN_REGION_SIZE => {
                DragOutcome::Selected(rect)
            }
            _ => DragOutcome::Discarded,
        }
    }

    /// Escape: remove the surface, restore the cursor, return to Idle.
    /// No message is sent.
    pub fn cancel(&mut self) {
        if self.phase == SelectionPhase::Idle {
            return;
        }
        self.surface.end();
        self.anchor = None;
        self.rect = None;
        self.phase = SelectionPhase::Idle;
    }
}
