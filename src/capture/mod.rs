//! The screen-region capture pipeline.
//!
//! `region` is the in-page half: the drag gesture state machine. `crop`
//! is the coordinator half: turning the screenshot plus the finalized
//! device-pixel rectangle into a stored capture asset.

pub mod crop;
pub mod region;

pub use crop::{crop_screenshot, decode_png};
pub use region::{DragOutcome, RegionSelector, SelectionPhase, SelectionSurface, MIN_REGION_SIZE};
