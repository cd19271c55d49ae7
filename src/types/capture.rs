use serde::{Deserialize, Serialize};

/// A point in page (CSS) pixels.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PagePoint {
    pub x: f64,
    pub y: f64,
}

/// An axis-aligned rectangle in pixels.
///
/// Whether the units are page pixels or device pixels depends on where the
/// rectangle is in the pipeline: the drag state machine works in page
/// pixels and converts once, at finalization.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CaptureRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl CaptureRect {
    /// Builds the bounding box of two corner points.
    ///
    /// The anchor and the current pointer position can be in any relative
    /// order; the result always has non-negative width and height.
    pub fn from_corners(a: PagePoint, b: PagePoint) -> Self {
        let x = a.x.min(b.x);
        let y = a.y.min(b.y);
        Self {
            x,
            y,
            width: a.x.max(b.x) - x,
            height: a.y.max(b.y) - y,
        }
    }

    /// Scales every component by the device pixel ratio.
    ///
    /// Screenshots are taken at device resolution, so the page-pixel
    /// rectangle must be converted before it can index into one.
    pub fn to_device_pixels(&self, ratio: f64) -> Self {
        Self {
            x: self.x * ratio,
            y: self.y * ratio,
            width: self.width * ratio,
            height: self.height * ratio,
        }
    }
}

/// A cropped capture: the exported image plus the device-pixel rectangle
/// it was cropped from. Owned by the tab's note state until save or cancel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CaptureAsset {
    /// PNG image as a `data:image/png;base64,...` URL.
    pub data_url: String,
    /// The device-pixel source rectangle of the crop.
    pub rect: CaptureRect,
}
