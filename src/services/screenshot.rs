//! Screenshot source for the capture pipeline.
//!
//! The coordinator asks for a full-viewport screenshot of a tab at device
//! resolution. In the packaged extension the browser supplies it; the
//! host binary is fed frames by its embedding shell instead.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use image::RgbaImage;

use crate::capture::decode_png;
use crate::types::errors::CaptureError;

/// A source of full-viewport screenshots, injectable so tests and hosts
/// can substitute their own.
#[async_trait]
pub trait ScreenCapturer: Send + Sync {
    async fn capture_visible(&self, tab_id: &str) -> Result<RgbaImage, CaptureError>;
}

/// Screenshot source backed by shell-pushed frames.
///
/// The embedding shell pushes the latest visible frame per tab as PNG;
/// `capture_visible` serves the most recent one. Capturing a tab with no
/// pushed frame is an error, not a blank image.
pub struct FrameCache {
    frames: Mutex<HashMap<String, RgbaImage>>,
}

impl FrameCache {
    pub fn new() -> Self {
        Self {
            frames: Mutex::new(HashMap::new()),
        }
    }

    /// Decodes and stores the latest frame for a tab.
    pub fn push_frame(&self, tab_id: &str, png: &[u8]) -> Result<(), CaptureError> {
        let img = decode_png(png)?;
        let mut frames = self
            .frames
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        frames.insert(tab_id.to_string(), img);
        Ok(())
    }
}

impl Default for FrameCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ScreenCapturer for FrameCache {
    async fn capture_visible(&self, tab_id: &str) -> Result<RgbaImage, CaptureError> {
        let frames = self
            .frames
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        frames
            .get(tab_id)
            .cloned()
            .ok_or_else(|| CaptureError::SourceUnavailable(format!("no frame for tab {}", tab_id)))
    }
}
