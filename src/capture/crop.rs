//! Screenshot cropping for the capture pipeline.
//!
//! The coordinator receives a full-viewport screenshot at device
//! resolution and the device-pixel rectangle the user selected; the crop
//! draws the source region into an off-screen buffer and exports PNG.

use std::io::Cursor;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use image::{imageops, DynamicImage, ImageFormat, RgbaImage};

use crate::types::capture::{CaptureAsset, CaptureRect};
use crate::types::errors::CaptureError;

/// Crops `screenshot` by the device-pixel `area` and exports the result.
///
/// The rectangle is clamped to the screenshot bounds — UI rendered after
/// the screenshot was taken can leave a selection hanging slightly past
/// the edge. A rectangle entirely outside the screenshot is an error.
pub fn crop_screenshot(
    screenshot: &RgbaImage,
    area: &CaptureRect,
) -> Result<CaptureAsset, CaptureError> {
    let (shot_w, shot_h) = screenshot.dimensions();

    let x = area.x.round().max(0.0) as u32;
    let y = area.y.round().max(0.0) as u32;
    if x >= shot_w || y >= shot_h {
        return Err(CaptureError::RegionOutOfBounds(format!(
            "origin ({}, {}) outside {}x{} screenshot",
            x, y, shot_w, shot_h
        )));
    }

    let width = (area.width.round() as u32).min(shot_w - x);
    let height = (area.height.round() as u32).min(shot_h - y);
    if width == 0 || height == 0 {
        return Err(CaptureError::RegionOutOfBounds(format!(
            "empty region at ({}, {}) in {}x{} screenshot",
            x, y, shot_w, shot_h
        )));
    }

    let cropped = imageops::crop_imm(screenshot, x, y, width, height).to_image();
    let png = encode_png(cropped)?;

    Ok(CaptureAsset {
        data_url: format!("data:image/png;base64,{}", BASE64.encode(&png)),
        rect: area.clone(),
    })
}

/// Decodes a PNG frame into the screenshot buffer format.
pub fn decode_png(bytes: &[u8]) -> Result<RgbaImage, CaptureError> {
    let img = image::load_from_memory_with_format(bytes, ImageFormat::Png)
        .map_err(|e| CaptureError::Decode(e.to_string()))?;
    Ok(img.to_rgba8())
}

fn encode_png(img: RgbaImage) -> Result<Vec<u8>, CaptureError> {
    let mut buf = Vec::new();
    DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .map_err(|e| CaptureError::Encode(e.to_string()))?;
    Ok(buf)
}
