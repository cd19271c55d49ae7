//! Unit tests for the screenshot crop: exact region extraction, bounds
//! clamping, and structured out-of-bounds errors.

use clipnote::capture::{crop_screenshot, decode_png};
use clipnote::types::capture::CaptureRect;
use image::{Rgba, RgbaImage};

/// A screenshot whose pixel values encode their own coordinates, so crops
/// can be verified exactly.
fn coordinate_image(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, 0, 255])
    })
}

fn rect(x: f64, y: f64, width: f64, height: f64) -> CaptureRect {
    CaptureRect {
        x,
        y,
        width,
        height,
    }
}

fn decode_data_url(data_url: &str) -> RgbaImage {
    use base64::engine::general_purpose::STANDARD as BASE64;
    use base64::Engine as _;
    let b64 = data_url
        .strip_prefix("data:image/png;base64,")
        .expect("capture asset must be a PNG data URL");
    decode_png(&BASE64.decode(b64).unwrap()).unwrap()
}

#[test]
fn crop_extracts_the_exact_region() {
    let shot = coordinate_image(200, 100);
    let asset = crop_screenshot(&shot, &rect(40.0, 20.0, 50.0, 30.0)).unwrap();

    let cropped = decode_data_url(&asset.data_url);
    assert_eq!(cropped.dimensions(), (50, 30));
    // Top-left pixel of the crop is the (40, 20) pixel of the screenshot.
    assert_eq!(cropped.get_pixel(0, 0), &Rgba([40, 20, 0, 255]));
    assert_eq!(cropped.get_pixel(49, 29), &Rgba([89, 49, 0, 255]));
}

#[test]
fn crop_keeps_the_source_rectangle() {
    let shot = coordinate_image(200, 100);
    let area = rect(10.0, 10.0, 20.0, 20.0);
    let asset = crop_screenshot(&shot, &area).unwrap();
    assert_eq!(asset.rect, area);
}

#[test]
fn crop_clamps_to_screenshot_bounds() {
    let shot = coordinate_image(100, 100);
    // Selection hangs past the right and bottom edges.
    let asset = crop_screenshot(&shot, &rect(80.0, 90.0, 50.0, 50.0)).unwrap();
    let cropped = decode_data_url(&asset.data_url);
    assert_eq!(cropped.dimensions(), (20, 10));
}

#[test]
fn crop_fully_outside_is_an_error() {
    let shot = coordinate_image(100, 100);
    let err = crop_screenshot(&shot, &rect(150.0, 20.0, 10.0, 10.0)).unwrap_err();
    assert!(err.to_string().contains("out of bounds"));
}

#[test]
fn crop_zero_size_region_is_an_error() {
    let shot = coordinate_image(100, 100);
    assert!(crop_screenshot(&shot, &rect(10.0, 10.0, 0.0, 0.0)).is_err());
}

#[test]
fn crop_negative_origin_is_clamped_to_zero() {
    let shot = coordinate_image(100, 100);
    let asset = crop_screenshot(&shot, &rect(-5.0, -5.0, 30.0, 30.0)).unwrap();
    let cropped = decode_data_url(&asset.data_url);
    assert_eq!(cropped.dimensions(), (30, 30));
    assert_eq!(cropped.get_pixel(0, 0), &Rgba([0, 0, 0, 255]));
}

#[test]
fn data_url_round_trips_through_png() {
    let shot = coordinate_image(64, 64);
    let asset = crop_screenshot(&shot, &rect(0.0, 0.0, 64.0, 64.0)).unwrap();
    let decoded = decode_data_url(&asset.data_url);
    assert_eq!(decoded, shot);
}
