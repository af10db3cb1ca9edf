//! Deterministic synthetic images for tests.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};

/// PNG bytes of a single-color image.
///
/// # Panics
///
/// Panics if PNG encoding fails (test-only code).
#[must_use]
pub fn solid_png(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
    let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba(rgba)));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png).expect("encode test PNG");
    out.into_inner()
}

