//! Base64 PNG encoding for inline report images.
//!
//! Reports embed the analyzed frame and its heatmap directly in the
//! response body, so clients render them without a second fetch.

use std::io::Cursor;

use base64::Engine;
use image::{ImageFormat, RgbImage, RgbaImage};

/// Encode an RGB image as a base64 PNG string.
pub fn rgb_png_base64(image: &RgbImage) -> Result<String, image::ImageError> {
    let mut buffer = Cursor::new(Vec::new());
    image.write_to(&mut buffer, ImageFormat::Png)?;
    Ok(base64::engine::general_purpose::STANDARD.encode(buffer.into_inner()))
}

/// Encode an RGBA image as a base64 PNG string.
pub fn rgba_png_base64(image: &RgbaImage) -> Result<String, image::ImageError> {
    let mut buffer = Cursor::new(Vec::new());
    image.write_to(&mut buffer, ImageFormat::Png)?;
    Ok(base64::engine::general_purpose::STANDARD.encode(buffer.into_inner()))
}
