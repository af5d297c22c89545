//! Confidence overlay rendering.
//!
//! The heatmap is a translucent red wash over the analyzed frame whose
//! opacity tracks the fake-probability score: a clean frame stays
//! untouched, a high-scoring frame glows red.

use image::{Rgba, RgbaImage, RgbImage};

/// Peak overlay opacity, reached at score 1.0.
const MAX_OVERLAY_ALPHA: f64 = 155.0;

/// Overlay alpha for a fake-probability score.
///
/// Scores are clamped to `[0, 1]` and mapped linearly onto
/// `[0, 155]`, rounded to the nearest integer.
pub fn overlay_alpha(score: f64) -> u8 {
    (MAX_OVERLAY_ALPHA * score.clamp(0.0, 1.0)).round() as u8
}

/// Composite a full-frame red overlay onto `frame`.
///
/// The output has the same dimensions as the input and is fully opaque.
/// At alpha 0 the pixel data passes through unchanged, so identical
/// inputs always produce identical outputs.
pub fn render_heatmap(frame: &RgbImage, score: f64) -> RgbaImage {
    let alpha = u32::from(overlay_alpha(score));
    let (width, height) = frame.dimensions();

    let mut out = RgbaImage::new(width, height);
    for (x, y, pixel) in frame.enumerate_pixels() {
        let r = blend(255, pixel[0], alpha);
        let g = blend(0, pixel[1], alpha);
        let b = blend(0, pixel[2], alpha);
        out.put_pixel(x, y, Rgba([r, g, b, 255]));
    }
    out
}

/// Source-over blend of one overlay channel onto an opaque background
/// channel, with rounded integer division.
fn blend(overlay: u32, background: u8, alpha: u32) -> u8 {
    ((overlay * alpha + u32::from(background) * (255 - alpha) + 127) / 255) as u8
}
