//! Colour-space conversions feeding the fusion detector.
//!
//! Both conversions follow the 8-bit conventions used by common vision
//! toolkits: luma uses the BT.601 weights and the HLS saturation channel is
//! scaled to `0..=255` and rounded.
use crate::image::{Frame, GrayImageU8};

const LUMA_R: f32 = 0.299;
const LUMA_G: f32 = 0.587;
const LUMA_B: f32 = 0.114;

/// BT.601 luma of an RGB frame.
pub fn luma(frame: &Frame) -> GrayImageU8 {
    let data = frame
        .pixels()
        .map(|[r, g, b]| {
            let y = LUMA_R * r as f32 + LUMA_G * g as f32 + LUMA_B * b as f32;
            y.round().clamp(0.0, 255.0) as u8
        })
        .collect();
    GrayImageU8::new(frame.width(), frame.height(), data)
}

/// HLS saturation of a single RGB pixel, scaled to `0..=255`.
#[inline]
pub fn hls_saturation(rgb: [u8; 3]) -> u8 {
    let r = rgb[0] as f32 / 255.0;
    let g = rgb[1] as f32 / 255.0;
    let b = rgb[2] as f32 / 255.0;
    let vmax = r.max(g).max(b);
    let vmin = r.min(g).min(b);
    let diff = vmax - vmin;
    if diff <= f32::EPSILON {
        return 0;
    }
    let lightness = 0.5 * (vmax + vmin);
    let s = if lightness < 0.5 {
        diff / (vmax + vmin)
    } else {
        diff / (2.0 - vmax - vmin)
    };
    (s * 255.0).round().clamp(0.0, 255.0) as u8
}

/// S-channel of the HLS representation of `frame`.
pub fn s_channel(frame: &Frame) -> GrayImageU8 {
    let data = frame.pixels().map(hls_saturation).collect();
    GrayImageU8::new(frame.width(), frame.height(), data)
}
