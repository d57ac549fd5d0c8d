//! Rescaling and inclusive range thresholding of per-pixel responses.
//!
//! Every cue uses the same boundary convention: a value `v` passes a range
//! `[lo, hi]` iff `lo <= v && v <= hi`.
use crate::image::{GrayImageU8, ImageF32, ImageView, Mask};
use serde::{Deserialize, Serialize};

/// Maximum responses at or below this are treated as "no signal".
pub const MIN_SCALE_DIVISOR: f32 = 1e-6;

/// Closed interval `[lo, hi]`, serialized as a two-element array.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Inclusive<T>(pub T, pub T);

impl<T: PartialOrd + Copy> Inclusive<T> {
    #[inline]
    pub fn contains(&self, v: T) -> bool {
        self.0 <= v && v <= self.1
    }

    pub fn lo(&self) -> T {
        self.0
    }

    pub fn hi(&self) -> T {
        self.1
    }

    pub fn is_ordered(&self) -> bool {
        self.0 <= self.1
    }
}

/// Rescale `|img|` to `0..=255` by the image's own maximum (truncating).
///
/// Returns `None` when the maximum is numerically zero; callers treat that
/// cue as all-off instead of dividing by it.
pub fn rescale_abs_to_u8(img: &ImageF32) -> Option<GrayImageU8> {
    let max = img.max_abs();
    if !(max > MIN_SCALE_DIVISOR) {
        return None;
    }
    let scale = 255.0 / max;
    let mut data = Vec::with_capacity(img.w * img.h);
    for row in img.rows() {
        data.extend(row.iter().map(|v| (v.abs() * scale).min(255.0) as u8));
    }
    Some(GrayImageU8::new(img.w, img.h, data))
}

/// Inclusive threshold of an 8-bit image.
pub fn threshold_u8(gray: &GrayImageU8, range: Inclusive<u8>) -> Mask {
    let (w, h) = (gray.width(), gray.height());
    let data = gray.data();
    Mask::from_fn(w, h, |x, y| range.contains(data[y * w + x]))
}

/// Rescale then threshold; an all-zero response yields an all-zero mask.
pub fn scaled_binary(img: &ImageF32, range: Inclusive<u8>) -> Mask {
    match rescale_abs_to_u8(img) {
        Some(scaled) => threshold_u8(&scaled, range),
        None => Mask::new(img.w, img.h),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_are_inclusive_on_both_ends() {
        let r = Inclusive(50u8, 200u8);
        assert!(!r.contains(49));
        assert!(r.contains(50));
        assert!(r.contains(200));
        assert!(!r.contains(201));
    }

    #[test]
    fn rescale_uses_per_image_maximum() {
        let mut img = ImageF32::new(3, 1);
        img.set(0, 0, -10.0);
        img.set(1, 0, 5.0);
        let scaled = rescale_abs_to_u8(&img).unwrap();
        assert_eq!(scaled.data(), &[255, 127, 0]);
    }

    #[test]
    fn zero_response_skips_scaling() {
        let img = ImageF32::new(4, 4);
        assert!(rescale_abs_to_u8(&img).is_none());
        // Even a range that admits zero must not light up a silent cue.
        let mask = scaled_binary(&img, Inclusive(0, 255));
        assert_eq!(mask.count_on(), 0);
    }
}
