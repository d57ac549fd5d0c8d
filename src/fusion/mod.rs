//! Multi-cue lane-marking detector.
//!
//! Overview
//! - Converts the undistorted RGB frame to luma (for gradients) and to the
//!   HLS saturation channel (for colour).
//! - Thresholds the S-channel directly.
//! - Computes Sobel `gx`/`gy` on luma, rescales `|gx|`, `|gy|` and the
//!   magnitude by their own per-frame maximum, and thresholds each one.
//! - Thresholds the folded gradient direction `atan2(|gy|, |gx|)`.
//! - Fuses: `(gx ∧ gy) ∨ (mag ∧ dir) ∨ s`.
//!
//! All ranges are inclusive on both ends. A frame without any gradient
//! produces all-zero gradient cues instead of dividing by a zero maximum.

pub mod params;

pub use params::FusionParams;

use crate::color::{luma, s_channel};
use crate::edges::{scaled_binary, sobel_gradients, threshold_u8, Inclusive};
use crate::error::{LaneError, Result};
use crate::image::{Frame, ImageF32, Mask};
use log::debug;

/// Every intermediate cue produced while detecting one frame.
#[derive(Clone, Debug)]
pub struct FusionStages {
    pub s_binary: Mask,
    pub gx_binary: Mask,
    pub gy_binary: Mask,
    pub mag_binary: Mask,
    pub dir_binary: Mask,
    /// `(gx ∧ gy) ∨ (mag ∧ dir)`
    pub gradient: Mask,
    /// Final fused mask.
    pub combined: Mask,
}

/// Fuses colour and gradient cues into a single binary lane-marking mask.
#[derive(Clone, Debug)]
pub struct SignalFusionDetector {
    params: FusionParams,
    dir_window: Inclusive<f32>,
}

impl SignalFusionDetector {
    /// Validate `params` and build a detector.
    pub fn new(params: FusionParams) -> Result<Self> {
        params.validate()?;
        let dir_window = params.dir_window_rad();
        Ok(Self { params, dir_window })
    }

    pub fn params(&self) -> &FusionParams {
        &self.params
    }

    /// Binary mask (`{0, 1}`) with the same size as `frame`.
    pub fn detect(&self, frame: &Frame) -> Mask {
        self.detect_with_stages(frame).combined
    }

    /// Same as [`detect`](Self::detect) but keeps every intermediate cue.
    pub fn detect_with_stages(&self, frame: &Frame) -> FusionStages {
        let (w, h) = (frame.width(), frame.height());

        let s_binary = threshold_u8(&s_channel(frame), self.params.s_thresh);

        let gray = luma(frame);
        let l = ImageF32::from_u8(&gray.as_view());
        // Aperture validity was checked at construction.
        let (gx_binary, gy_binary, mag_binary, dir_binary) =
            match sobel_gradients(&l, self.params.kernel_size) {
                Some(grad) => {
                    let gx_binary = scaled_binary(&grad.gx, self.params.gx_thresh);
                    let gy_binary = scaled_binary(&grad.gy, self.params.gy_thresh);
                    let mag_binary = scaled_binary(&grad.mag, self.params.mag_thresh);
                    let dir_binary =
                        Mask::from_fn(w, h, |x, y| self.dir_window.contains(grad.abs_direction(x, y)));
                    (gx_binary, gy_binary, mag_binary, dir_binary)
                }
                None => (
                    Mask::new(w, h),
                    Mask::new(w, h),
                    Mask::new(w, h),
                    Mask::new(w, h),
                ),
            };

        let xy = gx_binary.and(&gy_binary);
        let md = mag_binary.and(&dir_binary);
        let gradient = xy.or(&md);
        let combined = gradient.or(&s_binary);

        debug!(
            "SignalFusionDetector::detect w={} h={} s_on={} grad_on={} combined_on={}",
            w,
            h,
            s_binary.count_on(),
            gradient.count_on(),
            combined.count_on()
        );

        FusionStages {
            s_binary,
            gx_binary,
            gy_binary,
            mag_binary,
            dir_binary,
            gradient,
            combined,
        }
    }
}

impl Default for SignalFusionDetector {
    fn default() -> Self {
        let params = FusionParams::default();
        let dir_window = params.dir_window_rad();
        Self { params, dir_window }
    }
}

impl TryFrom<FusionParams> for SignalFusionDetector {
    type Error = LaneError;

    fn try_from(params: FusionParams) -> Result<Self> {
        Self::new(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_frame_yields_empty_mask() {
        let frame = Frame::filled(64, 48, [90, 90, 90]);
        let mask = SignalFusionDetector::default().detect(&frame);
        assert_eq!((mask.width(), mask.height()), (64, 48));
        assert_eq!(mask.count_on(), 0);
    }

    #[test]
    fn saturated_stripe_is_detected_by_colour() {
        let mut frame = Frame::filled(40, 20, [100, 100, 100]);
        for y in 0..20 {
            for x in 18..22 {
                frame.put_pixel(x, y, [230, 200, 20]);
            }
        }
        let stages = SignalFusionDetector::default().detect_with_stages(&frame);
        assert!(stages.s_binary.is_on(19, 10));
        assert!(!stages.s_binary.is_on(5, 10));
        assert!(stages.combined.is_on(19, 10));
        assert!(stages.combined.is_binary());
    }

    #[test]
    fn even_kernel_is_a_configuration_error() {
        let params = FusionParams {
            kernel_size: 4,
            ..Default::default()
        };
        assert!(matches!(
            SignalFusionDetector::new(params),
            Err(LaneError::Configuration(_))
        ));
    }

    #[test]
    fn inverted_range_is_a_configuration_error() {
        let params = FusionParams {
            mag_thresh: Inclusive(200, 100),
            ..Default::default()
        };
        assert!(SignalFusionDetector::new(params).is_err());
    }
}
