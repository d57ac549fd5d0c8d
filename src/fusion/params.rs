//! Parameters of the multi-cue lane-marking detector.
//!
//! Defaults: a saturation window of `[150, 255]`, a 13-tap Sobel aperture,
//! `[50, 255]` for the rescaled gradient cues and a 60° ± 20° direction window.

use crate::edges::{Inclusive, MAX_KERNEL_SIZE};
use crate::error::{LaneError, Result};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FusionParams {
    /// HLS saturation window.
    pub s_thresh: Inclusive<u8>,
    /// Odd Sobel aperture in `1..=31`.
    pub kernel_size: usize,
    /// Window on the rescaled horizontal derivative.
    pub gx_thresh: Inclusive<u8>,
    /// Window on the rescaled vertical derivative.
    pub gy_thresh: Inclusive<u8>,
    /// Window on the rescaled gradient magnitude.
    pub mag_thresh: Inclusive<u8>,
    /// Centre of the accepted gradient direction (degrees, first quadrant).
    pub dir_center_deg: f32,
    /// Half-width of the accepted direction window (degrees).
    pub dir_half_width_deg: f32,
}

impl Default for FusionParams {
    fn default() -> Self {
        Self {
            s_thresh: Inclusive(150, 255),
            kernel_size: 13,
            gx_thresh: Inclusive(50, 255),
            gy_thresh: Inclusive(50, 255),
            mag_thresh: Inclusive(50, 255),
            dir_center_deg: 60.0,
            dir_half_width_deg: 20.0,
        }
    }
}

impl FusionParams {
    /// Direction window converted to radians.
    pub fn dir_window_rad(&self) -> Inclusive<f32> {
        Inclusive(
            (self.dir_center_deg - self.dir_half_width_deg).to_radians(),
            (self.dir_center_deg + self.dir_half_width_deg).to_radians(),
        )
    }

    pub fn validate(&self) -> Result<()> {
        if self.kernel_size == 0 || self.kernel_size % 2 == 0 || self.kernel_size > MAX_KERNEL_SIZE
        {
            return Err(LaneError::config(format!(
                "kernel_size must be odd and within 1..={MAX_KERNEL_SIZE}, got {}",
                self.kernel_size
            )));
        }
        for (name, range) in [
            ("s_thresh", self.s_thresh),
            ("gx_thresh", self.gx_thresh),
            ("gy_thresh", self.gy_thresh),
            ("mag_thresh", self.mag_thresh),
        ] {
            if !range.is_ordered() {
                return Err(LaneError::config(format!(
                    "{name} lower bound {} exceeds upper bound {}",
                    range.lo(),
                    range.hi()
                )));
            }
        }
        if !self.dir_center_deg.is_finite()
            || !self.dir_half_width_deg.is_finite()
            || self.dir_half_width_deg < 0.0
        {
            return Err(LaneError::config(
                "direction window must be finite with a non-negative half-width",
            ));
        }
        Ok(())
    }
}
