use crate::error::{LaneError, Result};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayParams {
    /// Lane area colour in plan view, RGB.
    pub fill_color: [u8; 3],
    /// Weight of the unwarped lane area when added onto the camera frame.
    pub alpha: f32,
    pub text_color: [u8; 3],
    /// Colour of the message drawn on frames without a fit.
    pub failure_color: [u8; 3],
    pub text_origin_x: i64,
    /// Baseline of the first readout line.
    pub first_line_y: i64,
    pub line_spacing: i64,
    pub text_scale: usize,
    pub draw_readout: bool,
}

impl Default for OverlayParams {
    fn default() -> Self {
        Self {
            fill_color: [0, 255, 0],
            alpha: 0.3,
            text_color: [255, 255, 255],
            failure_color: [255, 64, 64],
            text_origin_x: 350,
            first_line_y: 50,
            line_spacing: 50,
            text_scale: 3,
            draw_readout: true,
        }
    }
}

impl OverlayParams {
    pub fn validate(&self) -> Result<()> {
        if !(self.alpha.is_finite() && self.alpha >= 0.0) {
            return Err(LaneError::config(format!(
                "overlay alpha must be finite and non-negative, got {}",
                self.alpha
            )));
        }
        if self.text_scale == 0 {
            return Err(LaneError::config("text_scale must be positive"));
        }
        Ok(())
    }
}
