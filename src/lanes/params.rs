use crate::error::{LaneError, Result};
use serde::{Deserialize, Serialize};

/// Sliding-window search and unit-conversion settings.
///
/// The default scale factors assume the plan view spans roughly 30 m ahead
/// over 720 rows and that a 3.7 m lane is about 700 px wide.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaneFitParams {
    /// Number of horizontal bands scanned bottom to top.
    pub windows: usize,
    /// Half-width of each search window, pixels.
    pub margin: usize,
    /// Pixels a window must collect before the next one is re-centred.
    pub min_pixels: usize,
    /// Meters per plan-view row.
    pub ym_per_px: f64,
    /// Meters per plan-view column.
    pub xm_per_px: f64,
    /// Half-width of the band searched around a previous fit, pixels.
    pub prior_margin: usize,
}

impl Default for LaneFitParams {
    fn default() -> Self {
        Self {
            windows: 9,
            margin: 100,
            min_pixels: 50,
            ym_per_px: 30.0 / 720.0,
            xm_per_px: 3.7 / 700.0,
            prior_margin: 100,
        }
    }
}

impl LaneFitParams {
    pub fn validate(&self) -> Result<()> {
        if self.windows == 0 {
            return Err(LaneError::config("windows must be positive"));
        }
        if self.margin == 0 {
            return Err(LaneError::config("margin must be positive"));
        }
        if self.prior_margin == 0 {
            return Err(LaneError::config("prior_margin must be positive"));
        }
        for (name, v) in [("ym_per_px", self.ym_per_px), ("xm_per_px", self.xm_per_px)] {
            if !(v.is_finite() && v > 0.0) {
                return Err(LaneError::config(format!("{name} must be positive, got {v}")));
            }
        }
        Ok(())
    }
}
