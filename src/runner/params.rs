use crate::error::{LaneError, Result};
use serde::{Deserialize, Serialize};

/// How each frame's pixel search is seeded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitStrategy {
    /// Every frame runs the full sliding-window search.
    #[default]
    Independent,
    /// Search around the previous frame's fit first. Forces sequential runs.
    ReusePrevious,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerParams {
    /// Process frames of a batch concurrently (needs the `parallel` feature).
    pub parallel: bool,
    /// Frames per batch.
    pub batch_size: usize,
    pub strategy: FitStrategy,
    /// Source frame rate, used for the processing-time factor.
    pub source_fps: Option<f64>,
    /// Attach the fused camera-view mask to every outcome.
    pub keep_masks: bool,
}

impl Default for RunnerParams {
    fn default() -> Self {
        Self {
            parallel: true,
            batch_size: 8,
            strategy: FitStrategy::Independent,
            source_fps: None,
            keep_masks: false,
        }
    }
}

impl RunnerParams {
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(LaneError::config("batch_size must be positive"));
        }
        if let Some(fps) = self.source_fps {
            if !(fps.is_finite() && fps > 0.0) {
                return Err(LaneError::config(format!("source_fps must be positive, got {fps}")));
            }
        }
        Ok(())
    }

    /// True when batches may run concurrently.
    pub fn runs_parallel(&self) -> bool {
        cfg!(feature = "parallel") && self.parallel && self.strategy == FitStrategy::Independent
    }
}
