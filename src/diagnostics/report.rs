use super::timing::TimingBreakdown;
use crate::error::LaneError;
use serde::Serialize;

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameFailure {
    pub index: usize,
    pub error: String,
}

/// Outcome counts and timing for everything a runner has processed.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub frames: usize,
    pub fitted: usize,
    pub failures: Vec<FrameFailure>,
    pub timing: TimingBreakdown,
    /// Wall-clock time over source duration, when the frame rate is known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing_factor: Option<f64>,
}

impl RunReport {
    pub(crate) fn record_failure(&mut self, index: usize, err: &LaneError) {
        self.failures.push(FrameFailure {
            index,
            error: err.to_string(),
        });
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// Share of processed frames with a lane fit, in `[0, 1]`.
    pub fn detection_rate(&self) -> f64 {
        if self.frames == 0 {
            0.0
        } else {
            self.fitted as f64 / self.frames as f64
        }
    }
}
