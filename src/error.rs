//! Error taxonomy shared by every pipeline stage.
use crate::types::LaneSide;
use thiserror::Error;

pub type Result<T, E = LaneError> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LaneError {
    /// Invalid parameters; only raised while constructing a component.
    #[error("invalid configuration: {0}")]
    Configuration(String),
    /// The sliding-window search collected no pixels for one side.
    #[error("no lane detected on the {side} side")]
    NoLaneDetected { side: LaneSide },
    /// Pixels were found but they do not determine a quadratic.
    #[error("cannot fit the {side} lane through {pixels} pixels (need 3 distinct rows)")]
    DegenerateFit { side: LaneSide, pixels: usize },
    /// Input size differs from the size the stage was built for.
    #[error("expected a {}x{} input, got {}x{}", expected.0, expected.1, actual.0, actual.1)]
    DimensionMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },
    /// Failure reported by the calibration handle.
    #[error("undistortion failed: {0}")]
    Undistort(String),
}

impl LaneError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// True for the "nothing to fit" family of per-frame outcomes.
    pub fn is_no_detection(&self) -> bool {
        matches!(self, Self::NoLaneDetected { .. } | Self::DegenerateFit { .. })
    }
}

pub(crate) fn ensure_dims(expected: (usize, usize), actual: (usize, usize)) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(LaneError::DimensionMismatch { expected, actual })
    }
}
