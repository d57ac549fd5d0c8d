#![doc = include_str!("../README.md")]

// Pipeline stages
pub mod calibration;
pub mod fusion;
pub mod lanes;
pub mod overlay;
pub mod rectify;
pub mod runner;

// Shared building blocks
pub mod color;
pub mod config;
pub mod diagnostics;
pub mod edges;
pub mod error;
pub mod homography;
pub mod image;
pub mod types;

// --- High-level re-exports -------------------------------------------------

pub use crate::calibration::{LensUndistort, Passthrough, Undistort};
pub use crate::config::{load_config, PipelineConfig};
pub use crate::error::{LaneError, Result};
pub use crate::fusion::{FusionParams, FusionStages, SignalFusionDetector};
pub use crate::homography::PlanarMapping;
pub use crate::lanes::{LaneCurveFitter, LaneFitParams};
pub use crate::overlay::{OverlayComposer, OverlayParams};
pub use crate::rectify::{PlanarRectifier, RectifierParams};
pub use crate::runner::{CancelToken, FitStrategy, FrameOutcome, FrameSequenceRunner, RunnerParams};
pub use crate::types::{CurvePoints, LaneBoundary, LaneFitResult, LaneSide, Polynomial2};

pub use crate::diagnostics::{RunReport, TimingBreakdown};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use lane_geometry::prelude::*;
/// use std::sync::Arc;
///
/// # fn main() -> lane_geometry::Result<()> {
/// let frames = vec![Frame::new(1280, 720); 3];
/// let mut runner =
///     FrameSequenceRunner::new(Arc::new(Passthrough), PipelineConfig::default(), 1280, 720)?;
/// for outcome in runner.run(frames) {
///     match &outcome.fit {
///         Ok(fit) => println!("frame {}: offset {:.2} m", outcome.index, fit.vehicle_offset()),
///         Err(err) => println!("frame {}: {err}", outcome.index),
///     }
/// }
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::image::{Frame, Mask};
    pub use crate::{
        FrameSequenceRunner, LaneCurveFitter, LaneFitResult, OverlayComposer, Passthrough,
        PipelineConfig, PlanarRectifier, SignalFusionDetector,
    };
}
