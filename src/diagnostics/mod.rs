//! Run diagnostics: per-stage timing and per-run outcome summary.

pub mod report;
pub mod timing;

pub use report::{FrameFailure, RunReport};
pub use timing::{Stage, StageClock, StageTiming, TimingBreakdown};
