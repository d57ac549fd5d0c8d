//! Undistortion capability consumed by the frame runner.
//!
//! Producing calibration data is out of scope; callers either pass frames
//! through untouched ([`Passthrough`]) or apply a known Brown–Conrady model
//! ([`LensUndistort`]).

mod lens;

pub use lens::{CalibrationKey, CameraIntrinsics, LensModel, LensUndistort, RadialTangential};

use crate::error::Result;
use crate::image::Frame;

/// Removes lens distortion from a frame. Output keeps the input size.
pub trait Undistort: Send + Sync {
    fn undistort(&self, frame: &Frame) -> Result<Frame>;
}

/// Identity handle for frames that are already undistorted.
#[derive(Clone, Copy, Debug, Default)]
pub struct Passthrough;

impl Undistort for Passthrough {
    fn undistort(&self, frame: &Frame) -> Result<Frame> {
        Ok(frame.clone())
    }
}

impl<T: Undistort + ?Sized> Undistort for std::sync::Arc<T> {
    fn undistort(&self, frame: &Frame) -> Result<Frame> {
        (**self).undistort(frame)
    }
}
