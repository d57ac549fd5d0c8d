//! Camera view ⇄ plan view rectification.
//!
//! [`PlanarRectifier`] owns a [`PlanarMapping`] built once from the
//! configured correspondences and resamples any [`Raster`] through it with
//! bilinear interpolation. Output rasters keep the input size, pixel type and
//! channel count.

mod warp;

pub use warp::warp_perspective;
pub(crate) use warp::bilinear;

use crate::error::Result;
use crate::homography::{apply_homography_points, PlanarMapping};
use crate::image::Raster;
use serde::{Deserialize, Serialize};

/// Frame size the default correspondences are tuned for.
pub const REFERENCE_SIZE: (usize, usize) = (1280, 720);

/// Point correspondences defining the plan-view mapping.
///
/// `src` is a trapezoid on the road surface in the camera view; `dst` is the
/// axis-aligned rectangle it should become in plan view.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RectifierParams {
    pub src: Vec<[f64; 2]>,
    pub dst: Vec<[f64; 2]>,
}

impl Default for RectifierParams {
    fn default() -> Self {
        Self {
            src: vec![[220.0, 720.0], [610.0, 440.0], [670.0, 440.0], [1110.0, 720.0]],
            dst: vec![[220.0, 720.0], [220.0, 0.0], [1110.0, 0.0], [1110.0, 720.0]],
        }
    }
}

impl RectifierParams {
    /// Default correspondences rescaled from 1280×720 to `width × height`.
    pub fn scaled_to(width: usize, height: usize) -> Self {
        let sx = width as f64 / REFERENCE_SIZE.0 as f64;
        let sy = height as f64 / REFERENCE_SIZE.1 as f64;
        let scale = |pts: Vec<[f64; 2]>| -> Vec<[f64; 2]> {
            pts.into_iter().map(|[x, y]| [x * sx, y * sy]).collect()
        };
        let base = Self::default();
        Self {
            src: scale(base.src),
            dst: scale(base.dst),
        }
    }
}

/// Fixed forward/inverse planar resampler.
#[derive(Clone, Debug)]
pub struct PlanarRectifier {
    mapping: PlanarMapping,
}

impl PlanarRectifier {
    pub fn new(params: &RectifierParams) -> Result<Self> {
        let mapping = PlanarMapping::from_points(&params.src, &params.dst)?;
        Ok(Self { mapping })
    }

    pub fn from_mapping(mapping: PlanarMapping) -> Self {
        Self { mapping }
    }

    pub fn mapping(&self) -> &PlanarMapping {
        &self.mapping
    }

    /// Camera view → plan view.
    pub fn warp<R: Raster + Sync>(&self, image: &R) -> R {
        // dst(p) = src(M⁻¹ p)
        warp_perspective(image, self.mapping.inverse())
    }

    /// Plan view → camera view.
    pub fn unwarp<R: Raster + Sync>(&self, image: &R) -> R {
        warp_perspective(image, self.mapping.forward())
    }

    /// Map camera-view points into plan view.
    pub fn warp_points(&self, pts: &[[f64; 2]]) -> Option<Vec<[f64; 2]>> {
        apply_homography_points(self.mapping.forward(), pts)
    }

    /// Map plan-view points back into the camera view.
    pub fn unwarp_points(&self, pts: &[[f64; 2]]) -> Option<Vec<[f64; 2]>> {
        apply_homography_points(self.mapping.inverse(), pts)
    }
}
