//! Plan-view lane boundary estimation.
//!
//! [`LaneCurveFitter`] finds lane pixels in a rectified binary mask, fits a
//! quadratic `x = a·y² + b·y + c` per side in pixels and in meters, and
//! derives curvature radii and the vehicle's lateral offset at the bottom
//! row (closest to the vehicle).
//!
//! Two pixel-collection strategies exist:
//! - [`fit`](LaneCurveFitter::fit) runs the histogram-seeded sliding-window
//!   search from scratch.
//! - [`fit_near`](LaneCurveFitter::fit_near) searches a band around a
//!   previous frame's fits and falls back to the full search when that band
//!   does not support a fit.

mod geometry;
mod histogram;
mod params;
mod polyfit;
mod window;

pub use geometry::{curvature_radius, to_meters, vehicle_offset, MIN_CURVATURE_TERM};
pub use histogram::{base_positions, bottom_half_histogram};
pub use params::LaneFitParams;
pub use polyfit::fit_quadratic;
pub use window::{around_prior, sliding_windows, PixelSearch, WindowTrace};

use crate::error::{ensure_dims, LaneError, Result};
use crate::image::Mask;
use crate::types::{LaneBoundary, LaneFitResult, LaneSide};
use log::debug;

/// Fits lane boundaries for plan-view masks of one fixed size.
#[derive(Clone, Debug)]
pub struct LaneCurveFitter {
    width: usize,
    height: usize,
    params: LaneFitParams,
}

impl LaneCurveFitter {
    pub fn new(width: usize, height: usize, params: LaneFitParams) -> Result<Self> {
        params.validate()?;
        if width < 2 || height == 0 {
            return Err(LaneError::config(format!(
                "plan view must be at least 2x1, got {width}x{height}"
            )));
        }
        if height < params.windows {
            return Err(LaneError::config(format!(
                "{} windows do not fit in {height} rows",
                params.windows
            )));
        }
        Ok(Self {
            width,
            height,
            params,
        })
    }

    pub fn params(&self) -> &LaneFitParams {
        &self.params
    }

    pub fn dims(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Sliding-window search and fit.
    pub fn fit(&self, mask: &Mask) -> Result<LaneFitResult> {
        ensure_dims(self.dims(), (mask.width(), mask.height()))?;
        let search = sliding_windows(mask, &self.params);
        self.fit_pixels(search)
    }

    /// Like [`fit`](Self::fit) but also returns the pixel search, windows included.
    pub fn fit_with_search(&self, mask: &Mask) -> Result<(LaneFitResult, PixelSearch)> {
        ensure_dims(self.dims(), (mask.width(), mask.height()))?;
        let search = sliding_windows(mask, &self.params);
        let fit = self.fit_pixels(search.clone())?;
        Ok((fit, search))
    }

    /// Search around `prior`'s pixel fits; use the sliding windows if that fails.
    pub fn fit_near(&self, mask: &Mask, prior: &LaneFitResult) -> Result<LaneFitResult> {
        ensure_dims(self.dims(), (mask.width(), mask.height()))?;
        let search = around_prior(mask, &prior.left.fit_px, &prior.right.fit_px, &self.params);
        match self.fit_pixels(search) {
            Ok(fit) => Ok(fit),
            Err(err) if err.is_no_detection() => {
                debug!("LaneCurveFitter::fit_near falling back to window search: {err}");
                self.fit(mask)
            }
            Err(err) => Err(err),
        }
    }

    fn fit_pixels(&self, search: PixelSearch) -> Result<LaneFitResult> {
        let PixelSearch { left, right, .. } = search;
        let left = self.fit_side(LaneSide::Left, left)?;
        let right = self.fit_side(LaneSide::Right, right)?;

        let y_px = self.height as f64;
        let y_m = y_px * self.params.ym_per_px;
        let curvature_left = curvature_radius(&left.fit_m, y_m);
        let curvature_right = curvature_radius(&right.fit_m, y_m);
        let curvature_left_px = curvature_radius(&left.fit_px, y_px);
        let curvature_right_px = curvature_radius(&right.fit_px, y_px);
        let vehicle_offset = vehicle_offset(
            &left.fit_px,
            &right.fit_px,
            self.width,
            y_px,
            self.params.xm_per_px,
        );

        debug!(
            "LaneCurveFitter::fit left_px={} right_px={} r_left={:.1} r_right={:.1} offset={:.3}",
            left.pixel_count, right.pixel_count, curvature_left, curvature_right, vehicle_offset
        );

        Ok(LaneFitResult {
            width: self.width,
            height: self.height,
            left,
            right,
            curvature_left,
            curvature_right,
            curvature_left_px,
            curvature_right_px,
            vehicle_offset,
        })
    }

    fn fit_side(&self, side: LaneSide, pixels: Vec<[u32; 2]>) -> Result<LaneBoundary> {
        if pixels.is_empty() {
            return Err(LaneError::NoLaneDetected { side });
        }
        let samples: Vec<(f64, f64)> = pixels
            .iter()
            .map(|p| (p[0] as f64, p[1] as f64))
            .collect();
        let fit_px = fit_quadratic(&samples).ok_or(LaneError::DegenerateFit {
            side,
            pixels: pixels.len(),
        })?;
        let fit_m = to_meters(&fit_px, self.params.ym_per_px, self.params.xm_per_px);
        Ok(LaneBoundary {
            side,
            pixel_count: pixels.len(),
            pixels,
            fit_px,
            fit_m,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Polynomial2;

    fn curve_mask(w: usize, h: usize, left: Polynomial2, right: Polynomial2) -> Mask {
        Mask::from_fn(w, h, |x, y| {
            let y = y as f64;
            let x = x as f64;
            (x - left.eval(y)).abs() <= 3.0 || (x - right.eval(y)).abs() <= 3.0
        })
    }

    #[test]
    fn straight_lines_are_flat_and_centered() {
        let mask = curve_mask(
            1280,
            720,
            Polynomial2::new(0.0, 0.0, 340.0),
            Polynomial2::new(0.0, 0.0, 940.0),
        );
        let fitter = LaneCurveFitter::new(1280, 720, LaneFitParams::default()).unwrap();
        let fit = fitter.fit(&mask).unwrap();
        let (l, r) = fit.curvature();
        assert!(l > 1e6 && r > 1e6);
        assert!(fit.vehicle_offset().abs() < 1e-6);
        assert!((fit.left.fit_px.c - 340.0).abs() < 0.5);
        assert!((fit.right.fit_px.c - 940.0).abs() < 0.5);
    }

    #[test]
    fn curved_lines_recover_the_quadratic() {
        let left = Polynomial2::new(2e-4, -0.2, 350.0);
        let right = Polynomial2::new(2e-4, -0.2, 1000.0);
        let mask = curve_mask(1280, 720, left, right);
        let fitter = LaneCurveFitter::new(1280, 720, LaneFitParams::default()).unwrap();
        let fit = fitter.fit(&mask).unwrap();
        for y in [100.0, 400.0, 700.0] {
            assert!((fit.left.fit_px.eval(y) - left.eval(y)).abs() < 1.0);
            assert!((fit.right.fit_px.eval(y) - right.eval(y)).abs() < 1.0);
        }
        assert!(fit.curvature_left.is_finite());
    }

    #[test]
    fn search_trace_matches_the_fit() {
        let mask = curve_mask(
            640,
            360,
            Polynomial2::new(0.0, 0.0, 160.0),
            Polynomial2::new(0.0, 0.0, 480.0),
        );
        let fitter = LaneCurveFitter::new(640, 360, LaneFitParams::default()).unwrap();
        let (fit, search) = fitter.fit_with_search(&mask).unwrap();
        assert_eq!(search.windows.len(), 2 * fitter.params().windows);
        assert_eq!(fit.boundary(LaneSide::Left).pixel_count, search.left.len());
        assert_eq!(fit.boundary(LaneSide::Right).pixel_count, search.right.len());
        let plain = fitter.fit(&mask).unwrap();
        assert_eq!(fit.left.fit_px, plain.left.fit_px);
        assert_eq!(fit.right.fit_px, plain.right.fit_px);
    }

    #[test]
    fn missing_right_line_is_no_detection() {
        let mask = Mask::from_fn(200, 90, |x, _| x == 40);
        let params = LaneFitParams {
            margin: 20,
            ..Default::default()
        };
        let fitter = LaneCurveFitter::new(200, 90, params).unwrap();
        let err = fitter.fit(&mask).unwrap_err();
        assert_eq!(err, LaneError::NoLaneDetected { side: LaneSide::Right });
    }

    #[test]
    fn empty_mask_reports_left_first() {
        let fitter = LaneCurveFitter::new(200, 90, LaneFitParams::default()).unwrap();
        let err = fitter.fit(&Mask::new(200, 90)).unwrap_err();
        assert_eq!(err, LaneError::NoLaneDetected { side: LaneSide::Left });
    }

    #[test]
    fn wrong_mask_size_is_rejected() {
        let fitter = LaneCurveFitter::new(200, 90, LaneFitParams::default()).unwrap();
        assert!(matches!(
            fitter.fit(&Mask::new(100, 90)),
            Err(LaneError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn fit_near_tracks_a_shifted_lane() {
        let fitter = LaneCurveFitter::new(1280, 720, LaneFitParams::default()).unwrap();
        let first = curve_mask(
            1280,
            720,
            Polynomial2::new(0.0, 0.0, 340.0),
            Polynomial2::new(0.0, 0.0, 940.0),
        );
        let prior = fitter.fit(&first).unwrap();
        let second = curve_mask(
            1280,
            720,
            Polynomial2::new(0.0, 0.0, 370.0),
            Polynomial2::new(0.0, 0.0, 970.0),
        );
        let next = fitter.fit_near(&second, &prior).unwrap();
        assert!((next.left.fit_px.c - 370.0).abs() < 0.5);
        assert!((next.right.fit_px.c - 970.0).abs() < 0.5);
    }

    #[test]
    fn fit_near_falls_back_when_band_is_empty() {
        let fitter = LaneCurveFitter::new(1280, 720, LaneFitParams::default()).unwrap();
        let prior = fitter
            .fit(&curve_mask(
                1280,
                720,
                Polynomial2::new(0.0, 0.0, 200.0),
                Polynomial2::new(0.0, 0.0, 700.0),
            ))
            .unwrap();
        let moved = curve_mask(
            1280,
            720,
            Polynomial2::new(0.0, 0.0, 450.0),
            Polynomial2::new(0.0, 0.0, 1050.0),
        );
        let next = fitter.fit_near(&moved, &prior).unwrap();
        assert!((next.left.fit_px.c - 450.0).abs() < 0.5);
    }

    #[test]
    fn too_many_windows_for_height() {
        let params = LaneFitParams {
            windows: 20,
            ..Default::default()
        };
        assert!(LaneCurveFitter::new(100, 10, params).is_err());
    }
}
