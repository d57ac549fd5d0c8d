//! Camera-view rendering of a lane fit.
//!
//! The lane area between both fitted curves is painted on a blank plan-view
//! canvas, warped back into the camera view and added onto the undistorted
//! frame with weight `alpha`. The curvature and offset readout is drawn on
//! top.

mod blend;
mod fill;
pub mod font;
mod params;
mod readout;

pub use blend::add_weighted;
pub use fill::{fill_polygon, lane_polygon};
pub use params::OverlayParams;
pub use readout::readout_lines;

use crate::error::{ensure_dims, LaneError, Result};
use crate::image::{Frame, Raster};
use crate::rectify::PlanarRectifier;
use crate::types::LaneFitResult;

#[derive(Clone, Debug)]
pub struct OverlayComposer {
    params: OverlayParams,
}

impl OverlayComposer {
    pub fn new(params: OverlayParams) -> Result<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &OverlayParams {
        &self.params
    }

    /// Plan-view canvas holding only the filled lane area.
    pub fn lane_canvas(&self, fit: &LaneFitResult, width: usize, height: usize) -> Frame {
        let mut canvas = Frame::new(width, height);
        let pts = fit.fit_points();
        let poly = lane_polygon(&pts.ys, &pts.left_x, &pts.right_x);
        fill_polygon(&mut canvas, &poly, self.params.fill_color);
        canvas
    }

    /// Render `fit` onto `camera_view`.
    ///
    /// `plan_view` only supplies the canvas size; it must match both the
    /// camera frame and the size the fit was computed for.
    pub fn compose<R: Raster>(
        &self,
        rectifier: &PlanarRectifier,
        fit: &LaneFitResult,
        camera_view: &Frame,
        plan_view: &R,
    ) -> Result<Frame> {
        let dims = (camera_view.width(), camera_view.height());
        ensure_dims(dims, plan_view.dims())?;
        ensure_dims(dims, (fit.width, fit.height))?;

        let canvas = self.lane_canvas(fit, dims.0, dims.1);
        let overlay = rectifier.unwarp(&canvas);
        let mut out = add_weighted(camera_view, &overlay, self.params.alpha)?;
        if self.params.draw_readout {
            self.draw_lines(&mut out, &readout_lines(fit), self.params.text_color);
        }
        Ok(out)
    }

    /// Copy of `frame` with `err` written where the readout would go.
    pub fn annotate_failure(&self, frame: &Frame, err: &LaneError) -> Frame {
        let mut out = frame.clone();
        if self.params.draw_readout {
            self.draw_lines(&mut out, &[err.to_string()], self.params.failure_color);
        }
        out
    }

    fn draw_lines(&self, frame: &mut Frame, lines: &[String], color: [u8; 3]) {
        let p = &self.params;
        for (i, line) in lines.iter().enumerate() {
            let baseline = p.first_line_y + i as i64 * p.line_spacing;
            font::draw_text(frame, p.text_origin_x, baseline, line, p.text_scale, color);
        }
    }
}

impl Default for OverlayComposer {
    fn default() -> Self {
        Self {
            params: OverlayParams::default(),
        }
    }
}
