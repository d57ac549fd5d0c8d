use serde::Serialize;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LaneSide {
    Left,
    Right,
}

impl fmt::Display for LaneSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LaneSide::Left => "left",
            LaneSide::Right => "right",
        })
    }
}

/// Quadratic `x = a·y² + b·y + c`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Polynomial2 {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl Polynomial2 {
    pub fn new(a: f64, b: f64, c: f64) -> Self {
        Self { a, b, c }
    }

    #[inline]
    pub fn eval(&self, y: f64) -> f64 {
        (self.a * y + self.b) * y + self.c
    }

    /// First derivative `dx/dy` at `y`.
    #[inline]
    pub fn slope(&self, y: f64) -> f64 {
        2.0 * self.a * y + self.b
    }

    pub fn coefficients(&self) -> [f64; 3] {
        [self.a, self.b, self.c]
    }
}

/// One fitted lane boundary in plan-view coordinates.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LaneBoundary {
    pub side: LaneSide,
    /// Plan-view `(x, y)` pixels attributed to this side, bottom window first.
    #[serde(skip)]
    pub pixels: Vec<[u32; 2]>,
    pub pixel_count: usize,
    /// Fit in pixel units.
    pub fit_px: Polynomial2,
    /// Fit after scaling both axes to meters.
    pub fit_m: Polynomial2,
}

/// Sampled boundary curves for drawing: one `x` per row for each side.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CurvePoints {
    pub ys: Vec<f64>,
    pub left_x: Vec<f64>,
    pub right_x: Vec<f64>,
}

/// Lane geometry estimated for a single frame.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LaneFitResult {
    pub width: usize,
    pub height: usize,
    pub left: LaneBoundary,
    pub right: LaneBoundary,
    /// Radius of curvature at the bottom row, meters. `inf` for a straight fit.
    pub curvature_left: f64,
    pub curvature_right: f64,
    /// Same radii in plan-view pixels.
    pub curvature_left_px: f64,
    pub curvature_right_px: f64,
    /// Signed lateral offset in meters; negative = vehicle left of lane center.
    pub vehicle_offset: f64,
}

impl LaneFitResult {
    /// `(left, right)` radii in meters.
    pub fn curvature(&self) -> (f64, f64) {
        (self.curvature_left, self.curvature_right)
    }

    /// `(left, right)` radii in plan-view pixels.
    pub fn curvature_px(&self) -> (f64, f64) {
        (self.curvature_left_px, self.curvature_right_px)
    }

    pub fn average_curvature(&self) -> f64 {
        0.5 * (self.curvature_left + self.curvature_right)
    }

    pub fn vehicle_offset(&self) -> f64 {
        self.vehicle_offset
    }

    pub fn boundary(&self, side: LaneSide) -> &LaneBoundary {
        match side {
            LaneSide::Left => &self.left,
            LaneSide::Right => &self.right,
        }
    }

    /// Evaluate both pixel fits on every row `0..height`.
    pub fn fit_points(&self) -> CurvePoints {
        let ys: Vec<f64> = (0..self.height).map(|y| y as f64).collect();
        let left_x = ys.iter().map(|&y| self.left.fit_px.eval(y)).collect();
        let right_x = ys.iter().map(|&y| self.right.fit_px.eval(y)).collect();
        CurvePoints { ys, left_x, right_x }
    }
}
