//! Fixed planar mapping between camera view and plan (bird's-eye) view.
//!
//! The forward matrix is solved exactly from four point correspondences
//! (8×8 linear system with `h33 = 1`); the inverse is its matrix inverse.
use crate::error::{LaneError, Result};
use nalgebra::{Matrix3, SMatrix, SVector, Vector3};
use serde::Serialize;

const EPS: f64 = 1e-12;

/// Immutable pair `(M, M⁻¹)` derived from four source/destination points.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanarMapping {
    src: [[f64; 2]; 4],
    dst: [[f64; 2]; 4],
    forward: Matrix3<f64>,
    inverse: Matrix3<f64>,
}

impl PlanarMapping {
    /// Solve the mapping sending `src[i]` to `dst[i]`.
    ///
    /// Fails when either slice does not hold exactly four points or when the
    /// points are degenerate (three collinear corners, repeated points).
    pub fn from_points(src: &[[f64; 2]], dst: &[[f64; 2]]) -> Result<Self> {
        if src.len() != 4 || dst.len() != 4 {
            return Err(LaneError::config(format!(
                "planar mapping needs exactly 4 source and 4 destination points, got {} and {}",
                src.len(),
                dst.len()
            )));
        }
        if src.iter().chain(dst).flatten().any(|v| !v.is_finite()) {
            return Err(LaneError::config("planar mapping points must be finite"));
        }
        let src: [[f64; 2]; 4] = [src[0], src[1], src[2], src[3]];
        let dst: [[f64; 2]; 4] = [dst[0], dst[1], dst[2], dst[3]];
        let forward = solve_four_point(&src, &dst)
            .ok_or_else(|| LaneError::config("degenerate planar mapping points"))?;
        let inverse = forward
            .try_inverse()
            .ok_or_else(|| LaneError::config("planar mapping is not invertible"))?;
        Ok(Self {
            src,
            dst,
            forward,
            inverse: normalize(inverse),
        })
    }

    /// Camera view → plan view.
    pub fn forward(&self) -> &Matrix3<f64> {
        &self.forward
    }

    /// Plan view → camera view.
    pub fn inverse(&self) -> &Matrix3<f64> {
        &self.inverse
    }

    pub fn source_points(&self) -> &[[f64; 2]; 4] {
        &self.src
    }

    pub fn destination_points(&self) -> &[[f64; 2]; 4] {
        &self.dst
    }

    pub fn map_forward(&self, p: [f64; 2]) -> Option<[f64; 2]> {
        apply_homography(&self.forward, p)
    }

    pub fn map_inverse(&self, p: [f64; 2]) -> Option<[f64; 2]> {
        apply_homography(&self.inverse, p)
    }

    /// Distance between `p` and `inverse(forward(p))`.
    pub fn round_trip_error(&self, p: [f64; 2]) -> Option<f64> {
        let back = self.map_inverse(self.map_forward(p)?)?;
        Some(((back[0] - p[0]).powi(2) + (back[1] - p[1]).powi(2)).sqrt())
    }
}

fn normalize(m: Matrix3<f64>) -> Matrix3<f64> {
    let s = m[(2, 2)];
    if s.abs() > EPS {
        m / s
    } else {
        m
    }
}

fn solve_four_point(src: &[[f64; 2]; 4], dst: &[[f64; 2]; 4]) -> Option<Matrix3<f64>> {
    let mut a = SMatrix::<f64, 8, 8>::zeros();
    let mut b = SVector::<f64, 8>::zeros();
    for i in 0..4 {
        let [x, y] = src[i];
        let [u, v] = dst[i];
        // u = (h0 x + h1 y + h2) / (h6 x + h7 y + 1)
        a[(i, 0)] = x;
        a[(i, 1)] = y;
        a[(i, 2)] = 1.0;
        a[(i, 6)] = -x * u;
        a[(i, 7)] = -y * u;
        b[i] = u;
        // v = (h3 x + h4 y + h5) / (h6 x + h7 y + 1)
        a[(i + 4, 3)] = x;
        a[(i + 4, 4)] = y;
        a[(i + 4, 5)] = 1.0;
        a[(i + 4, 6)] = -x * v;
        a[(i + 4, 7)] = -y * v;
        b[i + 4] = v;
    }
    let lu = a.full_piv_lu();
    if !lu.is_invertible() {
        return None;
    }
    let h = lu.solve(&b)?;
    if h.iter().any(|v| !v.is_finite()) {
        return None;
    }
    Some(Matrix3::new(
        h[0], h[1], h[2], h[3], h[4], h[5], h[6], h[7], 1.0,
    ))
}

/// Apply `h` to a single point; `None` if it maps to infinity.
pub fn apply_homography(h: &Matrix3<f64>, p: [f64; 2]) -> Option<[f64; 2]> {
    let v = h * Vector3::new(p[0], p[1], 1.0);
    let w = v[2];
    if !w.is_finite() || w.abs() <= EPS || !v[0].is_finite() || !v[1].is_finite() {
        return None;
    }
    Some([v[0] / w, v[1] / w])
}

/// Apply `h` to every point; `None` if any point maps to infinity.
pub fn apply_homography_points(h: &Matrix3<f64>, pts: &[[f64; 2]]) -> Option<Vec<[f64; 2]>> {
    pts.iter().map(|&p| apply_homography(h, p)).collect()
}
