use crate::types::Polynomial2;

/// Below this `|2a|` a fit is treated as straight.
pub const MIN_CURVATURE_TERM: f64 = 1e-12;

/// Radius of curvature `(1 + x'(y)²)^{3/2} / |x''(y)|` at `y`.
///
/// Returns `f64::INFINITY` for a straight fit.
pub fn curvature_radius(fit: &Polynomial2, y: f64) -> f64 {
    let second = (2.0 * fit.a).abs();
    if second < MIN_CURVATURE_TERM {
        return f64::INFINITY;
    }
    let slope = fit.slope(y);
    (1.0 + slope * slope).powf(1.5) / second
}

/// Signed lateral offset of the image center from the lane center, meters.
///
/// Both fits are evaluated at `y_eval`. Negative when the lane center lies to
/// the right of the image center.
pub fn vehicle_offset(
    left: &Polynomial2,
    right: &Polynomial2,
    width: usize,
    y_eval: f64,
    xm_per_px: f64,
) -> f64 {
    let lane_center = 0.5 * (left.eval(y_eval) + right.eval(y_eval));
    (width as f64 / 2.0 - lane_center) * xm_per_px
}

/// Rescale a pixel fit `x = a·y² + b·y + c` to meters on both axes.
pub fn to_meters(fit: &Polynomial2, ym_per_px: f64, xm_per_px: f64) -> Polynomial2 {
    Polynomial2::new(
        fit.a * xm_per_px / (ym_per_px * ym_per_px),
        fit.b * xm_per_px / ym_per_px,
        fit.c * xm_per_px,
    )
}
