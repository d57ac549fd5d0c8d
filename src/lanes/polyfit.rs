//! Least-squares quadratic `x = a·y² + b·y + c`.
//!
//! `y` is centred and scaled to `t = (y - m) / s` before forming the normal
//! equations so the 3×3 system stays well conditioned for plan-view rows in
//! the hundreds; the solution is then expanded back to `y`.
use crate::types::Polynomial2;
use nalgebra::{Matrix3, Vector3};

const MIN_SPREAD: f64 = 1e-12;

/// True once at least three distinct `y` values have been seen.
fn has_three_rows(points: &[(f64, f64)]) -> bool {
    let mut seen: [f64; 2] = [f64::NAN; 2];
    let mut n = 0;
    for &(_, y) in points {
        if seen[..n].contains(&y) {
            continue;
        }
        if n == 2 {
            return true;
        }
        seen[n] = y;
        n += 1;
    }
    false
}

/// Fit `(x, y)` samples; `None` when fewer than three distinct rows exist or
/// the system is singular.
pub fn fit_quadratic(points: &[(f64, f64)]) -> Option<Polynomial2> {
    if !has_three_rows(points) {
        return None;
    }
    let n = points.len() as f64;
    let m = points.iter().map(|p| p.1).sum::<f64>() / n;
    let s = points
        .iter()
        .map(|p| (p.1 - m).abs())
        .fold(0.0f64, f64::max);
    if s < MIN_SPREAD {
        return None;
    }

    // Power sums Σtᵏ (k = 0..4) and Σx·tᵏ (k = 0..2).
    let mut st = [0.0f64; 5];
    let mut sx = [0.0f64; 3];
    for &(x, y) in points {
        let t = (y - m) / s;
        let mut tk = 1.0;
        for k in 0..5 {
            st[k] += tk;
            if k < 3 {
                sx[k] += x * tk;
            }
            tk *= t;
        }
    }
    let ata = Matrix3::new(
        st[4], st[3], st[2], //
        st[3], st[2], st[1], //
        st[2], st[1], st[0],
    );
    let atb = Vector3::new(sx[2], sx[1], sx[0]);
    let sol = ata.lu().solve(&atb)?;
    let (a, b, c) = (sol[0], sol[1], sol[2]);
    if !(a.is_finite() && b.is_finite() && c.is_finite()) {
        return None;
    }

    let s2 = s * s;
    Some(Polynomial2::new(
        a / s2,
        b / s - 2.0 * a * m / s2,
        a * m * m / s2 - b * m / s + c,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol * (1.0 + b.abs())
    }

    #[test]
    fn recovers_exact_parabola() {
        let truth = Polynomial2::new(2.5e-4, -0.3, 640.0);
        let pts: Vec<(f64, f64)> = (0..720)
            .step_by(3)
            .map(|y| (truth.eval(y as f64), y as f64))
            .collect();
        let fit = fit_quadratic(&pts).unwrap();
        assert!(close(fit.a, truth.a, 1e-8));
        assert!(close(fit.b, truth.b, 1e-8));
        assert!(close(fit.c, truth.c, 1e-8));
    }

    #[test]
    fn vertical_line_has_zero_curvature_terms() {
        let pts: Vec<(f64, f64)> = (400..720).map(|y| (300.0, y as f64)).collect();
        let fit = fit_quadratic(&pts).unwrap();
        assert!(fit.a.abs() < 1e-12);
        assert!(fit.b.abs() < 1e-9);
        assert!((fit.c - 300.0).abs() < 1e-6);
    }

    #[test]
    fn two_rows_are_not_enough() {
        let pts: Vec<(f64, f64)> = (0..50)
            .map(|i| (i as f64, if i % 2 == 0 { 10.0 } else { 11.0 }))
            .collect();
        assert!(fit_quadratic(&pts).is_none());
        assert!(fit_quadratic(&[]).is_none());
    }
}
