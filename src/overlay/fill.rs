use crate::image::Frame;

/// Fill a closed polygon on `canvas` with `color` using the even-odd rule.
///
/// Each row `y` is sampled at integer height; an edge counts for that row
/// when `y` lies in `[y_min, y_max)`. Spans include both integer endpoints
/// that fall inside the crossing interval. Pixels outside the canvas are
/// clipped.
pub fn fill_polygon(canvas: &mut Frame, pts: &[[f64; 2]], color: [u8; 3]) {
    if pts.len() < 3 || pts.iter().flatten().any(|v| !v.is_finite()) {
        return;
    }
    let (w, h) = (canvas.width(), canvas.height());
    if w == 0 || h == 0 {
        return;
    }
    let y_min = pts.iter().map(|p| p[1]).fold(f64::INFINITY, f64::min);
    let y_max = pts.iter().map(|p| p[1]).fold(f64::NEG_INFINITY, f64::max);
    let row_lo = y_min.ceil().max(0.0) as usize;
    let row_hi = (y_max.floor().min((h - 1) as f64)).max(-1.0);
    if row_hi < 0.0 {
        return;
    }
    let row_hi = row_hi as usize;

    let mut xs: Vec<f64> = Vec::new();
    for y in row_lo..=row_hi {
        let yf = y as f64;
        xs.clear();
        for i in 0..pts.len() {
            let p = pts[i];
            let q = pts[(i + 1) % pts.len()];
            let (lo, hi) = if p[1] <= q[1] { (p, q) } else { (q, p) };
            if yf < lo[1] || yf >= hi[1] {
                continue;
            }
            let t = (yf - lo[1]) / (hi[1] - lo[1]);
            xs.push(lo[0] + t * (hi[0] - lo[0]));
        }
        xs.sort_by(f64::total_cmp);
        for span in xs.chunks_exact(2) {
            let x0 = span[0].ceil().max(0.0);
            let x1 = span[1].floor().min((w - 1) as f64);
            if x1 < x0 {
                continue;
            }
            for x in x0 as usize..=x1 as usize {
                canvas.put_pixel(x, y, color);
            }
        }
    }
}

/// Closed outline between two boundary curves: the left curve top to
/// bottom, then the right curve bottom to top.
pub fn lane_polygon(ys: &[f64], left_x: &[f64], right_x: &[f64]) -> Vec<[f64; 2]> {
    let left = left_x.iter().zip(ys).map(|(&x, &y)| [x, y]);
    let right = right_x.iter().zip(ys).rev().map(|(&x, &y)| [x, y]);
    left.chain(right).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_between_vertical_lines_fills_enclosed_columns() {
        let mut canvas = Frame::new(30, 12);
        let ys: Vec<f64> = (0..12).map(|y| y as f64).collect();
        let poly = lane_polygon(&ys, &[10.0; 12], &[20.0; 12]);
        fill_polygon(&mut canvas, &poly, [0, 255, 0]);
        for y in 0..11 {
            for x in 0..30 {
                let inside = (10..=20).contains(&x);
                assert_eq!(canvas.pixel(x, y) == [0, 255, 0], inside, "({x}, {y})");
            }
        }
    }

    #[test]
    fn polygon_outside_canvas_is_clipped() {
        let mut canvas = Frame::new(8, 8);
        let poly = [[-5.0, -5.0], [20.0, -5.0], [20.0, 20.0], [-5.0, 20.0]];
        fill_polygon(&mut canvas, &poly, [1, 2, 3]);
        assert!(canvas.pixels().all(|p| p == [1, 2, 3]));
    }

    #[test]
    fn degenerate_polygons_draw_nothing() {
        let mut canvas = Frame::new(8, 8);
        fill_polygon(&mut canvas, &[[1.0, 1.0], [5.0, 5.0]], [9, 9, 9]);
        fill_polygon(&mut canvas, &[[1.0, 1.0], [f64::NAN, 5.0], [3.0, 2.0]], [9, 9, 9]);
        assert!(canvas.pixels().all(|p| p == [0, 0, 0]));
    }
}
