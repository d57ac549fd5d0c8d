//! Pixel collection: sliding windows from histogram peaks, or a band around
//! a previous fit.
use super::histogram::{base_positions, bottom_half_histogram};
use super::params::LaneFitParams;
use crate::image::{ImageView, Mask};
use crate::types::{LaneSide, Polynomial2};
use serde::Serialize;

/// One search window, half-open on both axes: `[x_low, x_high) × [y_low, y_high)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowTrace {
    pub side: LaneSide,
    pub x_low: usize,
    pub x_high: usize,
    pub y_low: usize,
    pub y_high: usize,
    pub count: usize,
}

/// Pixels attributed to each side plus the windows that collected them.
#[derive(Clone, Debug, Default)]
pub struct PixelSearch {
    pub left: Vec<[u32; 2]>,
    pub right: Vec<[u32; 2]>,
    pub windows: Vec<WindowTrace>,
}

impl PixelSearch {
    pub fn pixels(&self, side: LaneSide) -> &[[u32; 2]] {
        match side {
            LaneSide::Left => &self.left,
            LaneSide::Right => &self.right,
        }
    }
}

struct Cursor {
    side: LaneSide,
    center: usize,
}

impl Cursor {
    /// Scan one band, append its pixels and re-centre if enough were found.
    fn scan(
        &mut self,
        mask: &Mask,
        rows: (usize, usize),
        params: &LaneFitParams,
        out: &mut Vec<[u32; 2]>,
    ) -> WindowTrace {
        let x_low = self.center.saturating_sub(params.margin);
        let x_high = self.center.saturating_add(params.margin).min(mask.width());
        let start = out.len();
        for y in rows.0..rows.1 {
            let row = mask.row(y);
            for x in x_low..x_high {
                if row[x] != 0 {
                    out.push([x as u32, y as u32]);
                }
            }
        }
        let found = &out[start..];
        if found.len() >= params.min_pixels && !found.is_empty() {
            let sum: u64 = found.iter().map(|p| p[0] as u64).sum();
            self.center = (sum / found.len() as u64) as usize;
        }
        WindowTrace {
            side: self.side,
            x_low,
            x_high,
            y_low: rows.0,
            y_high: rows.1,
            count: found.len(),
        }
    }
}

/// Histogram-seeded sliding-window search.
///
/// The image is split into `params.windows` bands of `height / windows` rows
/// from the bottom up; rows above the topmost band are never visited. Left and
/// right windows are independent and may overlap.
pub fn sliding_windows(mask: &Mask, params: &LaneFitParams) -> PixelSearch {
    let hist = bottom_half_histogram(mask);
    let (left_base, right_base) = base_positions(&hist);
    let mut left = Cursor {
        side: LaneSide::Left,
        center: left_base,
    };
    let mut right = Cursor {
        side: LaneSide::Right,
        center: right_base,
    };

    let h = mask.height();
    let window_height = h / params.windows;
    let mut search = PixelSearch::default();
    for i in 0..params.windows {
        let rows = (h - (i + 1) * window_height, h - i * window_height);
        let trace = left.scan(mask, rows, params, &mut search.left);
        search.windows.push(trace);
        let trace = right.scan(mask, rows, params, &mut search.right);
        search.windows.push(trace);
    }
    search
}

/// Collect pixels within `params.prior_margin` of each previous pixel fit.
///
/// `x` must fall in `[fit(y) - margin, fit(y) + margin)`.
pub fn around_prior(
    mask: &Mask,
    left_fit: &Polynomial2,
    right_fit: &Polynomial2,
    params: &LaneFitParams,
) -> PixelSearch {
    let margin = params.prior_margin as f64;
    let mut search = PixelSearch::default();
    for (y, row) in mask.rows().enumerate() {
        let yf = y as f64;
        let (lc, rc) = (left_fit.eval(yf), right_fit.eval(yf));
        for (x, &v) in row.iter().enumerate() {
            if v == 0 {
                continue;
            }
            let xf = x as f64;
            if xf >= lc - margin && xf < lc + margin {
                search.left.push([x as u32, y as u32]);
            }
            if xf >= rc - margin && xf < rc + margin {
                search.right.push([x as u32, y as u32]);
            }
        }
    }
    search
}
