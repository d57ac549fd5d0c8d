//! Separable Sobel derivatives of arbitrary odd aperture.
//!
//! - Builds the 1D smoothing (binomial) and derivative kernels for an
//!   aperture `k ∈ {1, 3, 5, …, 31}`; `k = 1` uses a bare `[-1, 0, 1]`
//!   derivative without smoothing.
//! - Convolves rows then columns with reflect-101 border handling.
//! - Outputs per-pixel `gx`, `gy` and `mag = sqrt(gx² + gy²)`.
//!
//! Complexity: O(W·H·k) per derivative; memory: four float buffers.
use crate::image::{ImageF32, ImageView, ImageViewMut};

/// Largest aperture accepted by [`sobel_kernels`].
pub const MAX_KERNEL_SIZE: usize = 31;

/// Per‑pixel gradient buffers.
#[derive(Clone, Debug)]
pub struct Grad {
    /// Horizontal derivative
    pub gx: ImageF32,
    /// Vertical derivative
    pub gy: ImageF32,
    /// Euclidean magnitude per pixel: `sqrt(gx^2 + gy^2)`
    pub mag: ImageF32,
}

impl Grad {
    /// Gradient direction folded into the first quadrant: `atan2(|gy|, |gx|)`.
    #[inline]
    pub fn abs_direction(&self, x: usize, y: usize) -> f32 {
        self.gy.get(x, y).abs().atan2(self.gx.get(x, y).abs())
    }
}

/// 1D `(smoothing, derivative)` kernels of the Sobel operator of size `ksize`.
///
/// Returns `None` for even sizes, zero, or sizes above [`MAX_KERNEL_SIZE`].
pub fn sobel_kernels(ksize: usize) -> Option<(Vec<f32>, Vec<f32>)> {
    if ksize == 0 || ksize % 2 == 0 || ksize > MAX_KERNEL_SIZE {
        return None;
    }
    if ksize == 1 {
        return Some((vec![1.0], vec![-1.0, 0.0, 1.0]));
    }
    let smooth = binomial_row(ksize - 1);
    // Binomial row of order k-2 convolved with [-1, 1].
    let base = binomial_row(ksize - 2);
    let mut deriv = vec![0.0f32; ksize];
    for (i, &b) in base.iter().enumerate() {
        deriv[i] -= b;
        deriv[i + 1] += b;
    }
    Some((smooth, deriv))
}

fn binomial_row(order: usize) -> Vec<f32> {
    let mut row = vec![1.0f32];
    for _ in 0..order {
        let mut next = vec![1.0f32; row.len() + 1];
        for i in 1..row.len() {
            next[i] = row[i - 1] + row[i];
        }
        row = next;
    }
    row
}

/// Reflect-101 index: `… 2 1 | 0 1 2 … n-1 | n-2 …`.
#[inline]
fn reflect101(i: isize, n: usize) -> usize {
    if n == 1 {
        return 0;
    }
    let period = 2 * (n as isize - 1);
    let mut j = i.rem_euclid(period);
    if j >= n as isize {
        j = period - j;
    }
    j as usize
}

/// Correlate every row with `kx`, then every column with `ky`.
fn separable(l: &ImageF32, kx: &[f32], ky: &[f32]) -> ImageF32 {
    let (w, h) = (l.w, l.h);
    let mut tmp = ImageF32::new(w, h);
    let rx = (kx.len() / 2) as isize;
    for y in 0..h {
        let src = l.row(y);
        let dst = tmp.row_mut(y);
        for (x, out) in dst.iter_mut().enumerate() {
            let mut acc = 0.0f32;
            for (t, &k) in kx.iter().enumerate() {
                acc += k * src[reflect101(x as isize + t as isize - rx, w)];
            }
            *out = acc;
        }
    }

    let mut out = ImageF32::new(w, h);
    let ry = (ky.len() / 2) as isize;
    for y in 0..h {
        let taps: Vec<(usize, f32)> = ky
            .iter()
            .enumerate()
            .map(|(t, &k)| (reflect101(y as isize + t as isize - ry, h), k))
            .collect();
        let dst = out.row_mut(y);
        for &(sy, k) in &taps {
            for (o, &s) in dst.iter_mut().zip(tmp.row(sy)) {
                *o += k * s;
            }
        }
    }
    out
}

/// Sobel gradients of a single-channel float image with aperture `ksize`.
///
/// Returns `None` when `ksize` is not a valid aperture.
pub fn sobel_gradients(l: &ImageF32, ksize: usize) -> Option<Grad> {
    let (smooth, deriv) = sobel_kernels(ksize)?;
    let (w, h) = (l.w, l.h);
    if w == 0 || h == 0 {
        return Some(Grad {
            gx: ImageF32::new(w, h),
            gy: ImageF32::new(w, h),
            mag: ImageF32::new(w, h),
        });
    }
    let gx = separable(l, &deriv, &smooth);
    let gy = separable(l, &smooth, &deriv);
    let mut mag = ImageF32::new(w, h);
    for ((m, &sx), &sy) in mag.data.iter_mut().zip(&gx.data).zip(&gy.data) {
        *m = (sx * sx + sy * sy).sqrt();
    }
    Some(Grad { gx, gy, mag })
}
