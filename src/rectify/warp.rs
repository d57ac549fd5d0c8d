//! Projective resampling of interleaved 8-bit rasters.
//!
//! For every destination pixel `(x, y)` the source position is
//! `sample · [x, y, 1]ᵀ`; the value is bilinearly interpolated from the four
//! neighbouring source pixels, with samples outside the source treated as 0.
use crate::image::Raster;
use nalgebra::Matrix3;

/// Resample `src` into a raster of the same size using the
/// destination→source matrix `sample`.
pub fn warp_perspective<R: Raster + Sync>(src: &R, sample: &Matrix3<f64>) -> R {
    let (w, h) = src.dims();
    let row_len = w * R::CHANNELS;
    let mut out = vec![0u8; row_len * h];
    if row_len == 0 {
        return R::from_raw_parts(w, h, out);
    }

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        out.par_chunks_mut(row_len)
            .enumerate()
            .for_each(|(y, row)| warp_row::<R>(src, sample, y, row));
    }
    #[cfg(not(feature = "parallel"))]
    {
        for (y, row) in out.chunks_mut(row_len).enumerate() {
            warp_row::<R>(src, sample, y, row);
        }
    }

    R::from_raw_parts(w, h, out)
}

fn warp_row<R: Raster>(src: &R, m: &Matrix3<f64>, y: usize, row: &mut [u8]) {
    let c = R::CHANNELS;
    let yf = y as f64;
    let mut acc = [0.0f32; 4];
    for x in 0..src.width() {
        let xf = x as f64;
        let wz = m[(2, 0)] * xf + m[(2, 1)] * yf + m[(2, 2)];
        if wz.abs() <= f64::EPSILON {
            continue;
        }
        let sx = (m[(0, 0)] * xf + m[(0, 1)] * yf + m[(0, 2)]) / wz;
        let sy = (m[(1, 0)] * xf + m[(1, 1)] * yf + m[(1, 2)]) / wz;
        if !bilinear(src, sx, sy, &mut acc[..c]) {
            continue;
        }
        for (dst, &v) in row[x * c..(x + 1) * c].iter_mut().zip(&acc[..c]) {
            *dst = R::quantize(v);
        }
    }
}

/// Bilinear sample with a zero border. Returns `false` when the footprint
/// lies entirely outside the source.
pub(crate) fn bilinear<R: Raster>(src: &R, sx: f64, sy: f64, out: &mut [f32]) -> bool {
    let (w, h) = src.dims();
    if !sx.is_finite() || !sy.is_finite() {
        return false;
    }
    let x0 = sx.floor();
    let y0 = sy.floor();
    if x0 < -1.0 || y0 < -1.0 || x0 >= w as f64 || y0 >= h as f64 {
        return false;
    }
    let fx = (sx - x0) as f32;
    let fy = (sy - y0) as f32;
    let (x0, y0) = (x0 as isize, y0 as isize);
    let c = R::CHANNELS;
    let data = src.raw();
    out.iter_mut().for_each(|v| *v = 0.0);

    let taps = [
        (x0, y0, (1.0 - fx) * (1.0 - fy)),
        (x0 + 1, y0, fx * (1.0 - fy)),
        (x0, y0 + 1, (1.0 - fx) * fy),
        (x0 + 1, y0 + 1, fx * fy),
    ];
    for (tx, ty, weight) in taps {
        if weight == 0.0 || tx < 0 || ty < 0 || tx >= w as isize || ty >= h as isize {
            continue;
        }
        let base = (ty as usize * w + tx as usize) * c;
        for (o, &s) in out.iter_mut().zip(&data[base..base + c]) {
            *o += weight * s as f32;
        }
    }
    true
}
