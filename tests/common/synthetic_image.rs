use lane_geometry::homography::PlanarMapping;
use lane_geometry::image::{Frame, Mask};
use lane_geometry::types::Polynomial2;

pub const ROAD: [u8; 3] = [90, 90, 90];
pub const PAINT: [u8; 3] = [230, 200, 20];

/// Plan-view mask with a band of `±half_width` px around each curve.
pub fn parabola_mask(
    width: usize,
    height: usize,
    left: Polynomial2,
    right: Polynomial2,
    half_width: f64,
) -> Mask {
    Mask::from_fn(width, height, |x, y| {
        let (x, y) = (x as f64, y as f64);
        (x - left.eval(y)).abs() <= half_width || (x - right.eval(y)).abs() <= half_width
    })
}

/// Camera-view frame of a uniform grey road with yellow paint wherever the
/// plan-view position lies within `half_width` px of one of `lanes_x`.
///
/// Pixels outside the mapped road area stay plain grey, so the only edges in
/// the frame are the painted lines.
pub fn road_frame(
    width: usize,
    height: usize,
    mapping: &PlanarMapping,
    lanes_x: &[f64],
    half_width: f64,
) -> Frame {
    let mut frame = Frame::filled(width, height, ROAD);
    let top = mapping.source_points().iter().map(|p| p[1]).fold(f64::INFINITY, f64::min);
    for y in (top.ceil() as usize)..height {
        for x in 0..width {
            let Some([px, py]) = mapping.map_forward([x as f64, y as f64]) else {
                continue;
            };
            if !(0.0..=height as f64).contains(&py) {
                continue;
            }
            if lanes_x.iter().any(|lx| (px - lx).abs() <= half_width) {
                frame.put_pixel(x, y, PAINT);
            }
        }
    }
    frame
}

/// Deterministic pseudo-random RGB frame (64-bit LCG).
pub fn noise_frame(width: usize, height: usize, seed: u64) -> Frame {
    let mut state = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
    let mut data = Vec::with_capacity(width * height * 3);
    for _ in 0..width * height * 3 {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        data.push((state >> 56) as u8);
    }
    Frame::from_rgb(width, height, data).expect("buffer size")
}
