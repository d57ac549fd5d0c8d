use crate::error::{ensure_dims, Result};
use crate::image::{Frame, Raster};

/// `out = saturate(round(base + alpha · overlay))`, channel by channel.
pub fn add_weighted(base: &Frame, overlay: &Frame, alpha: f32) -> Result<Frame> {
    ensure_dims(
        (base.width(), base.height()),
        (overlay.width(), overlay.height()),
    )?;
    let data = base
        .as_bytes()
        .iter()
        .zip(overlay.as_bytes())
        .map(|(&b, &o)| (b as f32 + alpha * o as f32).round().clamp(0.0, 255.0) as u8)
        .collect();
    Ok(Frame::from_raw_parts(base.width(), base.height(), data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blend_adds_scaled_overlay_and_saturates() {
        let base = Frame::filled(2, 2, [100, 250, 0]);
        let overlay = Frame::filled(2, 2, [0, 255, 10]);
        let out = add_weighted(&base, &overlay, 0.3).unwrap();
        assert_eq!(out.pixel(1, 1), [100, 255, 3]);
    }

    #[test]
    fn zero_overlay_is_identity() {
        let base = Frame::filled(3, 2, [12, 34, 56]);
        let out = add_weighted(&base, &Frame::new(3, 2), 0.3).unwrap();
        assert_eq!(out, base);
    }

    #[test]
    fn size_mismatch_is_an_error() {
        assert!(add_weighted(&Frame::new(2, 2), &Frame::new(3, 2), 0.3).is_err());
    }
}
