//! Fixed 5×7 bitmap font for the on-frame readout.
//!
//! Letters render in upper case. Characters without a glyph render as `?`.
use crate::image::Frame;

pub const GLYPH_WIDTH: usize = 5;
pub const GLYPH_HEIGHT: usize = 7;
/// Horizontal advance per character in font units (glyph plus one column gap).
pub const ADVANCE: usize = GLYPH_WIDTH + 1;

type Glyph = [u8; GLYPH_HEIGHT];

const UNKNOWN: Glyph = [0x0E, 0x11, 0x01, 0x02, 0x04, 0x00, 0x04];

fn glyph(c: char) -> Glyph {
    match c.to_ascii_uppercase() {
        ' ' => [0; 7],
        'A' => [0x0E, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'B' => [0x1E, 0x11, 0x11, 0x1E, 0x11, 0x11, 0x1E],
        'C' => [0x0E, 0x11, 0x10, 0x10, 0x10, 0x11, 0x0E],
        'D' => [0x1E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x1E],
        'E' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x1F],
        'F' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x10],
        'G' => [0x0E, 0x11, 0x10, 0x17, 0x11, 0x11, 0x0F],
        'H' => [0x11, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'I' => [0x0E, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E],
        'J' => [0x07, 0x02, 0x02, 0x02, 0x02, 0x12, 0x0C],
        'K' => [0x11, 0x12, 0x14, 0x18, 0x14, 0x12, 0x11],
        'L' => [0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x1F],
        'M' => [0x11, 0x1B, 0x15, 0x15, 0x11, 0x11, 0x11],
        'N' => [0x11, 0x11, 0x19, 0x15, 0x13, 0x11, 0x11],
        'O' => [0x0E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'P' => [0x1E, 0x11, 0x11, 0x1E, 0x10, 0x10, 0x10],
        'Q' => [0x0E, 0x11, 0x11, 0x11, 0x15, 0x12, 0x0D],
        'R' => [0x1E, 0x11, 0x11, 0x1E, 0x14, 0x12, 0x11],
        'S' => [0x0F, 0x10, 0x10, 0x0E, 0x01, 0x01, 0x1E],
        'T' => [0x1F, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04],
        'U' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'V' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x0A, 0x04],
        'W' => [0x11, 0x11, 0x11, 0x15, 0x15, 0x15, 0x0A],
        'X' => [0x11, 0x11, 0x0A, 0x04, 0x0A, 0x11, 0x11],
        'Y' => [0x11, 0x11, 0x11, 0x0A, 0x04, 0x04, 0x04],
        'Z' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x10, 0x1F],
        '0' => [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E],
        '1' => [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E],
        '2' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F],
        '3' => [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E],
        '4' => [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02],
        '5' => [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E],
        '6' => [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E],
        '7' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
        '8' => [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E],
        '9' => [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C],
        '.' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x0C, 0x0C],
        ',' => [0x00, 0x00, 0x00, 0x00, 0x0C, 0x04, 0x08],
        ':' => [0x00, 0x0C, 0x0C, 0x00, 0x0C, 0x0C, 0x00],
        '-' => [0x00, 0x00, 0x00, 0x1F, 0x00, 0x00, 0x00],
        '+' => [0x00, 0x04, 0x04, 0x1F, 0x04, 0x04, 0x00],
        '=' => [0x00, 0x00, 0x1F, 0x00, 0x1F, 0x00, 0x00],
        '(' => [0x02, 0x04, 0x08, 0x08, 0x08, 0x04, 0x02],
        ')' => [0x08, 0x04, 0x02, 0x02, 0x02, 0x04, 0x08],
        '/' => [0x00, 0x01, 0x02, 0x04, 0x08, 0x10, 0x00],
        '_' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x1F],
        _ => UNKNOWN,
    }
}

/// Width in pixels of `text` drawn at `scale`.
pub fn text_width(text: &str, scale: usize) -> usize {
    text.chars().count() * ADVANCE * scale
}

/// Draw `text` with its baseline at row `baseline` and its left edge at `x`.
///
/// Each font unit becomes a `scale × scale` block. Pixels falling outside the
/// frame are skipped.
pub fn draw_text(frame: &mut Frame, x: i64, baseline: i64, text: &str, scale: usize, color: [u8; 3]) {
    let (w, h) = (frame.width() as i64, frame.height() as i64);
    let s = scale.max(1) as i64;
    let top = baseline - GLYPH_HEIGHT as i64 * s;
    for (i, c) in text.chars().enumerate() {
        let left = x + (i * ADVANCE) as i64 * s;
        if left >= w {
            break;
        }
        for (gy, bits) in glyph(c).iter().enumerate() {
            for gx in 0..GLYPH_WIDTH {
                if bits & (0x10 >> gx) == 0 {
                    continue;
                }
                let px0 = left + gx as i64 * s;
                let py0 = top + gy as i64 * s;
                for py in py0.max(0)..(py0 + s).min(h) {
                    for px in px0.max(0)..(px0 + s).min(w) {
                        frame.put_pixel(px as usize, py as usize, color);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(frame: &Frame) -> usize {
        frame.pixels().filter(|&p| p != [0, 0, 0]).count()
    }

    #[test]
    fn glyph_pixels_scale_quadratically() {
        let mut one = Frame::new(40, 40);
        draw_text(&mut one, 0, 7, "1", 1, [255, 255, 255]);
        let mut three = Frame::new(40, 40);
        draw_text(&mut three, 0, 21, "1", 3, [255, 255, 255]);
        // "1" has 10 set bits.
        assert_eq!(lit(&one), 10);
        assert_eq!(lit(&three), 90);
    }

    #[test]
    fn lowercase_matches_uppercase() {
        let mut a = Frame::new(60, 10);
        let mut b = Frame::new(60, 10);
        draw_text(&mut a, 1, 8, "left", 1, [9, 9, 9]);
        draw_text(&mut b, 1, 8, "LEFT", 1, [9, 9, 9]);
        assert_eq!(a, b);
    }

    #[test]
    fn text_is_clipped_at_frame_edges() {
        let mut frame = Frame::new(10, 5);
        draw_text(&mut frame, -3, 3, "inf km", 2, [200, 0, 0]);
        assert!(lit(&frame) > 0);
        assert_eq!(text_width("inf", 2), 36);
    }
}
