//! Column histogram used to seed the window search.
use crate::image::{ImageView, Mask};

/// Count of "on" pixels per column over the bottom half of `mask`.
pub fn bottom_half_histogram(mask: &Mask) -> Vec<u32> {
    let mut hist = vec![0u32; mask.width()];
    for row in mask.rows().skip(mask.height() / 2) {
        for (bin, &v) in hist.iter_mut().zip(row) {
            *bin += u32::from(v != 0);
        }
    }
    hist
}

/// First index of the maximum, or 0 for an empty slice.
fn argmax(values: &[u32]) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate() {
        if v > values[best] {
            best = i;
        }
    }
    best
}

/// `(left, right)` starting columns: the histogram peak in each half.
pub fn base_positions(hist: &[u32]) -> (usize, usize) {
    let mid = hist.len() / 2;
    let left = argmax(&hist[..mid]);
    let right = mid + argmax(&hist[mid..]);
    (left, right)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_bottom_half_is_counted() {
        let mask = Mask::from_fn(10, 10, |x, y| (x == 2 && y < 5) || (x == 7 && y >= 5));
        let hist = bottom_half_histogram(&mask);
        assert_eq!(hist[2], 0);
        assert_eq!(hist[7], 5);
    }

    #[test]
    fn ties_pick_the_first_column() {
        let hist = [0, 3, 3, 1, 0, 0, 2, 2];
        assert_eq!(base_positions(&hist), (1, 6));
    }
}
