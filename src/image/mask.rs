//! Binary lane-marking mask with values restricted to `{0, 1}`.
use super::traits::{ImageView, Raster};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mask {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl Mask {
    /// All-zero mask.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0; width * height],
        }
    }

    /// Build a mask from a predicate evaluated at every pixel.
    pub fn from_fn(width: usize, height: usize, mut on: impl FnMut(usize, usize) -> bool) -> Self {
        let mut mask = Self::new(width, height);
        for y in 0..height {
            for x in 0..width {
                if on(x, y) {
                    mask.data[y * width + x] = 1;
                }
            }
        }
        mask
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.width + x]
    }

    #[inline]
    pub fn is_on(&self, x: usize, y: usize) -> bool {
        self.get(x, y) != 0
    }

    /// Set a pixel; any non-zero `on` is stored as 1.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, on: bool) {
        self.data[y * self.width + x] = on as u8;
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn count_on(&self) -> usize {
        self.data.iter().filter(|&&v| v != 0).count()
    }

    /// True when every sample is 0 or 1.
    pub fn is_binary(&self) -> bool {
        self.data.iter().all(|&v| v <= 1)
    }

    /// Element-wise AND of two equally sized masks.
    pub fn and(&self, other: &Mask) -> Mask {
        self.zip_with(other, |a, b| a & b)
    }

    /// Element-wise OR of two equally sized masks.
    pub fn or(&self, other: &Mask) -> Mask {
        self.zip_with(other, |a, b| a | b)
    }

    fn zip_with(&self, other: &Mask, op: impl Fn(u8, u8) -> u8) -> Mask {
        debug_assert_eq!((self.width, self.height), (other.width, other.height));
        let data = self
            .data
            .iter()
            .zip(&other.data)
            .map(|(&a, &b)| op(a, b))
            .collect();
        Mask {
            width: self.width,
            height: self.height,
            data,
        }
    }
}

impl ImageView for Mask {
    type Pixel = u8;

    #[inline]
    fn width(&self) -> usize {
        self.width
    }
    #[inline]
    fn height(&self) -> usize {
        self.height
    }
    #[inline]
    fn stride(&self) -> usize {
        self.width
    }
    #[inline]
    fn row(&self, y: usize) -> &[u8] {
        let start = y * self.width;
        &self.data[start..start + self.width]
    }
    #[inline]
    fn as_slice(&self) -> Option<&[u8]> {
        Some(&self.data)
    }
}

impl crate::image::traits::ImageViewMut for Mask {
    #[inline]
    fn row_mut(&mut self, y: usize) -> &mut [u8] {
        let start = y * self.width;
        &mut self.data[start..start + self.width]
    }
}

impl Raster for Mask {
    const CHANNELS: usize = 1;

    fn width(&self) -> usize {
        self.width
    }
    fn height(&self) -> usize {
        self.height
    }
    fn raw(&self) -> &[u8] {
        &self.data
    }
    fn from_raw_parts(width: usize, height: usize, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), width * height);
        Self {
            width,
            height,
            data,
        }
    }

    /// Interpolated coverage rounds back onto `{0, 1}`.
    #[inline]
    fn quantize(value: f32) -> u8 {
        (value >= 0.5) as u8
    }
}
