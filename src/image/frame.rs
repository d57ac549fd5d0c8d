//! Owned RGB frame, the unit flowing through the pipeline.
use super::traits::Raster;

/// Tightly packed 8-bit RGB image (`R, G, B` interleaved, row-major).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl Frame {
    pub const CHANNELS: usize = 3;

    /// All-black frame of the given size.
    pub fn new(width: usize, height: usize) -> Self {
        Self::filled(width, height, [0, 0, 0])
    }

    /// Frame with every pixel set to `rgb`.
    pub fn filled(width: usize, height: usize, rgb: [u8; 3]) -> Self {
        let mut data = Vec::with_capacity(width * height * Self::CHANNELS);
        for _ in 0..width * height {
            data.extend_from_slice(&rgb);
        }
        Self {
            width,
            height,
            data,
        }
    }

    /// Wrap packed RGB bytes. Returns `None` when the length does not match.
    pub fn from_rgb(width: usize, height: usize, data: Vec<u8>) -> Option<Self> {
        (data.len() == width * height * Self::CHANNELS).then_some(Self {
            width,
            height,
            data,
        })
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
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 3] {
        let i = (y * self.width + x) * Self::CHANNELS;
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    #[inline]
    pub fn put_pixel(&mut self, x: usize, y: usize, rgb: [u8; 3]) {
        let i = (y * self.width + x) * Self::CHANNELS;
        self.data[i..i + 3].copy_from_slice(&rgb);
    }

    /// Packed RGB samples of row `y`.
    #[inline]
    pub fn row(&self, y: usize) -> &[u8] {
        let start = y * self.width * Self::CHANNELS;
        &self.data[start..start + self.width * Self::CHANNELS]
    }

    pub fn pixels(&self) -> impl Iterator<Item = [u8; 3]> + '_ {
        self.data.chunks_exact(Self::CHANNELS).map(|p| [p[0], p[1], p[2]])
    }
}

impl Raster for Frame {
    const CHANNELS: usize = Frame::CHANNELS;

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
        debug_assert_eq!(data.len(), width * height * Frame::CHANNELS);
        Self {
            width,
            height,
            data,
        }
    }
}
