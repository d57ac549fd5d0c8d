pub trait ImageView {
    type Pixel: Copy;

    fn width(&self) -> usize;
    fn height(&self) -> usize;
    fn stride(&self) -> usize;

    fn row(&self, y: usize) -> &[Self::Pixel];

    fn rows(&self) -> Rows<'_, Self>
    where
        Self: Sized,
    {
        Rows { image: self, y: 0 }
    }

    fn is_contiguous(&self) -> bool {
        self.stride() == self.width()
    }

    fn as_slice(&self) -> Option<&[Self::Pixel]> {
        None
    }
}

pub trait ImageViewMut: ImageView {
    fn row_mut(&mut self, y: usize) -> &mut [Self::Pixel];

    fn rows_mut(&mut self) -> RowsMut<'_, Self>
    where
        Self: Sized,
    {
        RowsMut { image: self, y: 0 }
    }

    fn as_mut_slice(&mut self) -> Option<&mut [Self::Pixel]> {
        None
    }
}

/// Owned, tightly packed, interleaved 8-bit raster.
///
/// Implemented by [`Frame`](super::Frame) (3 channels) and
/// [`Mask`](super::Mask) (1 channel) so geometric resampling can be written
/// once and preserve both the pixel type and the channel count.
pub trait Raster: Sized {
    const CHANNELS: usize;

    fn width(&self) -> usize;
    fn height(&self) -> usize;
    fn raw(&self) -> &[u8];

    /// Rebuild a raster of the same kind from packed samples.
    ///
    /// `data.len()` must equal `width * height * CHANNELS`.
    fn from_raw_parts(width: usize, height: usize, data: Vec<u8>) -> Self;

    /// Post-process a resampled value before it is stored.
    #[inline]
    fn quantize(value: f32) -> u8 {
        value.round().clamp(0.0, 255.0) as u8
    }

    fn dims(&self) -> (usize, usize) {
        (self.width(), self.height())
    }
}

pub struct Rows<'a, I: ?Sized + ImageView> {
    image: &'a I,
    y: usize,
}

impl<'a, I: ImageView> Iterator for Rows<'a, I> {
    type Item = &'a [I::Pixel];

    fn next(&mut self) -> Option<Self::Item> {
        if self.y >= self.image.height() {
            return None;
        }
        let y = self.y;
        self.y += 1;
        Some(self.image.row(y))
    }
}

pub struct RowsMut<'a, I: ?Sized + ImageViewMut> {
    image: &'a mut I,
    y: usize,
}

impl<'a, I: ImageViewMut> Iterator for RowsMut<'a, I> {
    type Item = &'a mut [I::Pixel];

    fn next(&mut self) -> Option<Self::Item> {
        if self.y >= self.image.height() {
            return None;
        }
        // Reborrow trick to obtain a new &mut for each row
        let y = self.y;
        self.y += 1;
        let ptr = self.image as *mut I;
        // SAFETY: Each row y is returned at most once and rows do not alias.
        Some(unsafe { (&mut *ptr).row_mut(y) })
    }
}
