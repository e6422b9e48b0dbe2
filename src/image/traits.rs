use super::PixelFormat;

/// Read access to a strided, format-tagged byte grid.
pub trait ImageView {
    fn width(&self) -> usize;
    fn height(&self) -> usize;
    /// Bytes between the starts of two consecutive rows.
    fn stride(&self) -> usize;
    fn format(&self) -> PixelFormat;

    /// Logical bytes of row `y` (`width * bytes_per_pixel`), padding excluded.
    fn row(&self, y: usize) -> &[u8];

    fn rows(&self) -> Rows<'_, Self>
    where
        Self: Sized,
    {
        Rows { image: self, y: 0 }
    }

    #[inline]
    fn row_bytes(&self) -> usize {
        self.width() * self.format().bytes_per_pixel()
    }

    #[inline]
    fn is_contiguous(&self) -> bool {
        self.stride() == self.row_bytes()
    }

    /// Channel bytes of the pixel at (x, y).
    #[inline]
    fn pixel(&self, x: usize, y: usize) -> &[u8] {
        let bpp = self.format().bytes_per_pixel();
        &self.row(y)[x * bpp..(x + 1) * bpp]
    }
}

pub trait ImageViewMut: ImageView {
    fn row_mut(&mut self, y: usize) -> &mut [u8];
}

pub struct Rows<'a, I: ?Sized + ImageView> {
    image: &'a I,
    y: usize,
}

impl<'a, I: ImageView> Iterator for Rows<'a, I> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        if self.y >= self.image.height() {
            return None;
        }
        let y = self.y;
        self.y += 1;
        Some(self.image.row(y))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.image.height().saturating_sub(self.y);
        (left, Some(left))
    }
}

impl<I: ImageView> ExactSizeIterator for Rows<'_, I> {}
