use crate::image::{ImageViewMut, PixelBuffer, PixelFormat};

/// Dense 2D vote accumulator with 16-bit cells.
///
/// Votes saturate at `u16::MAX` instead of wrapping.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HoughMap {
    width: usize,
    height: usize,
    cells: Vec<u16>,
    max: u16,
}

impl HoughMap {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![0; width * height],
            max: 0,
        }
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
    pub fn get(&self, x: usize, y: usize) -> u16 {
        self.cells[y * self.width + x]
    }

    #[inline]
    pub(crate) fn vote(&mut self, x: usize, y: usize) {
        let cell = &mut self.cells[y * self.width + x];
        *cell = cell.saturating_add(1);
        self.max = self.max.max(*cell);
    }

    /// Largest vote count in the map.
    pub fn max_intensity(&self) -> u16 {
        self.max
    }

    pub fn row(&self, y: usize) -> &[u16] {
        &self.cells[y * self.width..(y + 1) * self.width]
    }

    /// Render as Gray8, scaled so the maximum becomes 255. An empty map
    /// renders all black.
    pub fn to_image(&self) -> PixelBuffer {
        let mut out = PixelBuffer::new(self.width, self.height, PixelFormat::Gray8);
        if self.max == 0 {
            return out;
        }
        let scale = 255.0f32 / self.max as f32;
        for y in 0..self.height {
            let src = self.row(y);
            for (dst, &v) in out.row_mut(y).iter_mut().zip(src) {
                *dst = ((scale * v as f32) as u32).min(255) as u8;
            }
        }
        out
    }
}
