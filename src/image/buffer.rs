use super::{ImageView, ImageViewMut, PixelFormat, PixelView};
use crate::error::{Error, Result};

/// Owned pixel buffer in row-major layout.
///
/// [`PixelBuffer::new`] is the allocator used by every filter that produces
/// a new image: zero-initialised and tightly packed (`stride == width * bpp`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    stride: usize,
    format: PixelFormat,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Construct a zero-initialized buffer of size `width × height`.
    pub fn new(width: usize, height: usize, format: PixelFormat) -> Self {
        let stride = width * format.bytes_per_pixel();
        Self {
            width,
            height,
            stride,
            format,
            data: vec![0; stride * height],
        }
    }

    /// Buffer where every byte of every pixel equals `value`.
    pub fn filled(width: usize, height: usize, format: PixelFormat, value: u8) -> Self {
        let mut out = Self::new(width, height, format);
        out.data.fill(value);
        out
    }

    /// Zero-initialized buffer whose rows are padded to `stride` bytes.
    pub fn with_stride(
        width: usize,
        height: usize,
        stride: usize,
        format: PixelFormat,
    ) -> Result<Self> {
        let row_bytes = width * format.bytes_per_pixel();
        if stride < row_bytes {
            return Err(Error::InvalidStride { stride, row_bytes });
        }
        Ok(Self {
            width,
            height,
            stride,
            format,
            data: vec![0; stride * height],
        })
    }

    /// Wrap tightly packed bytes.
    pub fn from_vec(width: usize, height: usize, format: PixelFormat, data: Vec<u8>) -> Result<Self> {
        Self::from_raw(width, height, width * format.bytes_per_pixel(), format, data)
    }

    /// Wrap bytes laid out with an explicit stride; `data` must hold
    /// `stride * height` bytes.
    pub fn from_raw(
        width: usize,
        height: usize,
        stride: usize,
        format: PixelFormat,
        data: Vec<u8>,
    ) -> Result<Self> {
        let row_bytes = width * format.bytes_per_pixel();
        if stride < row_bytes {
            return Err(Error::InvalidStride { stride, row_bytes });
        }
        let expected = stride.checked_mul(height).ok_or(Error::SizeMismatch {
            expected: usize::MAX,
            actual: data.len(),
        })?;
        if data.len() != expected {
            return Err(Error::SizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            stride,
            format,
            data,
        })
    }

    /// Borrow as a read-only view.
    pub fn as_view(&self) -> PixelView<'_> {
        PixelView::from_parts(self.width, self.height, self.stride, self.format, &self.data)
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.stride + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, v: u8) {
        self.data[y * self.stride + x] = v;
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Logical row slices (padding excluded), top to bottom.
    pub fn rows_mut(&mut self) -> impl Iterator<Item = &mut [u8]> + '_ {
        let row_bytes = self.width * self.format.bytes_per_pixel();
        self.data
            .chunks_mut(self.stride.max(1))
            .take(self.height)
            .map(move |row| &mut row[..row_bytes])
    }
}

impl ImageView for PixelBuffer {
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
        self.stride
    }
    #[inline]
    fn format(&self) -> PixelFormat {
        self.format
    }
    #[inline]
    fn row(&self, y: usize) -> &[u8] {
        let start = y * self.stride;
        &self.data[start..start + self.width * self.format.bytes_per_pixel()]
    }
}

impl ImageViewMut for PixelBuffer {
    #[inline]
    fn row_mut(&mut self, y: usize) -> &mut [u8] {
        let start = y * self.stride;
        let end = start + self.width * self.format.bytes_per_pixel();
        &mut self.data[start..end]
    }
}
