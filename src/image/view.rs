use super::{ImageView, PixelBuffer, PixelFormat, Rect};
use crate::error::{Error, Result};

/// Borrowed, read-only view over caller-owned pixel memory.
///
/// The slice must hold at least `(height - 1) * stride + width * bpp` bytes;
/// the padding after the last row may be missing.
#[derive(Clone, Copy, Debug)]
pub struct PixelView<'a> {
    w: usize,
    h: usize,
    stride: usize, // bytes between rows
    format: PixelFormat,
    data: &'a [u8],
}

impl<'a> PixelView<'a> {
    pub fn from_slice(
        w: usize,
        h: usize,
        stride: usize,
        format: PixelFormat,
        data: &'a [u8],
    ) -> Result<Self> {
        let row_bytes = w
            .checked_mul(format.bytes_per_pixel())
            .ok_or(Error::SizeMismatch {
                expected: usize::MAX,
                actual: data.len(),
            })?;
        if stride < row_bytes {
            return Err(Error::InvalidStride { stride, row_bytes });
        }
        let min_len = min_required_len(row_bytes, h, stride).ok_or(Error::SizeMismatch {
            expected: usize::MAX,
            actual: data.len(),
        })?;
        if data.len() < min_len {
            return Err(Error::SizeMismatch {
                expected: min_len,
                actual: data.len(),
            });
        }
        Ok(Self {
            w,
            h,
            stride,
            format,
            data,
        })
    }

    /// Caller guarantees the layout invariants (used by [`PixelBuffer`]).
    pub(super) fn from_parts(
        w: usize,
        h: usize,
        stride: usize,
        format: PixelFormat,
        data: &'a [u8],
    ) -> Self {
        debug_assert!(stride >= w * format.bytes_per_pixel());
        Self {
            w,
            h,
            stride,
            format,
            data,
        }
    }

    /// Tightly packed 8-bit grayscale view.
    pub fn gray(w: usize, h: usize, data: &'a [u8]) -> Result<Self> {
        Self::from_slice(w, h, w, PixelFormat::Gray8, data)
    }

    /// Gray level at (x, y); only meaningful for [`PixelFormat::Gray8`].
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.stride + x]
    }

    /// Raw bytes, row padding included.
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Copy a sub-rectangle into a freshly allocated buffer of the same format.
    pub fn crop(&self, rect: Rect) -> Result<PixelBuffer> {
        rect.ensure_within(self.w, self.h)?;
        let bpp = self.format.bytes_per_pixel();
        let mut out = PixelBuffer::new(rect.width, rect.height, self.format);
        for (dy, dst) in out.rows_mut().enumerate() {
            let src = self.row(rect.y + dy);
            dst.copy_from_slice(&src[rect.x * bpp..rect.right() * bpp]);
        }
        Ok(out)
    }

    /// Copy into an owned, tightly packed buffer.
    pub fn to_owned_buffer(&self) -> PixelBuffer {
        let mut out = PixelBuffer::new(self.w, self.h, self.format);
        for (src, dst) in self.rows().zip(out.rows_mut()) {
            dst.copy_from_slice(src);
        }
        out
    }
}

impl<'a> ImageView for PixelView<'a> {
    #[inline]
    fn width(&self) -> usize {
        self.w
    }
    #[inline]
    fn height(&self) -> usize {
        self.h
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
        assert!(y < self.h, "row index out of bounds");
        let start = y * self.stride;
        &self.data[start..start + self.w * self.format.bytes_per_pixel()]
    }
}

fn min_required_len(row_bytes: usize, height: usize, stride: usize) -> Option<usize> {
    if row_bytes == 0 || height == 0 {
        return Some(0);
    }
    let rows_before_last = height.checked_sub(1)?;
    rows_before_last.checked_mul(stride)?.checked_add(row_bytes)
}

#[cfg(test)]
mod tests {
    use super::PixelView;
    use crate::error::Error;
    use crate::image::{ImageView, PixelFormat, Rect};

    #[test]
    fn view_indexing_with_stride() {
        let data = vec![1u8, 2, 3, 99, 4, 5, 6, 88];
        let view = PixelView::from_slice(3, 2, 4, PixelFormat::Gray8, &data).expect("valid view");

        assert_eq!(view.row(0), &[1, 2, 3]);
        assert_eq!(view.row(1), &[4, 5, 6]);
        assert_eq!(view.get(2, 1), 6);
        assert!(!view.is_contiguous());
        let rows: Vec<&[u8]> = view.rows().collect();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn last_row_padding_may_be_missing() {
        let data = vec![10u8, 11, 12, 0, 0, 0, 20, 21, 22];
        let view =
            PixelView::from_slice(1, 2, 6, PixelFormat::Rgb24, &data).expect("short tail is ok");
        assert_eq!(view.pixel(0, 1), &[20, 21, 22]);
    }

    #[test]
    fn rejects_short_stride_and_short_data() {
        let data = vec![0u8; 12];
        assert_eq!(
            PixelView::from_slice(2, 2, 5, PixelFormat::Rgb24, &data).unwrap_err(),
            Error::InvalidStride {
                stride: 5,
                row_bytes: 6
            }
        );
        assert!(matches!(
            PixelView::from_slice(4, 4, 4, PixelFormat::Gray8, &data),
            Err(Error::SizeMismatch { expected: 16, .. })
        ));
    }

    #[test]
    fn crop_copies_sub_rectangle() {
        let data: Vec<u8> = (0..20).collect();
        let view = PixelView::from_slice(4, 4, 5, PixelFormat::Gray8, &data).expect("view");
        let crop = view.crop(Rect::new(1, 2, 2, 2)).expect("crop inside");
        assert_eq!(crop.as_view().row(0), &[11, 12]);
        assert_eq!(crop.as_view().row(1), &[16, 17]);
        assert!(view.crop(Rect::new(3, 3, 2, 1)).is_err());
    }
}
