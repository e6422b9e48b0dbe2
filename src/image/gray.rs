//! Grayscale conversion for filters that binarize luminance.
//!
//! Colour pixels are reduced with BT.709 weights and the result is truncated
//! to a byte. Gray inputs pass through untouched and are borrowed, not copied,
//! whenever the caller only needs to read them.

use super::{ImageView, PixelBuffer, PixelFormat, PixelView};

/// BT.709 luma weights for `R, G, B`.
pub const BT709: [f64; 3] = [0.2125, 0.7154, 0.0721];

#[inline]
pub fn luma_bt709(r: u8, g: u8, b: u8) -> u8 {
    (BT709[0] * r as f64 + BT709[1] * g as f64 + BT709[2] * b as f64) as u8
}

/// Convert any supported format to an owned, tightly packed Gray8 buffer.
pub fn to_gray8<I: ImageView>(image: &I) -> PixelBuffer {
    let format = image.format();
    let bpp = format.bytes_per_pixel();
    let mut out = PixelBuffer::new(image.width(), image.height(), PixelFormat::Gray8);
    for (src, dst) in image.rows().zip(out.rows_mut()) {
        if format.is_gray() {
            dst.copy_from_slice(src);
        } else {
            for (px, d) in src.chunks_exact(bpp).zip(dst.iter_mut()) {
                *d = luma_bt709(px[0], px[1], px[2]);
            }
        }
    }
    out
}

/// Gray view of an input: borrowed when it already is Gray8, converted otherwise.
pub(crate) enum GraySource<'a> {
    Borrowed(PixelView<'a>),
    Owned(PixelBuffer),
}

impl<'a> GraySource<'a> {
    pub(crate) fn new(image: &PixelView<'a>) -> Self {
        if image.format().is_gray() {
            GraySource::Borrowed(*image)
        } else {
            GraySource::Owned(to_gray8(image))
        }
    }

    pub(crate) fn view(&self) -> PixelView<'_> {
        match self {
            GraySource::Borrowed(view) => *view,
            GraySource::Owned(buffer) => buffer.as_view(),
        }
    }
}
