use crate::image::gray::GraySource;
use crate::image::{ImageView, ImageViewMut, PixelBuffer, PixelFormat, PixelView};
use log::debug;

/// Simple image statistics (SIS) threshold.
///
/// Every interior pixel is weighted by its stronger central difference,
/// `max(|I(x+1) - I(x-1)|, |I(y+1) - I(y-1)|)`; the level is the weighted
/// mean intensity, truncated, or `0` when no interior pixel has a gradient.
/// Pixels `<= level` become `0`, the rest `255`. Accepts any pixel format and
/// returns Gray8.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SisThreshold;

impl SisThreshold {
    pub fn new() -> Self {
        Self
    }

    /// Level computed from the whole image.
    pub fn calculate_threshold(&self, image: &PixelView<'_>) -> u8 {
        let source = GraySource::new(image);
        sis_level(&source.view())
    }

    /// Binarize a copy of `image`; the level is available through
    /// [`SisThreshold::calculate_threshold`].
    pub fn apply(&self, image: &PixelView<'_>) -> PixelBuffer {
        let source = GraySource::new(image);
        let src = source.view();
        let level = sis_level(&src);
        let mut out = PixelBuffer::new(src.width(), src.height(), PixelFormat::Gray8);
        for (y, src_row) in src.rows().enumerate() {
            for (dst, &v) in out.row_mut(y).iter_mut().zip(src_row) {
                *dst = if v <= level { 0 } else { 255 };
            }
        }
        debug!("SisThreshold: level={} over {}x{}", level, src.width(), src.height());
        out
    }
}

fn sis_level(gray: &PixelView<'_>) -> u8 {
    let (w, h) = (gray.width(), gray.height());
    if w < 3 || h < 3 {
        return 0;
    }
    let (mut weight_total, mut total) = (0.0f64, 0.0f64);
    for y in 1..h - 1 {
        let (above, row, below) = (gray.row(y - 1), gray.row(y), gray.row(y + 1));
        for x in 1..w - 1 {
            let ex = row[x + 1].abs_diff(row[x - 1]);
            let ey = below[x].abs_diff(above[x]);
            let weight = ex.max(ey) as f64;
            weight_total += weight;
            total += weight * row[x] as f64;
        }
    }
    if weight_total == 0.0 {
        0
    } else {
        (total / weight_total) as u8
    }
}
