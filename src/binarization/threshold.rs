use crate::error::Result;
use crate::image::gray::GraySource;
use crate::image::{ImageView, ImageViewMut, PixelBuffer, PixelFormat, PixelView, Rect};
use serde::{Deserialize, Serialize};

/// Plain threshold: `255` if `v >= threshold`, else `0`.
///
/// Gray-to-gray only. Applying it twice with the same level is a no-op the
/// second time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Threshold {
    pub threshold: u8,
}

impl Default for Threshold {
    fn default() -> Self {
        Self { threshold: 128 }
    }
}

impl Threshold {
    pub fn new(threshold: u8) -> Self {
        Self { threshold }
    }

    #[inline]
    pub fn classify(&self, v: u8) -> u8 {
        if v >= self.threshold {
            255
        } else {
            0
        }
    }

    /// Threshold a copy of `image`.
    pub fn apply(&self, image: &PixelView<'_>) -> Result<PixelBuffer> {
        image.format().require(PixelFormat::Gray8)?;
        let mut out = image.to_owned_buffer();
        self.apply_in_place(&mut out)?;
        Ok(out)
    }

    pub fn apply_in_place(&self, image: &mut PixelBuffer) -> Result<()> {
        let full = Rect::full(image.width(), image.height());
        self.apply_in_place_rect(image, full)
    }

    /// Threshold only the pixels inside `rect`; the rest of the buffer is left as is.
    pub fn apply_in_place_rect(&self, image: &mut PixelBuffer, rect: Rect) -> Result<()> {
        image.format().require(PixelFormat::Gray8)?;
        rect.ensure_within(image.width(), image.height())?;
        for y in rect.y..rect.bottom() {
            for px in &mut image.row_mut(y)[rect.x..rect.right()] {
                *px = self.classify(*px);
            }
        }
        Ok(())
    }
}

/// Threshold with a per-row carry.
///
/// Scanning left to right, each pixel value is added to `carry`; when the
/// carry reaches the threshold the pixel turns white and `255` is taken back
/// out of the carry. The carry restarts at zero on every row, so error never
/// crosses scan lines.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdWithCarry {
    pub threshold: u8,
}

impl Default for ThresholdWithCarry {
    fn default() -> Self {
        Self { threshold: 128 }
    }
}

impl ThresholdWithCarry {
    pub fn new(threshold: u8) -> Self {
        Self { threshold }
    }

    /// Binarize any supported format into a new Gray8 buffer.
    pub fn apply(&self, image: &PixelView<'_>) -> PixelBuffer {
        let source = GraySource::new(image);
        let src = source.view();
        let threshold = self.threshold as i32;

        let mut out = PixelBuffer::new(src.width(), src.height(), PixelFormat::Gray8);
        for (src_row, dst_row) in src.rows().zip(out.rows_mut()) {
            let mut carry = 0i32;
            for (&v, dst) in src_row.iter().zip(dst_row.iter_mut()) {
                carry += v as i32;
                if carry >= threshold {
                    *dst = 255;
                    carry -= 255;
                } else {
                    *dst = 0;
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::{Threshold, ThresholdWithCarry};
    use crate::error::Error;
    use crate::image::{ImageView, PixelBuffer, PixelFormat, PixelView, Rect};

    #[test]
    fn threshold_boundary_is_inclusive() {
        let t = Threshold::new(100);
        for v in 0..=255u8 {
            let expected = if v >= 100 { 255 } else { 0 };
            assert_eq!(t.classify(v), expected, "v={v}");
        }
    }

    #[test]
    fn threshold_is_idempotent() {
        let data: Vec<u8> = (0..64).map(|i| (i * 4) as u8).collect();
        let view = PixelView::gray(8, 8, &data).expect("view");
        let t = Threshold::new(77);
        let once = t.apply(&view).expect("gray input");
        let twice = t.apply(&once.as_view()).expect("gray input");
        assert_eq!(once, twice);
        assert!(once.data().iter().all(|&v| v == 0 || v == 255));
    }

    #[test]
    fn threshold_rect_leaves_outside_untouched() {
        let mut buf = PixelBuffer::filled(4, 4, PixelFormat::Gray8, 200);
        Threshold::new(128)
            .apply_in_place_rect(&mut buf, Rect::new(1, 1, 2, 2))
            .expect("rect inside");
        assert_eq!(buf.row(0), &[200, 200, 200, 200]);
        assert_eq!(buf.row(1), &[200, 255, 255, 200]);
        assert_eq!(buf.row(3), &[200, 200, 200, 200]);
    }

    #[test]
    fn threshold_rejects_color_input() {
        let buf = PixelBuffer::new(2, 2, PixelFormat::Rgb24);
        let err = Threshold::default().apply(&buf.as_view()).unwrap_err();
        assert!(matches!(err, Error::UnsupportedPixelFormat { .. }), "{err}");
    }

    #[test]
    fn carry_halftones_mid_gray() {
        // 64 per pixel: the carry crosses 128 every second pixel, then drops by 255.
        let data = vec![64u8; 8];
        let view = PixelView::gray(8, 1, &data).expect("view");
        let out = ThresholdWithCarry::new(128).apply(&view);
        let whites = out.row(0).iter().filter(|&&v| v == 255).count();
        assert_eq!(out.row(0)[0], 0);
        assert_eq!(out.row(0)[1], 255);
        assert!((1..=3).contains(&whites), "whites={whites}");
    }

    #[test]
    fn carry_restarts_each_row() {
        let data = vec![100u8; 6];
        let view = PixelView::gray(3, 2, &data).expect("view");
        let out = ThresholdWithCarry::new(150).apply(&view);
        assert_eq!(out.row(0), out.row(1));
        assert_eq!(out.row(0), &[0, 255, 0]);
    }

    #[test]
    fn carry_accepts_rgb() {
        let data = vec![255u8; 2 * 2 * 3];
        let view = PixelView::from_slice(2, 2, 6, PixelFormat::Rgb24, &data).expect("view");
        let out = ThresholdWithCarry::default().apply(&view);
        assert_eq!(out.format(), PixelFormat::Gray8);
        assert!(out.data().iter().all(|&v| v == 255));
    }
}
