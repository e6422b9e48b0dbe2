use crate::error::Result;
use crate::image::{ImageView, ImageViewMut, PixelBuffer, PixelFormat, PixelView, Rect};
use log::debug;

/// Otsu's adaptive threshold.
///
/// The level is chosen to maximise the between-class variance of the
/// region's histogram; pixels `>= level` become `255`, the rest `0`.
/// Gray-to-gray only.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OtsuThreshold;

impl OtsuThreshold {
    pub fn new() -> Self {
        Self
    }

    /// Level Otsu's method picks for the pixels of `rect`.
    pub fn calculate_threshold(&self, image: &PixelView<'_>, rect: Rect) -> Result<u8> {
        image.format().require(PixelFormat::Gray8)?;
        rect.ensure_within(image.width(), image.height())?;
        Ok(otsu_level(&histogram(image, rect)))
    }

    /// Binarize the whole buffer; returns the level used.
    pub fn apply_in_place(&self, image: &mut PixelBuffer) -> Result<u8> {
        let full = Rect::full(image.width(), image.height());
        self.apply_in_place_rect(image, full)
    }

    /// Binarize the pixels of `rect` with a level computed from that region alone.
    pub fn apply_in_place_rect(&self, image: &mut PixelBuffer, rect: Rect) -> Result<u8> {
        let level = self.calculate_threshold(&image.as_view(), rect)?;
        for y in rect.y..rect.bottom() {
            for px in &mut image.row_mut(y)[rect.x..rect.right()] {
                *px = if *px >= level { 255 } else { 0 };
            }
        }
        debug!(
            "Otsu: level={} over {}x{} region at ({}, {})",
            level, rect.width, rect.height, rect.x, rect.y
        );
        Ok(level)
    }
}

pub(crate) fn histogram(image: &PixelView<'_>, rect: Rect) -> [u32; 256] {
    let mut hist = [0u32; 256];
    for y in rect.y..rect.bottom() {
        for &v in &image.row(y)[rect.x..rect.right()] {
            hist[v as usize] += 1;
        }
    }
    hist
}

/// Threshold maximising `p1 * (1 - p1) * (m1 - m2)^2`, where class 1 holds
/// the values below the candidate level. The first strict maximum wins.
pub(crate) fn otsu_level(hist: &[u32; 256]) -> u8 {
    let total: u64 = hist.iter().map(|&c| c as u64).sum();
    if total == 0 {
        return 0;
    }
    let prob: Vec<f64> = hist.iter().map(|&c| c as f64 / total as f64).collect();
    let mean: f64 = prob.iter().enumerate().map(|(i, p)| i as f64 * p).sum();

    let mut best = f64::MIN;
    let mut level = 0u8;
    let mut p1 = 0.0f64;
    let mut p2 = 1.0f64;
    let mut m1 = 0.0f64;

    for (t, &p) in prob.iter().enumerate() {
        if p2 > f64::EPSILON {
            let m2 = (mean - m1 * p1) / p2;
            let variance = p1 * (1.0 - p1) * (m1 - m2).powi(2);
            if variance > best {
                best = variance;
                level = t as u8;
            }
        }

        m1 *= p1;
        p1 += p;
        p2 -= p;
        m1 += t as f64 * p;
        // an empty lower class has no mean yet
        m1 = if p1 > 0.0 { m1 / p1 } else { 0.0 };
    }
    level
}
