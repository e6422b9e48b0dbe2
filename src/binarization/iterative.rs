use crate::binarization::otsu::histogram;
use crate::binarization::Threshold;
use crate::error::Result;
use crate::image::{ImageView, PixelBuffer, PixelFormat, PixelView, Rect};
use log::debug;
use serde::{Deserialize, Serialize};

/// Upper bound on refinement rounds; the level normally settles in a few.
const MAX_ITERATIONS: usize = 256;

/// Iterative (isodata) threshold.
///
/// Starting from `threshold`, the level is moved to the midpoint of the mean
/// of the pixels below it and the mean of the pixels at or above it, until a
/// round changes it by at most `min_error`. The final level is applied like
/// [`Threshold`]. Gray-to-gray only.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IterativeThreshold {
    pub min_error: u8,
    /// Starting level.
    pub threshold: u8,
}

impl Default for IterativeThreshold {
    fn default() -> Self {
        Self {
            min_error: 0,
            threshold: 128,
        }
    }
}

impl IterativeThreshold {
    pub fn new(min_error: u8) -> Self {
        Self {
            min_error,
            ..Self::default()
        }
    }

    pub fn with_start(min_error: u8, threshold: u8) -> Self {
        Self {
            min_error,
            threshold,
        }
    }

    /// Level the iteration settles on for the pixels of `rect`.
    pub fn calculate_threshold(&self, image: &PixelView<'_>, rect: Rect) -> Result<u8> {
        image.format().require(PixelFormat::Gray8)?;
        rect.ensure_within(image.width(), image.height())?;
        Ok(self.settle(&histogram(image, rect)))
    }

    /// Binarize the whole buffer; returns the level used.
    pub fn apply_in_place(&self, image: &mut PixelBuffer) -> Result<u8> {
        let full = Rect::full(image.width(), image.height());
        self.apply_in_place_rect(image, full)
    }

    /// Binarize the pixels of `rect` with a level computed from that region alone.
    pub fn apply_in_place_rect(&self, image: &mut PixelBuffer, rect: Rect) -> Result<u8> {
        let level = self.calculate_threshold(&image.as_view(), rect)?;
        Threshold::new(level).apply_in_place_rect(image, rect)?;
        debug!(
            "IterativeThreshold: level={} (start {}, min error {}) over {}x{} region",
            level, self.threshold, self.min_error, rect.width, rect.height
        );
        Ok(level)
    }

    fn settle(&self, hist: &[u32; 256]) -> u8 {
        if hist.iter().all(|&c| c == 0) {
            return self.threshold;
        }
        let mut level = self.threshold;
        for _ in 0..MAX_ITERATIONS {
            let split = level as usize;
            let below = class_mean(&hist[..split], 0);
            let above = class_mean(&hist[split..], split);
            let next = ((below + above) / 2.0) as u8;
            let change = next.abs_diff(level);
            level = next;
            if change <= self.min_error {
                break;
            }
        }
        level
    }
}

/// Mean value of a histogram slice whose first bin holds `offset`; `0` when
/// the slice is empty.
fn class_mean(bins: &[u32], offset: usize) -> f64 {
    let (count, sum) = bins
        .iter()
        .enumerate()
        .fold((0u64, 0.0f64), |(count, sum), (i, &c)| {
            (count + c as u64, sum + (offset + i) as f64 * c as f64)
        });
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}
