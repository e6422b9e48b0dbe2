use crate::binarization::{DitherMethod, IterativeThreshold, ThresholdMatrix};
use crate::image::{PixelBuffer, PixelFormat};
use crate::smoothing::BilateralParams;
use serde::Deserialize;
use std::path::PathBuf;

/// Configuration of the `dither_demo` tool.
#[derive(Debug, Deserialize)]
pub struct DitherToolConfig {
    #[serde(default)]
    pub gradient: GradientConfig,
    #[serde(default)]
    pub filters: FilterConfig,
    pub output: DitherOutputConfig,
}

/// Test pattern: a horizontal ramp from 0 to 255, optionally tinted and
/// repeated in colour channels.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GradientConfig {
    pub width: usize,
    pub height: usize,
    pub format: PixelFormat,
    /// Per-channel multipliers for colour formats.
    pub tint: [f64; 3],
}

impl Default for GradientConfig {
    fn default() -> Self {
        Self {
            width: 256,
            height: 64,
            format: PixelFormat::Gray8,
            tint: [1.0, 1.0, 1.0],
        }
    }
}

impl GradientConfig {
    pub fn render(&self) -> PixelBuffer {
        let mut img = PixelBuffer::new(self.width, self.height, self.format);
        let bpp = self.format.bytes_per_pixel();
        let span = self.width.saturating_sub(1).max(1) as f64;
        for row in img.rows_mut() {
            for (x, px) in row.chunks_exact_mut(bpp).enumerate() {
                let level = x as f64 * 255.0 / span;
                for (c, v) in px.iter_mut().enumerate() {
                    *v = match c {
                        0..=2 if bpp > 1 => (level * self.tint[c]).clamp(0.0, 255.0) as u8,
                        3 => 255,
                        _ => level as u8,
                    };
                }
            }
        }
        img
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub threshold: u8,
    pub carry_threshold: u8,
    /// Start level and stopping tolerance of the iterative threshold.
    pub iterative: IterativeThreshold,
    /// Ordered dithering matrix; the 4x4 Bayer-style default when omitted.
    pub ordered_matrix: ThresholdMatrix,
    pub diffusion: Vec<DitherMethod>,
    /// Bilateral smoothing runs before binarization when present.
    pub bilateral: Option<BilateralParams>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            threshold: 128,
            carry_threshold: 128,
            iterative: IterativeThreshold::default(),
            ordered_matrix: ThresholdMatrix::default(),
            diffusion: DitherMethod::ALL.to_vec(),
            bilateral: None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DitherOutputConfig {
    pub report_json: PathBuf,
}
