#![doc = include_str!("../README.md")]

// Public modules
pub mod binarization;
pub mod error;
pub mod hough;
pub mod image;
pub mod smoothing;

// Helpers for tools and reporting.
pub mod angle;
pub mod config;
pub mod diagnostics;

// --- High-level re-exports -------------------------------------------------

pub use crate::error::{Error, ErrorKind, Result};
pub use crate::image::{ImageView, ImageViewMut, PixelBuffer, PixelFormat, PixelView, Rect};

pub use crate::binarization::{
    DiffusionKernel, DitherMethod, ErrorDiffusionDithering, IterativeThreshold, OrderedDithering,
    OtsuThreshold, SisThreshold, Threshold, ThresholdMatrix, ThresholdWithCarry,
};
pub use crate::hough::{
    HoughCircle, HoughCircleParams, HoughCircleTransform, HoughLine, HoughLineParams,
    HoughLineTransform, HoughMap,
};
pub use crate::smoothing::{BilateralParams, BilateralSmoothing};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use hough_filters::prelude::*;
///
/// # fn main() -> hough_filters::Result<()> {
/// let (w, h) = (320usize, 240usize);
/// let gray = vec![0u8; w * h];
/// let view = PixelView::gray(w, h, &gray)?;
///
/// let edges = Threshold::new(128).apply(&view)?;
/// let mut hough = HoughLineTransform::default();
/// hough.process_image(&edges.as_view())?;
/// for line in hough.most_intensive_lines(5)? {
///     println!("theta={} r={} votes={}", line.theta, line.radius, line.intensity);
/// }
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::image::{ImageView, ImageViewMut, PixelBuffer, PixelFormat, PixelView};
    pub use crate::{
        BilateralSmoothing, ErrorDiffusionDithering, HoughLineTransform, OrderedDithering,
        Threshold,
    };
}
