//! Binarization filters: every output pixel is either `0` or `255`.
//!
//! - [`Threshold`] / [`OtsuThreshold`] / [`IterativeThreshold`]: per-pixel
//!   comparison against a fixed or histogram-derived level, in place on Gray8
//!   buffers, optionally restricted to a sub-rectangle.
//! - [`SisThreshold`]: level from gradient-weighted image statistics.
//! - [`ThresholdWithCarry`]: threshold with a per-row running carry, a cheap
//!   halftone that only propagates error along the scan line.
//! - [`OrderedDithering`]: comparison against a tiled [`ThresholdMatrix`].
//! - [`ErrorDiffusionDithering`]: quantisation error pushed onto unvisited
//!   neighbours through a [`DiffusionKernel`]; the classic named kernels are
//!   listed in [`DitherMethod`].
//!
//! Filters that accept any pixel format reduce colour input to BT.709 luma
//! first (see [`crate::image::gray`]) and always return a Gray8 buffer.

pub mod diffusion;
pub mod iterative;
pub mod ordered;
pub mod otsu;
pub mod sis;
pub mod threshold;

pub use diffusion::{
    DiffusionKernel, DiffusionTap, DitherMethod, ErrorDiffusionDithering, MAX_TAP_OFFSET,
    MAX_TAP_WEIGHT,
};
pub use iterative::IterativeThreshold;
pub use ordered::{OrderedDithering, ThresholdMatrix};
pub use otsu::OtsuThreshold;
pub use sis::SisThreshold;
pub use threshold::{Threshold, ThresholdWithCarry};
