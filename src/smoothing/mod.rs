//! Edge-preserving smoothing.
//!
//! [`BilateralSmoothing`] averages each pixel with its neighbours, weighting
//! every neighbour by a spatial term (distance in the kernel window) and a
//! range term (difference of channel values). Both weight tables are built
//! when the filter is configured and rebuilt only when a shaping parameter
//! actually changes.

pub mod bilateral;
pub mod weights;

pub use bilateral::{BilateralParams, BilateralSmoothing, MAX_KERNEL_SIZE, SAFE_KERNEL_SIZE};
pub use weights::{RangeWeights, SpatialWeights};
