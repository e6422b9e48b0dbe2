//! Hough transforms over binary edge images.
//!
//! Both transforms share one state machine: a transform is created
//! unprocessed, [`process_image`](HoughLineTransform::process_image) builds a
//! fresh [`HoughMap`] and a ranked detection list, and the accessors read that
//! result until the next successful call replaces it. Accessors called before
//! any image was processed fail with [`Error::NotProcessed`](crate::Error::NotProcessed).
//!
//! - [`HoughLineTransform`]: polar `(theta, radius)` accumulator with
//!   non-maximum suppression that wraps around the angle axis.
//! - [`HoughCircleTransform`]: image-sized accumulator of circle centres for a
//!   fixed radius.

pub mod circles;
pub mod lines;
pub mod map;

pub use circles::{HoughCircle, HoughCircleParams, HoughCircleTransform};
pub use lines::{HoughLine, HoughLineParams, HoughLineTransform};
pub use map::HoughMap;

/// Shortest prefix of a list sorted by descending intensity whose entries all
/// reach `min_relative`.
pub(crate) fn relative_prefix<T>(items: &[T], min_relative: f64, rel: impl Fn(&T) -> f64) -> &[T] {
    let n = items
        .iter()
        .take_while(|&item| rel(item) >= min_relative)
        .count();
    &items[..n]
}
