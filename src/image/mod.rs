//! Pixel buffers shared by every filter.
//!
//! A buffer is a rectangular grid of bytes with a row stride (in bytes) that
//! may exceed the logical row length, plus a [`PixelFormat`] telling how many
//! interleaved channels each pixel carries. Row `y` starts at byte offset
//! `y * stride`.
//!
//! - [`PixelBuffer`] owns its bytes and doubles as the allocator for filter
//!   outputs (zero-initialised, tightly packed).
//! - [`PixelView`] borrows caller memory, e.g. a padded frame from a camera
//!   or a decoder.
//! - [`ImageView`] / [`ImageViewMut`] give both a common row-oriented API.
//! - [`gray`] holds the grayscale conversion used by filters that accept
//!   colour input but binarize luminance.

pub mod buffer;
pub mod format;
pub mod gray;
pub mod rect;
pub mod traits;
pub mod view;

pub use self::buffer::PixelBuffer;
pub use self::format::PixelFormat;
pub use self::rect::Rect;
pub use self::traits::{ImageView, ImageViewMut, Rows};
pub use self::view::PixelView;
