use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Memory layout of one pixel.
///
/// Colour formats store channels in `R, G, B[, A]` byte order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PixelFormat {
    Gray8,
    Rgb24,
    Rgba32,
}

impl PixelFormat {
    #[inline]
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Gray8 => 1,
            PixelFormat::Rgb24 => 3,
            PixelFormat::Rgba32 => 4,
        }
    }

    /// Number of channels that carry colour (alpha excluded).
    #[inline]
    pub const fn color_channels(self) -> usize {
        match self {
            PixelFormat::Gray8 => 1,
            PixelFormat::Rgb24 | PixelFormat::Rgba32 => 3,
        }
    }

    #[inline]
    pub const fn is_gray(self) -> bool {
        matches!(self, PixelFormat::Gray8)
    }

    /// Fails with [`Error::UnsupportedPixelFormat`] unless `self == expected`.
    pub fn require(self, expected: PixelFormat) -> Result<()> {
        if self == expected {
            Ok(())
        } else {
            Err(Error::UnsupportedPixelFormat {
                expected: expected.name(),
                actual: self,
            })
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            PixelFormat::Gray8 => "Gray8",
            PixelFormat::Rgb24 => "Rgb24",
            PixelFormat::Rgba32 => "Rgba32",
        }
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
