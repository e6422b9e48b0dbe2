use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Axis-aligned pixel rectangle, `x`/`y` being the top-left corner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl Rect {
    pub const fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle covering a whole `width × height` image.
    pub const fn full(width: usize, height: usize) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Exclusive right edge.
    #[inline]
    pub const fn right(&self) -> usize {
        self.x + self.width
    }

    /// Exclusive bottom edge.
    #[inline]
    pub const fn bottom(&self) -> usize {
        self.y + self.height
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Fails with [`Error::RegionOutOfBounds`] unless the rectangle lies
    /// inside a `width × height` image.
    pub fn ensure_within(&self, width: usize, height: usize) -> Result<()> {
        let fits_x = self.x <= width && self.width <= width - self.x;
        let fits_y = self.y <= height && self.height <= height - self.y;
        if fits_x && fits_y {
            Ok(())
        } else {
            Err(Error::RegionOutOfBounds {
                rect: *self,
                width,
                height,
            })
        }
    }
}
