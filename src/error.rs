//! Error type shared by every filter and transform.
//!
//! Variants are grouped into three kinds (see [`ErrorKind`]): bad input
//! (wrong pixel format, mismatched sizes, out-of-image regions), bad call
//! order (querying a Hough transform before it processed an image), and
//! configurations that are refused outright instead of being clamped.

use crate::image::{PixelFormat, Rect};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    InvalidState,
    UnsupportedConfiguration,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("pixel format of source image should be {expected}, got {actual}")]
    UnsupportedPixelFormat {
        expected: &'static str,
        actual: PixelFormat,
    },

    #[error("size mismatch: expected {expected}, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("stride {stride} is smaller than the {row_bytes} bytes of a row")]
    InvalidStride { stride: usize, row_bytes: usize },

    #[error("region {rect:?} lies outside of the {width}x{height} image")]
    RegionOutOfBounds {
        rect: Rect,
        width: usize,
        height: usize,
    },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Hough transformation was not done yet")]
    NotProcessed,

    #[error("unsupported kernel size {size}: {reason}")]
    UnsupportedKernelSize { size: u32, reason: &'static str },

    #[error("{name} = {value} is outside of [{min}, {max}]")]
    ParameterOutOfRange {
        name: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotProcessed => ErrorKind::InvalidState,
            Self::UnsupportedKernelSize { .. } | Self::ParameterOutOfRange { .. } => {
                ErrorKind::UnsupportedConfiguration
            }
            Self::UnsupportedPixelFormat { .. }
            | Self::SizeMismatch { .. }
            | Self::InvalidStride { .. }
            | Self::RegionOutOfBounds { .. }
            | Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
        }
    }
}
