use crate::error::{Error, Result};
use crate::image::gray::GraySource;
use crate::image::{ImageView, PixelBuffer, PixelFormat, PixelView};
use serde::{Deserialize, Serialize};

/// Rectangular grid of byte thresholds tiled over the image.
///
/// Pixel `(x, y)` is compared against `rows[y % R][x % C]`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<u8>>", into = "Vec<Vec<u8>>")]
pub struct ThresholdMatrix {
    rows: usize,
    cols: usize,
    values: Vec<u8>,
}

impl ThresholdMatrix {
    /// Build from row-major rows; every row must be non-empty and equally long.
    pub fn new(rows: Vec<Vec<u8>>) -> Result<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        if cols == 0 {
            return Err(Error::InvalidArgument(
                "threshold matrix must have at least one row and one column".to_string(),
            ));
        }
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != cols) {
            return Err(Error::InvalidArgument(format!(
                "threshold matrix row {i} has {} entries, expected {cols}",
                row.len()
            )));
        }
        Ok(Self {
            rows: rows.len(),
            cols,
            values: rows.into_iter().flatten().collect(),
        })
    }

    /// The 4x4 Bayer-style matrix used by default.
    pub fn bayer4() -> Self {
        Self {
            rows: 4,
            cols: 4,
            values: vec![
                15, 143, 47, 175, //
                207, 79, 239, 111, //
                63, 191, 31, 159, //
                255, 127, 223, 95,
            ],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn at(&self, x: usize, y: usize) -> u8 {
        self.values[(y % self.rows) * self.cols + x % self.cols]
    }
}

impl Default for ThresholdMatrix {
    fn default() -> Self {
        Self::bayer4()
    }
}

impl TryFrom<Vec<Vec<u8>>> for ThresholdMatrix {
    type Error = Error;

    fn try_from(rows: Vec<Vec<u8>>) -> Result<Self> {
        Self::new(rows)
    }
}

impl From<ThresholdMatrix> for Vec<Vec<u8>> {
    fn from(m: ThresholdMatrix) -> Self {
        m.values.chunks(m.cols).map(<[u8]>::to_vec).collect()
    }
}

/// Ordered dithering: `0` if `v <= matrix(x, y)`, else `255`.
///
/// Colour input is reduced to BT.709 luma first; the result is always Gray8.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OrderedDithering {
    matrix: ThresholdMatrix,
}

impl OrderedDithering {
    pub fn new(matrix: ThresholdMatrix) -> Self {
        Self { matrix }
    }

    pub fn matrix(&self) -> &ThresholdMatrix {
        &self.matrix
    }

    pub fn apply(&self, image: &PixelView<'_>) -> PixelBuffer {
        let source = GraySource::new(image);
        let src = source.view();
        let mut out = PixelBuffer::new(src.width(), src.height(), PixelFormat::Gray8);
        for (y, (src_row, dst_row)) in src.rows().zip(out.rows_mut()).enumerate() {
            for (x, (&v, dst)) in src_row.iter().zip(dst_row.iter_mut()).enumerate() {
                *dst = if v <= self.matrix.at(x, y) { 0 } else { 255 };
            }
        }
        out
    }
}
