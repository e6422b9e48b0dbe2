//! Error-diffusion dithering.
//!
//! One shared routine binarizes a gray working copy pixel by pixel and
//! pushes the residual onto not-yet-visited neighbours through a
//! [`DiffusionKernel`]. Named algorithms are nothing but kernels.

use crate::error::{Error, Result};
use crate::image::gray::to_gray8;
use crate::image::{ImageView, ImageViewMut, PixelBuffer, PixelFormat, PixelView};
use serde::{Deserialize, Serialize};

/// Largest accepted `|weight|`; keeps `error * weight` inside `i32` for
/// any residual in `[-255, 255]`.
pub const MAX_TAP_WEIGHT: i32 = 8_000_000;
/// Largest accepted `|dx|` and `dy` of a tap.
pub const MAX_TAP_OFFSET: usize = 64;

/// One diffusion target relative to the current pixel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DiffusionTap {
    pub dx: isize,
    /// Rows below the current one; `0` means the current row (then `dx > 0`).
    pub dy: usize,
    pub weight: i32,
}

/// Coefficient table with its divisor (the sum of all weights).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiffusionKernel {
    taps: Vec<DiffusionTap>,
    divisor: i32,
}

impl DiffusionKernel {
    /// Build from coefficient rows: row 0 lists the pixels right of the
    /// current one (`dx = 1, 2, ...`), each further row is a symmetric span
    /// of odd length centred under the current pixel.
    pub fn from_rows(rows: &[&[i32]]) -> Result<Self> {
        if rows.is_empty() {
            return Err(Error::InvalidArgument(
                "diffusion kernel needs at least one row".to_string(),
            ));
        }
        if let Some(dy) = (1..rows.len()).find(|&dy| rows[dy].len() % 2 == 0) {
            return Err(Error::InvalidArgument(format!(
                "diffusion kernel row {dy} must have odd length, got {}",
                rows[dy].len()
            )));
        }
        Self::from_taps(rows_to_taps(rows))
    }

    /// Build from explicit taps, for layouts that are not contiguous spans.
    ///
    /// Offsets are limited to [`MAX_TAP_OFFSET`] and weights to
    /// ±[`MAX_TAP_WEIGHT`].
    pub fn from_taps(taps: Vec<DiffusionTap>) -> Result<Self> {
        if let Some(tap) = taps.iter().find(|t| t.dy == 0 && t.dx <= 0) {
            return Err(Error::InvalidArgument(format!(
                "tap at dx={} on the current row would touch an already visited pixel",
                tap.dx
            )));
        }
        if let Some(tap) = taps
            .iter()
            .find(|t| t.dx.unsigned_abs() > MAX_TAP_OFFSET || t.dy > MAX_TAP_OFFSET)
        {
            return Err(Error::InvalidArgument(format!(
                "tap offset ({}, {}) exceeds {MAX_TAP_OFFSET} pixels",
                tap.dx, tap.dy
            )));
        }
        if let Some(tap) = taps.iter().find(|t| t.weight.unsigned_abs() > MAX_TAP_WEIGHT as u32) {
            return Err(Error::InvalidArgument(format!(
                "tap weight {} exceeds ±{MAX_TAP_WEIGHT}",
                tap.weight
            )));
        }
        let total: i64 = taps.iter().map(|t| t.weight as i64).sum();
        let divisor = i32::try_from(total).map_err(|_| {
            Error::InvalidArgument(format!("diffusion kernel divisor {total} overflows i32"))
        })?;
        if divisor <= 0 {
            return Err(Error::InvalidArgument(format!(
                "diffusion kernel weights must sum to a positive divisor, got {divisor}"
            )));
        }
        Ok(Self { taps, divisor })
    }

    fn from_static_rows(rows: &[&[i32]]) -> Self {
        let taps = rows_to_taps(rows);
        let divisor = taps.iter().map(|t| t.weight).sum();
        Self { taps, divisor }
    }

    pub fn floyd_steinberg() -> Self {
        Self::from_static_rows(&[&[7], &[3, 5, 1]])
    }

    pub fn burkes() -> Self {
        Self::from_static_rows(&[&[8, 4], &[2, 4, 8, 4, 2]])
    }

    pub fn stucki() -> Self {
        Self::from_static_rows(&[&[8, 4], &[2, 4, 8, 4, 2], &[1, 2, 4, 2, 1]])
    }

    pub fn sierra() -> Self {
        Self::from_static_rows(&[&[5, 3], &[2, 4, 5, 4, 2], &[2, 3, 2]])
    }

    pub fn jarvis_judice_ninke() -> Self {
        Self::from_static_rows(&[&[7, 5], &[3, 5, 7, 5, 3], &[1, 3, 5, 3, 1]])
    }

    /// Stevenson-Arce coefficients.
    ///
    /// These were designed for a hexagonal lattice. On square pixel grids
    /// the result is visibly worse than the other kernels; the kernel is
    /// kept for educational comparison only.
    pub fn stevenson_arce() -> Self {
        const TAPS: [(isize, usize, i32); 12] = [
            (2, 0, 32),
            (-3, 1, 12),
            (-1, 1, 26),
            (1, 1, 30),
            (3, 1, 16),
            (-2, 2, 12),
            (0, 2, 26),
            (2, 2, 12),
            (-3, 3, 5),
            (-1, 3, 12),
            (1, 3, 12),
            (3, 3, 5),
        ];
        let taps: Vec<DiffusionTap> = TAPS
            .iter()
            .map(|&(dx, dy, weight)| DiffusionTap { dx, dy, weight })
            .collect();
        Self { taps, divisor: 200 }
    }

    pub fn taps(&self) -> &[DiffusionTap] {
        &self.taps
    }

    pub fn divisor(&self) -> i32 {
        self.divisor
    }

    /// Add `error * weight / divisor` to every in-bounds target of `(x, y)`,
    /// clamping to `[0, 255]`.
    fn diffuse(&self, work: &mut PixelBuffer, x: usize, y: usize, error: i32) {
        let (w, h) = (work.width(), work.height());
        for tap in &self.taps {
            let ty = y + tap.dy;
            if ty >= h {
                continue;
            }
            let tx = x as isize + tap.dx;
            if tx < 0 || tx as usize >= w {
                continue;
            }
            let px = &mut work.row_mut(ty)[tx as usize];
            let v = *px as i32 + error * tap.weight / self.divisor;
            *px = v.clamp(0, 255) as u8;
        }
    }
}

fn rows_to_taps(rows: &[&[i32]]) -> Vec<DiffusionTap> {
    let mut taps = Vec::new();
    for (dy, row) in rows.iter().enumerate() {
        let start = if dy == 0 { 1 } else { -((row.len() / 2) as isize) };
        for (i, &weight) in row.iter().enumerate() {
            taps.push(DiffusionTap {
                dx: start + i as isize,
                dy,
                weight,
            });
        }
    }
    taps
}

/// Named diffusion kernels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DitherMethod {
    FloydSteinberg,
    Burkes,
    Stucki,
    Sierra,
    JarvisJudiceNinke,
    /// Educational only, see [`DiffusionKernel::stevenson_arce`].
    StevensonArce,
}

impl DitherMethod {
    pub const ALL: [DitherMethod; 6] = [
        DitherMethod::FloydSteinberg,
        DitherMethod::Burkes,
        DitherMethod::Stucki,
        DitherMethod::Sierra,
        DitherMethod::JarvisJudiceNinke,
        DitherMethod::StevensonArce,
    ];

    pub fn kernel(self) -> DiffusionKernel {
        match self {
            DitherMethod::FloydSteinberg => DiffusionKernel::floyd_steinberg(),
            DitherMethod::Burkes => DiffusionKernel::burkes(),
            DitherMethod::Stucki => DiffusionKernel::stucki(),
            DitherMethod::Sierra => DiffusionKernel::sierra(),
            DitherMethod::JarvisJudiceNinke => DiffusionKernel::jarvis_judice_ninke(),
            DitherMethod::StevensonArce => DiffusionKernel::stevenson_arce(),
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            DitherMethod::FloydSteinberg => "floydSteinberg",
            DitherMethod::Burkes => "burkes",
            DitherMethod::Stucki => "stucki",
            DitherMethod::Sierra => "sierra",
            DitherMethod::JarvisJudiceNinke => "jarvisJudiceNinke",
            DitherMethod::StevensonArce => "stevensonArce",
        }
    }
}

/// Error-diffusion dithering with a fixed kernel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ErrorDiffusionDithering {
    kernel: DiffusionKernel,
}

impl Default for ErrorDiffusionDithering {
    fn default() -> Self {
        Self::new(DiffusionKernel::floyd_steinberg())
    }
}

impl From<DitherMethod> for ErrorDiffusionDithering {
    fn from(method: DitherMethod) -> Self {
        Self::new(method.kernel())
    }
}

impl ErrorDiffusionDithering {
    pub fn new(kernel: DiffusionKernel) -> Self {
        Self { kernel }
    }

    pub fn kernel(&self) -> &DiffusionKernel {
        &self.kernel
    }

    /// Dither into a new Gray8 buffer. The input is never modified; errors
    /// accumulate in a private gray copy so later pixels see adjusted but
    /// not yet binarized values.
    pub fn apply(&self, image: &PixelView<'_>) -> PixelBuffer {
        let mut work = to_gray8(image);
        let (w, h) = (work.width(), work.height());
        let mut out = PixelBuffer::new(w, h, PixelFormat::Gray8);
        for y in 0..h {
            for x in 0..w {
                let v = work.row(y)[x] as i32;
                let (level, error) = if v < 128 { (0u8, v) } else { (255u8, v - 255) };
                out.row_mut(y)[x] = level;
                self.kernel.diffuse(&mut work, x, y, error);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::{
        DiffusionKernel, DiffusionTap, DitherMethod, ErrorDiffusionDithering, MAX_TAP_OFFSET,
        MAX_TAP_WEIGHT,
    };
    use crate::image::{ImageView, PixelFormat, PixelView};

    #[test]
    fn named_kernels_have_classic_divisors() {
        let expected = [16, 32, 42, 32, 48, 200];
        for (method, divisor) in DitherMethod::ALL.iter().zip(expected) {
            let kernel = method.kernel();
            assert_eq!(kernel.divisor(), divisor, "{}", method.name());
            let sum: i32 = kernel.taps().iter().map(|t| t.weight).sum();
            assert_eq!(sum, divisor, "{}", method.name());
            assert!(kernel.taps().iter().all(|t| t.dy > 0 || t.dx > 0));
        }
    }

    #[test]
    fn rows_are_centred_under_the_pixel() {
        let fs = DiffusionKernel::floyd_steinberg();
        let taps: Vec<(isize, usize, i32)> =
            fs.taps().iter().map(|t| (t.dx, t.dy, t.weight)).collect();
        assert_eq!(taps, vec![(1, 0, 7), (-1, 1, 3), (0, 1, 5), (1, 1, 1)]);
        assert_eq!(
            DiffusionKernel::from_rows(&[&[7], &[3, 5, 1]]).expect("valid"),
            fs
        );
    }

    #[test]
    fn invalid_kernels_are_rejected() {
        assert!(DiffusionKernel::from_rows(&[]).is_err());
        assert!(DiffusionKernel::from_rows(&[&[7], &[3, 5]]).is_err());
        assert!(DiffusionKernel::from_rows(&[&[0]]).is_err());
        let backwards = vec![DiffusionTap {
            dx: -1,
            dy: 0,
            weight: 1,
        }];
        assert!(DiffusionKernel::from_taps(backwards).is_err());
    }

    #[test]
    fn oversized_taps_are_rejected() {
        let tap = |dx, dy, weight| DiffusionTap { dx, dy, weight };
        assert!(DiffusionKernel::from_taps(vec![tap(1, 0, MAX_TAP_WEIGHT)]).is_ok());
        assert!(DiffusionKernel::from_taps(vec![tap(1, 0, MAX_TAP_WEIGHT + 1)]).is_err());
        assert!(DiffusionKernel::from_taps(vec![tap(1, 0, 5), tap(0, 1, i32::MIN)]).is_err());
        assert!(DiffusionKernel::from_taps(vec![tap(1, usize::MAX, 1)]).is_err());
        assert!(DiffusionKernel::from_taps(vec![tap(isize::MIN, 1, 1)]).is_err());

        let crowded = vec![tap(1, 0, MAX_TAP_WEIGHT); 300];
        assert!(DiffusionKernel::from_taps(crowded).is_err());

        let far = DiffusionKernel::from_taps(vec![tap(MAX_TAP_OFFSET as isize, MAX_TAP_OFFSET, 1)])
            .expect("within limits");
        let data = vec![200u8; 4 * 4];
        let out = ErrorDiffusionDithering::new(far).apply(&PixelView::gray(4, 4, &data).expect("view"));
        assert!(out.data().iter().all(|&v| v == 255));

        let heavy = DiffusionKernel::from_taps(vec![tap(1, 0, MAX_TAP_WEIGHT), tap(0, 1, 1)])
            .expect("within limits");
        let ramp: Vec<u8> = (0..8 * 8).map(|i| (i * 4) as u8).collect();
        let out = ErrorDiffusionDithering::new(heavy).apply(&PixelView::gray(8, 8, &ramp).expect("view"));
        assert!(out.data().iter().all(|&v| v == 0 || v == 255));
    }

    #[test]
    fn diffused_error_adds_up_to_the_residual() {
        for method in DitherMethod::ALL {
            let kernel = method.kernel();
            for error in -255..=255 {
                let spread: i32 = kernel
                    .taps()
                    .iter()
                    .map(|t| error * t.weight / kernel.divisor())
                    .sum();
                let drift = (spread - error).abs() as usize;
                assert!(
                    drift <= kernel.taps().len(),
                    "{} error={error} spread={spread}",
                    method.name()
                );
            }
        }
    }

    #[test]
    fn output_is_binary_and_corners_are_safe() {
        let data: Vec<u8> = (0..5 * 3).map(|i| (i * 17) as u8).collect();
        let view = PixelView::gray(5, 3, &data).expect("view");
        for method in DitherMethod::ALL {
            let out = ErrorDiffusionDithering::from(method).apply(&view);
            assert_eq!((out.width(), out.height()), (5, 3));
            assert!(out.data().iter().all(|&v| v == 0 || v == 255));
        }
        let one = [200u8];
        let out = ErrorDiffusionDithering::default().apply(&PixelView::gray(1, 1, &one).expect("1x1"));
        assert_eq!(out.data(), &[255]);
    }

    #[test]
    fn mid_gray_keeps_average_tone() {
        let data = vec![128u8; 32 * 32];
        let view = PixelView::gray(32, 32, &data).expect("view");
        let out = ErrorDiffusionDithering::default().apply(&view);
        let whites = out.data().iter().filter(|&&v| v == 255).count();
        let ratio = whites as f64 / data.len() as f64;
        assert!((0.4..=0.6).contains(&ratio), "white ratio {ratio}");
        assert_eq!(data, vec![128u8; 32 * 32]);
    }

    #[test]
    fn color_input_is_dithered_as_luma() {
        let data = vec![255u8; 3 * 3 * 4];
        let view = PixelView::from_slice(3, 3, 12, PixelFormat::Rgba32, &data).expect("view");
        let out = ErrorDiffusionDithering::from(DitherMethod::Sierra).apply(&view);
        assert_eq!(out.format(), PixelFormat::Gray8);
        assert!(out.data().iter().all(|&v| v == 255));
    }

    #[test]
    fn method_names_match_serde() {
        for method in DitherMethod::ALL {
            let json = serde_json::to_string(&method).expect("serialize");
            assert_eq!(json, format!("\"{}\"", method.name()));
        }
    }
}
