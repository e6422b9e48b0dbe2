use super::weights::{RangeWeights, SpatialWeights};
use crate::error::{Error, Result};
use crate::image::{ImageView, ImageViewMut, PixelBuffer, PixelView, Rect};
use log::debug;
use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::time::Instant;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Largest kernel size accepted at all.
pub const MAX_KERNEL_SIZE: u32 = 255;
/// Largest kernel size accepted while `limit_kernel_size` is set.
pub const SAFE_KERNEL_SIZE: u32 = 25;
const MIN_KERNEL_SIZE: u32 = 3;

/// Shaping parameters of [`BilateralSmoothing`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BilateralParams {
    /// Odd window size in `[3, 255]`.
    pub kernel_size: u32,
    pub spatial_factor: f64,
    pub spatial_power: f64,
    pub color_factor: f64,
    pub color_power: f64,
    /// Refuse kernels above 25, whose cost grows quadratically.
    pub limit_kernel_size: bool,
    /// Force the single-threaded interior pass.
    pub disable_parallel: bool,
}

impl Default for BilateralParams {
    fn default() -> Self {
        Self {
            kernel_size: 9,
            spatial_factor: 10.0,
            spatial_power: 2.0,
            color_factor: 50.0,
            color_power: 2.0,
            limit_kernel_size: true,
            disable_parallel: false,
        }
    }
}

fn check_kernel_size(size: u32, limit: bool) -> Result<()> {
    let reason = if size > MAX_KERNEL_SIZE {
        "kernel size must not exceed 255"
    } else if size < MIN_KERNEL_SIZE {
        "kernel size must be at least 3"
    } else if limit && size > SAFE_KERNEL_SIZE {
        "kernel size above 25 is refused while limit_kernel_size is set"
    } else if size % 2 == 0 {
        "kernel size must be odd"
    } else {
        return Ok(());
    };
    Err(Error::UnsupportedKernelSize { size, reason })
}

fn check_shape(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidArgument(format!(
            "{name} must be a positive finite number, got {value}"
        )))
    }
}

/// Bilateral smoothing for Gray8, Rgb24 and Rgba32 images.
///
/// Colour channels are filtered independently; alpha is copied through.
/// Interior pixels, whose window lies inside the image, take a path without
/// bounds checks that runs one row per task when the `parallel` feature is
/// enabled. Pixels near the border skip the samples that fall outside.
#[derive(Clone, Debug)]
pub struct BilateralSmoothing {
    params: BilateralParams,
    spatial: SpatialWeights,
    range: RangeWeights,
}

impl Default for BilateralSmoothing {
    fn default() -> Self {
        let params = BilateralParams::default();
        Self {
            spatial: spatial_table(&params),
            range: RangeWeights::new(params.color_factor, params.color_power),
            params,
        }
    }
}

fn spatial_table(params: &BilateralParams) -> SpatialWeights {
    SpatialWeights::new(
        params.kernel_size as usize,
        params.spatial_factor,
        params.spatial_power,
    )
}

impl BilateralSmoothing {
    pub fn new(params: BilateralParams) -> Result<Self> {
        check_kernel_size(params.kernel_size, params.limit_kernel_size)?;
        check_shape("spatialFactor", params.spatial_factor)?;
        check_shape("spatialPower", params.spatial_power)?;
        check_shape("colorFactor", params.color_factor)?;
        check_shape("colorPower", params.color_power)?;
        Ok(Self {
            spatial: spatial_table(&params),
            range: RangeWeights::new(params.color_factor, params.color_power),
            params,
        })
    }

    pub fn params(&self) -> &BilateralParams {
        &self.params
    }

    pub fn spatial_weights(&self) -> &SpatialWeights {
        &self.spatial
    }

    pub fn range_weights(&self) -> &RangeWeights {
        &self.range
    }

    pub fn set_kernel_size(&mut self, size: u32) -> Result<()> {
        check_kernel_size(size, self.params.limit_kernel_size)?;
        if size != self.params.kernel_size {
            self.params.kernel_size = size;
            self.spatial = spatial_table(&self.params);
        }
        Ok(())
    }

    pub fn set_spatial_factor(&mut self, factor: f64) -> Result<()> {
        check_shape("spatialFactor", factor)?;
        if factor != self.params.spatial_factor {
            self.params.spatial_factor = factor;
            self.spatial = spatial_table(&self.params);
        }
        Ok(())
    }

    pub fn set_spatial_power(&mut self, power: f64) -> Result<()> {
        check_shape("spatialPower", power)?;
        if power != self.params.spatial_power {
            self.params.spatial_power = power;
            self.spatial = spatial_table(&self.params);
        }
        Ok(())
    }

    pub fn set_color_factor(&mut self, factor: f64) -> Result<()> {
        check_shape("colorFactor", factor)?;
        if factor != self.params.color_factor {
            self.params.color_factor = factor;
            self.range = RangeWeights::new(factor, self.params.color_power);
        }
        Ok(())
    }

    pub fn set_color_power(&mut self, power: f64) -> Result<()> {
        check_shape("colorPower", power)?;
        if power != self.params.color_power {
            self.params.color_power = power;
            self.range = RangeWeights::new(self.params.color_factor, power);
        }
        Ok(())
    }

    /// Only gates later [`set_kernel_size`](Self::set_kernel_size) calls.
    pub fn set_limit_kernel_size(&mut self, limit: bool) {
        self.params.limit_kernel_size = limit;
    }

    pub fn set_disable_parallel(&mut self, disable: bool) {
        self.params.disable_parallel = disable;
    }

    fn should_parallelize(&self) -> bool {
        #[cfg(feature = "parallel")]
        {
            !self.params.disable_parallel && rayon::current_num_threads() > 1
        }
        #[cfg(not(feature = "parallel"))]
        {
            false
        }
    }

    /// Smooth `image` into a new buffer of the same format and size.
    pub fn apply(&self, image: &PixelView<'_>) -> Result<PixelBuffer> {
        let t0 = Instant::now();
        let mut out = image.to_owned_buffer();
        let (w, h) = (image.width(), image.height());
        let ks = self.params.kernel_size as usize;
        let kh = ks / 2;

        let path = if w <= ks || h <= ks {
            self.process_with_edge_checks(image, &mut out, Rect::full(w, h));
            "edge-checked"
        } else {
            let parallel = self.should_parallelize();
            self.process_interior(image, &mut out, parallel);
            self.process_with_edge_checks(image, &mut out, Rect::new(0, 0, w, kh));
            self.process_with_edge_checks(image, &mut out, Rect::new(0, h - kh, w, kh));
            self.process_with_edge_checks(image, &mut out, Rect::new(0, kh, kh, h - 2 * kh));
            self.process_with_edge_checks(image, &mut out, Rect::new(w - kh, kh, kh, h - 2 * kh));
            if parallel {
                "parallel interior"
            } else {
                "sequential interior"
            }
        };
        debug!(
            "Bilateral: {}x{} {} kernel={} path={} in {:.2} ms",
            w,
            h,
            image.format(),
            ks,
            path,
            t0.elapsed().as_secs_f64() * 1000.0
        );
        Ok(out)
    }

    fn process_interior(&self, src: &PixelView<'_>, out: &mut PixelBuffer, parallel: bool) {
        let ks = self.params.kernel_size as usize;
        let kh = ks / 2;
        let rows = kh..src.height() - kh;
        let cols = kh..src.width() - kh;

        if parallel {
            #[cfg(feature = "parallel")]
            {
                let row_bytes = out.row_bytes();
                out.data_mut()
                    .par_chunks_mut(row_bytes)
                    .enumerate()
                    .skip(rows.start)
                    .take(rows.len())
                    .for_each(|(y, dst_row)| {
                        self.smooth_row(src, y, cols.clone(), 0..ks, dst_row);
                    });
                return;
            }
        }

        for y in rows {
            self.smooth_row(src, y, cols.clone(), 0..ks, out.row_mut(y));
        }
    }

    /// Window rows are clipped once per output row, window columns once per pixel.
    fn process_with_edge_checks(&self, src: &PixelView<'_>, out: &mut PixelBuffer, rect: Rect) {
        let ks = self.params.kernel_size as usize;
        let kh = ks / 2;
        let (w, h) = (src.width(), src.height());
        let bpp = src.format().bytes_per_pixel();
        for y in rect.y..rect.bottom() {
            let ky = kh.saturating_sub(y)..ks.min(h + kh - y);
            let dst_row = out.row_mut(y);
            for x in rect.x..rect.right() {
                let kx = kh.saturating_sub(x)..ks.min(w + kh - x);
                self.smooth_pixel(src, x, y, kx, ky.clone(), &mut dst_row[x * bpp..]);
            }
        }
    }

    fn smooth_row(
        &self,
        src: &PixelView<'_>,
        y: usize,
        cols: Range<usize>,
        window: Range<usize>,
        dst_row: &mut [u8],
    ) {
        let bpp = src.format().bytes_per_pixel();
        for x in cols {
            self.smooth_pixel(src, x, y, window.clone(), window.clone(), &mut dst_row[x * bpp..]);
        }
    }

    /// Weighted average around `(x, y)` over window offsets `kx` x `ky`
    /// (kernel coordinates, `kh` is the centre); writes the colour channels
    /// of one pixel at the start of `dst`.
    fn smooth_pixel(
        &self,
        src: &PixelView<'_>,
        x: usize,
        y: usize,
        kx: Range<usize>,
        ky: Range<usize>,
        dst: &mut [u8],
    ) {
        let kh = self.params.kernel_size as usize / 2;
        let format = src.format();
        let bpp = format.bytes_per_pixel();
        let channels = format.color_channels();
        let center = src.pixel(x, y);

        // deviations from the centre keep flat regions exact
        let mut sum_w = [0.0f64; 3];
        let mut sum_wd = [0.0f64; 3];
        for j in ky {
            let row = src.row(y + j - kh);
            for i in kx.clone() {
                let spatial = self.spatial.get(i, j);
                let px = &row[(x + i - kh) * bpp..];
                for c in 0..channels {
                    let v = px[c];
                    let weight = spatial * self.range.get(v, center[c]);
                    sum_w[c] += weight;
                    sum_wd[c] += weight * (v as f64 - center[c] as f64);
                }
            }
        }
        for c in 0..channels {
            dst[c] = (center[c] as f64 + sum_wd[c] / sum_w[c]) as u8;
        }
    }
}
