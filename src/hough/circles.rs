use super::lines::{check_range, clamp_range, LOCAL_PEAK_RADIUS_RANGE};
use super::{relative_prefix, HoughMap};
use crate::error::{Error, Result};
use crate::image::{ImageView, PixelBuffer, PixelFormat, PixelView};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::time::Instant;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HoughCircleParams {
    /// Radius of the circles to look for, in pixels.
    pub radius_to_detect: u32,
    pub min_circle_intensity: u16,
    pub local_peak_radius: u32,
}

impl Default for HoughCircleParams {
    fn default() -> Self {
        Self {
            radius_to_detect: 10,
            min_circle_intensity: 10,
            local_peak_radius: 4,
        }
    }
}

/// Circle centre found by [`HoughCircleTransform`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HoughCircle {
    pub x: usize,
    pub y: usize,
    pub radius: u32,
    pub intensity: u16,
    pub relative_intensity: f64,
}

#[derive(Clone, Debug)]
struct CircleAccumulator {
    map: HoughMap,
    circles: Vec<HoughCircle>,
}

/// Fixed-radius Hough circle transform over binary Gray8 images.
///
/// Every non-zero pixel votes along a midpoint circle of `radius_to_detect`
/// into a map the size of the image, so cells collect votes for circle
/// centres.
#[derive(Clone, Debug)]
pub struct HoughCircleTransform {
    params: HoughCircleParams,
    offsets: Vec<(i32, i32)>,
    result: Option<CircleAccumulator>,
}

impl Default for HoughCircleTransform {
    fn default() -> Self {
        Self::new(HoughCircleParams::default())
    }
}

impl HoughCircleTransform {
    pub fn new(params: HoughCircleParams) -> Self {
        let params = HoughCircleParams {
            local_peak_radius: clamp_range(params.local_peak_radius, LOCAL_PEAK_RADIUS_RANGE),
            ..params
        };
        Self {
            offsets: circle_offsets(params.radius_to_detect),
            params,
            result: None,
        }
    }

    pub fn try_new(params: HoughCircleParams) -> Result<Self> {
        check_range("localPeakRadius", params.local_peak_radius, LOCAL_PEAK_RADIUS_RANGE)?;
        Ok(Self::new(params))
    }

    pub fn params(&self) -> &HoughCircleParams {
        &self.params
    }

    pub fn set_min_circle_intensity(&mut self, intensity: u16) {
        self.params.min_circle_intensity = intensity;
    }

    pub fn set_local_peak_radius(&mut self, radius: u32) {
        self.params.local_peak_radius = clamp_range(radius, LOCAL_PEAK_RADIUS_RANGE);
    }

    pub fn try_set_local_peak_radius(&mut self, radius: u32) -> Result<()> {
        check_range("localPeakRadius", radius, LOCAL_PEAK_RADIUS_RANGE)?;
        self.set_local_peak_radius(radius);
        Ok(())
    }

    pub fn is_processed(&self) -> bool {
        self.result.is_some()
    }

    /// Build the centre accumulator; on error the previous result is kept.
    pub fn process_image(&mut self, image: &PixelView<'_>) -> Result<()> {
        image.format().require(PixelFormat::Gray8)?;
        let t0 = Instant::now();
        let (w, h) = (image.width(), image.height());

        let mut map = HoughMap::new(w, h);
        let mut edge_pixels = 0usize;
        for (y, row) in image.rows().enumerate() {
            for (x, _) in row.iter().enumerate().filter(|&(_, &v)| v != 0) {
                edge_pixels += 1;
                for &(dx, dy) in &self.offsets {
                    let tx = x as i64 + dx as i64;
                    let ty = y as i64 + dy as i64;
                    if tx >= 0 && ty >= 0 && (tx as usize) < w && (ty as usize) < h {
                        map.vote(tx as usize, ty as usize);
                    }
                }
            }
        }

        let circles = if map.max_intensity() == 0 {
            warn!("HoughCircles: no votes in {w}x{h} image ({edge_pixels} edge pixels)");
            Vec::new()
        } else {
            self.collect_circles(&map)
        };
        debug!(
            "HoughCircles: r={} edge_px={} max={} circles={} in {:.2} ms",
            self.params.radius_to_detect,
            edge_pixels,
            map.max_intensity(),
            circles.len(),
            t0.elapsed().as_secs_f64() * 1000.0
        );
        self.result = Some(CircleAccumulator { map, circles });
        Ok(())
    }

    fn collect_circles(&self, map: &HoughMap) -> Vec<HoughCircle> {
        let (w, h) = (map.width() as isize, map.height() as isize);
        let r = self.params.local_peak_radius as isize;
        let max = map.max_intensity() as f64;

        let mut circles = Vec::new();
        for y in 0..h {
            for x in 0..w {
                let intensity = map.get(x as usize, y as usize);
                if intensity < self.params.min_circle_intensity {
                    continue;
                }
                let ys = (y - r).max(0)..(y + r).min(h);
                let xs = (x - r).max(0) as usize..(x + r).min(w) as usize;
                let greater = ys
                    .into_iter()
                    .any(|ty| map.row(ty as usize)[xs.clone()].iter().any(|&v| v > intensity));
                if greater {
                    continue;
                }
                circles.push(HoughCircle {
                    x: x as usize,
                    y: y as usize,
                    radius: self.params.radius_to_detect,
                    intensity,
                    relative_intensity: intensity as f64 / max,
                });
            }
        }
        circles.sort_by(|a, b| b.intensity.cmp(&a.intensity));
        circles
    }

    fn result(&self) -> Result<&CircleAccumulator> {
        self.result.as_ref().ok_or(Error::NotProcessed)
    }

    pub fn map(&self) -> Result<&HoughMap> {
        Ok(&self.result()?.map)
    }

    pub fn max_intensity(&self) -> Result<u16> {
        Ok(self.result()?.map.max_intensity())
    }

    pub fn circles_count(&self) -> Result<usize> {
        Ok(self.result()?.circles.len())
    }

    pub fn most_intensive_circles(&self, count: usize) -> Result<&[HoughCircle]> {
        let circles = &self.result()?.circles;
        Ok(&circles[..count.min(circles.len())])
    }

    pub fn circles_by_relative_intensity(&self, min_relative: f64) -> Result<&[HoughCircle]> {
        let circles = &self.result()?.circles;
        Ok(relative_prefix(circles, min_relative, |c| c.relative_intensity))
    }

    pub fn to_image(&self) -> Result<PixelBuffer> {
        Ok(self.result()?.map.to_image())
    }
}

/// Offsets of the pixels on a midpoint-algorithm circle of `radius`, in
/// drawing order.
pub fn circle_offsets(radius: u32) -> Vec<(i32, i32)> {
    let r = radius as i32;
    let mut out = Vec::new();
    let (mut x, mut y) = (0i32, r);
    let mut p = (5 - r * 4) / 4;
    push_octants(&mut out, x, y);
    while x < y {
        x += 1;
        if p < 0 {
            p += 2 * x + 1;
        } else {
            y -= 1;
            p += 2 * (x - y) + 1;
        }
        push_octants(&mut out, x, y);
    }
    out
}

fn push_octants(out: &mut Vec<(i32, i32)>, x: i32, y: i32) {
    if x == 0 {
        out.extend([(0, y), (0, -y), (y, 0), (-y, 0)]);
    } else if x == y {
        out.extend([(x, y), (-x, y), (x, -y), (-x, -y)]);
    } else if x < y {
        out.extend([
            (x, y),
            (-x, y),
            (x, -y),
            (-x, -y),
            (y, x),
            (-y, x),
            (y, -x),
            (-y, -x),
        ]);
    }
}
