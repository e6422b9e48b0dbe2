use super::{relative_prefix, HoughMap};
use crate::angle::angular_difference_deg;
use crate::error::{Error, Result};
use crate::image::{ImageView, PixelBuffer, PixelFormat, PixelView, Rect};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::time::Instant;

pub const STEPS_PER_DEGREE_RANGE: (u32, u32) = (1, 10);
pub const LOCAL_PEAK_RADIUS_RANGE: (u32, u32) = (1, 10);

/// Tunables of [`HoughLineTransform`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HoughLineParams {
    /// Angular buckets per degree; the map spans `180 * steps_per_degree` rows.
    pub steps_per_degree: u32,
    /// Cells with fewer votes are never reported.
    pub min_line_intensity: u16,
    /// Half-width of the non-maximum suppression window, in cells.
    pub local_peak_radius: u32,
}

impl Default for HoughLineParams {
    fn default() -> Self {
        Self {
            steps_per_degree: 1,
            min_line_intensity: 10,
            local_peak_radius: 4,
        }
    }
}

impl HoughLineParams {
    /// Copy with every ranged field clamped into its valid interval.
    pub fn clamped(self) -> Self {
        Self {
            steps_per_degree: clamp_range(self.steps_per_degree, STEPS_PER_DEGREE_RANGE),
            local_peak_radius: clamp_range(self.local_peak_radius, LOCAL_PEAK_RADIUS_RANGE),
            ..self
        }
    }

    /// Reject out-of-range fields instead of clamping them.
    pub fn validate(&self) -> Result<()> {
        check_range("stepsPerDegree", self.steps_per_degree, STEPS_PER_DEGREE_RANGE)?;
        check_range("localPeakRadius", self.local_peak_radius, LOCAL_PEAK_RADIUS_RANGE)
    }
}

pub(crate) fn clamp_range(v: u32, (lo, hi): (u32, u32)) -> u32 {
    v.clamp(lo, hi)
}

pub(crate) fn check_range(name: &'static str, v: u32, (lo, hi): (u32, u32)) -> Result<()> {
    if (lo..=hi).contains(&v) {
        Ok(())
    } else {
        Err(Error::ParameterOutOfRange {
            name,
            value: v as i64,
            min: lo as i64,
            max: hi as i64,
        })
    }
}

/// Line found by [`HoughLineTransform`].
///
/// The line is the set of points `(x, y)`, measured from the image centre
/// with `y` pointing down, satisfying `x cos(theta) - y sin(theta) = radius`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HoughLine {
    /// Normal angle in degrees, `[0, 180)`.
    pub theta: f64,
    /// Signed distance from the image centre in pixels.
    pub radius: i32,
    /// Number of votes.
    pub intensity: u16,
    /// `intensity / max_intensity` of the map the line came from.
    pub relative_intensity: f64,
}

impl HoughLine {
    /// Orientation distance to another line in degrees, in `[0, 90]`.
    pub fn angle_to(&self, other: &HoughLine) -> f64 {
        angular_difference_deg(self.theta, other.theta)
    }
}

#[derive(Clone, Debug)]
struct LineAccumulator {
    map: HoughMap,
    lines: Vec<HoughLine>,
}

/// Hough line transform over binary Gray8 images.
///
/// Every non-zero pixel votes once per angle bucket. Peaks are cells that
/// reach `min_line_intensity` and have no strictly greater neighbour within
/// `local_peak_radius` cells. The window wraps around the angle axis with
/// the radius mirrored, since `(theta, r)` and `(theta + 180, -r)` describe
/// the same line.
#[derive(Clone, Debug)]
pub struct HoughLineTransform {
    params: HoughLineParams,
    sin_table: Vec<f64>,
    cos_table: Vec<f64>,
    result: Option<LineAccumulator>,
}

impl Default for HoughLineTransform {
    fn default() -> Self {
        Self::new(HoughLineParams::default())
    }
}

impl HoughLineTransform {
    /// Create a transform; out-of-range parameters are clamped.
    pub fn new(params: HoughLineParams) -> Self {
        let params = params.clamped();
        let (sin_table, cos_table) = trig_tables(params.steps_per_degree);
        Self {
            params,
            sin_table,
            cos_table,
            result: None,
        }
    }

    /// Create a transform, rejecting out-of-range parameters.
    pub fn try_new(params: HoughLineParams) -> Result<Self> {
        params.validate()?;
        Ok(Self::new(params))
    }

    pub fn params(&self) -> &HoughLineParams {
        &self.params
    }

    pub fn set_steps_per_degree(&mut self, steps: u32) {
        let steps = clamp_range(steps, STEPS_PER_DEGREE_RANGE);
        if steps != self.params.steps_per_degree {
            self.params.steps_per_degree = steps;
            (self.sin_table, self.cos_table) = trig_tables(steps);
        }
    }

    pub fn try_set_steps_per_degree(&mut self, steps: u32) -> Result<()> {
        check_range("stepsPerDegree", steps, STEPS_PER_DEGREE_RANGE)?;
        self.set_steps_per_degree(steps);
        Ok(())
    }

    pub fn set_min_line_intensity(&mut self, intensity: u16) {
        self.params.min_line_intensity = intensity;
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

    /// Build the accumulator for the whole image.
    pub fn process_image(&mut self, image: &PixelView<'_>) -> Result<()> {
        self.process_image_rect(image, Rect::full(image.width(), image.height()))
    }

    /// Build the accumulator for the pixels of `rect`; coordinates are
    /// measured from the centre of the rectangle.
    ///
    /// On error the previous result, if any, is kept.
    pub fn process_image_rect(&mut self, image: &PixelView<'_>, rect: Rect) -> Result<()> {
        image.format().require(PixelFormat::Gray8)?;
        rect.ensure_within(image.width(), image.height())?;
        let t0 = Instant::now();

        let half_w = (rect.width / 2) as isize;
        let half_h = (rect.height / 2) as isize;
        let half_hough = ((half_w * half_w + half_h * half_h) as f64).sqrt() as usize;
        let hough_width = half_hough * 2;
        let hough_height = self.sin_table.len();

        let mut map = HoughMap::new(hough_width, hough_height);
        let mut edge_pixels = 0usize;
        for y in 0..rect.height {
            let row = &image.row(rect.y + y)[rect.x..rect.right()];
            let cy = (y as isize - half_h) as f64;
            for (x, _) in row.iter().enumerate().filter(|&(_, &v)| v != 0) {
                edge_pixels += 1;
                let cx = (x as isize - half_w) as f64;
                for theta in 0..hough_height {
                    let r = (self.cos_table[theta] * cx - self.sin_table[theta] * cy).round()
                        as isize
                        + half_hough as isize;
                    if r >= 0 && (r as usize) < hough_width {
                        map.vote(r as usize, theta);
                    }
                }
            }
        }

        let lines = if map.max_intensity() == 0 {
            warn!(
                "HoughLines: no votes in {}x{} region ({} edge pixels)",
                rect.width, rect.height, edge_pixels
            );
            Vec::new()
        } else {
            self.collect_lines(&map)
        };
        debug!(
            "HoughLines: map {}x{} edge_px={} max={} lines={} in {:.2} ms",
            hough_width,
            hough_height,
            edge_pixels,
            map.max_intensity(),
            lines.len(),
            t0.elapsed().as_secs_f64() * 1000.0
        );
        self.result = Some(LineAccumulator { map, lines });
        Ok(())
    }

    fn collect_lines(&self, map: &HoughMap) -> Vec<HoughLine> {
        let max_theta = map.height() as isize;
        let max_radius = map.width() as isize;
        let half_hough = max_radius / 2;
        let peak_r = self.params.local_peak_radius as isize;
        let max = map.max_intensity() as f64;
        let steps = self.params.steps_per_degree as f64;

        let mut lines = Vec::new();
        for theta in 0..max_theta {
            for radius in 0..max_radius {
                let intensity = map.get(radius as usize, theta as usize);
                if intensity < self.params.min_line_intensity {
                    continue;
                }
                if !self.is_local_peak(map, theta, radius, intensity, peak_r) {
                    continue;
                }
                lines.push(HoughLine {
                    theta: theta as f64 / steps,
                    radius: (radius - half_hough) as i32,
                    intensity,
                    relative_intensity: intensity as f64 / max,
                });
            }
        }
        lines.sort_by(|a, b| b.intensity.cmp(&a.intensity));
        lines
    }

    fn is_local_peak(
        &self,
        map: &HoughMap,
        theta: isize,
        radius: isize,
        intensity: u16,
        peak_r: isize,
    ) -> bool {
        let max_theta = map.height() as isize;
        let max_radius = map.width() as isize;
        for tt in theta - peak_r..theta + peak_r {
            let (cycled_theta, cycled_radius) = if tt < 0 {
                (tt + max_theta, max_radius - radius)
            } else if tt >= max_theta {
                (tt - max_theta, max_radius - radius)
            } else {
                (tt, radius)
            };
            let row = map.row(cycled_theta as usize);
            for tr in cycled_radius - peak_r..cycled_radius + peak_r {
                if tr < 0 {
                    continue;
                }
                if tr >= max_radius {
                    break;
                }
                if row[tr as usize] > intensity {
                    return false;
                }
            }
        }
        true
    }

    fn result(&self) -> Result<&LineAccumulator> {
        self.result.as_ref().ok_or(Error::NotProcessed)
    }

    /// Accumulator of the last processed image.
    pub fn map(&self) -> Result<&HoughMap> {
        Ok(&self.result()?.map)
    }

    pub fn max_intensity(&self) -> Result<u16> {
        Ok(self.result()?.map.max_intensity())
    }

    pub fn lines_count(&self) -> Result<usize> {
        Ok(self.result()?.lines.len())
    }

    /// Up to `count` lines, strongest first.
    pub fn most_intensive_lines(&self, count: usize) -> Result<&[HoughLine]> {
        let lines = &self.result()?.lines;
        Ok(&lines[..count.min(lines.len())])
    }

    /// All lines whose relative intensity is at least `min_relative`.
    pub fn lines_by_relative_intensity(&self, min_relative: f64) -> Result<&[HoughLine]> {
        let lines = &self.result()?.lines;
        Ok(relative_prefix(lines, min_relative, |l| l.relative_intensity))
    }

    /// Accumulator rendered as Gray8 (radius along x, angle along y).
    pub fn to_image(&self) -> Result<PixelBuffer> {
        Ok(self.result()?.map.to_image())
    }
}

fn trig_tables(steps_per_degree: u32) -> (Vec<f64>, Vec<f64>) {
    let buckets = 180 * steps_per_degree as usize;
    let step = std::f64::consts::PI / buckets as f64;
    (0..buckets)
        .map(|i| {
            let a = i as f64 * step;
            (a.sin(), a.cos())
        })
        .unzip()
}

#[cfg(test)]
mod tests {
    use super::{HoughLine, HoughLineParams, HoughLineTransform};
    use crate::error::{Error, ErrorKind};
    use crate::image::{ImageView, PixelBuffer, PixelFormat, PixelView};

    fn draw_column(w: usize, h: usize, x: usize) -> PixelBuffer {
        let mut buf = PixelBuffer::new(w, h, PixelFormat::Gray8);
        for y in 0..h {
            buf.set(x, y, 255);
        }
        buf
    }

    #[test]
    fn setters_clamp_and_strict_setters_reject() {
        let mut t = HoughLineTransform::default();
        t.set_steps_per_degree(50);
        assert_eq!(t.params().steps_per_degree, 10);
        t.set_local_peak_radius(0);
        assert_eq!(t.params().local_peak_radius, 1);
        let err = t.try_set_local_peak_radius(11).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedConfiguration);
        assert_eq!(t.params().local_peak_radius, 1);
        assert!(HoughLineTransform::try_new(HoughLineParams {
            steps_per_degree: 0,
            ..HoughLineParams::default()
        })
        .is_err());
    }

    #[test]
    fn angle_between_lines_ignores_half_turns() {
        let line = |theta| HoughLine {
            theta,
            radius: 0,
            intensity: 1,
            relative_intensity: 1.0,
        };
        assert!((line(2.0).angle_to(&line(178.0)) - 4.0).abs() < 1e-9);
        assert!((line(30.0).angle_to(&line(120.0)) - 90.0).abs() < 1e-9);
        assert_eq!(line(45.0).angle_to(&line(45.0)), 0.0);
    }

    #[test]
    fn params_deserialize_with_defaults() {
        let p: HoughLineParams = serde_json::from_str(r#"{"minLineIntensity": 3}"#).expect("json");
        assert_eq!(p.min_line_intensity, 3);
        assert_eq!(p.steps_per_degree, 1);
        assert_eq!(p.local_peak_radius, 4);
    }

    #[test]
    fn vertical_line_peaks_at_zero_degrees() {
        let img = draw_column(40, 30, 30);
        let mut t = HoughLineTransform::default();
        t.process_image(&img.as_view()).expect("gray input");
        let top = t.most_intensive_lines(1).expect("processed");
        assert_eq!(top.len(), 1);
        let line = top[0];
        // x measured from centre: 30 - 20 = 10; ties keep scan order
        assert_eq!(line.theta, 0.0);
        assert_eq!(line.radius, 10);
        assert_eq!(line.intensity, 30);
        assert_eq!(line.relative_intensity, 1.0);
        assert_eq!(t.max_intensity().expect("processed"), 30);
    }

    #[test]
    fn horizontal_line_peaks_near_ninety_degrees() {
        let mut img = PixelBuffer::new(32, 32, PixelFormat::Gray8);
        for x in 0..32 {
            img.set(x, 8, 255);
        }
        let mut t = HoughLineTransform::new(HoughLineParams {
            steps_per_degree: 2,
            ..HoughLineParams::default()
        });
        t.process_image(&img.as_view()).expect("gray input");
        // neighbouring buckets tie on a plateau of 32 votes; all of them survive
        let strongest = t.lines_by_relative_intensity(1.0).expect("processed");
        assert!(strongest.iter().any(|l| l.theta == 90.0));
        for line in strongest {
            assert!((line.theta - 90.0).abs() <= 1.5, "theta={}", line.theta);
            // y measured from centre: 8 - 16 = -8, radius = -sin(90) * y
            assert_eq!(line.radius, 8);
        }
        assert_eq!(t.map().expect("processed").height(), 360);
    }

    #[test]
    fn lines_are_sorted_and_relative_prefix_holds() {
        let mut img = draw_column(48, 48, 10);
        for y in 0..24 {
            img.set(38, y, 255);
        }
        let mut t = HoughLineTransform::default();
        t.process_image(&img.as_view()).expect("gray input");
        let all = t.most_intensive_lines(usize::MAX).expect("processed");
        assert!(all.len() >= 2);
        assert!(all.windows(2).all(|w| w[0].intensity >= w[1].intensity));
        let strongest = t.lines_by_relative_intensity(1.0).expect("processed");
        assert!(!strongest.is_empty());
        assert!(strongest.iter().all(|l| l.intensity == 48));
        assert_eq!(t.lines_count().expect("processed"), all.len());
    }

    #[test]
    fn accessors_fail_before_processing() {
        let t = HoughLineTransform::default();
        assert_eq!(t.most_intensive_lines(3).unwrap_err(), Error::NotProcessed);
        assert_eq!(t.to_image().unwrap_err().kind(), ErrorKind::InvalidState);
        assert!(t.lines_by_relative_intensity(0.5).is_err());
        assert!(!t.is_processed());
    }

    #[test]
    fn failed_call_keeps_previous_result() {
        let img = draw_column(20, 20, 5);
        let mut t = HoughLineTransform::default();
        t.process_image(&img.as_view()).expect("gray input");
        let before = t.lines_count().expect("processed");

        let rgb = vec![0u8; 20 * 20 * 3];
        let view = PixelView::from_slice(20, 20, 60, PixelFormat::Rgb24, &rgb).expect("view");
        let err = t.process_image(&view).unwrap_err();
        assert!(matches!(err, Error::UnsupportedPixelFormat { .. }));
        assert_eq!(t.lines_count().expect("still processed"), before);
    }

    #[test]
    fn blank_image_has_no_lines() {
        let img = PixelBuffer::new(16, 16, PixelFormat::Gray8);
        let mut t = HoughLineTransform::new(HoughLineParams {
            min_line_intensity: 0,
            ..HoughLineParams::default()
        });
        t.process_image(&img.as_view()).expect("gray input");
        assert_eq!(t.max_intensity().expect("processed"), 0);
        assert!(t.most_intensive_lines(10).expect("processed").is_empty());
        let map_img = t.to_image().expect("processed");
        assert_eq!(map_img.width(), t.map().expect("processed").width());
        assert!(map_img.data().iter().all(|&v| v == 0));
    }

    #[test]
    fn wrap_around_suppresses_mirrored_duplicate() {
        // Slightly tilted near-vertical line: the true peak sits at a few
        // degrees, its mirrored twin at 179 degrees gets one vote less and
        // must be suppressed through the wrapped window.
        let mut img = PixelBuffer::new(40, 40, PixelFormat::Gray8);
        for y in 0..40 {
            img.set(if y < 20 { 21 } else { 22 }, y, 255);
        }
        let mut t = HoughLineTransform::default();
        t.process_image(&img.as_view()).expect("gray input");
        let found: Vec<_> = t
            .most_intensive_lines(usize::MAX)
            .expect("processed")
            .iter()
            .map(|l| (l.theta, l.radius, l.intensity))
            .collect();
        assert_eq!(found, vec![(2.0, 2, 21), (3.0, 2, 21), (4.0, 2, 21)]);
    }
}
