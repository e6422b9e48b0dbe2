use crate::hough::circles::circle_offsets;
use crate::image::{ImageView, PixelBuffer, PixelFormat};
use serde::Deserialize;

/// Synthetic binary scene: straight segments and circles drawn one pixel
/// wide on a black Gray8 canvas.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub width: usize,
    pub height: usize,
    pub foreground: u8,
    pub segments: Vec<SegmentSpec>,
    pub circles: Vec<CircleSpec>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            width: 128,
            height: 128,
            foreground: 255,
            segments: Vec::new(),
            circles: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct SegmentSpec {
    pub from: [i64; 2],
    pub to: [i64; 2],
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct CircleSpec {
    pub center: [i64; 2],
    pub radius: u32,
}

impl SceneConfig {
    pub fn render(&self) -> PixelBuffer {
        let mut img = PixelBuffer::new(self.width, self.height, PixelFormat::Gray8);
        for seg in &self.segments {
            draw_segment(&mut img, seg.from, seg.to, self.foreground);
        }
        for circle in &self.circles {
            for (dx, dy) in circle_offsets(circle.radius) {
                let p = [circle.center[0] + dx as i64, circle.center[1] + dy as i64];
                plot(&mut img, p, self.foreground);
            }
        }
        img
    }
}

fn plot(img: &mut PixelBuffer, [x, y]: [i64; 2], value: u8) {
    if x >= 0 && y >= 0 && (x as usize) < img.width() && (y as usize) < img.height() {
        img.set(x as usize, y as usize, value);
    }
}

/// Bresenham segment, endpoints included; pixels off the canvas are dropped.
fn draw_segment(img: &mut PixelBuffer, from: [i64; 2], to: [i64; 2], value: u8) {
    let (mut x, mut y) = (from[0], from[1]);
    let dx = (to[0] - x).abs();
    let dy = -(to[1] - y).abs();
    let sx = if x < to[0] { 1 } else { -1 };
    let sy = if y < to[1] { 1 } else { -1 };
    let mut err = dx + dy;
    loop {
        plot(img, [x, y], value);
        if x == to[0] && y == to[1] {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}
