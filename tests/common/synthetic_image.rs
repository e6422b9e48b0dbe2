#![allow(dead_code)]

use hough_filters::{PixelBuffer, PixelFormat};
use rand::prelude::*;

/// Generates a simple high-contrast checkerboard image.
pub fn checkerboard_u8(width: usize, height: usize, cell: usize) -> Vec<u8> {
    assert!(width > 0 && height > 0, "image dimensions must be positive");
    assert!(cell > 0, "cell size must be positive");

    let mut img = vec![0u8; width * height];
    for y in 0..height {
        for x in 0..width {
            let sum = x / cell + y / cell;
            img[y * width + x] = if sum & 1 == 0 { 32u8 } else { 220u8 };
        }
    }
    img
}

/// Gray8 canvas filled with `background` and a one-pixel 45° diagonal from
/// `(start, start)` to `(end, end)` inclusive.
pub fn diagonal_u8(size: usize, start: usize, end: usize, background: u8, line: u8) -> PixelBuffer {
    assert!(start <= end && end < size, "diagonal must fit the canvas");
    let mut img = PixelBuffer::filled(size, size, PixelFormat::Gray8, background);
    for t in start..=end {
        img.set(t, t, line);
    }
    img
}

/// Gray8 canvas with a full-height vertical line at column `x`.
pub fn vertical_line_u8(width: usize, height: usize, x: usize) -> PixelBuffer {
    let mut img = PixelBuffer::new(width, height, PixelFormat::Gray8);
    for y in 0..height {
        img.set(x, y, 255);
    }
    img
}

/// Vertical step edge: columns left of `edge_x` hold `left`, the rest `right`.
pub fn step_edge_u8(width: usize, height: usize, edge_x: usize, left: u8, right: u8) -> PixelBuffer {
    let mut img = PixelBuffer::new(width, height, PixelFormat::Gray8);
    for y in 0..height {
        for x in 0..width {
            img.set(x, y, if x < edge_x { left } else { right });
        }
    }
    img
}

/// Seeded uniform noise, `len` bytes long.
pub fn noise_bytes(len: usize, seed: u64) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len).map(|_| rng.gen::<u8>()).collect()
}
