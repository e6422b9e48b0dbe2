//! Angle utilities for comparing line orientations given in degrees.
//!
//! Hough lines are parameterised by a normal angle in `[0, 180)`; a line at
//! `theta` and one at `theta + 180` with negated radius are the same line, so
//! orientation comparisons work modulo a half turn.

/// Normalizes an angle in degrees into the range [0, 180).
#[inline]
pub fn normalize_half_turn_deg(angle: f64) -> f64 {
    let norm = angle.rem_euclid(180.0);
    if norm >= 180.0 - 1e-9 {
        0.0
    } else {
        norm
    }
}

/// Smallest unsigned difference between two orientations in degrees,
/// treating directions 180° apart as equal. Returns a value in [0, 90].
#[inline]
pub fn angular_difference_deg(a: f64, b: f64) -> f64 {
    let diff = normalize_half_turn_deg(a - b);
    if diff > 90.0 {
        180.0 - diff
    } else {
        diff
    }
}
