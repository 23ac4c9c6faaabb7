//! Circular angle helpers shared by projection, windowing and sweeping.

use std::f64::consts::{PI, TAU};

/// Wrap an angle into the half-open interval `[0, 2π)`.
///
/// `rem_euclid` may round up to exactly `2π` for tiny negative inputs; that
/// case is folded back to `0`.
#[inline]
pub fn wrap_angle(theta: f64) -> f64 {
    let r = theta.rem_euclid(TAU);
    if r >= TAU {
        0.0
    } else {
        r
    }
}

/// Unsigned circular distance between two angles, in `[0, π]`.
#[inline]
pub fn circular_distance(a: f64, b: f64) -> f64 {
    ((a - b + PI).rem_euclid(TAU) - PI).abs()
}

/// Whether `theta` lies within `width / 2` of `center` on the circle.
#[inline]
pub fn in_scanning_range(theta: f64, center: f64, width: f64) -> bool {
    circular_distance(theta, center) <= width / 2.0
}
