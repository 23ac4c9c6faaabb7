//! Windowed circular histogram and its cumulative distribution.
//!
//! A scan window is a contiguous arc of length `width` starting at
//! `center - width/2`. Angles inside the arc are shifted so the arc maps to
//! `[0, width]`, then counted into `resolution` equal bins.

use std::f64::consts::TAU;

use crate::angle::wrap_angle;
use crate::error::{Result, RspError};

/// Scanning window: center angle and angular width, both in radians.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScanWindow {
    /// Window center (any real value; only its value modulo 2π matters).
    pub center: f64,
    /// Arc length in `(0, 2π]`.
    pub width: f64,
}

impl ScanWindow {
    /// Build a window, rejecting widths outside `(0, 2π]`.
    pub fn new(center: f64, width: f64) -> Result<Self> {
        validate_width(width)?;
        Ok(Self { center, width })
    }

    /// Window start, wrapped into `[0, 2π)`.
    pub fn start(&self) -> f64 {
        wrap_angle(self.center - self.width / 2.0)
    }

    /// Window end, wrapped into `[0, 2π)`.
    pub fn end(&self) -> f64 {
        wrap_angle(self.center + self.width / 2.0)
    }

    /// True when the window covers the whole circle.
    pub fn is_full_circle(&self) -> bool {
        self.width >= TAU
    }

    /// Map an angle onto the window-local axis `[0, width]`.
    ///
    /// Returns `None` for angles outside the arc.
    #[inline]
    fn local_offset(&self, theta: f64, start: f64, end: f64) -> Option<f64> {
        if start <= end && !self.is_full_circle() {
            (theta >= start && theta <= end).then(|| theta - start)
        } else {
            // Arc straddles the 0/2π seam (or is the whole circle).
            let shifted = (theta - start).rem_euclid(TAU);
            (shifted <= self.width).then_some(shifted)
        }
    }
}

pub(crate) fn validate_width(width: f64) -> Result<()> {
    if width.is_finite() && width > 0.0 && width <= TAU {
        Ok(())
    } else {
        Err(RspError::InvalidWindow { width })
    }
}

/// Uniform bin edges over `[0, hi]`: `resolution + 1` values, last exactly `hi`.
fn bin_edges(hi: f64, resolution: usize) -> Vec<f64> {
    let step = hi / resolution as f64;
    let mut edges: Vec<f64> = (0..=resolution).map(|i| i as f64 * step).collect();
    edges[resolution] = hi;
    edges
}

/// Bin index for `v` in `[0, hi]`, with the last bin closed on the right.
///
/// The arithmetic estimate is corrected against the materialized edges so
/// that values sitting exactly on an edge land in the bin that edge opens.
#[inline]
fn bin_index(v: f64, edges: &[f64], norm: f64) -> usize {
    let n = edges.len() - 1;
    let mut idx = ((v * norm) as usize).min(n);
    if idx == n {
        idx -= 1;
    }
    if v < edges[idx] && idx > 0 {
        idx -= 1;
    } else if v >= edges[idx + 1] && idx != n - 1 {
        idx += 1;
    }
    idx
}

/// Count `angles` falling inside `window` into `resolution` equal bins.
///
/// Returns a zero-length vector when `resolution == 0`.
pub fn windowed_histogram(angles: &[f64], resolution: usize, window: ScanWindow) -> Vec<usize> {
    let mut bins = vec![0usize; resolution];
    if resolution == 0 {
        return bins;
    }
    let start = window.start();
    let end = window.end();
    let edges = bin_edges(window.width, resolution);
    let norm = resolution as f64 / window.width;

    for &theta in angles {
        let Some(v) = window.local_offset(theta, start, end) else {
            continue;
        };
        if !(0.0..=window.width).contains(&v) {
            continue;
        }
        bins[bin_index(v, &edges, norm)] += 1;
    }
    bins
}

/// Cumulative distribution of a histogram, normalized to end at 1.
///
/// An empty histogram (total count 0) yields all zeros.
pub fn cdf(bins: &[usize]) -> Vec<f64> {
    let total: usize = bins.iter().sum();
    if total == 0 {
        return vec![0.0; bins.len()];
    }
    let total = total as f64;
    let mut acc = 0usize;
    bins.iter()
        .map(|&c| {
            acc += c;
            acc as f64 / total
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

    #[test]
    fn window_rejects_bad_width() {
        assert!(ScanWindow::new(0.0, 0.0).is_err());
        assert!(ScanWindow::new(0.0, -1.0).is_err());
        assert!(ScanWindow::new(0.0, TAU + 1e-6).is_err());
        assert!(ScanWindow::new(0.0, f64::NAN).is_err());
        assert!(ScanWindow::new(0.0, TAU).is_ok());
    }

    #[test]
    fn non_wrapping_window_counts_inside_only() {
        let w = ScanWindow::new(PI, FRAC_PI_2).unwrap();
        // Window is [3π/4, 5π/4].
        let angles = [0.5, 2.4, 3.0, 3.2, 4.0, 5.0];
        let bins = windowed_histogram(&angles, 4, w);
        assert_eq!(bins.iter().sum::<usize>(), 3);
        // 2.4 - 3π/4 ≈ 0.044 → bin 0; 3.0 → bin 1; 3.2 → bin 2.
        assert_eq!(bins, vec![1, 1, 1, 0]);
    }

    #[test]
    fn wrapping_window_straddles_seam() {
        let w = ScanWindow::new(0.0, FRAC_PI_2).unwrap();
        assert!(w.start() > w.end());
        let angles = [TAU - 0.9, TAU - 0.1, 0.1, 0.9, PI];
        let bins = windowed_histogram(&angles, 2, w);
        // TAU-0.1 sits in the first half of the arc, 0.1 in the second.
        assert_eq!(bins, vec![1, 1]);
    }

    #[test]
    fn window_start_is_inclusive() {
        let w = ScanWindow::new(PI, FRAC_PI_2).unwrap();
        let start = w.start();
        let end = w.end();
        let bins = windowed_histogram(&[start, end - 1e-12], 4, w);
        assert_eq!(bins[0], 1);
        assert_eq!(bins[3], 1);
    }

    #[test]
    fn center_representation_does_not_matter() {
        let angles: Vec<f64> = (0..97).map(|i| 0.013 + i as f64 * 0.0647).collect();
        let a = windowed_histogram(&angles, 16, ScanWindow::new(0.0, PI).unwrap());
        let b = windowed_histogram(&angles, 16, ScanWindow::new(TAU, PI).unwrap());
        assert_eq!(a, b);
        assert!(a.iter().sum::<usize>() > 0);
    }

    #[test]
    fn full_circle_window_keeps_everything() {
        let angles = [0.0, FRAC_PI_2, PI, 3.0 * FRAC_PI_2];
        let bins = windowed_histogram(&angles, 4, ScanWindow::new(0.0, TAU).unwrap());
        assert_eq!(bins.iter().sum::<usize>(), 4);
    }

    #[test]
    fn bin_index_respects_edges() {
        let edges = bin_edges(1.0, 4);
        let norm = 4.0;
        assert_eq!(bin_index(0.0, &edges, norm), 0);
        assert_eq!(bin_index(0.25, &edges, norm), 1);
        assert_eq!(bin_index(0.2499, &edges, norm), 0);
        assert_eq!(bin_index(1.0, &edges, norm), 3);
    }

    #[test]
    fn cdf_normalizes_and_handles_empty() {
        let c = cdf(&[1, 0, 3]);
        assert_abs_diff_eq!(c[0], 0.25);
        assert_abs_diff_eq!(c[1], 0.25);
        assert_abs_diff_eq!(c[2], 1.0);
        assert_eq!(cdf(&[0, 0, 0]), vec![0.0; 3]);
        assert!(cdf(&[]).is_empty());
    }

    #[test]
    fn quarter_window_bin_count() {
        let w = ScanWindow::new(FRAC_PI_4, FRAC_PI_2).unwrap();
        let bins = windowed_histogram(&[0.1, 0.2, 1.5], 10, w);
        assert_eq!(bins.len(), 10);
        assert_eq!(bins.iter().sum::<usize>(), 3);
    }
}
