//! Per-window foreground/background divergence.

use crate::histogram::{cdf, windowed_histogram, ScanWindow};

/// Policy for rescaling the foreground CDF before comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CdfScaling {
    /// Scale the foreground CDF by `fg_count / bg_count` inside the window,
    /// so it reflects absolute abundance relative to the background.
    ///
    /// No scaling is applied when the window holds no background points.
    #[default]
    Absolute,
}

/// Foreground and background CDFs over one window, after scaling.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowCdfs {
    /// Foreground CDF, scaled per [`CdfScaling`].
    pub foreground: Vec<f64>,
    /// Background CDF (ends at 1, or all zeros for an empty window).
    pub background: Vec<f64>,
}

/// Build the scaled CDF pair for one scan window.
pub fn window_cdfs(
    fg_angles: &[f64],
    bg_angles: &[f64],
    window: ScanWindow,
    resolution: usize,
    scaling: CdfScaling,
) -> WindowCdfs {
    let fg_hist = windowed_histogram(fg_angles, resolution, window);
    let bg_hist = windowed_histogram(bg_angles, resolution, window);

    let mut foreground = cdf(&fg_hist);
    let background = cdf(&bg_hist);

    match scaling {
        CdfScaling::Absolute => {
            let bg_total: usize = bg_hist.iter().sum();
            if bg_total > 0 {
                let fg_total: usize = fg_hist.iter().sum();
                let factor = fg_total as f64 / bg_total as f64;
                foreground.iter_mut().for_each(|v| *v *= factor);
            }
        }
    }

    WindowCdfs {
        foreground,
        background,
    }
}

/// Trapezoidal integral of uniformly spaced samples with step `dx`.
///
/// Fewer than two samples integrate to zero.
pub fn trapezoid(values: &[f64], dx: f64) -> f64 {
    values
        .windows(2)
        .map(|w| (w[0] + w[1]) * 0.5)
        .sum::<f64>()
        * dx
}

/// Area between the foreground and background CDFs inside `window`.
///
/// Always ≥ 0.
pub fn sample_divergence(
    fg_angles: &[f64],
    bg_angles: &[f64],
    window: ScanWindow,
    resolution: usize,
    scaling: CdfScaling,
) -> f64 {
    if resolution == 0 {
        return 0.0;
    }
    let cdfs = window_cdfs(fg_angles, bg_angles, window, resolution, scaling);
    let abs_diff: Vec<f64> = cdfs
        .background
        .iter()
        .zip(&cdfs.foreground)
        .map(|(b, f)| (b - f).abs())
        .collect();
    trapezoid(&abs_diff, window.width / resolution as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn window(center: f64, width: f64) -> ScanWindow {
        ScanWindow::new(center, width).unwrap()
    }

    #[test]
    fn trapezoid_matches_hand_computation() {
        assert_abs_diff_eq!(trapezoid(&[0.0, 1.0, 2.0], 0.5), 1.0);
        assert_abs_diff_eq!(trapezoid(&[3.0], 1.0), 0.0);
        assert_abs_diff_eq!(trapezoid(&[], 1.0), 0.0);
    }

    #[test]
    fn identical_populations_do_not_diverge() {
        let angles = [2.5, 2.9, 3.1, 3.3, 3.6];
        let d = sample_divergence(&angles, &angles, window(PI, FRAC_PI_2), 32, CdfScaling::Absolute);
        assert_eq!(d, 0.0);
    }

    #[test]
    fn absolute_scaling_uses_count_ratio() {
        let bg = [2.5, 2.9, 3.1, 3.3];
        let fg = [2.5];
        let cdfs = window_cdfs(&fg, &bg, window(PI, FRAC_PI_2), 8, CdfScaling::Absolute);
        // One foreground point against four background points.
        assert_abs_diff_eq!(*cdfs.foreground.last().unwrap(), 0.25);
        assert_abs_diff_eq!(*cdfs.background.last().unwrap(), 1.0);
    }

    #[test]
    fn empty_background_leaves_foreground_unscaled() {
        let fg = [3.0, 3.2];
        let cdfs = window_cdfs(&fg, &[], window(PI, FRAC_PI_2), 8, CdfScaling::Absolute);
        assert_abs_diff_eq!(*cdfs.foreground.last().unwrap(), 1.0);
        assert!(cdfs.background.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn empty_foreground_integrates_background_cdf() {
        let bg = [2.5, 2.9, 3.1, 3.3, 3.6];
        let w = window(PI, FRAC_PI_2);
        let res = 16;
        let d = sample_divergence(&[], &bg, w, res, CdfScaling::Absolute);
        let bg_cdf = cdf(&windowed_histogram(&bg, res, w));
        assert_abs_diff_eq!(d, trapezoid(&bg_cdf, w.width / res as f64), epsilon = 1e-15);
        assert!(d > 0.0);
    }

    #[test]
    fn divergence_is_non_negative() {
        let bg: Vec<f64> = (0..50).map(|i| i as f64 * 0.12).collect();
        let fg: Vec<f64> = (0..7).map(|i| 0.4 + i as f64 * 0.9).collect();
        for k in 0..24 {
            let d = sample_divergence(&fg, &bg, window(k as f64 * 0.26, 1.3), 20, CdfScaling::Absolute);
            assert!(d >= 0.0);
        }
    }

    #[test]
    fn scaling_serializes_as_snake_case() {
        let s = serde_json::to_string(&CdfScaling::Absolute).unwrap();
        assert_eq!(s, "\"absolute\"");
    }
}
