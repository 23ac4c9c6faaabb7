//! Angular sweep producing the deviation signal.
//!
//! Both populations are projected once; every scan angle is then an
//! independent pure computation over the shared, read-only angle arrays.

use rayon::prelude::*;

use crate::angle::in_scanning_range;
use crate::config::RspConfig;
use crate::divergence::sample_divergence;
use crate::error::{Result, RspError};
use crate::histogram::ScanWindow;
use crate::polar::{project, PolarProjection};

/// Scan angles paired with their divergence values.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Sweep {
    /// Window centers, in sampling order.
    pub angles: Vec<f64>,
    /// Divergence per window center (≥ 0).
    pub signal: Vec<f64>,
}

/// `resolution` evenly spaced angles over `[start, end)`, right end excluded.
pub fn sample_angles(angle_range: [f64; 2], resolution: usize) -> Vec<f64> {
    let [start, end] = angle_range;
    let step = (end - start) / resolution as f64;
    (0..resolution).map(|i| start + i as f64 * step).collect()
}

fn angles_in_window(angles: &[f64], center: f64, width: f64) -> Vec<f64> {
    angles
        .iter()
        .copied()
        .filter(|&theta| in_scanning_range(theta, center, width))
        .collect()
}

/// Sweep already-projected populations.
pub fn sweep_projected(
    foreground: &PolarProjection,
    background: &PolarProjection,
    config: &RspConfig,
) -> Result<Sweep> {
    config.validate()?;
    let width = config.window_width;
    let resolution = config.resolution;
    let scaling = config.scaling;
    let angles = sample_angles(config.angle_range, resolution);

    let sample_at = |center: f64| -> f64 {
        let fg = angles_in_window(&foreground.angle, center, width);
        let bg = angles_in_window(&background.angle, center, width);
        let window = ScanWindow { center, width };
        sample_divergence(&fg, &bg, window, resolution, scaling)
    };

    let signal: Vec<f64> = if config.parallel {
        angles.par_iter().map(|&c| sample_at(c)).collect()
    } else {
        angles.iter().map(|&c| sample_at(c)).collect()
    };

    Ok(Sweep { angles, signal })
}

/// Project both populations around `vantage` and sweep the full angle range.
pub fn sweep(
    foreground: &[[f64; 2]],
    background: &[[f64; 2]],
    vantage: [f64; 2],
    config: &RspConfig,
) -> Result<Sweep> {
    if !vantage.iter().all(|v| v.is_finite()) {
        return Err(RspError::InvalidVantage {
            x: vantage[0],
            y: vantage[1],
        });
    }
    config.validate()?;

    let fg = project(foreground, vantage);
    let bg = project(background, vantage);
    if fg.is_empty() {
        tracing::warn!("foreground is empty; signal reduces to the background CDF area");
    }
    tracing::debug!(
        n_foreground = fg.len(),
        n_background = bg.len(),
        resolution = config.resolution,
        window_width = config.window_width,
        parallel = config.parallel,
        "sweeping"
    );
    sweep_projected(&fg, &bg, config)
}
