//! Aggregate statistics over a deviation signal.
//!
//! The signal is treated as a radial profile: sample `i` is the radius of a
//! circular sector of angular width `Δθ`.

use std::f64::consts::PI;

use crate::config::RspConfig;

/// Scalar summaries of a deviation signal.
#[derive(Debug, Clone, Copy, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AggregateScores {
    /// Polar area enclosed by the signal profile (≥ 0).
    pub area: f64,
    /// Root-mean-square of the signal (≥ 0).
    pub rmsd: f64,
    /// Share of the profile contained in the equivalent circle; 0 when `area == 0`.
    pub deviation_score: f64,
}

/// Radius of the circle whose area equals `area`.
pub fn equivalent_radius(area: f64) -> f64 {
    (area / PI).sqrt()
}

/// Per-sample `min(signal_i, radius)`: the part of the profile inside the circle.
pub fn overlap_profile(signal: &[f64], radius: f64) -> Vec<f64> {
    signal.iter().map(|&s| s.min(radius)).collect()
}

/// Reduce `signal`, sampled with step `delta_theta`, to area, RMSD and
/// deviation score.
///
/// An empty signal scores all zeros.
pub fn score_with_step(signal: &[f64], delta_theta: f64) -> AggregateScores {
    if signal.is_empty() {
        return AggregateScores::default();
    }
    let sum_sq: f64 = signal.iter().map(|s| s * s).sum();
    let area = 0.5 * delta_theta * sum_sq;
    let rmsd = (sum_sq / signal.len() as f64).sqrt();

    let deviation_score = if area != 0.0 {
        let radius = equivalent_radius(area);
        let inside: f64 = signal.iter().map(|&s| s.min(radius)).sum();
        inside * delta_theta / area
    } else {
        0.0
    };

    AggregateScores {
        area,
        rmsd,
        deviation_score,
    }
}

/// Score a signal sampled over `angle_range` with `resolution` samples.
pub fn score(signal: &[f64], angle_range: [f64; 2], resolution: usize) -> AggregateScores {
    if resolution == 0 {
        return AggregateScores::default();
    }
    let delta_theta = (angle_range[1] - angle_range[0]) / resolution as f64;
    score_with_step(signal, delta_theta)
}

/// Score a signal produced with `config`.
pub fn score_for_config(signal: &[f64], config: &RspConfig) -> AggregateScores {
    score_with_step(signal, config.delta_theta())
}
