//! biorsp: radar-scanning spatial bias statistics for 2D embeddings.
//!
//! Measures whether a foreground subset of points (e.g. cells expressing a
//! gene) is distributed non-uniformly in angle around a vantage point,
//! relative to a background population. The pipeline stages are:
//!
//! 1. **Select** – split index-aligned coordinates into foreground and
//!    background by expression threshold and optional cluster membership.
//! 2. **Project** – polar coordinates around the vantage point, sorted by angle.
//! 3. **Sweep** – for each scan angle, build windowed foreground/background
//!    CDFs and integrate their absolute difference (the deviation signal).
//! 4. **Score** – polar area, RMSD and deviation score of the signal.
//!
//! # Public API
//! - [`Analyzer`] as the primary entry point, configured by [`RspConfig`]
//! - [`ExpressionSource`] / [`ExpressionMatrix`] for the expression lookup
//! - the individual stages ([`project`], [`windowed_histogram`],
//!   [`sample_divergence`], [`sweep()`], [`score()`]) for callers that need
//!   intermediate results
//!
//! No I/O, plotting, embedding or clustering happens here.

mod angle;
mod api;
mod config;
mod divergence;
mod error;
mod expression;
mod histogram;
mod polar;
mod score;
mod select;
mod sweep;

#[cfg(test)]
pub(crate) mod test_utils;

pub use angle::{circular_distance, in_scanning_range, wrap_angle};
pub use api::{resolve_vantage, Analyzer};
pub use config::{RspConfig, SelectionConfig, VantagePoint};
pub use divergence::{sample_divergence, trapezoid, window_cdfs, CdfScaling, WindowCdfs};
pub use error::{Result, RspError};
pub use expression::{ExpressionMatrix, ExpressionSource};
pub use histogram::{cdf, windowed_histogram, ScanWindow};
pub use polar::{centroid, project, PolarProjection};
pub use score::{
    equivalent_radius, overlap_profile, score, score_for_config, score_with_step,
    AggregateScores,
};
pub use select::{select_points, SelectedPoints};
pub use sweep::{sample_angles, sweep, sweep_projected, Sweep};

/// Full analysis result for one foreground/background pair.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RspResult {
    /// Polar area enclosed by the deviation signal.
    pub area: f64,
    /// Root-mean-square of the deviation signal.
    pub rmsd: f64,
    /// Share of the signal contained in the equivalent circle (0 when `area == 0`).
    pub deviation_score: f64,
    /// Radius of the circle with the same area as the signal profile.
    pub equivalent_radius: f64,
    /// Vantage point the populations were projected around.
    pub vantage: [f64; 2],
    /// Scan angles in radians, in sampling order.
    pub angles: Vec<f64>,
    /// Deviation signal, one value per scan angle.
    pub signal: Vec<f64>,
}

impl RspResult {
    /// The scalar summaries without the signal.
    pub fn scores(&self) -> AggregateScores {
        AggregateScores {
            area: self.area,
            rmsd: self.rmsd,
            deviation_score: self.deviation_score,
        }
    }

    /// `min(signal, equivalent_radius)` per scan angle.
    pub fn overlap(&self) -> Vec<f64> {
        overlap_profile(&self.signal, self.equivalent_radius)
    }
}

/// Result of a gene-driven analysis.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GeneAnalysis {
    /// Gene the foreground was selected by.
    pub gene: String,
    /// Foreground population size.
    pub n_foreground: usize,
    /// Background population size.
    pub n_background: usize,
    /// Sweep and scores.
    pub result: RspResult,
}
