//! High-level analysis API.
//!
//! [`Analyzer`] is the primary entry point. It wraps an [`RspConfig`] and
//! runs the full pipeline: selection (optional) → projection → sweep →
//! scoring.

use crate::config::{RspConfig, SelectionConfig, VantagePoint};
use crate::error::{Result, RspError};
use crate::expression::ExpressionSource;
use crate::polar::centroid;
use crate::score::{equivalent_radius, score_for_config, AggregateScores};
use crate::select::{select_points, SelectedPoints};
use crate::sweep::sweep;
use crate::{GeneAnalysis, RspResult};

/// Primary analysis interface.
///
/// Create once, analyze many point sets.
///
/// # Examples
///
/// ```
/// use biorsp::{Analyzer, RspConfig};
///
/// let analyzer = Analyzer::with_config(RspConfig {
///     resolution: 90,
///     ..Default::default()
/// });
/// let background = vec![[1.0, 0.0], [0.0, 1.0], [-1.0, 0.0], [0.0, -1.0]];
/// let foreground = vec![[1.0, 0.0]];
/// let result = analyzer
///     .analyze_points(&foreground, &background, [0.0, 0.0])
///     .unwrap();
/// assert_eq!(result.signal.len(), 90);
/// assert!(result.area > 0.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    config: RspConfig,
}

impl Analyzer {
    /// Create an analyzer with default parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with full config control.
    pub fn with_config(config: RspConfig) -> Self {
        Self { config }
    }

    /// Access the current configuration.
    pub fn config(&self) -> &RspConfig {
        &self.config
    }

    /// Mutable access to configuration for post-construction tuning.
    pub fn config_mut(&mut self) -> &mut RspConfig {
        &mut self.config
    }

    /// Sweep and score two point sets around an explicit vantage point.
    pub fn analyze_points(
        &self,
        foreground: &[[f64; 2]],
        background: &[[f64; 2]],
        vantage: [f64; 2],
    ) -> Result<RspResult> {
        let sweep = sweep(foreground, background, vantage, &self.config)?;
        let scores = score_for_config(&sweep.signal, &self.config);
        tracing::debug!(
            area = scores.area,
            rmsd = scores.rmsd,
            deviation_score = scores.deviation_score,
            "scored sweep"
        );
        Ok(RspResult {
            area: scores.area,
            rmsd: scores.rmsd,
            deviation_score: scores.deviation_score,
            equivalent_radius: equivalent_radius(scores.area),
            vantage,
            angles: sweep.angles,
            signal: sweep.signal,
        })
    }

    /// Analyze already-selected populations, resolving the vantage point first.
    pub fn analyze_selection(
        &self,
        points: &SelectedPoints,
        vantage: VantagePoint,
    ) -> Result<RspResult> {
        let origin = resolve_vantage(vantage, &points.background)?;
        self.analyze_points(&points.foreground, &points.background, origin)
    }

    /// Select populations for `gene` and analyze them.
    pub fn analyze_gene<E: ExpressionSource + ?Sized>(
        &self,
        gene: &str,
        expression: &E,
        coordinates: &[[f64; 2]],
        cluster_labels: Option<&[i32]>,
        selection: &SelectionConfig,
        vantage: VantagePoint,
    ) -> Result<GeneAnalysis> {
        let points = select_points(gene, expression, coordinates, cluster_labels, selection)?;
        let result = self.analyze_selection(&points, vantage)?;
        Ok(GeneAnalysis {
            gene: gene.to_string(),
            n_foreground: points.foreground.len(),
            n_background: points.background.len(),
            result,
        })
    }

    /// Score an existing signal with this analyzer's angle range and resolution.
    pub fn score_signal(&self, signal: &[f64]) -> AggregateScores {
        score_for_config(signal, &self.config)
    }
}

/// Resolve a [`VantagePoint`] against the background population.
pub fn resolve_vantage(vantage: VantagePoint, background: &[[f64; 2]]) -> Result<[f64; 2]> {
    match vantage {
        VantagePoint::Explicit(v) => Ok(v),
        VantagePoint::BackgroundCentroid => {
            centroid(background).ok_or(RspError::EmptyPopulation { what: "background" })
        }
    }
}
