//! Crate error type.

use thiserror::Error;

/// Errors surfaced by selection, configuration and matrix construction.
///
/// Degenerate numeric inputs (empty point sets, empty windows, zero area)
/// are not errors; they produce defined zero outputs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RspError {
    /// Requested gene is absent from the expression data.
    #[error("gene '{gene}' not found in the expression data")]
    InvalidGene {
        /// Gene name that was looked up.
        gene: String,
    },
    /// Two index-aligned inputs disagree in length.
    #[error("{what}: expected {expected} entries, got {got}")]
    DimensionMismatch {
        /// Which input disagreed.
        what: &'static str,
        /// Length implied by the coordinate array.
        expected: usize,
        /// Length actually provided.
        got: usize,
    },
    /// A cluster filter was requested without per-entity cluster labels.
    #[error("selected clusters were given but no cluster labels are available")]
    MissingClusterLabels,
    /// An operation that needs at least one point received none.
    #[error("{what} is empty")]
    EmptyPopulation {
        /// Which population was empty.
        what: &'static str,
    },
    /// Scan window width outside `(0, 2π]`.
    #[error("scan window width must be in (0, 2π], got {width}")]
    InvalidWindow {
        /// Offending width in radians.
        width: f64,
    },
    /// Sweep or histogram resolution of zero.
    #[error("resolution must be at least 1")]
    InvalidResolution,
    /// Angle range that is not finite or not increasing.
    #[error("angle range must be finite with end > start, got [{start}, {end}]")]
    InvalidAngleRange {
        /// Range start in radians.
        start: f64,
        /// Range end in radians.
        end: f64,
    },
    /// Vantage point with a non-finite coordinate.
    #[error("vantage point must be finite, got ({x}, {y})")]
    InvalidVantage {
        /// Vantage x.
        x: f64,
        /// Vantage y.
        y: f64,
    },
    /// Malformed expression matrix input.
    #[error("invalid expression matrix: {0}")]
    InvalidMatrix(String),
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, RspError>;
