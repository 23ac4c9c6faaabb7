//! Foreground/background population selection.

use crate::config::SelectionConfig;
use crate::error::{Result, RspError};
use crate::expression::ExpressionSource;

/// Coordinates of the two populations being compared.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SelectedPoints {
    /// Entities expressing the gene above threshold (within the selected clusters).
    pub foreground: Vec<[f64; 2]>,
    /// Reference population: all entities, or those in the selected clusters.
    pub background: Vec<[f64; 2]>,
}

/// Split `coordinates` into foreground and background for `gene`.
///
/// `coordinates`, `cluster_labels` and the expression values are
/// index-aligned. Foreground membership is `expression > threshold`
/// (strict); with `selected_clusters` set, both populations are restricted to
/// entities whose label is in that list.
pub fn select_points<E: ExpressionSource + ?Sized>(
    gene: &str,
    expression: &E,
    coordinates: &[[f64; 2]],
    cluster_labels: Option<&[i32]>,
    selection: &SelectionConfig,
) -> Result<SelectedPoints> {
    if let Some(labels) = cluster_labels {
        if labels.len() != coordinates.len() {
            return Err(RspError::DimensionMismatch {
                what: "cluster labels",
                expected: coordinates.len(),
                got: labels.len(),
            });
        }
    }
    let values = expression
        .gene_expression(gene)
        .ok_or_else(|| RspError::InvalidGene {
            gene: gene.to_string(),
        })?;
    if values.len() != coordinates.len() {
        return Err(RspError::DimensionMismatch {
            what: "expression values",
            expected: coordinates.len(),
            got: values.len(),
        });
    }

    let cluster_filter = match (selection.selected_clusters.as_deref(), cluster_labels) {
        (None, _) => None,
        (Some(selected), Some(labels)) => Some((selected, labels)),
        (Some(_), None) => return Err(RspError::MissingClusterLabels),
    };

    let mut points = SelectedPoints::default();
    for (i, (&xy, &value)) in coordinates.iter().zip(values).enumerate() {
        if let Some((selected, labels)) = cluster_filter {
            if !selected.contains(&labels[i]) {
                continue;
            }
        }
        points.background.push(xy);
        if value > selection.threshold {
            points.foreground.push(xy);
        }
    }

    tracing::debug!(
        gene,
        n_foreground = points.foreground.len(),
        n_background = points.background.len(),
        threshold = selection.threshold,
        "selected populations"
    );
    Ok(points)
}
