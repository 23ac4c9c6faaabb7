//! Cartesian → polar projection around a vantage point.

use nalgebra::{Point2, Vector2};
use std::f64::consts::TAU;

use crate::angle::wrap_angle;

/// Polar coordinates of a point set, sorted ascending by angle.
///
/// `radius[i]` and `angle[i]` describe the same point; the order is not the
/// input order.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PolarProjection {
    /// Euclidean distance from the vantage point (≥ 0).
    pub radius: Vec<f64>,
    /// Angle in `[0, 2π)` measured from +x towards +y.
    pub angle: Vec<f64>,
}

impl PolarProjection {
    /// Number of projected points.
    pub fn len(&self) -> usize {
        self.angle.len()
    }

    /// True when no points were projected.
    pub fn is_empty(&self) -> bool {
        self.angle.is_empty()
    }
}

/// Project `points` into polar coordinates relative to `vantage`.
///
/// Empty input yields an empty projection.
pub fn project(points: &[[f64; 2]], vantage: [f64; 2]) -> PolarProjection {
    if points.is_empty() {
        return PolarProjection::default();
    }
    let origin = Point2::new(vantage[0], vantage[1]);

    let mut polar: Vec<(f64, f64)> = points
        .iter()
        .map(|p| {
            let d: Vector2<f64> = Point2::new(p[0], p[1]) - origin;
            let theta = d.y.atan2(d.x);
            (d.norm(), wrap_angle(theta + TAU))
        })
        .collect();
    polar.sort_by(|a, b| a.1.total_cmp(&b.1));

    let (radius, angle) = polar.into_iter().unzip();
    PolarProjection { radius, angle }
}

/// Arithmetic mean of a point set, or `None` when empty.
pub fn centroid(points: &[[f64; 2]]) -> Option<[f64; 2]> {
    if points.is_empty() {
        return None;
    }
    let sum = points
        .iter()
        .fold(Vector2::zeros(), |acc: Vector2<f64>, p| {
            acc + Vector2::new(p[0], p[1])
        });
    let c = sum / points.len() as f64;
    Some([c.x, c.y])
}
