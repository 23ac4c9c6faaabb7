//! Analysis configuration.

use std::f64::consts::{PI, TAU};
use std::path::Path;

use crate::divergence::CdfScaling;
use crate::error::{Result, RspError};
use crate::histogram::validate_width;

/// Sweep and scoring parameters.
///
/// `resolution` is shared by the sweep (number of scan angles) and the
/// per-window histogram (number of bins).
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RspConfig {
    /// Scanning window width in radians, in `(0, 2π]`.
    pub window_width: f64,
    /// Number of scan angles and histogram bins per window.
    pub resolution: usize,
    /// Half-open sweep range `[start, end)` in radians.
    pub angle_range: [f64; 2],
    /// Foreground CDF scaling policy.
    pub scaling: CdfScaling,
    /// Distribute scan angles over the rayon thread pool.
    pub parallel: bool,
}

impl Default for RspConfig {
    fn default() -> Self {
        Self {
            window_width: PI,
            resolution: 1000,
            angle_range: [0.0, TAU],
            scaling: CdfScaling::Absolute,
            parallel: true,
        }
    }
}

impl RspConfig {
    /// Check parameter ranges.
    pub fn validate(&self) -> Result<()> {
        validate_width(self.window_width)?;
        if self.resolution == 0 {
            return Err(RspError::InvalidResolution);
        }
        validate_angle_range(self.angle_range)
    }

    /// Angular step between consecutive scan angles.
    pub fn delta_theta(&self) -> f64 {
        (self.angle_range[1] - self.angle_range[0]) / self.resolution as f64
    }

    /// Load a config from a JSON file; missing fields take defaults.
    pub fn from_json_file(path: &Path) -> std::result::Result<Self, Box<dyn std::error::Error>> {
        let data = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }
}

fn validate_angle_range(range: [f64; 2]) -> Result<()> {
    let [start, end] = range;
    if start.is_finite() && end.is_finite() && end > start {
        Ok(())
    } else {
        Err(RspError::InvalidAngleRange { start, end })
    }
}

/// Foreground/background population selection parameters.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Entities with expression strictly above this value are foreground.
    pub threshold: f64,
    /// Restrict both populations to these cluster labels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_clusters: Option<Vec<i32>>,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            threshold: 1.0,
            selected_clusters: None,
        }
    }
}

/// Origin used for the polar projection.
#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VantagePoint {
    /// A caller-supplied coordinate.
    Explicit([f64; 2]),
    /// Mean of the background coordinates.
    #[default]
    BackgroundCentroid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = RspConfig::default();
        cfg.validate().unwrap();
        assert_eq!(cfg.scaling, CdfScaling::Absolute);
        assert!((cfg.delta_theta() - TAU / 1000.0).abs() < 1e-15);
    }

    #[test]
    fn validate_rejects_bad_values() {
        let mut cfg = RspConfig {
            resolution: 0,
            ..Default::default()
        };
        assert_eq!(cfg.validate(), Err(RspError::InvalidResolution));

        cfg.resolution = 10;
        cfg.window_width = 7.0;
        assert!(matches!(cfg.validate(), Err(RspError::InvalidWindow { .. })));

        cfg.window_width = 1.0;
        cfg.angle_range = [1.0, 1.0];
        assert!(matches!(
            cfg.validate(),
            Err(RspError::InvalidAngleRange { .. })
        ));
    }

    #[test]
    fn partial_json_takes_defaults() {
        let cfg: RspConfig = serde_json::from_str(r#"{ "resolution": 360 }"#).unwrap();
        assert_eq!(cfg.resolution, 360);
        assert_eq!(cfg.window_width, PI);
        assert!(cfg.parallel);

        let cfg: RspConfig = serde_json::from_str(r#"{ "scaling": "absolute" }"#).unwrap();
        assert_eq!(cfg.scaling, CdfScaling::Absolute);
        assert!(serde_json::from_str::<RspConfig>(r#"{ "scaling": "relative" }"#).is_err());
    }

    #[test]
    fn vantage_point_json_forms() {
        let v: VantagePoint = serde_json::from_str(r#"{ "explicit": [1.0, 2.0] }"#).unwrap();
        assert_eq!(v, VantagePoint::Explicit([1.0, 2.0]));
        let v: VantagePoint = serde_json::from_str(r#""background_centroid""#).unwrap();
        assert_eq!(v, VantagePoint::BackgroundCentroid);
    }
}
