use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, VertexError};
use crate::models::{LabelColor, Subset};

/// Which corner detector feeds the clustering stage
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum CornerDetectorKind {
    #[default]
    Harris,
    Fast,
}

/// Parameters for the detect and refine actions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionParams {
    /// Cluster merge radius in pixels
    pub merge_radius: f64,
    /// Duplicate suppression distance in pixels
    pub min_distance: f64,
    /// Neighbor count at which a point becomes a junction
    pub junction_threshold: usize,
    pub detector: CornerDetectorKind,
    pub max_corners: usize,
}

impl Default for DetectionParams {
    fn default() -> Self {
        Self {
            merge_radius: 10.0,
            min_distance: 8.0,
            junction_threshold: 3,
            detector: CornerDetectorKind::Harris,
            max_corners: 2000,
        }
    }
}

impl DetectionParams {
    /// Second, tighter duplicate suppression pass
    pub fn tight_min_distance(&self) -> f64 {
        self.min_distance * 0.8
    }

    /// Minimum spacing handed to the corner detector
    pub fn corner_spacing(&self) -> f64 {
        (self.min_distance * 0.7).floor()
    }

    pub fn validate(&self) -> Result<()> {
        check_range("merge_radius", self.merge_radius, 3.0, 30.0)?;
        check_range("min_distance", self.min_distance, 2.0, 20.0)?;
        check_range("junction_threshold", self.junction_threshold as f64, 2.0, 8.0)?;
        if self.max_corners == 0 {
            return Err(VertexError::InvalidConfig(
                "max_corners must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Parameters for ordering and labelling; changing these never re-runs detection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderParams {
    pub subset: Subset,
    /// Row band tolerance as a fraction of the point cloud height
    pub row_tolerance: f64,
    pub color: LabelColor,
    pub font_scale: f64,
    pub thickness: u32,
}

impl Default for RenderParams {
    fn default() -> Self {
        Self {
            subset: Subset::All,
            row_tolerance: 0.04,
            color: LabelColor::Red,
            font_scale: 0.7,
            thickness: 2,
        }
    }
}

impl RenderParams {
    pub fn validate(&self) -> Result<()> {
        check_range("row_tolerance", self.row_tolerance, 0.01, 0.15)?;
        check_range("font_scale", self.font_scale, 0.3, 2.5)?;
        check_range("thickness", self.thickness as f64, 1.0, 5.0)?;
        Ok(())
    }
}

/// Full configuration file layout
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub detection: DetectionParams,
    pub render: RenderParams,
}

impl Config {
    /// Load a JSON config; missing keys fall back to defaults
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&contents).map_err(|e| {
            VertexError::InvalidConfig(format!("{}: {}", path.display(), e))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.detection.validate()?;
        self.render.validate()
    }
}

fn check_range(name: &str, value: f64, min: f64, max: f64) -> Result<()> {
    if !(min..=max).contains(&value) {
        return Err(VertexError::InvalidConfig(format!(
            "{} = {} is outside [{}, {}]",
            name, value, min, max
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: Config =
            serde_json::from_str(r#"{ "detection": { "merge_radius": 12.5 } }"#).unwrap();
        assert_eq!(config.detection.merge_radius, 12.5);
        assert_eq!(config.detection.min_distance, 8.0);
        assert_eq!(config.render, RenderParams::default());
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let params = DetectionParams {
            junction_threshold: 1,
            ..Default::default()
        };
        assert!(matches!(params.validate(), Err(VertexError::InvalidConfig(_))));

        let render = RenderParams {
            font_scale: 3.0,
            ..Default::default()
        };
        assert!(render.validate().is_err());
    }

    #[test]
    fn corner_spacing_truncates() {
        let params = DetectionParams::default();
        assert_eq!(params.corner_spacing(), 5.0);
        assert!((params.tight_min_distance() - 6.4).abs() < 1e-12);
    }
}
