//! Inspection settings.
//!
//! Settings JSON follows a versioned schema (`cratecheck.settings.v1`). The
//! file is parsed into [`InspectionConfig`] and validated once, before any
//! analyzer is built; out-of-domain values are rejected eagerly.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Schema tag accepted by [`InspectionConfig::from_json_str`].
pub const SETTINGS_SCHEMA_V1: &str = "cratecheck.settings.v1";

/// Upper Canny threshold used when locating the crate region.
pub const EDGE_UPPER_THRESHOLD: f32 = 255.0;

/// Working image size the input is resized to before analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

/// Slot grid dimensions of the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GridConfig {
    pub rows: u32,
    pub cols: u32,
}

/// Fraction of the detected crate region trimmed from each side, per axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FeatherConfig {
    pub x: f64,
    pub y: f64,
}

/// Circle search parameters (binarize → median → Hough gradient).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CircleConfig {
    /// Fallback binarization level, used when the crop histogram has a single
    /// value and the Otsu level is undefined.
    pub binarize_threshold: u8,
    /// Upper Canny threshold for circle edges; the lower one is half of it.
    pub param1: f32,
    /// Minimum accumulator votes for a centre, and minimum edge support for
    /// its radius.
    pub param2: u32,
    /// Smallest accepted radius in pixels.
    pub min_radius: u32,
    /// Largest accepted radius in pixels.
    pub max_radius: u32,
    /// Median filter window side (odd).
    #[serde(default = "default_median_kernel")]
    pub median_kernel: u32,
    /// Minimum spacing between accepted circle centres in pixels.
    #[serde(default = "default_min_center_distance")]
    pub min_center_distance: f32,
}

fn default_median_kernel() -> u32 {
    5
}

fn default_min_center_distance() -> f32 {
    20.0
}

/// Radius matching tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MatchConfig {
    /// Maximum symmetric percentage radius difference for an OK slot.
    pub error_threshold: f64,
}

/// Reference image location and the size every slot crop is normalized to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TemplateConfig {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
}

/// Complete analyzer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InspectionConfig {
    pub schema: String,
    pub image: ImageSize,
    #[serde(rename = "crate")]
    pub grid: GridConfig,
    pub feather: FeatherConfig,
    /// Lower Canny threshold used to find the crate outline.
    pub edge_threshold: f32,
    pub circle: CircleConfig,
    pub matching: MatchConfig,
    pub template: TemplateConfig,
}

impl Default for InspectionConfig {
    fn default() -> Self {
        Self {
            schema: SETTINGS_SCHEMA_V1.to_string(),
            image: ImageSize {
                width: 640,
                height: 480,
            },
            grid: GridConfig { rows: 4, cols: 6 },
            feather: FeatherConfig { x: 0.02, y: 0.02 },
            edge_threshold: 50.0,
            circle: CircleConfig {
                binarize_threshold: 127,
                param1: 100.0,
                param2: 15,
                min_radius: 10,
                max_radius: 40,
                median_kernel: default_median_kernel(),
                min_center_distance: default_min_center_distance(),
            },
            matching: MatchConfig {
                error_threshold: 10.0,
            },
            template: TemplateConfig {
                path: PathBuf::from("assets/template.png"),
                width: 90,
                height: 90,
            },
        }
    }
}

impl InspectionConfig {
    /// Load and validate settings from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&data)
    }

    /// Parse and validate settings from JSON text.
    pub fn from_json_str(data: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(data)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every field against its documented domain.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.schema != SETTINGS_SCHEMA_V1 {
            return Err(ConfigError::UnsupportedSchema {
                found: self.schema.clone(),
                expected: SETTINGS_SCHEMA_V1,
            });
        }

        if self.image.width == 0 || self.image.height == 0 {
            return Err(ConfigError::invalid("image", "width and height must be >= 1"));
        }
        if self.grid.rows == 0 {
            return Err(ConfigError::invalid("crate.rows", "must be >= 1"));
        }
        if self.grid.cols == 0 {
            return Err(ConfigError::invalid("crate.cols", "must be >= 1"));
        }

        validate_feather("feather.x", self.feather.x)?;
        validate_feather("feather.y", self.feather.y)?;

        if !self.edge_threshold.is_finite()
            || self.edge_threshold < 0.0
            || self.edge_threshold > EDGE_UPPER_THRESHOLD
        {
            return Err(ConfigError::invalid(
                "edge_threshold",
                format!("must be finite and in [0, {}]", EDGE_UPPER_THRESHOLD),
            ));
        }

        let circle = &self.circle;
        if !circle.param1.is_finite() || circle.param1 <= 0.0 {
            return Err(ConfigError::invalid("circle.param1", "must be finite and > 0"));
        }
        if circle.param2 == 0 {
            return Err(ConfigError::invalid("circle.param2", "must be >= 1"));
        }
        if circle.min_radius == 0 {
            return Err(ConfigError::invalid("circle.min_radius", "must be >= 1"));
        }
        if circle.max_radius < circle.min_radius {
            return Err(ConfigError::invalid(
                "circle.max_radius",
                format!("must be >= min_radius ({})", circle.min_radius),
            ));
        }
        // A mouth never outgrows the normalized slot crop.
        let radius_limit = self.template.width.max(self.template.height);
        if circle.max_radius > radius_limit {
            return Err(ConfigError::invalid(
                "circle.max_radius",
                format!("must be <= max(template.width, template.height) ({})", radius_limit),
            ));
        }
        if circle.median_kernel == 0 || circle.median_kernel % 2 == 0 {
            return Err(ConfigError::invalid("circle.median_kernel", "must be odd and >= 1"));
        }
        if !circle.min_center_distance.is_finite() || circle.min_center_distance < 0.0 {
            return Err(ConfigError::invalid(
                "circle.min_center_distance",
                "must be finite and >= 0",
            ));
        }

        if !self.matching.error_threshold.is_finite() || self.matching.error_threshold < 0.0 {
            return Err(ConfigError::invalid(
                "matching.error_threshold",
                "must be finite and >= 0",
            ));
        }

        if self.template.width == 0 || self.template.height == 0 {
            return Err(ConfigError::invalid("template", "width and height must be >= 1"));
        }

        Ok(())
    }
}

fn validate_feather(field: &'static str, value: f64) -> Result<(), ConfigError> {
    // At 0.5 the trimmed margins meet and the region collapses.
    if !value.is_finite() || !(0.0..0.5).contains(&value) {
        return Err(ConfigError::invalid(field, format!("{} is not in [0, 0.5)", value)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "schema": "cratecheck.settings.v1",
        "image": { "width": 340, "height": 240 },
        "crate": { "rows": 2, "cols": 3 },
        "feather": { "x": 0.05, "y": 0.05 },
        "edge_threshold": 50.0,
        "circle": {
            "binarize_threshold": 127,
            "param1": 100.0,
            "param2": 15,
            "min_radius": 10,
            "max_radius": 40
        },
        "matching": { "error_threshold": 10.0 },
        "template": { "path": "assets/template.png", "width": 90, "height": 90 }
    }"#;

    #[test]
    fn default_config_is_valid() {
        InspectionConfig::default()
            .validate()
            .expect("default config must validate");
    }

    #[test]
    fn parses_sample_settings_with_circle_defaults() {
        let config = InspectionConfig::from_json_str(SAMPLE).expect("valid settings");
        assert_eq!(config.grid, GridConfig { rows: 2, cols: 3 });
        assert_eq!(config.image.width, 340);
        assert_eq!(config.circle.median_kernel, 5);
        assert_eq!(config.circle.min_center_distance, 20.0);
        assert_eq!(config.template.path, PathBuf::from("assets/template.png"));
    }

    #[test]
    fn rejects_unknown_schema() {
        let raw = SAMPLE.replace("cratecheck.settings.v1", "cratecheck.settings.v0");
        let err = InspectionConfig::from_json_str(&raw).expect_err("expected error");
        assert!(matches!(err, ConfigError::UnsupportedSchema { .. }));
    }

    #[test]
    fn rejects_missing_group() {
        let raw = SAMPLE.replace(r#""matching": { "error_threshold": 10.0 },"#, "");
        let err = InspectionConfig::from_json_str(&raw).expect_err("expected error");
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn rejects_unknown_fields() {
        let raw = SAMPLE.replace(r#""edge_threshold": 50.0,"#, r#""canny": 50.0,"#);
        assert!(InspectionConfig::from_json_str(&raw).is_err());
    }

    #[test]
    fn feather_must_stay_below_half() {
        let mut config = InspectionConfig::default();
        config.feather.x = 0.5;
        let err = config.validate().expect_err("expected error");
        assert!(matches!(err, ConfigError::InvalidField { field: "feather.x", .. }));

        config.feather.x = 0.49;
        config.feather.y = -0.1;
        let err = config.validate().expect_err("expected error");
        assert!(matches!(err, ConfigError::InvalidField { field: "feather.y", .. }));
    }

    #[test]
    fn radius_bounds_must_be_ordered_and_positive() {
        let mut config = InspectionConfig::default();
        config.circle.min_radius = 0;
        assert!(config.validate().is_err());

        config.circle.min_radius = 30;
        config.circle.max_radius = 20;
        let err = config.validate().expect_err("expected error");
        assert!(matches!(
            err,
            ConfigError::InvalidField {
                field: "circle.max_radius",
                ..
            }
        ));
    }

    #[test]
    fn max_radius_is_bounded_by_template_size() {
        let mut config = InspectionConfig::default();
        config.circle.max_radius = 90;
        config.validate().expect("radius equal to the template side is accepted");

        for max_radius in [91, 4_000, u32::MAX] {
            config.circle.max_radius = max_radius;
            let err = config.validate().expect_err("expected error");
            assert!(
                matches!(
                    err,
                    ConfigError::InvalidField {
                        field: "circle.max_radius",
                        ..
                    }
                ),
                "max_radius = {}",
                max_radius
            );
        }
    }

    #[test]
    fn rejects_zero_grid_and_even_median_kernel() {
        let mut config = InspectionConfig::default();
        config.grid.cols = 0;
        assert!(config.validate().is_err());

        let mut config = InspectionConfig::default();
        config.circle.median_kernel = 4;
        assert!(config.validate().is_err());
    }

    #[test]
    fn edge_threshold_bounded_by_upper_threshold() {
        let mut config = InspectionConfig::default();
        config.edge_threshold = 300.0;
        assert!(config.validate().is_err());
        config.edge_threshold = f32::NAN;
        assert!(config.validate().is_err());
    }
}
