//! Configuration for the dominant color extraction pipeline.
//!
//! Every tunable of the pipeline lives in [`ExtractionConfig`]. The defaults
//! reproduce the reference behavior; the struct can also be loaded from a
//! JSON file for reproducible experiments:
//!
//! ```no_run
//! use colorfinder::ExtractionConfig;
//! use std::path::Path;
//!
//! // Load from file
//! let config = ExtractionConfig::from_json_file(Path::new("extraction.json"))?;
//!
//! // Or use defaults
//! let config = ExtractionConfig::default();
//! # Ok::<(), colorfinder::ColorError>(())
//! ```
//!
//! Missing keys fall back to their defaults, so a file only needs to name
//! the values it changes.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::extraction;
use crate::{ColorError, Result};

/// Tunable parameters of the extraction pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Longest image side allowed before downsizing
    pub max_dimension: u32,

    /// Spatial radius is `round(spatial_radius_scale / sqrt(min(w, h)))`
    pub spatial_radius_scale: f64,

    /// Segmentation color bandwidth
    pub range_radius: u32,

    /// Smallest region, in pixels, kept by segmentation
    pub min_density: u32,

    /// Sampling stride is `dimension / sample_grid + 1`
    pub sample_grid: u32,

    /// Share of all samples a color must exceed to be classified (0.0-1.0)
    pub min_frequency: f64,

    /// ΔE2000 below which two classified colors are merged
    pub merge_threshold: f64,

    /// Optional deadline for the segmentation step, in milliseconds
    pub segmentation_timeout_ms: Option<u64>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            max_dimension: extraction::MAX_DIMENSION,
            spatial_radius_scale: extraction::SPATIAL_RADIUS_SCALE,
            range_radius: extraction::RANGE_RADIUS,
            min_density: extraction::MIN_DENSITY,
            sample_grid: extraction::SAMPLE_GRID,
            min_frequency: extraction::MIN_FREQUENCY,
            merge_threshold: extraction::MERGE_THRESHOLD,
            segmentation_timeout_ms: None,
        }
    }
}

impl ExtractionConfig {
    /// Check parameter ranges
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        let invalid = |parameter: &str, value: String| {
            Err(ColorError::InvalidParameter {
                parameter: parameter.to_string(),
                value,
            })
        };

        if self.max_dimension == 0 {
            return invalid("max_dimension", self.max_dimension.to_string());
        }
        if self.sample_grid == 0 {
            return invalid("sample_grid", self.sample_grid.to_string());
        }
        if !(self.spatial_radius_scale.is_finite() && self.spatial_radius_scale >= 0.0) {
            return invalid("spatial_radius_scale", self.spatial_radius_scale.to_string());
        }
        if !(0.0..1.0).contains(&self.min_frequency) {
            return invalid("min_frequency", self.min_frequency.to_string());
        }
        if !(self.merge_threshold.is_finite() && self.merge_threshold >= 0.0) {
            return invalid("merge_threshold", self.merge_threshold.to_string());
        }
        Ok(())
    }

    /// Load configuration from JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ColorError::config(format!("Failed to read config: {}", path.display()), e)
        })?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| ColorError::config("Failed to parse config JSON", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to JSON file
    pub fn to_json_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ColorError::config("Failed to serialize config", e))?;
        std::fs::write(path, json).map_err(|e| {
            ColorError::config(format!("Failed to write config: {}", path.display()), e)
        })?;
        Ok(())
    }
}
