//! Configuration structures for extraction and recoloring.
//!
//! Every tunable value defaults to the reference behaviour in
//! [`crate::constants`], so `EngineConfig::default()` reproduces it exactly.
//!
//! # Configuration Loading
//!
//! Configuration can be loaded from JSON files or constructed programmatically:
//!
//! ```no_run
//! use swap_colors::EngineConfig;
//! use std::path::Path;
//!
//! // Load from file
//! let config = EngineConfig::from_json_file(Path::new("config.json"))?;
//!
//! // Or use defaults
//! let config = EngineConfig::default();
//! # Ok::<(), swap_colors::RecolorError>(())
//! ```
//!
//! Missing fields fall back to their defaults, so a file containing only
//! `{"recolor": {"tolerance_scale": 3.0}}` is valid.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::constants::{extraction, recolor};
use crate::{RecolorError, Result};

/// Complete configuration for the color extractor and recolor engine.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Color extraction configuration
    pub extraction: ExtractionConfig,

    /// Recolor configuration
    pub recolor: RecolorConfig,
}

/// Color extraction parameters.
///
/// Controls pixel sampling, quantization and the size of the ranked palette.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Sample every Nth pixel in linear order (1 = every pixel)
    pub sample_stride: usize,

    /// Quantization step per channel
    pub bucket_width: u8,

    /// Maximum number of palette entries
    pub palette_size: usize,

    /// Sampled pixels with alpha below this are excluded
    pub min_alpha: u8,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            sample_stride: extraction::SAMPLE_STRIDE,
            bucket_width: extraction::BUCKET_WIDTH,
            palette_size: extraction::PALETTE_SIZE,
            min_alpha: extraction::MIN_ALPHA,
        }
    }
}

/// Recolor parameters that are fixed per engine rather than per call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecolorConfig {
    /// Pixels with alpha below this are left untouched
    pub min_alpha: u8,

    /// Multiplier from user tolerance to RGB distance radius
    pub tolerance_scale: f64,
}

impl Default for RecolorConfig {
    fn default() -> Self {
        Self {
            min_alpha: recolor::MIN_ALPHA,
            tolerance_scale: recolor::TOLERANCE_SCALE,
        }
    }
}

impl ExtractionConfig {
    /// Check that the extraction parameters can drive a scan
    pub fn validate(&self) -> Result<()> {
        if self.sample_stride == 0 {
            return Err(RecolorError::invalid_parameter("extraction.sample_stride", 0));
        }
        if self.bucket_width == 0 {
            return Err(RecolorError::invalid_parameter("extraction.bucket_width", 0));
        }
        if self.palette_size == 0 {
            return Err(RecolorError::invalid_parameter("extraction.palette_size", 0));
        }
        Ok(())
    }
}

impl RecolorConfig {
    /// Check that the recolor parameters are usable
    pub fn validate(&self) -> Result<()> {
        if !self.tolerance_scale.is_finite() || self.tolerance_scale < 0.0 {
            return Err(RecolorError::invalid_parameter(
                "recolor.tolerance_scale",
                self.tolerance_scale,
            ));
        }
        Ok(())
    }
}

impl EngineConfig {
    /// Validate every section
    pub fn validate(&self) -> Result<()> {
        self.extraction.validate()?;
        self.recolor.validate()
    }

    /// Load configuration from JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            RecolorError::config(format!("Failed to read {}", path.display()), e)
        })?;
        let config = Self::from_json_str(&content)?;
        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parse and validate configuration from a JSON string
    pub fn from_json_str(content: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(content)
            .map_err(|e| RecolorError::config("Invalid configuration JSON", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to JSON file
    pub fn to_json_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| RecolorError::config("Failed to serialize configuration", e))?;
        std::fs::write(path, json).map_err(|e| {
            RecolorError::config(format!("Failed to write {}", path.display()), e)
        })?;
        Ok(())
    }
}
