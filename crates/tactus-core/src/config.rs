// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pipeline configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Result, TactusError};

/// Settings for the whole recognition pipeline.
///
/// Every section falls back to its defaults when omitted from the JSON file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub normalize: NormalizeConfig,
    pub reconstruct: ReconstructConfig,
    pub batch: BatchConfig,
    /// Label table to load instead of the built-in one.
    pub labels_path: Option<PathBuf>,
}

/// Image normalization settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeConfig {
    /// Side of the square Gaussian smoothing kernel (odd, >= 3).
    pub blur_kernel: u32,
    /// Apply adaptive Gaussian thresholding after smoothing.
    pub binarize: bool,
    /// Neighbourhood size for adaptive thresholding (odd, >= 3).
    pub threshold_block_size: u32,
    /// Constant subtracted from the weighted local mean.
    pub threshold_offset: f32,
    /// Morphological open + close with a 3x3 square after binarization.
    pub morphology: bool,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            blur_kernel: 5,
            binarize: false,
            threshold_block_size: 15,
            threshold_offset: 5.0,
            morphology: true,
        }
    }
}

/// Line reconstruction settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconstructConfig {
    /// Maximum `y1` distance (pixels, exclusive) between a detection and a
    /// line's representative for the detection to join that line.
    pub vertical_tolerance: f32,
}

impl Default for ReconstructConfig {
    fn default() -> Self {
        Self {
            vertical_tolerance: 100.0,
        }
    }
}

impl ReconstructConfig {
    /// Tolerance rescaled for images `factor` times the reference resolution.
    pub fn scaled(&self, factor: f32) -> Self {
        Self {
            vertical_tolerance: self.vertical_tolerance * factor,
        }
    }
}

/// Batch processing settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Maximum number of images processed at the same time.
    pub max_concurrency: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self { max_concurrency: 4 }
    }
}

impl PipelineConfig {
    /// Load a configuration file (JSON) and validate it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path).map_err(|err| {
            TactusError::Config(format!("cannot read {}: {err}", path.display()))
        })?;
        let config: Self = serde_json::from_str(&data).map_err(|err| {
            TactusError::Config(format!("cannot parse {}: {err}", path.display()))
        })?;
        config.validate()?;
        info!(path = %path.display(), "pipeline configuration loaded");
        debug!(?config, "effective configuration");
        Ok(config)
    }

    /// Check value ranges that the type system cannot express.
    pub fn validate(&self) -> Result<()> {
        check_odd_kernel("normalize.blur_kernel", self.normalize.blur_kernel)?;
        check_odd_kernel(
            "normalize.threshold_block_size",
            self.normalize.threshold_block_size,
        )?;
        if !self.normalize.threshold_offset.is_finite() {
            return Err(TactusError::Config(
                "normalize.threshold_offset must be finite".into(),
            ));
        }
        let tolerance = self.reconstruct.vertical_tolerance;
        if !(tolerance.is_finite() && tolerance > 0.0) {
            return Err(TactusError::Config(format!(
                "reconstruct.vertical_tolerance must be a positive number, got {tolerance}"
            )));
        }
        if self.batch.max_concurrency == 0 {
            return Err(TactusError::Config(
                "batch.max_concurrency must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

fn check_odd_kernel(name: &str, size: u32) -> Result<()> {
    if size < 3 || size % 2 == 0 {
        return Err(TactusError::Config(format!(
            "{name} must be an odd number >= 3, got {size}"
        )));
    }
    Ok(())
}
