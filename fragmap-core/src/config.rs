use std::fs::read_to_string;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::errors::{FragmapError, Result};

/// Padding applied around merged read envelopes when building candidate regions.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PaddingConfig {
    pub left_padding: u32,
    pub right_padding: u32,
}

impl Default for PaddingConfig {
    fn default() -> Self {
        PaddingConfig {
            left_padding: DEFAULT_LEFT_PADDING,
            right_padding: DEFAULT_RIGHT_PADDING,
        }
    }
}

/// Thresholds for boundary peak detection.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PeakConfig {
    pub min_count: u32,
    pub suppression_window: usize,
}

impl Default for PeakConfig {
    fn default() -> Self {
        PeakConfig {
            min_count: DEFAULT_MIN_COUNT,
            suppression_window: DEFAULT_SUPPRESSION_WINDOW,
        }
    }
}

/// Length bounds and pairing penalty for fragment reconstruction.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct FragmentConfig {
    pub min_fragment_length: usize,
    pub max_fragment_length: usize,
    pub length_penalty: f64,
}

impl Default for FragmentConfig {
    fn default() -> Self {
        FragmentConfig {
            min_fragment_length: DEFAULT_MIN_FRAGMENT_LENGTH,
            max_fragment_length: DEFAULT_MAX_FRAGMENT_LENGTH,
            length_penalty: DEFAULT_LENGTH_PENALTY,
        }
    }
}

///
/// Complete parameter set for a fragment annotation run.
///
/// Every section is optional in the TOML file; missing sections and keys
/// fall back to the defaults in [crate::consts]:
///
/// ```toml
/// [padding]
/// left_padding = 8
/// right_padding = 8
///
/// [peaks]
/// min_count = 3
/// suppression_window = 3
///
/// [fragments]
/// min_fragment_length = 12
/// max_fragment_length = 200
/// length_penalty = 1.0
/// ```
///
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct FragmapConfig {
    pub padding: PaddingConfig,
    pub peaks: PeakConfig,
    pub fragments: FragmentConfig,
}

impl FragmapConfig {
    ///
    /// Reject parameter combinations no region could be processed with.
    ///
    pub fn validate(&self) -> Result<()> {
        if self.peaks.min_count < 1 {
            return Err(FragmapError::InvalidConfig(
                "min_count must be at least 1".to_string(),
            ));
        }

        let fragments = &self.fragments;
        if fragments.min_fragment_length < 1 || fragments.max_fragment_length < 1 {
            return Err(FragmapError::InvalidConfig(
                "fragment length bounds must be positive".to_string(),
            ));
        }

        if fragments.min_fragment_length > fragments.max_fragment_length {
            return Err(FragmapError::InvalidConfig(format!(
                "min_fragment_length ({}) exceeds max_fragment_length ({})",
                fragments.min_fragment_length, fragments.max_fragment_length
            )));
        }

        if !fragments.length_penalty.is_finite() || fragments.length_penalty < 0.0 {
            return Err(FragmapError::InvalidConfig(format!(
                "length_penalty must be a non-negative number, got {}",
                fragments.length_penalty
            )));
        }

        Ok(())
    }

    ///
    /// Parse and validate a configuration from a TOML string.
    ///
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        let config: FragmapConfig =
            toml::from_str(toml_str).map_err(|e| FragmapError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

impl TryFrom<&Path> for FragmapConfig {
    type Error = FragmapError;

    fn try_from(path: &Path) -> Result<Self> {
        let toml_str = read_to_string(path)?;
        FragmapConfig::from_toml_str(&toml_str)
    }
}
