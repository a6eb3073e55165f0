//! Global configuration for audiowave-tag
//!
//! Configuration is stored as YAML in the user config directory.
//! Default location: ~/.config/audiowave-tag/config.yaml
//!
//! Only tunable thresholds live here. The coarse-tag vocabulary and the
//! label-mapping rule tables are process-wide constants (see
//! `tagging::vocabulary` and `tagging::label_map`) and are deliberately not
//! configurable: their content and ordering are part of the output contract.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::tagging::CalibrationStrategy;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TaggingConfig {
    /// Waveform analysis settings
    pub analysis: AnalysisConfig,
    /// Event classifier output shaping
    pub classifier: ClassifierConfig,
    /// Tag calibration and partitioning
    pub tags: TagConfig,
}

impl TaggingConfig {
    /// Validate and clamp all sections
    pub fn validate(&mut self) {
        self.classifier.validate();
        self.tags.validate();
    }
}

/// Waveform analysis settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Fixed analysis sample rate in Hz; stems are resampled to mono at this
    /// rate before feature extraction and inference
    pub sample_rate: u32,
    /// Stereo width above which a stem is considered wide
    /// (feeds both the stereo_wide meta tag and the synth refiner)
    pub stereo_wide_threshold: f32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            sample_rate: 32_000,
            stereo_wide_threshold: 0.25,
        }
    }
}

/// Event classifier output shaping
///
/// The classifier contract: top-k classes by probability, filtered to a
/// minimum score, truncated to a maximum count, descending order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Number of top classes considered before filtering
    pub top_k: usize,
    /// Minimum class probability to keep (conservative, reduces garbage)
    pub min_score: f32,
    /// Maximum predictions surfaced per stem
    pub max_predictions: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            top_k: 32,
            min_score: 0.18,
            max_predictions: 8,
        }
    }
}

impl ClassifierConfig {
    /// Clamp values to sane ranges
    pub fn validate(&mut self) {
        self.top_k = self.top_k.clamp(1, 64);
        self.min_score = self.min_score.clamp(0.0, 1.0);
        self.max_predictions = self.max_predictions.clamp(1, self.top_k);
    }
}

/// Tag calibration and partitioning settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TagConfig {
    /// Maximum number of content tags per stem
    pub max_content_tags: usize,
    /// Minimum score for a content tag to survive partitioning
    pub content_min_score: f32,
    /// Which calibration policy to apply (stem-aware is canonical)
    pub calibration: CalibrationStrategy,
}

impl Default for TagConfig {
    fn default() -> Self {
        Self {
            max_content_tags: 3,
            content_min_score: 0.15,
            calibration: CalibrationStrategy::default(),
        }
    }
}

impl TagConfig {
    /// Clamp values to sane ranges
    pub fn validate(&mut self) {
        self.max_content_tags = self.max_content_tags.clamp(1, 8);
        self.content_min_score = self.content_min_score.clamp(0.0, 1.0);
    }
}

/// Get the default config file path
///
/// Returns: ~/.config/audiowave-tag/config.yaml
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("audiowave-tag")
        .join("config.yaml")
}

/// Load configuration from a YAML file
///
/// If the file doesn't exist, returns default config.
/// If the file exists but is invalid, logs a warning and returns default config.
pub fn load_config(path: &Path) -> TaggingConfig {
    if !path.exists() {
        log::debug!("load_config: {:?} doesn't exist, using defaults", path);
        return TaggingConfig::default();
    }

    match std::fs::read_to_string(path) {
        Ok(contents) => match serde_yaml::from_str::<TaggingConfig>(&contents) {
            Ok(mut config) => {
                config.validate();
                log::info!("load_config: loaded {:?}", path);
                config
            }
            Err(e) => {
                log::warn!("load_config: failed to parse config: {}, using defaults", e);
                TaggingConfig::default()
            }
        },
        Err(e) => {
            log::warn!("load_config: failed to read config file: {}, using defaults", e);
            TaggingConfig::default()
        }
    }
}

/// Save configuration to a YAML file
///
/// Creates parent directories if they don't exist.
pub fn save_config(config: &TaggingConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
    }

    let yaml = serde_yaml::to_string(config).context("Failed to serialize config to YAML")?;

    std::fs::write(path, yaml)
        .with_context(|| format!("Failed to write config file: {:?}", path))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TaggingConfig::default();
        assert_eq!(config.analysis.sample_rate, 32_000);
        assert_eq!(config.classifier.top_k, 32);
        assert_eq!(config.classifier.max_predictions, 8);
        assert_eq!(config.tags.max_content_tags, 3);
        assert!((config.classifier.min_score - 0.18).abs() < f32::EPSILON);
        assert!((config.tags.content_min_score - 0.15).abs() < f32::EPSILON);
    }

    #[test]
    fn test_validation_clamps_values() {
        let mut config = TaggingConfig::default();
        config.classifier.top_k = 500;
        config.classifier.max_predictions = 100;
        config.tags.content_min_score = 3.0;
        config.validate();
        assert_eq!(config.classifier.top_k, 64);
        assert!(config.classifier.max_predictions <= config.classifier.top_k);
        assert!((config.tags.content_min_score - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_yaml_roundtrip() {
        let mut config = TaggingConfig::default();
        config.classifier.min_score = 0.25;
        config.tags.calibration = CalibrationStrategy::MinMaxRescale;

        let yaml = serde_yaml::to_string(&config).unwrap();
        let parsed: TaggingConfig = serde_yaml::from_str(&yaml).unwrap();

        assert!((parsed.classifier.min_score - 0.25).abs() < f32::EPSILON);
        assert_eq!(parsed.tags.calibration, CalibrationStrategy::MinMaxRescale);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let config = load_config(Path::new("/nonexistent/audiowave-tag/config.yaml"));
        assert_eq!(config.analysis.sample_rate, 32_000);
    }
}
