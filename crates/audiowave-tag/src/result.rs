//! Clip result types and the tags.json artifact
//!
//! One JSON document is written per clip directory. Field order and shape
//! are part of the external contract; running the pipeline twice over
//! byte-identical stems must produce byte-identical artifacts.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TagError};

/// Canonical artifact filename inside a clip directory
pub const ARTIFACT_FILENAME: &str = "tags.json";

/// A single tag with its calibrated score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagScore {
    pub label: String,
    pub score: f32,
}

/// Per-stem analysis record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StemAnalysis {
    /// Source stem path as given to the pipeline
    pub file: String,
    /// Mean spectral centroid in Hz
    pub spectral_centroid_hz: f32,
    /// Stereo width estimate, clamped to [0, 1]
    pub stereo_width: f32,
    /// Ranked raw classifier predictions that survived thresholding
    pub top_audioset: Vec<(String, f32)>,
    /// Instrument identity tags (at most 3, descending by score)
    pub content_tags: Vec<TagScore>,
    /// Mix-characteristic tags (stereo_wide / sidechain_pump only)
    pub meta_tags: Vec<TagScore>,
}

/// Stem-level failure record
///
/// A malformed or unreadable stem is recorded instead of aborting the clip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StemFailure {
    pub file: String,
    pub error: String,
}

/// One entry in the clip's results list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StemEntry {
    Analysis(StemAnalysis),
    Failed(StemFailure),
}

/// Clip-level sidechain detection result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalSidechain {
    pub detected: bool,
    /// Squashed pump strength in [0, 1]; present only when detected
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strength: Option<f32>,
    /// Envelope peak frequency in Hz; present only when detected
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency_hz: Option<f32>,
}

impl GlobalSidechain {
    /// A not-detected result
    pub fn none() -> Self {
        Self {
            detected: false,
            strength: None,
            frequency_hz: None,
        }
    }
}

/// Clip-level metadata block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipMetadata {
    pub global_sidechain: GlobalSidechain,
}

/// The complete per-clip artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipResult {
    /// Clip identifier (directory name)
    pub clip: String,
    pub metadata: ClipMetadata,
    /// Per-stem entries in canonical stem order; absent stems are omitted
    pub results: Vec<StemEntry>,
}

impl ClipResult {
    /// Serialize to the canonical pretty-printed JSON form
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| TagError::Serialization(e.to_string()))
    }
}

/// Write the artifact to disk
///
/// A write failure is fatal for the clip.
pub fn write_artifact(result: &ClipResult, path: &Path) -> Result<()> {
    let json = result.to_json()?;
    std::fs::write(path, json).map_err(|e| TagError::ArtifactWriteError {
        path: path.to_path_buf(),
        source: e,
    })?;
    log::info!("Wrote {:?} ({} stems)", path, result.results.len());
    Ok(())
}
