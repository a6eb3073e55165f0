//! Tagging error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while tagging a clip
#[derive(Error, Debug)]
pub enum TagError {
    #[error("Classifier unavailable: {0}")]
    ClassifierUnavailable(String),

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Model download failed: {0}")]
    ModelDownloadFailed(String),

    #[error("Failed to read audio file: {path}")]
    AudioReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported audio format: {0}")]
    UnsupportedFormat(String),

    #[error("Inference failed: {0}")]
    InferenceFailed(String),

    #[error("Failed to write tags artifact: {path}")]
    ArtifactWriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Clip directory not found: {0}")]
    ClipNotFound(PathBuf),

    #[error("Serialization failed: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, TagError>;
