//! Classifier model management
//!
//! Handles downloading, caching, and locating the ONNX classifier model and
//! its AudioSet label sidecar. Files are downloaded on first use and cached
//! in `~/.cache/audiowave-tag/models/`.

use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// Available event classifier models
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassifierModel {
    /// PANNs CNN14 trained on AudioSet (~330 MB)
    /// Takes a 32 kHz mono waveform, outputs 527 class probabilities
    Cnn14,
}

impl ClassifierModel {
    /// Model filename for caching
    pub fn filename(&self) -> &'static str {
        match self {
            ClassifierModel::Cnn14 => "cnn14.onnx",
        }
    }

    /// Label sidecar filename for caching
    pub fn labels_filename(&self) -> &'static str {
        match self {
            ClassifierModel::Cnn14 => "class_labels_indices.csv",
        }
    }

    /// Model download URL
    pub fn download_url(&self) -> &'static str {
        match self {
            // Hosted on Audiowave GitHub releases (converted from the PANNs
            // release checkpoint)
            ClassifierModel::Cnn14 => {
                "https://github.com/audiowave/audiowave/releases/download/models/cnn14.onnx"
            }
        }
    }

    /// Label sidecar download URL (published AudioSet taxonomy)
    pub fn labels_url(&self) -> &'static str {
        match self {
            ClassifierModel::Cnn14 => {
                "http://storage.googleapis.com/us_audioset/youtube_corpus/v1/csv/class_labels_indices.csv"
            }
        }
    }

    /// Human-readable name
    pub fn display_name(&self) -> &'static str {
        match self {
            ClassifierModel::Cnn14 => "PANNs CNN14",
        }
    }

    /// Approximate model size in bytes
    pub fn size_bytes(&self) -> u64 {
        match self {
            ClassifierModel::Cnn14 => 330_000_000,
        }
    }
}

/// Manages classifier model downloads and caching
pub struct ModelManager {
    cache_dir: PathBuf,
}

impl ModelManager {
    /// Create with default cache directory: `~/.cache/audiowave-tag/models/`
    pub fn new() -> Result<Self, String> {
        let base = dirs::cache_dir().ok_or_else(|| "Could not determine cache directory".to_string())?;
        Ok(Self {
            cache_dir: base.join("audiowave-tag").join("models"),
        })
    }

    /// Create with a custom cache directory (for testing)
    pub fn with_cache_dir(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    /// Get the local path for a model
    pub fn model_path(&self, model: ClassifierModel) -> PathBuf {
        self.cache_dir.join(model.filename())
    }

    /// Get the local path for a model's label sidecar
    pub fn labels_path(&self, model: ClassifierModel) -> PathBuf {
        self.cache_dir.join(model.labels_filename())
    }

    /// Check if a model and its labels are already downloaded
    pub fn is_available(&self, model: ClassifierModel) -> bool {
        self.model_path(model).exists() && self.labels_path(model).exists()
    }

    /// Ensure model and label files exist locally, downloading if necessary
    ///
    /// Returns the model path on success.
    pub fn ensure(&self, model: ClassifierModel) -> Result<PathBuf, String> {
        let model_path = self.model_path(model);
        if !model_path.exists() {
            log::info!(
                "Downloading {} ({} MB) from {}",
                model.display_name(),
                model.size_bytes() / 1_000_000,
                model.download_url()
            );
            self.download_file(model.download_url(), &model_path)?;
        }

        let labels_path = self.labels_path(model);
        if !labels_path.exists() {
            log::info!("Downloading AudioSet labels from {}", model.labels_url());
            self.download_file(model.labels_url(), &labels_path)?;
        }

        Ok(model_path)
    }

    /// Download a file from URL to target path with atomic rename
    fn download_file(&self, url: &str, target_path: &Path) -> Result<(), String> {
        fs::create_dir_all(&self.cache_dir)
            .map_err(|e| format!("Failed to create cache dir: {}", e))?;

        let temp_path = target_path.with_extension("tmp");

        let response = ureq::get(url)
            .call()
            .map_err(|e| format!("Download failed for {}: {}", url, e))?;

        let content_length: Option<u64> = response
            .header("Content-Length")
            .and_then(|s| s.parse().ok());

        let mut file = fs::File::create(&temp_path)
            .map_err(|e| format!("Failed to create temp file: {}", e))?;

        let mut reader = response.into_reader();
        let mut buffer = [0u8; 8192];
        let mut downloaded: u64 = 0;

        loop {
            let bytes_read = reader
                .read(&mut buffer)
                .map_err(|e| format!("Read error: {}", e))?;
            if bytes_read == 0 {
                break;
            }

            file.write_all(&buffer[..bytes_read])
                .map_err(|e| format!("Write error: {}", e))?;
            downloaded += bytes_read as u64;
        }

        file.flush().map_err(|e| format!("Flush error: {}", e))?;
        drop(file);

        if let Some(expected) = content_length {
            if downloaded != expected {
                fs::remove_file(&temp_path).ok();
                return Err(format!(
                    "Download incomplete: expected {} bytes, got {}",
                    expected, downloaded
                ));
            }
        }

        // Atomic rename
        fs::rename(&temp_path, target_path).map_err(|e| format!("Rename failed: {}", e))?;

        log::info!(
            "Downloaded {:?} ({} bytes)",
            target_path.file_name().unwrap_or_default(),
            downloaded
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_paths() {
        let mgr = ModelManager::with_cache_dir("/tmp/test-models".into());
        assert!(mgr
            .model_path(ClassifierModel::Cnn14)
            .to_str()
            .unwrap()
            .ends_with("cnn14.onnx"));
        assert!(mgr
            .labels_path(ClassifierModel::Cnn14)
            .to_str()
            .unwrap()
            .ends_with("class_labels_indices.csv"));
    }

    #[test]
    fn test_missing_files_not_available() {
        let mgr = ModelManager::with_cache_dir("/nonexistent/cache".into());
        assert!(!mgr.is_available(ClassifierModel::Cnn14));
    }
}
