//! PANNs CNN14 classifier via ONNX Runtime
//!
//! CNN14 takes the raw 32 kHz mono waveform (the spectrogram frontend is
//! part of the exported graph) and produces a 527-class AudioSet
//! probability vector in one forward pass. Loading the session is the
//! expensive part; one `PannsClassifier` is created per process and reused
//! for every stem.

use std::path::Path;

use ndarray::Array2;
use ort::session::Session;
use ort::value::Tensor;

use crate::config::ClassifierConfig;
use crate::error::{Result, TagError};

use super::adapter::{rank_predictions, EventClassifier};
use super::labels::load_audioset_labels;
use super::models::{ClassifierModel, ModelManager};

/// Event classifier backed by a pre-loaded ONNX session
pub struct PannsClassifier {
    session: Session,
    labels: Vec<String>,
    config: ClassifierConfig,
}

// Safety: ort::Session is Send+Sync by design
unsafe impl Send for PannsClassifier {}
unsafe impl Sync for PannsClassifier {}

impl PannsClassifier {
    /// Load the classifier from explicit model and label file paths
    ///
    /// Fails with [`TagError::ClassifierUnavailable`], which is fatal for
    /// the whole run; there is no per-clip recovery from a missing model.
    pub fn new(model_path: &Path, labels_path: &Path, config: ClassifierConfig) -> Result<Self> {
        if !model_path.exists() {
            return Err(TagError::ModelNotFound(model_path.display().to_string()));
        }

        let session = Session::builder()
            .and_then(|b| b.with_intra_threads(1))
            .and_then(|b| b.commit_from_file(model_path))
            .map_err(|e| TagError::ClassifierUnavailable(format!("Failed to load CNN14: {}", e)))?;

        let labels = load_audioset_labels(labels_path).map_err(TagError::ClassifierUnavailable)?;

        log::info!(
            "Loaded {} from {:?} ({} classes)",
            ClassifierModel::Cnn14.display_name(),
            model_path,
            labels.len()
        );

        Ok(Self {
            session,
            labels,
            config,
        })
    }

    /// Load the classifier through a model manager, downloading on first use
    pub fn from_manager(manager: &ModelManager, config: ClassifierConfig) -> Result<Self> {
        let model_path = manager
            .ensure(ClassifierModel::Cnn14)
            .map_err(TagError::ModelDownloadFailed)?;
        let labels_path = manager.labels_path(ClassifierModel::Cnn14);
        Self::new(&model_path, &labels_path, config)
    }

    /// Run the model on a waveform -> dense class probabilities
    fn run_model(&mut self, samples: &[f32]) -> std::result::Result<Vec<f32>, String> {
        // CNN14 input: [batch=1, samples]
        let input = Array2::from_shape_vec((1, samples.len()), samples.to_vec())
            .map_err(|e| format!("Input shape error: {}", e))?;

        let input_tensor =
            Tensor::from_array(input).map_err(|e| format!("Tensor creation error: {}", e))?;

        let outputs = self
            .session
            .run(ort::inputs!["waveform" => input_tensor])
            .map_err(|e| format!("Inference error: {}", e))?;

        // First output is the clipwise probability vector [1, 527]
        let (_, clipwise_value) = outputs.iter().next().ok_or("Model produced no output")?;

        let (_shape, clipwise) = clipwise_value
            .try_extract_tensor::<f32>()
            .map_err(|e| format!("Output extraction error: {}", e))?;

        Ok(clipwise.to_vec())
    }
}

impl EventClassifier for PannsClassifier {
    fn infer(&mut self, samples: &[f32]) -> Result<Vec<(String, f32)>> {
        if samples.is_empty() {
            return Err(TagError::InferenceFailed("Empty waveform".to_string()));
        }

        let clipwise = self.run_model(samples).map_err(TagError::InferenceFailed)?;

        if clipwise.len() != self.labels.len() {
            return Err(TagError::InferenceFailed(format!(
                "Model returned {} probabilities for {} labels",
                clipwise.len(),
                self.labels.len()
            )));
        }

        let predictions = rank_predictions(&clipwise, &self.labels, &self.config);
        log::debug!(
            "{}: {} predictions above {:.2}",
            self.name(),
            predictions.len(),
            self.config.min_score
        );

        Ok(predictions)
    }

    fn name(&self) -> &'static str {
        "cnn14"
    }
}
