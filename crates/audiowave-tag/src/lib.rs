//! Audiowave Tag - stem-aware coarse tagging for separated clips
//!
//! Turns a classifier's raw event probabilities plus low-level acoustic
//! measurements into a small closed vocabulary of musically meaningful tags
//! per stem, with a clip-level sidechain pump detector:
//!
//! 1. **Features**: spectral centroid, stereo width, tempo/onset strength,
//!    periodic-envelope prominence
//! 2. **Classifier**: AudioSet event probabilities through a swappable
//!    `EventClassifier` boundary (CNN14 via ONNX Runtime bundled)
//! 3. **Tagging**: ordered stem-aware rule tables, synth-family refinement,
//!    spectral fallbacks, confidence calibration, content/meta partitioning
//! 4. **Orchestration**: the per-stem pipeline across a clip's four
//!    canonical stems, plus the `tags.json` artifact
//!
//! ```no_run
//! use audiowave_tag::classifier::{ModelManager, PannsClassifier};
//! use audiowave_tag::clip::ClipTagger;
//! use audiowave_tag::config::TaggingConfig;
//!
//! let config = TaggingConfig::default();
//! let manager = ModelManager::new().expect("cache dir");
//! let classifier = PannsClassifier::from_manager(&manager, config.classifier.clone())?;
//! let mut tagger = ClipTagger::new(classifier, config);
//! tagger.tag_clip_dir(std::path::Path::new("/clips/my_song"))?;
//! # Ok::<(), audiowave_tag::TagError>(())
//! ```

pub mod audio;
pub mod classifier;
pub mod clip;
pub mod config;
pub mod error;
pub mod features;
pub mod result;
pub mod sidechain;
pub mod stem;
pub mod tagging;

// Re-export main types
pub use classifier::EventClassifier;
pub use clip::ClipTagger;
pub use config::TaggingConfig;
pub use error::{Result, TagError};
pub use result::{ClipResult, StemAnalysis};
pub use stem::StemType;
pub use tagging::{CalibrationStrategy, CoarseTag};
