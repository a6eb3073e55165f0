//! External event classifier boundary
//!
//! The tagging core never inspects classifier internals; it consumes a
//! capability: a mono waveform at the analysis rate goes in, a ranked and
//! thresholded list of (label, probability) pairs comes out. Any compliant
//! classifier is substitutable.
//!
//! - **Adapter** (`adapter.rs`): the `EventClassifier` trait plus the
//!   ranking contract (top-k, minimum score, truncation)
//! - **Labels** (`labels.rs`): AudioSet class label loading
//! - **Models** (`models.rs`): download + cache of the ONNX model and its
//!   label sidecar
//! - **PANNs** (`panns.rs`): ort-based CNN14 implementation

pub mod adapter;
pub mod labels;
pub mod models;
pub mod panns;

pub use adapter::{rank_predictions, EventClassifier};
pub use models::{ClassifierModel, ModelManager};
pub use panns::PannsClassifier;
