//! Heuristic tag fusion
//!
//! Turns ranked classifier predictions plus stem characteristics into the
//! final coarse tags for one stem:
//!
//! - **Vocabulary** (`vocabulary.rs`): closed `CoarseTag` enum, score maps,
//!   max-aggregation
//! - **Label mapping** (`label_map.rs`): ordered stem-aware rule tables
//! - **Refinement** (`refine.rs`): synth-family disambiguation from
//!   spectral/stereo cues
//! - **Fallbacks** (`fallback.rs`): spectral-threshold injection when
//!   classifier evidence is weak
//! - **Calibration** (`calibrate.rs`): canonical stem-aware policy plus the
//!   compatibility min-max policy
//! - **Partitioning** (`partition.rs`): content vs. meta split and
//!   truncation

pub mod calibrate;
pub mod fallback;
pub mod label_map;
pub mod partition;
pub mod refine;
pub mod vocabulary;

pub use calibrate::{calibrate, CalibrationStrategy};
pub use fallback::inject_spectral_fallbacks;
pub use label_map::{map_predictions, STOP_LABELS};
pub use partition::{partition_tags, PartitionedTags};
pub use refine::{refine_synth_family, SYNTH_SCORE_FLOOR};
pub use vocabulary::{merge_max, CoarseTag, TagCategory, TagScores};
