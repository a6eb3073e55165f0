//! Confidence calibration
//!
//! Two divergent policies exist; they are never blended:
//!
//! - **StemAware** (canonical): piecewise per-score rescaling plus a
//!   per-stem-type minimum-tag guarantee
//! - **MinMaxRescale** (alternate): global min-max rescale, fixed-threshold
//!   drop, two-decimal rounding. Kept behind the same interface for
//!   compatibility testing.

use serde::{Deserialize, Serialize};

use crate::stem::StemType;

use super::vocabulary::{CoarseTag, TagScores};

/// Score injected by the minimum-tag guarantee
const GUARANTEE_SCORE: f32 = 0.4;

/// Which calibration policy to apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum CalibrationStrategy {
    /// Piecewise rescaling with per-stem minimum-tag guarantees (canonical)
    #[default]
    StemAware,
    /// Global min-max rescale with fixed-threshold drop (compatibility)
    MinMaxRescale,
}

/// Calibrate tag scores for one stem
pub fn calibrate(
    tags: &TagScores,
    stem_type: StemType,
    strategy: CalibrationStrategy,
) -> TagScores {
    match strategy {
        CalibrationStrategy::StemAware => calibrate_stem_aware(tags, stem_type),
        CalibrationStrategy::MinMaxRescale => calibrate_min_max(tags, 0.15),
    }
}

/// Piecewise per-score calibration with minimum-tag guarantees
///
/// - score > 0.7: preserved
/// - 0.3 < score <= 0.7: boosted by 1.2x, capped at 1.0
/// - 0.15 < score <= 0.3: preserved
/// - score <= 0.15: dropped
///
/// After filtering, each stem type must retain at least one of its core
/// tags, else a fallback tag is injected at 0.4. Vocals have no guarantee.
fn calibrate_stem_aware(tags: &TagScores, stem_type: StemType) -> TagScores {
    if tags.is_empty() {
        return TagScores::new();
    }

    let mut calibrated = TagScores::new();
    for (&tag, &score) in tags {
        if score > 0.7 {
            calibrated.insert(tag, score);
        } else if score > 0.3 {
            calibrated.insert(tag, (score * 1.2).min(1.0));
        } else if score > 0.15 {
            calibrated.insert(tag, score);
        }
        // Very low confidence is filtered out entirely
    }

    let guarantee: Option<(&[CoarseTag], CoarseTag)> = match stem_type {
        StemType::Drums => Some((
            &[
                CoarseTag::Kick,
                CoarseTag::Snare,
                CoarseTag::HiHat,
                CoarseTag::PercLoop,
            ],
            CoarseTag::PercLoop,
        )),
        StemType::Bass => Some((
            &[CoarseTag::Sub808, CoarseTag::SynthBass, CoarseTag::Reese],
            CoarseTag::SynthBass,
        )),
        StemType::Other => Some((
            &[CoarseTag::SynthPad, CoarseTag::SawLead, CoarseTag::Pluck],
            CoarseTag::SynthPad,
        )),
        StemType::Vocals => None,
    };

    if let Some((required, fallback)) = guarantee {
        if !required.iter().any(|t| calibrated.contains_key(t)) {
            calibrated.insert(fallback, GUARANTEE_SCORE);
        }
    }

    calibrated
}

/// Global min-max rescale calibration
///
/// Rescales all scores to [0, 1], drops anything below `min_score`, rounds
/// survivors to two decimals. A degenerate distribution (all scores equal)
/// is returned unchanged.
fn calibrate_min_max(tags: &TagScores, min_score: f32) -> TagScores {
    if tags.is_empty() {
        return TagScores::new();
    }

    let min_val = tags.values().copied().fold(f32::MAX, f32::min);
    let max_val = tags.values().copied().fold(f32::MIN, f32::max);
    if (max_val - min_val).abs() < f32::EPSILON {
        return tags.clone();
    }

    let mut calibrated = TagScores::new();
    for (&tag, &score) in tags {
        let rescaled = (score - min_val) / (max_val - min_val);
        if rescaled >= min_score {
            calibrated.insert(tag, round2(rescaled));
        }
    }
    calibrated
}

fn round2(value: f32) -> f32 {
    (value * 100.0).round() / 100.0
}
