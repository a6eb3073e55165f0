//! Closed coarse-tag vocabulary
//!
//! The output vocabulary is a fixed set of musically meaningful tags. It is
//! modeled as an enum so no ad hoc tag name can enter a result at runtime;
//! every rule table and injection site speaks in `CoarseTag` values.

use std::collections::BTreeMap;

use serde::{Serialize, Serializer};

/// A member of the closed output vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CoarseTag {
    // Drums
    Kick,
    Snare,
    HiHat,
    Clap,
    PercLoop,
    // Bass
    Sub808,
    Reese,
    SynthBass,
    SlapBass,
    // Keys / melodic
    Piano,
    Rhodes,
    Organ,
    Bell,
    Pluck,
    SawLead,
    SynthPad,
    // Vocals
    Vox,
    VoxLead,
    VoxRap,
    VoxHarmony,
    // FX
    Riser,
    Impact,
    VinylNoise,
    // Meta (mix characteristics, not instrument identity)
    SidechainPump,
    StereoWide,
}

/// Whether a tag names a sound source or a mix characteristic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagCategory {
    /// Instrument / sound-source identity
    Content,
    /// Mix-level characteristic (stereo width, pumping)
    Meta,
}

impl CoarseTag {
    /// Published tag name as it appears in the artifact
    pub fn as_str(&self) -> &'static str {
        match self {
            CoarseTag::Kick => "kick",
            CoarseTag::Snare => "snare",
            CoarseTag::HiHat => "hi-hat",
            CoarseTag::Clap => "clap",
            CoarseTag::PercLoop => "perc_loop",
            CoarseTag::Sub808 => "sub_808",
            CoarseTag::Reese => "reese",
            CoarseTag::SynthBass => "synth_bass",
            CoarseTag::SlapBass => "slap_bass",
            CoarseTag::Piano => "piano",
            CoarseTag::Rhodes => "rhodes",
            CoarseTag::Organ => "organ",
            CoarseTag::Bell => "bell",
            CoarseTag::Pluck => "pluck",
            CoarseTag::SawLead => "saw_lead",
            CoarseTag::SynthPad => "synth_pad",
            CoarseTag::Vox => "vox",
            CoarseTag::VoxLead => "vox_lead",
            CoarseTag::VoxRap => "vox_rap",
            CoarseTag::VoxHarmony => "vox_harmony",
            CoarseTag::Riser => "riser",
            CoarseTag::Impact => "impact",
            CoarseTag::VinylNoise => "vinyl_noise",
            CoarseTag::SidechainPump => "sidechain_pump",
            CoarseTag::StereoWide => "stereo_wide",
        }
    }

    /// Content vs. meta classification
    pub fn category(&self) -> TagCategory {
        match self {
            CoarseTag::SidechainPump | CoarseTag::StereoWide => TagCategory::Meta,
            _ => TagCategory::Content,
        }
    }

    /// The complete vocabulary
    pub fn all() -> &'static [CoarseTag] {
        &[
            CoarseTag::Kick,
            CoarseTag::Snare,
            CoarseTag::HiHat,
            CoarseTag::Clap,
            CoarseTag::PercLoop,
            CoarseTag::Sub808,
            CoarseTag::Reese,
            CoarseTag::SynthBass,
            CoarseTag::SlapBass,
            CoarseTag::Piano,
            CoarseTag::Rhodes,
            CoarseTag::Organ,
            CoarseTag::Bell,
            CoarseTag::Pluck,
            CoarseTag::SawLead,
            CoarseTag::SynthPad,
            CoarseTag::Vox,
            CoarseTag::VoxLead,
            CoarseTag::VoxRap,
            CoarseTag::VoxHarmony,
            CoarseTag::Riser,
            CoarseTag::Impact,
            CoarseTag::VinylNoise,
            CoarseTag::SidechainPump,
            CoarseTag::StereoWide,
        ]
    }
}

impl std::fmt::Display for CoarseTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for CoarseTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Per-stem tag scores keyed by vocabulary member
///
/// BTreeMap keeps iteration in declaration order, so downstream sorting and
/// serialization are deterministic.
pub type TagScores = BTreeMap<CoarseTag, f32>;

/// Raise a tag's score to `score` if higher, insert otherwise
///
/// All rule layers aggregate through this: a later rule can raise a score
/// but never lower one.
pub fn merge_max(scores: &mut TagScores, tag: CoarseTag, score: f32) {
    let entry = scores.entry(tag).or_insert(0.0);
    if score > *entry {
        *entry = score;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vocabulary_is_closed_and_unique() {
        let all = CoarseTag::all();
        assert_eq!(all.len(), 25);
        let mut names: Vec<&str> = all.iter().map(|t| t.as_str()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), all.len(), "duplicate tag names");
    }

    #[test]
    fn test_exactly_two_meta_tags() {
        let meta: Vec<_> = CoarseTag::all()
            .iter()
            .filter(|t| t.category() == TagCategory::Meta)
            .collect();
        assert_eq!(meta.len(), 2);
        assert!(meta.contains(&&CoarseTag::SidechainPump));
        assert!(meta.contains(&&CoarseTag::StereoWide));
    }

    #[test]
    fn test_merge_max_never_lowers() {
        let mut scores = TagScores::new();
        merge_max(&mut scores, CoarseTag::Kick, 0.8);
        merge_max(&mut scores, CoarseTag::Kick, 0.3);
        assert_eq!(scores[&CoarseTag::Kick], 0.8);
        merge_max(&mut scores, CoarseTag::Kick, 0.9);
        assert_eq!(scores[&CoarseTag::Kick], 0.9);
    }

    #[test]
    fn test_serializes_to_published_name() {
        let json = serde_json::to_string(&CoarseTag::HiHat).unwrap();
        assert_eq!(json, "\"hi-hat\"");
        let json = serde_json::to_string(&CoarseTag::Sub808).unwrap();
        assert_eq!(json, "\"sub_808\"");
    }
}
