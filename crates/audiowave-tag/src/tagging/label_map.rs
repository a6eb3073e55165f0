//! Classifier-label to coarse-tag mapping
//!
//! Raw classifier labels are mapped through a cascade of rule tables, in
//! strict priority order per prediction:
//!
//! 1. stop-list (exact match, zero-signal labels are dropped)
//! 2. stem-specific keyword table
//! 3. drum label table (drum stems only)
//! 4. instrument label table
//! 5. general classifier-vocabulary table
//!
//! Every table is an explicit ordered slice scanned top-to-bottom with
//! first-match-wins substring semantics. Ordering is part of the output
//! contract: place specific patterns before general ones, because a broad
//! pattern like "drum" shadows everything after it.
//!
//! Matched tags aggregate via max, never overwrite-with-lower.

use crate::stem::StemType;

use super::vocabulary::{merge_max, CoarseTag, TagScores};

/// Labels that add zero signal; matched exactly against the lowercased label
///
/// "music" is near-universally top-ranked and carries no information about
/// which instrument a stem holds.
pub const STOP_LABELS: &[&str] = &["music", "speech"];

/// Stem-specific keywords, scanned in order; the matched keyword (not the
/// full label) selects the tag via [`keyword_tag`]
const DRUM_STEM_KEYWORDS: &[&str] = &[
    "kick",
    "snare",
    "hi-hat",
    "drum",
    "percussion",
    "cymbal",
    "clap",
    "thunk",
];

const BASS_STEM_KEYWORDS: &[&str] = &["bass", "808", "sub", "low frequency", "electric bass"];

const VOCAL_STEM_KEYWORDS: &[&str] = &["singing", "speech", "vocal", "rap", "choir", "chant"];

const OTHER_STEM_KEYWORDS: &[&str] = &[
    "synthesizer",
    "piano",
    "organ",
    "guitar",
    "strings",
    "melody",
    "pad",
];

/// Drum label table, consulted for drum stems after the keyword scan
pub const DRUM_LABELS: &[(&str, CoarseTag)] = &[
    ("kick drum", CoarseTag::Kick),
    ("bass drum", CoarseTag::Kick),
    ("kick", CoarseTag::Kick),
    ("snare drum", CoarseTag::Snare),
    ("snare", CoarseTag::Snare),
    ("hi-hat", CoarseTag::HiHat),
    ("hi hat", CoarseTag::HiHat),
    ("hihat", CoarseTag::HiHat),
    ("cymbal", CoarseTag::HiHat),
    ("ride cymbal", CoarseTag::HiHat),
    ("crash cymbal", CoarseTag::HiHat),
    ("tom-tom", CoarseTag::PercLoop),
    ("clap", CoarseTag::Clap),
    ("hand clap", CoarseTag::Clap),
    ("thunk", CoarseTag::PercLoop),
    ("percussion", CoarseTag::PercLoop),
    ("drum machine", CoarseTag::PercLoop),
];

/// Instrument label table, consulted for every stem type
pub const INSTRUMENT_LABELS: &[(&str, CoarseTag)] = &[
    ("organ", CoarseTag::Organ),
    ("hammond organ", CoarseTag::Organ),
    ("electronic organ", CoarseTag::Organ),
    ("piano", CoarseTag::Piano),
    ("electric piano", CoarseTag::Rhodes),
    ("rhodes", CoarseTag::Rhodes),
    ("harpsichord", CoarseTag::Bell),
    ("bell", CoarseTag::Bell),
    ("glockenspiel", CoarseTag::Bell),
    ("acoustic guitar", CoarseTag::Pluck),
    ("electric guitar", CoarseTag::Pluck),
    ("violin", CoarseTag::SawLead),
    ("cello", CoarseTag::SawLead),
    ("strings", CoarseTag::SawLead),
    ("synthesizer", CoarseTag::Pluck),
    ("sampler", CoarseTag::Pluck),
    ("singing", CoarseTag::VoxLead),
    ("synthetic singing", CoarseTag::VoxLead),
    ("choir", CoarseTag::VoxHarmony),
    ("vocal", CoarseTag::Vox),
    ("a capella", CoarseTag::VoxLead),
    ("speech", CoarseTag::VoxRap),
    ("rap", CoarseTag::VoxRap),
    ("chant", CoarseTag::VoxHarmony),
    ("electric bass", CoarseTag::SynthBass),
    ("bass guitar", CoarseTag::SynthBass),
    ("synth bass", CoarseTag::SynthBass),
    ("808", CoarseTag::Sub808),
    ("sub", CoarseTag::Sub808),
    ("sub bass", CoarseTag::Sub808),
];

/// General classifier-vocabulary table, the last resort for any stem
pub const GENERAL_LABELS: &[(&str, CoarseTag)] = &[
    // Drums
    ("drum", CoarseTag::PercLoop),
    ("drum kit", CoarseTag::PercLoop),
    ("snare drum", CoarseTag::Snare),
    ("snare", CoarseTag::Snare),
    ("bass drum", CoarseTag::Kick),
    ("kick drum", CoarseTag::Kick),
    ("kick", CoarseTag::Kick),
    ("hi-hat", CoarseTag::HiHat),
    ("hi hat", CoarseTag::HiHat),
    ("hihat", CoarseTag::HiHat),
    ("cymbal", CoarseTag::HiHat),
    ("ride cymbal", CoarseTag::HiHat),
    ("crash cymbal", CoarseTag::HiHat),
    ("tom-tom", CoarseTag::PercLoop),
    ("clap", CoarseTag::Clap),
    ("hand clap", CoarseTag::Clap),
    ("thunk", CoarseTag::PercLoop),
    ("percussion", CoarseTag::PercLoop),
    ("drum machine", CoarseTag::PercLoop),
    // Bass
    ("electric bass", CoarseTag::SynthBass),
    ("bass guitar", CoarseTag::SynthBass),
    ("synth bass", CoarseTag::SynthBass),
    ("808", CoarseTag::Sub808),
    ("sub", CoarseTag::Sub808),
    ("sub bass", CoarseTag::Sub808),
    // Keys / piano / organ
    ("piano", CoarseTag::Piano),
    ("electric piano", CoarseTag::Rhodes),
    ("rhodes", CoarseTag::Rhodes),
    ("organ", CoarseTag::Organ),
    ("hammond organ", CoarseTag::Organ),
    ("electronic organ", CoarseTag::Organ),
    ("musical instrument", CoarseTag::Organ),
    ("keyboard (musical)", CoarseTag::Piano),
    ("harpsichord", CoarseTag::Bell),
    ("bell", CoarseTag::Bell),
    ("glockenspiel", CoarseTag::Bell),
    // Guitars / strings
    ("acoustic guitar", CoarseTag::Pluck),
    ("electric guitar", CoarseTag::Pluck),
    ("violin", CoarseTag::SawLead),
    ("cello", CoarseTag::SawLead),
    ("strings", CoarseTag::SawLead),
    // Synths (broad; refined by the synth-family heuristics)
    ("synthesizer", CoarseTag::Pluck),
    ("sampler", CoarseTag::Pluck),
    // Vocals
    ("singing", CoarseTag::VoxLead),
    ("synthetic singing", CoarseTag::VoxLead),
    ("choir", CoarseTag::VoxHarmony),
    ("vocal", CoarseTag::Vox),
    ("a capella", CoarseTag::VoxLead),
    ("speech", CoarseTag::VoxRap),
    ("rap", CoarseTag::VoxRap),
    ("chant", CoarseTag::VoxHarmony),
    // FX textures
    ("reverberation", CoarseTag::VinylNoise),
    ("echo", CoarseTag::VinylNoise),
    ("chorus effect", CoarseTag::VinylNoise),
    ("distortion", CoarseTag::Impact),
    ("overdrive", CoarseTag::Impact),
    ("saturation", CoarseTag::Impact),
];

/// Map ranked classifier predictions to coarse-tag scores, stem-aware
///
/// Unmatched predictions contribute nothing.
pub fn map_predictions(predictions: &[(String, f32)], stem_type: StemType) -> TagScores {
    let mut out = TagScores::new();

    for (label, score) in predictions {
        let label = label.to_lowercase();

        if STOP_LABELS.contains(&label.as_str()) {
            continue;
        }

        // 1. Stem-specific keywords take priority
        if let Some(keyword) = stem_keywords(stem_type)
            .iter()
            .find(|kw| label.contains(*kw))
        {
            let tag = keyword_tag(keyword, stem_type);
            merge_max(&mut out, tag, *score);
            continue;
        }

        // 2. Drum table, for drum stems only
        if stem_type == StemType::Drums {
            if let Some(tag) = first_match(DRUM_LABELS, &label) {
                merge_max(&mut out, tag, *score);
                continue;
            }
        }

        // 3. Instrument table
        if let Some(tag) = first_match(INSTRUMENT_LABELS, &label) {
            merge_max(&mut out, tag, *score);
            continue;
        }

        // 4. General table
        if let Some(tag) = first_match(GENERAL_LABELS, &label) {
            merge_max(&mut out, tag, *score);
        }
    }

    out
}

/// First substring match in an ordered table
fn first_match(table: &[(&str, CoarseTag)], label: &str) -> Option<CoarseTag> {
    table
        .iter()
        .find(|(pattern, _)| label.contains(pattern))
        .map(|(_, tag)| *tag)
}

/// Keyword list for a stem type
fn stem_keywords(stem_type: StemType) -> &'static [&'static str] {
    match stem_type {
        StemType::Drums => DRUM_STEM_KEYWORDS,
        StemType::Bass => BASS_STEM_KEYWORDS,
        StemType::Vocals => VOCAL_STEM_KEYWORDS,
        StemType::Other => OTHER_STEM_KEYWORDS,
    }
}

/// Deterministic tag for a matched stem keyword
fn keyword_tag(keyword: &str, stem_type: StemType) -> CoarseTag {
    match stem_type {
        StemType::Drums => {
            if keyword.contains("kick") {
                CoarseTag::Kick
            } else if keyword.contains("snare") {
                CoarseTag::Snare
            } else if keyword.contains("hi-hat")
                || keyword.contains("hi hat")
                || keyword.contains("cymbal")
            {
                CoarseTag::HiHat
            } else if keyword.contains("clap") {
                CoarseTag::Clap
            } else {
                CoarseTag::PercLoop
            }
        }
        StemType::Bass => {
            if keyword.contains("808") || keyword.contains("sub") {
                CoarseTag::Sub808
            } else {
                CoarseTag::SynthBass
            }
        }
        StemType::Vocals => {
            if keyword.contains("rap") {
                CoarseTag::VoxRap
            } else if keyword.contains("singing") {
                CoarseTag::VoxLead
            } else if keyword.contains("choir") || keyword.contains("chant") {
                CoarseTag::VoxHarmony
            } else {
                CoarseTag::Vox
            }
        }
        StemType::Other => {
            if keyword.contains("piano") {
                CoarseTag::Piano
            } else if keyword.contains("organ") {
                CoarseTag::Organ
            } else if keyword.contains("guitar") {
                CoarseTag::Pluck
            } else if keyword.contains("strings") {
                CoarseTag::SawLead
            } else {
                CoarseTag::SynthPad
            }
        }
    }
}
