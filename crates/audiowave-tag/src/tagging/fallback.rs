//! Spectral fallback injection
//!
//! When classifier evidence is weak or absent, deterministic
//! spectral-threshold rules add or raise tag scores so every stem still
//! receives a plausible identity. All injections go through max-aggregation
//! and never lower an existing score. Vocals have no fallback rule.

use crate::features::StemCharacteristics;
use crate::stem::StemType;

use super::vocabulary::{merge_max, CoarseTag, TagScores};

/// Onset strength above which an otherwise untagged drum stem is labeled a
/// percussion loop
const DRUM_ONSET_THRESHOLD: f32 = 0.3;

/// Inject spectral-threshold fallback tags for one stem
pub fn inject_spectral_fallbacks(
    tags: &mut TagScores,
    characteristics: &StemCharacteristics,
    stem_type: StemType,
) {
    let centroid = characteristics.centroid_hz;

    match stem_type {
        StemType::Drums => {
            if centroid > 4000.0 {
                merge_max(tags, CoarseTag::HiHat, 0.6);
            } else if centroid > 2500.0 {
                merge_max(tags, CoarseTag::Snare, 0.5);
            } else if centroid > 1500.0 {
                merge_max(tags, CoarseTag::Kick, 0.4);
            }

            // Rhythm-based fallback when nothing percussive matched at all
            let has_drum_tag = [
                CoarseTag::Kick,
                CoarseTag::Snare,
                CoarseTag::HiHat,
                CoarseTag::PercLoop,
            ]
            .iter()
            .any(|t| tags.contains_key(t));
            if characteristics.onset_strength > DRUM_ONSET_THRESHOLD && !has_drum_tag {
                merge_max(tags, CoarseTag::PercLoop, 0.5);
            }
        }
        StemType::Bass => {
            if centroid < 2000.0 {
                merge_max(tags, CoarseTag::Sub808, 0.6);
            } else {
                merge_max(tags, CoarseTag::SynthBass, 0.5);
            }
        }
        StemType::Other => {
            if centroid > 3000.0 {
                merge_max(tags, CoarseTag::SawLead, 0.5);
            } else if centroid < 1500.0 {
                merge_max(tags, CoarseTag::SynthPad, 0.5);
            } else {
                merge_max(tags, CoarseTag::Pluck, 0.4);
            }
        }
        StemType::Vocals => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(centroid_hz: f32, onset_strength: f32) -> StemCharacteristics {
        StemCharacteristics {
            centroid_hz,
            rolloff_hz: 0.0,
            zero_crossing_rate: 0.0,
            tempo_bpm: 120.0,
            onset_strength,
        }
    }

    #[test]
    fn test_bright_drums_get_hihat() {
        let mut tags = TagScores::new();
        inject_spectral_fallbacks(&mut tags, &chars(5000.0, 0.0), StemType::Drums);
        assert_eq!(tags.get(&CoarseTag::HiHat), Some(&0.6));
        assert!(!tags.contains_key(&CoarseTag::Snare));
    }

    #[test]
    fn test_midbright_drums_get_snare() {
        let mut tags = TagScores::new();
        inject_spectral_fallbacks(&mut tags, &chars(3000.0, 0.0), StemType::Drums);
        assert_eq!(tags.get(&CoarseTag::Snare), Some(&0.5));
    }

    #[test]
    fn test_low_drums_get_kick() {
        let mut tags = TagScores::new();
        inject_spectral_fallbacks(&mut tags, &chars(1800.0, 0.0), StemType::Drums);
        assert_eq!(tags.get(&CoarseTag::Kick), Some(&0.4));
    }

    #[test]
    fn test_rhythmic_untagged_drums_get_perc_loop() {
        let mut tags = TagScores::new();
        inject_spectral_fallbacks(&mut tags, &chars(1000.0, 0.5), StemType::Drums);
        assert_eq!(tags.get(&CoarseTag::PercLoop), Some(&0.5));
    }

    #[test]
    fn test_onset_rule_skipped_when_drum_tag_present() {
        let mut tags = TagScores::new();
        merge_max(&mut tags, CoarseTag::Kick, 0.9);
        inject_spectral_fallbacks(&mut tags, &chars(1000.0, 0.5), StemType::Drums);
        assert!(!tags.contains_key(&CoarseTag::PercLoop));
    }

    #[test]
    fn test_fallback_never_lowers_existing_score() {
        let mut tags = TagScores::new();
        merge_max(&mut tags, CoarseTag::HiHat, 0.9);
        inject_spectral_fallbacks(&mut tags, &chars(5000.0, 0.0), StemType::Drums);
        assert_eq!(tags.get(&CoarseTag::HiHat), Some(&0.9));
    }

    #[test]
    fn test_low_bass_gets_sub() {
        let mut tags = TagScores::new();
        inject_spectral_fallbacks(&mut tags, &chars(500.0, 0.0), StemType::Bass);
        assert_eq!(tags.get(&CoarseTag::Sub808), Some(&0.6));
    }

    #[test]
    fn test_high_bass_gets_synth_bass() {
        let mut tags = TagScores::new();
        inject_spectral_fallbacks(&mut tags, &chars(2500.0, 0.0), StemType::Bass);
        assert_eq!(tags.get(&CoarseTag::SynthBass), Some(&0.5));
    }

    #[test]
    fn test_other_branches() {
        let mut tags = TagScores::new();
        inject_spectral_fallbacks(&mut tags, &chars(3500.0, 0.0), StemType::Other);
        assert_eq!(tags.get(&CoarseTag::SawLead), Some(&0.5));

        let mut tags = TagScores::new();
        inject_spectral_fallbacks(&mut tags, &chars(1000.0, 0.0), StemType::Other);
        assert_eq!(tags.get(&CoarseTag::SynthPad), Some(&0.5));

        let mut tags = TagScores::new();
        inject_spectral_fallbacks(&mut tags, &chars(2000.0, 0.0), StemType::Other);
        assert_eq!(tags.get(&CoarseTag::Pluck), Some(&0.4));
    }

    #[test]
    fn test_vocals_have_no_fallback() {
        let mut tags = TagScores::new();
        inject_spectral_fallbacks(&mut tags, &chars(5000.0, 0.9), StemType::Vocals);
        assert!(tags.is_empty());
    }
}
