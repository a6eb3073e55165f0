//! Synth-family refinement
//!
//! Generic "synth" classifier labels are too broad to be useful on their
//! own. When one is present, spectral and stereo cues pick the specific
//! family: bright + wide reads as a saw lead, dark as a pad, anything in
//! between as a pluck.

use super::vocabulary::CoarseTag;

/// Minimum score a refined synth-family tag is merged at
pub const SYNTH_SCORE_FLOOR: f32 = 0.5;

/// Centroid above which a wide synth counts as a saw lead, in Hz
const LEAD_CENTROID_HZ: f32 = 3000.0;

/// Centroid below which a synth counts as a pad, in Hz
const PAD_CENTROID_HZ: f32 = 1200.0;

/// Pick a synth family from spectral/stereo cues
///
/// Returns None unless some raw label contains "synth". The caller merges
/// the returned tag at [`SYNTH_SCORE_FLOOR`] via max-aggregation.
pub fn refine_synth_family(
    predictions: &[(String, f32)],
    centroid_hz: f32,
    wide_stereo: bool,
) -> Option<CoarseTag> {
    let has_synth = predictions
        .iter()
        .any(|(label, _)| label.to_lowercase().contains("synth"));
    if !has_synth {
        return None;
    }

    if centroid_hz > LEAD_CENTROID_HZ && wide_stereo {
        Some(CoarseTag::SawLead)
    } else if centroid_hz < PAD_CENTROID_HZ {
        Some(CoarseTag::SynthPad)
    } else {
        Some(CoarseTag::Pluck)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn synth_preds() -> Vec<(String, f32)> {
        vec![("Synthesizer".to_string(), 0.6)]
    }

    #[test]
    fn test_bright_and_wide_is_saw_lead() {
        assert_eq!(
            refine_synth_family(&synth_preds(), 4500.0, true),
            Some(CoarseTag::SawLead)
        );
    }

    #[test]
    fn test_bright_but_narrow_is_pluck() {
        assert_eq!(
            refine_synth_family(&synth_preds(), 4500.0, false),
            Some(CoarseTag::Pluck)
        );
    }

    #[test]
    fn test_dark_is_pad() {
        assert_eq!(
            refine_synth_family(&synth_preds(), 800.0, false),
            Some(CoarseTag::SynthPad)
        );
    }

    #[test]
    fn test_midrange_is_pluck() {
        assert_eq!(
            refine_synth_family(&synth_preds(), 2000.0, true),
            Some(CoarseTag::Pluck)
        );
    }

    #[test]
    fn test_no_synth_label_is_none() {
        let preds = vec![("Piano".to_string(), 0.9)];
        assert_eq!(refine_synth_family(&preds, 4500.0, true), None);
    }
}
