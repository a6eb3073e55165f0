//! Sidechain pump detection modes
//!
//! Both modes run the same periodic-envelope detector
//! ([`crate::features::detect_periodic_pump`]):
//!
//! - **Per-stem**: detect directly on one stem's waveform; the squashed
//!   prominence becomes a `sidechain_pump` meta tag on that stem
//! - **Global**: detect once on the renormalized sum of all present stems
//!   and store the result as clip-level metadata. Preferred for whole-clip
//!   processing because pumping usually rides on every stem at once and
//!   per-stem detection would report the same pump four times.

use crate::features::{detect_periodic_pump, PumpDetection};
use crate::result::GlobalSidechain;

/// Squash a pump prominence into a [0, 1] meta-tag score
pub fn pump_score(prominence: f32) -> f32 {
    (0.2 + (prominence + 1e-9).log10()).clamp(0.0, 1.0)
}

/// Sum stem waveforms, zero-padding shorter ones, and renormalize to peak 1.0
///
/// Returns None when no stems are given.
pub fn sum_stems(stems: &[&[f32]]) -> Option<Vec<f32>> {
    if stems.is_empty() {
        return None;
    }

    let max_len = stems.iter().map(|s| s.len()).max().unwrap_or(0);
    let mut sum = vec![0.0f32; max_len];
    for stem in stems {
        for (i, &s) in stem.iter().enumerate() {
            sum[i] += s;
        }
    }

    crate::audio::peak_normalize(&mut sum);
    Some(sum)
}

/// Run the pump detector once over the sum of all present stems
pub fn detect_global_sidechain(stems: &[&[f32]], sample_rate: u32) -> PumpDetection {
    match sum_stems(stems) {
        Some(mix) => detect_periodic_pump(&mix, sample_rate),
        None => PumpDetection {
            detected: false,
            prominence: 0.0,
            peak_freq_hz: None,
        },
    }
}

/// Convert a detection into the clip-level metadata block
pub fn to_global_metadata(detection: &PumpDetection) -> GlobalSidechain {
    if detection.detected {
        GlobalSidechain {
            detected: true,
            strength: Some(pump_score(detection.prominence)),
            frequency_hz: detection.peak_freq_hz,
        }
    } else {
        GlobalSidechain::none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: u32 = 32_000;

    fn pumped(mod_hz: f32, secs: f32, gain: f32) -> Vec<f32> {
        let n = (SR as f32 * secs) as usize;
        (0..n)
            .map(|i| {
                let t = i as f32 / SR as f32;
                let env = 0.55 + 0.45 * (2.0 * std::f32::consts::PI * mod_hz * t).sin();
                gain * env * (2.0 * std::f32::consts::PI * 220.0 * t).sin()
            })
            .collect()
    }

    #[test]
    fn test_pump_score_squashes_into_unit_range() {
        assert_eq!(pump_score(1e-9), 0.0); // log10(2e-9) clamps to 0
        assert!(pump_score(13.0) >= 1.0 - 1e-6);
        assert!((0.0..=1.0).contains(&pump_score(100.0)));
    }

    #[test]
    fn test_sum_stems_zero_pads_shorter() {
        let a = vec![0.5f32; 100];
        let b = vec![0.5f32; 50];
        let sum = sum_stems(&[&a, &b]).unwrap();
        assert_eq!(sum.len(), 100);
        // Both halves are renormalized by the same peak
        assert!((sum[0] - 1.0).abs() < 1e-6);
        assert!((sum[75] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_sum_stems_empty_is_none() {
        assert!(sum_stems(&[]).is_none());
    }

    #[test]
    fn test_global_detection_on_pumped_stems() {
        let drums = pumped(2.0, 8.0, 0.8);
        let bass = pumped(2.0, 6.0, 0.4); // shorter, gets zero-padded
        let detection = detect_global_sidechain(&[&drums, &bass], SR);
        assert!(detection.detected, "prominence: {}", detection.prominence);

        let metadata = to_global_metadata(&detection);
        assert!(metadata.detected);
        let strength = metadata.strength.expect("strength");
        assert!((0.0..=1.0).contains(&strength));
        let freq = metadata.frequency_hz.expect("frequency");
        assert!((freq - 2.0).abs() < 0.3, "freq: {}", freq);
    }

    #[test]
    fn test_no_stems_is_not_detected() {
        let detection = detect_global_sidechain(&[], SR);
        assert!(!detection.detected);
        assert_eq!(to_global_metadata(&detection), GlobalSidechain::none());
    }
}
