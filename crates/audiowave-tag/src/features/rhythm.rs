//! Best-effort tempo and onset strength
//!
//! Onset strength is the mean positive log-spectral flux across STFT bins.
//! Tempo is estimated by autocorrelating the onset envelope over the
//! 30-240 BPM lag range. Both are best-effort: when the signal is too short
//! or carries no onsets, the documented fallbacks (120.0 BPM, 0.0 strength)
//! are returned instead of an error.

use super::spectral::{magnitude_frames, FRAME_SIZE, HOP_SIZE};

/// Tempo fallback when rhythm analysis cannot produce an estimate
pub const FALLBACK_TEMPO_BPM: f32 = 120.0;

/// Onset strength fallback when rhythm analysis cannot produce an estimate
pub const FALLBACK_ONSET_STRENGTH: f32 = 0.0;

/// Tempo search range in BPM
const MIN_TEMPO_BPM: f32 = 30.0;
const MAX_TEMPO_BPM: f32 = 240.0;

/// Dynamic range kept below the loudest bin when log-compressing, in dB
const TOP_DB: f32 = 80.0;

/// Rhythm analysis result
#[derive(Debug, Clone, Copy)]
pub struct RhythmFeatures {
    /// Estimated tempo in BPM
    pub tempo_bpm: f32,
    /// Mean onset strength (dB of positive spectral flux per bin)
    pub onset_strength: f32,
}

/// Analyze tempo and onset strength, falling back on failure
pub fn analyze_rhythm(samples: &[f32], sample_rate: u32) -> RhythmFeatures {
    match try_analyze(samples, sample_rate) {
        Some(features) => features,
        None => {
            log::debug!("rhythm analysis fell back to defaults");
            RhythmFeatures {
                tempo_bpm: FALLBACK_TEMPO_BPM,
                onset_strength: FALLBACK_ONSET_STRENGTH,
            }
        }
    }
}

fn try_analyze(samples: &[f32], sample_rate: u32) -> Option<RhythmFeatures> {
    if sample_rate == 0 {
        return None;
    }

    let envelope = onset_envelope(samples);
    if envelope.len() < 4 {
        return None;
    }

    let onset_strength = envelope.iter().sum::<f32>() / envelope.len() as f32;
    if envelope.iter().all(|&v| v <= 1e-9) {
        // No onsets at all (silence or a pure sustained tone)
        return None;
    }

    let frames_per_sec = sample_rate as f32 / HOP_SIZE as f32;
    let tempo_bpm = estimate_tempo(&envelope, frames_per_sec)?;

    Some(RhythmFeatures {
        tempo_bpm,
        onset_strength,
    })
}

/// Positive log-spectral flux per frame
///
/// Magnitudes are log-compressed with an 80 dB floor below the global peak
/// before differencing, so the flux tracks perceptual onsets rather than raw
/// energy.
fn onset_envelope(samples: &[f32]) -> Vec<f32> {
    let frames = magnitude_frames(samples, FRAME_SIZE, HOP_SIZE);
    if frames.len() < 2 {
        return Vec::new();
    }

    // Log power relative to the global peak, clipped at -TOP_DB
    let peak = frames
        .iter()
        .flat_map(|f| f.iter())
        .fold(f32::MIN_POSITIVE, |acc, &m| acc.max(m * m));
    let floor_db = 10.0 * peak.log10() - TOP_DB;

    let db = |m: f32| -> f32 {
        let power = (m * m).max(1e-20);
        (10.0 * power.log10()).max(floor_db)
    };

    let n_bins = frames[0].len();
    let mut envelope = Vec::with_capacity(frames.len() - 1);
    for pair in frames.windows(2) {
        let mut flux = 0.0f32;
        for k in 0..n_bins {
            let diff = db(pair[1][k]) - db(pair[0][k]);
            if diff > 0.0 {
                flux += diff;
            }
        }
        envelope.push(flux / n_bins as f32);
    }
    envelope
}

/// Pick the strongest autocorrelation lag in the tempo search range
fn estimate_tempo(envelope: &[f32], frames_per_sec: f32) -> Option<f32> {
    let mean = envelope.iter().sum::<f32>() / envelope.len() as f32;
    let centered: Vec<f32> = envelope.iter().map(|&v| v - mean).collect();

    let min_lag = ((60.0 / MAX_TEMPO_BPM) * frames_per_sec).round() as usize;
    let max_lag = ((60.0 / MIN_TEMPO_BPM) * frames_per_sec).round() as usize;
    let max_lag = max_lag.min(centered.len() / 2);
    if min_lag == 0 || min_lag >= max_lag {
        return None;
    }

    let mut best_lag = 0usize;
    let mut best_value = f32::MIN;
    for lag in min_lag..=max_lag {
        let pairs = centered.len() - lag;
        let mut acc = 0.0f32;
        for t in 0..pairs {
            acc += centered[t] * centered[t + lag];
        }
        let value = acc / pairs as f32;
        if value > best_value {
            best_value = value;
            best_lag = lag;
        }
    }

    if best_value <= 0.0 || best_lag == 0 {
        return None;
    }

    Some(60.0 * frames_per_sec / best_lag as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: u32 = 32_000;

    /// Click train at the given BPM: short decaying bursts over silence
    fn click_train(bpm: f32, secs: f32) -> Vec<f32> {
        let n = (SR as f32 * secs) as usize;
        let period = (60.0 / bpm * SR as f32) as usize;
        let mut samples = vec![0.0f32; n];
        let mut pos = 0usize;
        while pos < n {
            for i in 0..800.min(n - pos) {
                let decay = (-(i as f32) / 200.0).exp();
                samples[pos + i] = decay * (i as f32 * 0.9).sin();
            }
            pos += period;
        }
        samples
    }

    #[test]
    fn test_click_train_tempo() {
        let samples = click_train(120.0, 8.0);
        let rhythm = analyze_rhythm(&samples, SR);
        assert!(
            (rhythm.tempo_bpm - 120.0).abs() < 8.0,
            "expected ~120 BPM, got {}",
            rhythm.tempo_bpm
        );
    }

    #[test]
    fn test_click_train_has_onsets() {
        let samples = click_train(100.0, 6.0);
        let rhythm = analyze_rhythm(&samples, SR);
        assert!(
            rhythm.onset_strength > FALLBACK_ONSET_STRENGTH,
            "clicks should produce onset strength: {}",
            rhythm.onset_strength
        );
    }

    #[test]
    fn test_silence_falls_back() {
        let samples = vec![0.0f32; SR as usize * 4];
        let rhythm = analyze_rhythm(&samples, SR);
        assert_eq!(rhythm.tempo_bpm, FALLBACK_TEMPO_BPM);
        assert_eq!(rhythm.onset_strength, FALLBACK_ONSET_STRENGTH);
    }

    #[test]
    fn test_short_signal_falls_back() {
        let samples = vec![0.3f32; 1000];
        let rhythm = analyze_rhythm(&samples, SR);
        assert_eq!(rhythm.tempo_bpm, FALLBACK_TEMPO_BPM);
    }
}
