//! Frame-based spectral features
//!
//! Magnitude STFT with a Hann window, 2048-sample frames and 512-sample hop.
//! Per-frame values are averaged over the whole signal; silent frames
//! contribute zero and a non-finite mean is forced to 0.

use realfft::RealFftPlanner;

/// STFT frame size in samples
pub const FRAME_SIZE: usize = 2048;

/// STFT hop size in samples
pub const HOP_SIZE: usize = 512;

/// Fraction of total magnitude below the rolloff frequency
const ROLLOFF_PERCENT: f32 = 0.85;

/// Aggregated spectral features for one waveform
#[derive(Debug, Clone, Copy)]
pub struct SpectralFeatures {
    /// Mean spectral centroid in Hz
    pub centroid_hz: f32,
    /// Mean 85% rolloff frequency in Hz
    pub rolloff_hz: f32,
    /// Mean zero-crossing rate
    pub zero_crossing_rate: f32,
}

/// Compute aggregated spectral features for a mono waveform
pub fn spectral_features(samples: &[f32], sample_rate: u32) -> SpectralFeatures {
    let frames = magnitude_frames(samples, FRAME_SIZE, HOP_SIZE);

    let hz_per_bin = sample_rate as f32 / FRAME_SIZE as f32;
    let mut centroid_sum = 0.0f64;
    let mut rolloff_sum = 0.0f64;

    for frame in &frames {
        centroid_sum += frame_centroid(frame, hz_per_bin) as f64;
        rolloff_sum += frame_rolloff(frame, hz_per_bin) as f64;
    }

    let n = frames.len().max(1) as f64;
    SpectralFeatures {
        centroid_hz: force_finite((centroid_sum / n) as f32),
        rolloff_hz: force_finite((rolloff_sum / n) as f32),
        zero_crossing_rate: zero_crossing_rate(samples),
    }
}

/// Mean spectral centroid in Hz (convenience wrapper)
pub fn spectral_centroid_hz(samples: &[f32], sample_rate: u32) -> f32 {
    spectral_features(samples, sample_rate).centroid_hz
}

/// Centroid of a single magnitude frame; silent frames give 0
fn frame_centroid(magnitudes: &[f32], hz_per_bin: f32) -> f32 {
    let total: f32 = magnitudes.iter().sum();
    if total <= f32::EPSILON {
        return 0.0;
    }
    let weighted: f32 = magnitudes
        .iter()
        .enumerate()
        .map(|(k, &m)| k as f32 * hz_per_bin * m)
        .sum();
    weighted / total
}

/// Frequency below which `ROLLOFF_PERCENT` of the frame magnitude lies
fn frame_rolloff(magnitudes: &[f32], hz_per_bin: f32) -> f32 {
    let total: f32 = magnitudes.iter().sum();
    if total <= f32::EPSILON {
        return 0.0;
    }
    let threshold = ROLLOFF_PERCENT * total;
    let mut cumulative = 0.0f32;
    for (k, &m) in magnitudes.iter().enumerate() {
        cumulative += m;
        if cumulative >= threshold {
            return k as f32 * hz_per_bin;
        }
    }
    (magnitudes.len().saturating_sub(1)) as f32 * hz_per_bin
}

/// Fraction of adjacent sample pairs with a sign change
fn zero_crossing_rate(samples: &[f32]) -> f32 {
    if samples.len() < 2 {
        return 0.0;
    }
    let crossings = samples
        .windows(2)
        .filter(|w| (w[0] >= 0.0) != (w[1] >= 0.0))
        .count();
    crossings as f32 / (samples.len() - 1) as f32
}

fn force_finite(value: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Compute magnitude spectra for Hann-windowed frames
///
/// Returns one `n_fft/2 + 1`-bin magnitude vector per frame. Signals shorter
/// than one frame produce no frames.
pub(crate) fn magnitude_frames(samples: &[f32], n_fft: usize, hop: usize) -> Vec<Vec<f32>> {
    if samples.len() < n_fft {
        return Vec::new();
    }

    let mut planner = RealFftPlanner::<f32>::new();
    let fft = planner.plan_fft_forward(n_fft);

    let window: Vec<f32> = (0..n_fft)
        .map(|i| {
            let phase = 2.0 * std::f32::consts::PI * i as f32 / n_fft as f32;
            0.5 * (1.0 - phase.cos())
        })
        .collect();

    let n_frames = (samples.len() - n_fft) / hop + 1;
    let mut frames = Vec::with_capacity(n_frames);

    let mut scratch = fft.make_scratch_vec();
    let mut frame_buf = vec![0.0f32; n_fft];
    let mut spectrum = fft.make_output_vec();

    for frame_idx in 0..n_frames {
        let start = frame_idx * hop;
        for i in 0..n_fft {
            frame_buf[i] = samples[start + i] * window[i];
        }

        if let Err(e) = fft.process_with_scratch(&mut frame_buf, &mut spectrum, &mut scratch) {
            log::warn!("FFT failed on frame {}: {:?}", frame_idx, e);
            continue;
        }

        frames.push(spectrum.iter().map(|c| c.norm()).collect());
    }

    frames
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq: f32, sample_rate: u32, secs: f32) -> Vec<f32> {
        let n = (sample_rate as f32 * secs) as usize;
        (0..n)
            .map(|i| (2.0 * std::f32::consts::PI * freq * i as f32 / sample_rate as f32).sin())
            .collect()
    }

    #[test]
    fn test_centroid_tracks_sine_frequency() {
        let samples = sine(1000.0, 32_000, 2.0);
        let centroid = spectral_centroid_hz(&samples, 32_000);
        assert!(
            (centroid - 1000.0).abs() < 100.0,
            "1 kHz sine should have centroid near 1 kHz: {}",
            centroid
        );
    }

    #[test]
    fn test_centroid_of_silence_is_zero() {
        let samples = vec![0.0f32; 32_000];
        assert_eq!(spectral_centroid_hz(&samples, 32_000), 0.0);
    }

    #[test]
    fn test_centroid_of_short_signal_is_zero() {
        let samples = vec![0.5f32; 100];
        assert_eq!(spectral_centroid_hz(&samples, 32_000), 0.0);
    }

    #[test]
    fn test_rolloff_above_centroid_for_sine() {
        let samples = sine(2000.0, 32_000, 2.0);
        let features = spectral_features(&samples, 32_000);
        assert!(
            (features.rolloff_hz - 2000.0).abs() < 300.0,
            "Narrowband rolloff should sit near the tone: {}",
            features.rolloff_hz
        );
    }

    #[test]
    fn test_zero_crossing_rate_scales_with_frequency() {
        let low = spectral_features(&sine(100.0, 32_000, 1.0), 32_000).zero_crossing_rate;
        let high = spectral_features(&sine(4000.0, 32_000, 1.0), 32_000).zero_crossing_rate;
        assert!(high > low * 10.0, "zcr low={} high={}", low, high);
    }

    #[test]
    fn test_magnitude_frames_count() {
        let samples = vec![0.1f32; FRAME_SIZE + 3 * HOP_SIZE];
        let frames = magnitude_frames(&samples, FRAME_SIZE, HOP_SIZE);
        assert_eq!(frames.len(), 4);
        assert_eq!(frames[0].len(), FRAME_SIZE / 2 + 1);
    }
}
