//! Periodic envelope (sidechain pump) detection
//!
//! Computes an RMS envelope over 20 ms frames with a 10 ms hop, removes its
//! mean, and looks for a dominant peak in the 0.5-4.0 Hz band of the
//! envelope's power spectrum (quarter-note pumping at 30-240 BPM).
//! Prominence is the ratio of the band peak to the band median power; a
//! ratio above 12 counts as detected.

use realfft::RealFftPlanner;

/// Frequency band searched for pumping, in Hz
pub const PUMP_BAND_HZ: (f32, f32) = (0.5, 4.0);

/// Peak-to-median power ratio above which pumping is reported
pub const PROMINENCE_THRESHOLD: f32 = 12.0;

/// Prominence is clamped to this ceiling for reporting
pub const PROMINENCE_CEILING: f32 = 100.0;

/// RMS frame length in seconds
const RMS_FRAME_SECS: f32 = 0.02;

/// RMS hop length in seconds
const RMS_HOP_SECS: f32 = 0.01;

/// Result of periodic-pump detection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PumpDetection {
    /// Whether prominence exceeded the detection threshold
    pub detected: bool,
    /// Peak-to-median power ratio in the pump band, clamped to 100
    pub prominence: f32,
    /// Frequency of the band peak in Hz; None when no spectrum was computed
    pub peak_freq_hz: Option<f32>,
}

impl PumpDetection {
    fn none() -> Self {
        Self {
            detected: false,
            prominence: 0.0,
            peak_freq_hz: None,
        }
    }
}

/// Detect periodic amplitude pumping in a mono waveform
///
/// Signals shorter than one second, or with a numerically constant envelope,
/// report not-detected.
pub fn detect_periodic_pump(samples: &[f32], sample_rate: u32) -> PumpDetection {
    if sample_rate == 0 || samples.len() < sample_rate as usize {
        return PumpDetection::none();
    }

    let frame = (RMS_FRAME_SECS * sample_rate as f32) as usize;
    let hop = (RMS_HOP_SECS * sample_rate as f32) as usize;
    if frame == 0 || hop == 0 {
        return PumpDetection::none();
    }

    let mut envelope = rms_envelope(samples, frame, hop);
    if envelope.len() < 8 {
        return PumpDetection::none();
    }

    // Remove DC so the spectrum reflects modulation only
    let mean = envelope.iter().sum::<f32>() / envelope.len() as f32;
    for v in envelope.iter_mut() {
        *v -= mean;
    }

    let variance = envelope.iter().map(|&v| v * v).sum::<f32>() / envelope.len() as f32;
    if variance < 1e-12 {
        return PumpDetection::none();
    }

    // Power spectrum of the envelope, sampled at the hop rate
    let envelope_rate = sample_rate as f32 / hop as f32;
    let power = match power_spectrum(&mut envelope) {
        Some(p) => p,
        None => return PumpDetection::none(),
    };

    let n = power.len();
    let hz_per_bin = envelope_rate / (2.0 * (n as f32 - 1.0));

    let lo_bin = (PUMP_BAND_HZ.0 / hz_per_bin).ceil() as usize;
    let hi_bin = (PUMP_BAND_HZ.1 / hz_per_bin).floor() as usize;
    let hi_bin = hi_bin.min(n - 1);
    if lo_bin > hi_bin {
        return PumpDetection::none();
    }

    let band = &power[lo_bin..=hi_bin];
    let (peak_offset, peak_power) = band
        .iter()
        .enumerate()
        .fold((0usize, f32::MIN), |acc, (i, &p)| {
            if p > acc.1 {
                (i, p)
            } else {
                acc
            }
        });
    let peak_freq = (lo_bin + peak_offset) as f32 * hz_per_bin;

    let median = median_of(band) + 1e-9;
    let prominence = peak_power / median;

    PumpDetection {
        detected: prominence > PROMINENCE_THRESHOLD,
        prominence: prominence.min(PROMINENCE_CEILING),
        peak_freq_hz: Some(peak_freq),
    }
}

/// RMS over sliding frames
fn rms_envelope(samples: &[f32], frame: usize, hop: usize) -> Vec<f32> {
    if samples.len() < frame {
        return Vec::new();
    }
    let n_frames = (samples.len() - frame) / hop + 1;
    let mut envelope = Vec::with_capacity(n_frames);
    for i in 0..n_frames {
        let start = i * hop;
        let window = &samples[start..start + frame];
        let sum_sq: f32 = window.iter().map(|&s| s * s).sum();
        envelope.push((sum_sq / frame as f32).sqrt());
    }
    envelope
}

/// One-sided power spectrum via real FFT
///
/// The input is truncated to even length; absolute scaling is irrelevant
/// because prominence is a ratio within the band.
fn power_spectrum(envelope: &mut Vec<f32>) -> Option<Vec<f32>> {
    if envelope.len() % 2 == 1 {
        envelope.pop();
    }
    let n = envelope.len();
    if n < 8 {
        return None;
    }

    let mut planner = RealFftPlanner::<f32>::new();
    let fft = planner.plan_fft_forward(n);
    let mut spectrum = fft.make_output_vec();
    let mut scratch = fft.make_scratch_vec();

    fft.process_with_scratch(envelope, &mut spectrum, &mut scratch)
        .ok()?;

    Some(spectrum.iter().map(|c| c.norm_sqr() / n as f32).collect())
}

fn median_of(values: &[f32]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: u32 = 32_000;

    /// Carrier amplitude-modulated at `mod_hz`
    fn pumped_signal(mod_hz: f32, secs: f32) -> Vec<f32> {
        let n = (SR as f32 * secs) as usize;
        (0..n)
            .map(|i| {
                let t = i as f32 / SR as f32;
                let env = 0.55 + 0.45 * (2.0 * std::f32::consts::PI * mod_hz * t).sin();
                env * (2.0 * std::f32::consts::PI * 1000.0 * t).sin()
            })
            .collect()
    }

    #[test]
    fn test_strong_2hz_pump_is_detected() {
        let samples = pumped_signal(2.0, 10.0);
        let result = detect_periodic_pump(&samples, SR);
        assert!(result.detected, "prominence: {}", result.prominence);
        assert!(result.prominence > PROMINENCE_THRESHOLD);
        let freq = result.peak_freq_hz.expect("peak frequency");
        assert!(
            (PUMP_BAND_HZ.0..=PUMP_BAND_HZ.1).contains(&freq),
            "peak at {} Hz",
            freq
        );
        assert!((freq - 2.0).abs() < 0.3, "peak at {} Hz", freq);
    }

    #[test]
    fn test_steady_tone_is_not_detected() {
        // Phase computed modulo one cycle so every RMS window sees identical
        // sample values and the envelope is numerically constant
        let n = SR as usize * 5;
        let samples: Vec<f32> = (0..n)
            .map(|i| (2.0 * std::f32::consts::PI * (i % 32) as f32 / 32.0).sin())
            .collect();
        let result = detect_periodic_pump(&samples, SR);
        assert!(!result.detected, "prominence: {}", result.prominence);
    }

    #[test]
    fn test_silence_is_not_detected() {
        let samples = vec![0.0f32; SR as usize * 3];
        let result = detect_periodic_pump(&samples, SR);
        assert!(!result.detected);
        assert_eq!(result.peak_freq_hz, None);
    }

    #[test]
    fn test_too_short_is_not_detected() {
        let samples = pumped_signal(2.0, 0.5);
        let result = detect_periodic_pump(&samples, SR);
        assert!(!result.detected);
        assert_eq!(result.prominence, 0.0);
    }

    #[test]
    fn test_prominence_is_clamped() {
        let samples = pumped_signal(2.0, 20.0);
        let result = detect_periodic_pump(&samples, SR);
        assert!(result.prominence <= PROMINENCE_CEILING);
    }

    #[test]
    fn test_modulation_outside_band_is_not_detected() {
        // 8 Hz tremolo sits above the quarter-note band
        let samples = pumped_signal(8.0, 10.0);
        let result = detect_periodic_pump(&samples, SR);
        assert!(!result.detected, "prominence: {}", result.prominence);
    }
}
