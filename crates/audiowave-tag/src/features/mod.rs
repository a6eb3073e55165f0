//! Low-level feature extraction
//!
//! Pure Rust signal processing over the mono analysis waveform:
//!
//! - **Spectral** (`spectral.rs`): frame-based STFT features (centroid,
//!   rolloff, zero-crossing rate)
//! - **Stereo** (`stereo.rs`): width estimate from L/R correlation on the
//!   native samples
//! - **Rhythm** (`rhythm.rs`): best-effort tempo and onset strength with
//!   documented fallbacks
//! - **Envelope** (`envelope.rs`): RMS envelope periodicity (sidechain pump)

pub mod envelope;
pub mod rhythm;
pub mod spectral;
pub mod stereo;

pub use envelope::{detect_periodic_pump, PumpDetection};
pub use rhythm::{analyze_rhythm, RhythmFeatures};
pub use spectral::{spectral_features, SpectralFeatures};
pub use stereo::stereo_width;

/// Per-stem signal characteristics feeding the heuristic rules
#[derive(Debug, Clone, Copy)]
pub struct StemCharacteristics {
    /// Mean spectral centroid in Hz
    pub centroid_hz: f32,
    /// Mean 85% spectral rolloff in Hz
    pub rolloff_hz: f32,
    /// Mean zero-crossing rate (fraction of sign changes per sample)
    pub zero_crossing_rate: f32,
    /// Estimated tempo in BPM (fallback 120.0 when rhythm analysis fails)
    pub tempo_bpm: f32,
    /// Mean onset strength (fallback 0.0 when rhythm analysis fails)
    pub onset_strength: f32,
}

/// Extract the full characteristics record for one stem
pub fn analyze_stem(samples: &[f32], sample_rate: u32) -> StemCharacteristics {
    let spectral = spectral_features(samples, sample_rate);
    let rhythm = analyze_rhythm(samples, sample_rate);

    let characteristics = StemCharacteristics {
        centroid_hz: spectral.centroid_hz,
        rolloff_hz: spectral.rolloff_hz,
        zero_crossing_rate: spectral.zero_crossing_rate,
        tempo_bpm: rhythm.tempo_bpm,
        onset_strength: rhythm.onset_strength,
    };

    log::debug!(
        "stem characteristics: centroid={:.0}Hz rolloff={:.0}Hz zcr={:.3} tempo={:.1}bpm onset={:.2}",
        characteristics.centroid_hz,
        characteristics.rolloff_hz,
        characteristics.zero_crossing_rate,
        characteristics.tempo_bpm,
        characteristics.onset_strength
    );

    characteristics
}
