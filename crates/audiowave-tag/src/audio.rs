//! Audio decoding and analysis-rate conversion
//!
//! Stems arrive at arbitrary native sample rates and channel counts. The
//! tagging pipeline works on two views of each file:
//!
//! - a mono waveform resampled to the fixed analysis rate (32 kHz by
//!   default) and peak-normalized, used for features and inference
//! - the native interleaved samples, used only for stereo width estimation

use std::path::Path;

use crate::error::{Result, TagError};

/// Decoded audio file: interleaved f32 samples at the native rate
#[derive(Debug, Clone)]
pub struct DecodedAudio {
    /// Interleaved samples (frame-major: L R L R ... for stereo)
    pub samples: Vec<f32>,
    /// Native sample rate
    pub sample_rate: u32,
    /// Channel count (1 = mono, 2 = stereo)
    pub channels: u16,
}

impl DecodedAudio {
    /// Number of sample frames (samples per channel)
    pub fn frames(&self) -> usize {
        if self.channels == 0 {
            0
        } else {
            self.samples.len() / self.channels as usize
        }
    }

    /// Duration in seconds
    pub fn duration_secs(&self) -> f64 {
        self.frames() as f64 / self.sample_rate as f64
    }

    /// Produce the mono analysis waveform at `target_rate`
    ///
    /// Channels are averaged, the result is linearly resampled and
    /// peak-normalized to 1.0. Silent audio is left untouched.
    pub fn analysis_mono(&self, target_rate: u32) -> Vec<f32> {
        let mono = mixdown_mono(&self.samples, self.channels);
        let mut resampled = if self.sample_rate == target_rate {
            mono
        } else {
            resample_linear(&mono, self.sample_rate as f32, target_rate as f32)
        };
        peak_normalize(&mut resampled);
        resampled
    }
}

/// Decode an audio file to f32 samples using Symphonia
pub fn decode_audio(path: &Path) -> Result<DecodedAudio> {
    use std::fs::File;
    use symphonia::core::audio::SampleBuffer;
    use symphonia::core::codecs::DecoderOptions;
    use symphonia::core::formats::FormatOptions;
    use symphonia::core::io::MediaSourceStream;
    use symphonia::core::meta::MetadataOptions;
    use symphonia::core::probe::Hint;

    let file = File::open(path).map_err(|e| TagError::AudioReadError {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    // Create a hint with the file extension
    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    // Probe the media source
    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .map_err(|e| TagError::UnsupportedFormat(e.to_string()))?;

    let mut format = probed.format;

    // Find the first audio track
    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != symphonia::core::codecs::CODEC_TYPE_NULL)
        .ok_or_else(|| TagError::UnsupportedFormat("No audio track found".to_string()))?;

    let track_id = track.id;

    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or_else(|| TagError::UnsupportedFormat("Unknown sample rate".to_string()))?;

    let channels = track
        .codec_params
        .channels
        .map(|c| c.count() as u16)
        .unwrap_or(2);

    // Create decoder
    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| TagError::UnsupportedFormat(e.to_string()))?;

    let mut samples: Vec<f32> = Vec::new();
    let mut sample_buf: Option<SampleBuffer<f32>> = None;

    // Decode all packets
    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(symphonia::core::errors::Error::IoError(e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => {
                log::warn!("Error reading packet from {:?}: {}", path, e);
                break;
            }
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            Err(e) => {
                log::warn!("Error decoding packet from {:?}: {}", path, e);
                continue;
            }
        };

        // Initialize sample buffer on first decode
        if sample_buf.is_none() {
            let spec = *decoded.spec();
            let duration = decoded.capacity() as u64;
            sample_buf = Some(SampleBuffer::new(duration, spec));
        }

        if let Some(ref mut buf) = sample_buf {
            buf.copy_interleaved_ref(decoded);
            samples.extend_from_slice(buf.samples());
        }
    }

    if samples.is_empty() {
        return Err(TagError::UnsupportedFormat(format!(
            "No decodable audio in {:?}",
            path
        )));
    }

    log::debug!(
        "Decoded {:?}: {} frames, {}Hz, {} channels",
        path,
        samples.len() / channels.max(1) as usize,
        sample_rate,
        channels
    );

    Ok(DecodedAudio {
        samples,
        sample_rate,
        channels,
    })
}

/// Average interleaved channels down to mono
pub fn mixdown_mono(samples: &[f32], channels: u16) -> Vec<f32> {
    if channels <= 1 {
        return samples.to_vec();
    }
    let ch = channels as usize;
    samples
        .chunks(ch)
        .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
        .collect()
}

/// Simple linear interpolation resampling
pub fn resample_linear(samples: &[f32], from_sr: f32, to_sr: f32) -> Vec<f32> {
    let ratio = from_sr / to_sr;
    let output_len = (samples.len() as f32 / ratio) as usize;
    let mut output = Vec::with_capacity(output_len);

    for i in 0..output_len {
        let src_pos = i as f32 * ratio;
        let idx = src_pos as usize;
        let frac = src_pos - idx as f32;

        let sample = if idx + 1 < samples.len() {
            samples[idx] * (1.0 - frac) + samples[idx + 1] * frac
        } else if idx < samples.len() {
            samples[idx]
        } else {
            0.0
        };
        output.push(sample);
    }

    output
}

/// Write a mono waveform to a 16-bit PCM WAV file
pub fn write_wav_mono(path: &Path, samples: &[f32], sample_rate: u32) -> Result<()> {
    use hound::{SampleFormat, WavSpec, WavWriter};

    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let to_io_err = |e: hound::Error| std::io::Error::new(std::io::ErrorKind::Other, e.to_string());

    let mut writer = WavWriter::create(path, spec).map_err(|e| TagError::Io(to_io_err(e)))?;
    for &sample in samples {
        writer
            .write_sample((sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16)
            .map_err(|e| TagError::Io(to_io_err(e)))?;
    }
    writer.finalize().map_err(|e| TagError::Io(to_io_err(e)))?;
    Ok(())
}

/// Normalize samples to peak amplitude 1.0 in place
///
/// Silent input is left untouched.
pub fn peak_normalize(samples: &mut [f32]) {
    let peak = samples.iter().fold(0.0f32, |acc, &s| acc.max(s.abs()));
    if peak > 0.0 {
        let inv = 1.0 / peak;
        for s in samples.iter_mut() {
            *s *= inv;
        }
    }
}
