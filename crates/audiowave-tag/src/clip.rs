//! Clip orchestration
//!
//! Drives the full per-stem pipeline across a clip's four canonical stem
//! slots and assembles the `tags.json` artifact:
//!
//! 1. global sidechain detection on the sum of all present stems
//! 2. per-stem: decode -> features -> inference -> mapping -> refinement ->
//!    fallbacks -> calibration -> partitioning
//! 3. artifact assembly in canonical stem order
//!
//! Stems are processed sequentially: the classifier is a shared,
//! expensive-to-load resource that is initialized once per process and not
//! assumed thread-safe. Absent stems are omitted from the results; a stem
//! that fails to decode becomes a failure entry instead of aborting the
//! clip.

use std::path::{Path, PathBuf};

use crate::audio::decode_audio;
use crate::classifier::EventClassifier;
use crate::config::TaggingConfig;
use crate::error::{Result, TagError};
use crate::features::{analyze_stem, detect_periodic_pump, stereo_width};
use crate::result::{
    write_artifact, ClipMetadata, ClipResult, StemAnalysis, StemEntry, StemFailure,
    ARTIFACT_FILENAME,
};
use crate::sidechain::{detect_global_sidechain, pump_score, to_global_metadata};
use crate::stem::StemType;
use crate::tagging::{
    calibrate, inject_spectral_fallbacks, map_predictions, merge_max, partition_tags,
    refine_synth_family, CoarseTag, SYNTH_SCORE_FLOOR,
};

/// Runs the tagging pipeline over clip directories
///
/// Holds the classifier for the lifetime of the process; independent clips
/// can be processed in parallel only by separate worker processes, each
/// with its own classifier instance.
pub struct ClipTagger<C: EventClassifier> {
    classifier: C,
    config: TaggingConfig,
}

impl<C: EventClassifier> ClipTagger<C> {
    /// Create a tagger around an initialized classifier
    pub fn new(classifier: C, mut config: TaggingConfig) -> Self {
        config.validate();
        Self { classifier, config }
    }

    /// Tag every present stem of a clip directory
    ///
    /// Global sidechain detection runs first over the summed stems;
    /// per-stem pump detection is suppressed so the same pump is not
    /// reported once per stem.
    pub fn tag_clip(&mut self, clip_dir: &Path) -> Result<ClipResult> {
        if !clip_dir.is_dir() {
            return Err(TagError::ClipNotFound(clip_dir.to_path_buf()));
        }

        let clip_name = clip_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| clip_dir.display().to_string());
        let sample_rate = self.config.analysis.sample_rate;

        log::info!("Tagging clip {:?}", clip_name);

        // Global sidechain over whichever stems decode; an unreadable stem
        // is skipped here and surfaces as a failure entry below
        let mut stem_waveforms: Vec<Vec<f32>> = Vec::new();
        for stem in StemType::all() {
            let path = clip_dir.join(stem.canonical_filename());
            if !path.is_file() {
                continue;
            }
            match decode_audio(&path) {
                Ok(decoded) => stem_waveforms.push(decoded.analysis_mono(sample_rate)),
                Err(e) => log::warn!("Skipping {:?} for global sidechain: {}", path, e),
            }
        }
        let refs: Vec<&[f32]> = stem_waveforms.iter().map(|w| w.as_slice()).collect();
        let detection = detect_global_sidechain(&refs, sample_rate);
        let global_sidechain = to_global_metadata(&detection);
        if global_sidechain.detected {
            log::info!(
                "Global sidechain detected: prominence {:.1}, {:.2} Hz",
                detection.prominence,
                detection.peak_freq_hz.unwrap_or(0.0)
            );
        }

        let mut results = Vec::new();
        for stem in StemType::all() {
            let path = clip_dir.join(stem.canonical_filename());
            if !path.is_file() {
                // Absent stems are simply omitted; this is not an error
                continue;
            }
            match self.tag_stem(&path, true) {
                Ok(analysis) => results.push(StemEntry::Analysis(analysis)),
                Err(e) => {
                    log::warn!("Stem {:?} failed: {}", path, e);
                    results.push(StemEntry::Failed(StemFailure {
                        file: path.display().to_string(),
                        error: e.to_string(),
                    }));
                }
            }
        }

        Ok(ClipResult {
            clip: clip_name,
            metadata: ClipMetadata { global_sidechain },
            results,
        })
    }

    /// Tag a clip directory and persist the artifact next to the stems
    pub fn tag_clip_dir(&mut self, clip_dir: &Path) -> Result<PathBuf> {
        let result = self.tag_clip(clip_dir)?;
        let out_path = clip_dir.join(ARTIFACT_FILENAME);
        write_artifact(&result, &out_path)?;
        Ok(out_path)
    }

    /// Run the full pipeline on a single stem file
    ///
    /// `suppress_pump` disables per-stem sidechain detection; the
    /// orchestrator sets it when a clip-level detection already ran.
    pub fn tag_stem(&mut self, path: &Path, suppress_pump: bool) -> Result<StemAnalysis> {
        let stem_type = StemType::from_filename(path);
        let sample_rate = self.config.analysis.sample_rate;

        let decoded = decode_audio(path)?;
        let mono = decoded.analysis_mono(sample_rate);
        let width = stereo_width(&decoded.samples, decoded.channels);

        let characteristics = analyze_stem(&mono, sample_rate);
        let predictions = self.classifier.infer(&mono)?;

        let mut tags = map_predictions(&predictions, stem_type);

        let wide = width > self.config.analysis.stereo_wide_threshold;
        if let Some(family) =
            refine_synth_family(&predictions, characteristics.centroid_hz, wide)
        {
            merge_max(&mut tags, family, SYNTH_SCORE_FLOOR);
        }

        inject_spectral_fallbacks(&mut tags, &characteristics, stem_type);

        if !suppress_pump {
            let pump = detect_periodic_pump(&mono, sample_rate);
            if pump.detected {
                merge_max(
                    &mut tags,
                    CoarseTag::SidechainPump,
                    pump_score(pump.prominence),
                );
            }
        }

        if wide {
            merge_max(&mut tags, CoarseTag::StereoWide, width.min(1.0));
        }

        let calibrated = calibrate(&tags, stem_type, self.config.tags.calibration);
        let partitioned = partition_tags(
            &calibrated,
            self.config.tags.max_content_tags,
            self.config.tags.content_min_score,
        );

        log::info!(
            "{} ({}): {} predictions -> {} content / {} meta tags",
            path.display(),
            stem_type,
            predictions.len(),
            partitioned.content.len(),
            partitioned.meta.len()
        );

        Ok(StemAnalysis {
            file: path.display().to_string(),
            spectral_centroid_hz: characteristics.centroid_hz,
            stereo_width: width.min(1.0),
            top_audioset: predictions,
            content_tags: partitioned.content,
            meta_tags: partitioned.meta,
        })
    }
}
