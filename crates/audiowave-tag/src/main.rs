//! Audiowave Tag - command-line caller for the tagging pipeline
//!
//! Usage: `audiowave-tag <clip-dir> [<clip-dir> ...]`
//!
//! Each clip directory may hold any subset of the canonical stem files
//! (drums.wav, bass.wav, vocals.wav, other.wav); a tags.json artifact is
//! written next to them. The classifier is loaded once and reused across
//! all given clips.

use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};

use audiowave_tag::classifier::{ModelManager, PannsClassifier};
use audiowave_tag::clip::ClipTagger;
use audiowave_tag::config::{default_config_path, load_config};

fn main() -> Result<()> {
    env_logger::init();

    let clip_dirs: Vec<PathBuf> = std::env::args().skip(1).map(PathBuf::from).collect();
    if clip_dirs.is_empty() {
        eprintln!("Usage: audiowave-tag <clip-dir> [<clip-dir> ...]");
        std::process::exit(2);
    }

    let config = load_config(&default_config_path());

    // Classifier load failure is fatal for the whole run
    let manager = ModelManager::new().map_err(|e| anyhow!(e))?;
    let classifier = PannsClassifier::from_manager(&manager, config.classifier.clone())
        .context("Failed to initialize the event classifier")?;
    let mut tagger = ClipTagger::new(classifier, config);

    for clip_dir in &clip_dirs {
        if !clip_dir.is_dir() {
            bail!("Clip folder not found: {}", clip_dir.display());
        }
        let out_path = tagger
            .tag_clip_dir(clip_dir)
            .with_context(|| format!("Tagging failed for {}", clip_dir.display()))?;
        println!("[OK] Wrote {}", out_path.display());
    }

    Ok(())
}
