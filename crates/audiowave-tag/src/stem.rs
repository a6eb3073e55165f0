//! Stem types and the canonical clip layout
//!
//! A clip directory holds up to four fixed-named stem files produced by the
//! separation stage. Any subset may be present; a missing stem is not an
//! error, it is simply absent from the results.

use std::path::Path;

/// The four canonical stem slots of a separated clip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StemType {
    /// Drums stem (kick, snare, hats, cymbals)
    Drums,
    /// Bass stem (bass guitar, sub-bass, bass synths)
    Bass,
    /// Vocals stem (lead vocals, backing vocals)
    Vocals,
    /// Other stem (everything else - synths, guitars, FX)
    Other,
}

impl StemType {
    /// Lowercase name used in logs and stem-specific rule lookups
    pub fn as_str(&self) -> &'static str {
        match self {
            StemType::Drums => "drums",
            StemType::Bass => "bass",
            StemType::Vocals => "vocals",
            StemType::Other => "other",
        }
    }

    /// Infer the stem type from a file name
    ///
    /// Matches on substrings of the lowercased file stem, so both the
    /// canonical `drums.wav` and variants like `Mix_(Drums).wav` resolve.
    /// Anything unrecognized falls back to [`StemType::Other`].
    pub fn from_filename(path: &Path) -> Self {
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_lowercase();

        if stem.contains("drum") {
            StemType::Drums
        } else if stem.contains("bass") {
            StemType::Bass
        } else if stem.contains("vocal") {
            StemType::Vocals
        } else {
            StemType::Other
        }
    }

    /// All stem types in canonical processing order
    pub fn all() -> &'static [StemType] {
        &[
            StemType::Drums,
            StemType::Bass,
            StemType::Vocals,
            StemType::Other,
        ]
    }

    /// Canonical file name for this stem inside a clip directory
    pub fn canonical_filename(&self) -> &'static str {
        match self {
            StemType::Drums => "drums.wav",
            StemType::Bass => "bass.wav",
            StemType::Vocals => "vocals.wav",
            StemType::Other => "other.wav",
        }
    }
}

impl std::fmt::Display for StemType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
