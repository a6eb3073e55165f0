//! Content / meta tag partitioning
//!
//! Splits calibrated tags by category, orders both groups by descending
//! score, truncates content to the configured maximum, and drops content
//! tags below the minimum score. Content scores are rounded to two decimals
//! for the artifact; meta scores are reported as computed.

use crate::result::TagScore;

use super::vocabulary::{TagCategory, TagScores};

/// Partitioned tags ready for the artifact
#[derive(Debug, Clone, PartialEq)]
pub struct PartitionedTags {
    /// Instrument identity tags, descending by score, at most the configured
    /// maximum, each at or above the content minimum
    pub content: Vec<TagScore>,
    /// Mix-characteristic tags (stereo_wide / sidechain_pump), descending
    pub meta: Vec<TagScore>,
}

/// Partition calibrated tags into content and meta groups
pub fn partition_tags(tags: &TagScores, max_content: usize, content_min_score: f32) -> PartitionedTags {
    let mut content: Vec<(&'static str, f32)> = Vec::new();
    let mut meta: Vec<(&'static str, f32)> = Vec::new();

    for (&tag, &score) in tags {
        match tag.category() {
            TagCategory::Content => content.push((tag.as_str(), score)),
            TagCategory::Meta => meta.push((tag.as_str(), score)),
        }
    }

    // Stable sorts keep vocabulary order for equal scores, so output is
    // deterministic
    content.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    content.truncate(max_content);
    let content = content
        .into_iter()
        .filter(|(_, score)| *score >= content_min_score)
        .map(|(label, score)| TagScore {
            label: label.to_string(),
            score: round2(score),
        })
        .collect();

    meta.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    let meta = meta
        .into_iter()
        .map(|(label, score)| TagScore {
            label: label.to_string(),
            score,
        })
        .collect();

    PartitionedTags { content, meta }
}

fn round2(value: f32) -> f32 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tagging::vocabulary::CoarseTag;

    fn scores(pairs: &[(CoarseTag, f32)]) -> TagScores {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_content_is_truncated_to_max() {
        let tags = scores(&[
            (CoarseTag::Kick, 0.9),
            (CoarseTag::Snare, 0.8),
            (CoarseTag::HiHat, 0.7),
            (CoarseTag::Clap, 0.6),
        ]);
        let out = partition_tags(&tags, 3, 0.15);
        assert_eq!(out.content.len(), 3);
        assert_eq!(out.content[0].label, "kick");
        assert_eq!(out.content[2].label, "hi-hat");
    }

    #[test]
    fn test_content_below_minimum_is_dropped() {
        let tags = scores(&[(CoarseTag::Kick, 0.9), (CoarseTag::Organ, 0.1)]);
        let out = partition_tags(&tags, 3, 0.15);
        assert_eq!(out.content.len(), 1);
        assert_eq!(out.content[0].label, "kick");
    }

    #[test]
    fn test_meta_tags_are_separated() {
        let tags = scores(&[
            (CoarseTag::Kick, 0.9),
            (CoarseTag::StereoWide, 0.4),
            (CoarseTag::SidechainPump, 0.8),
        ]);
        let out = partition_tags(&tags, 3, 0.15);
        assert_eq!(out.content.len(), 1);
        assert_eq!(out.meta.len(), 2);
        assert_eq!(out.meta[0].label, "sidechain_pump");
        assert_eq!(out.meta[1].label, "stereo_wide");
    }

    #[test]
    fn test_meta_is_not_truncated_or_thresholded() {
        let tags = scores(&[(CoarseTag::StereoWide, 0.05)]);
        let out = partition_tags(&tags, 3, 0.15);
        assert_eq!(out.meta.len(), 1);
    }

    #[test]
    fn test_content_scores_are_rounded() {
        let tags = scores(&[(CoarseTag::Kick, 0.333_333)]);
        let out = partition_tags(&tags, 3, 0.15);
        assert!((out.content[0].score - 0.33).abs() < 1e-6);
    }

    #[test]
    fn test_truncation_happens_before_threshold() {
        // Four tags above the minimum, but the three highest are kept and
        // only then filtered - the 0.2 tag never makes the cut
        let tags = scores(&[
            (CoarseTag::Kick, 0.9),
            (CoarseTag::Snare, 0.8),
            (CoarseTag::HiHat, 0.7),
            (CoarseTag::Clap, 0.2),
        ]);
        let out = partition_tags(&tags, 3, 0.15);
        assert!(!out.content.iter().any(|t| t.label == "clap"));
    }
}
