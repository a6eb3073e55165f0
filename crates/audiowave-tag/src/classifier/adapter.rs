//! Classifier capability trait and output ranking
//!
//! The ranking contract: consider the top-k class probabilities, keep only
//! those at or above the minimum score, truncate to the maximum count,
//! descending by score. The conservative minimum keeps garbage classes out
//! of the rule tables downstream.

use crate::config::ClassifierConfig;
use crate::error::Result;

/// An audio event classifier
///
/// Implementations receive the mono analysis waveform and return ranked,
/// thresholded (label, probability) pairs per the contract above. `infer`
/// takes `&mut self` because inference sessions are stateful and not
/// assumed thread-safe; the classifier is loaded once per process and
/// reused across every stem and clip.
pub trait EventClassifier {
    /// Classify one waveform into ranked (label, score) pairs
    fn infer(&mut self, samples: &[f32]) -> Result<Vec<(String, f32)>>;

    /// Classifier name for logging
    fn name(&self) -> &'static str {
        "classifier"
    }
}

/// Apply the ranking contract to a dense probability vector
///
/// `probabilities[i]` is the probability for `labels[i]`.
pub fn rank_predictions(
    probabilities: &[f32],
    labels: &[String],
    config: &ClassifierConfig,
) -> Vec<(String, f32)> {
    let mut indexed: Vec<(usize, f32)> = probabilities.iter().copied().enumerate().collect();
    indexed.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    indexed.truncate(config.top_k);

    indexed
        .into_iter()
        .filter(|(_, score)| *score >= config.min_score)
        .take(config.max_predictions)
        .map(|(i, score)| {
            let label = labels
                .get(i)
                .cloned()
                .unwrap_or_else(|| format!("class_{}", i));
            (label, score)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("label{}", i)).collect()
    }

    #[test]
    fn test_descending_order() {
        let probs = vec![0.2, 0.9, 0.5];
        let out = rank_predictions(&probs, &labels(3), &ClassifierConfig::default());
        assert_eq!(out[0].0, "label1");
        assert_eq!(out[1].0, "label2");
        assert_eq!(out[2].0, "label0");
    }

    #[test]
    fn test_minimum_score_filter() {
        let probs = vec![0.5, 0.17, 0.05];
        let out = rank_predictions(&probs, &labels(3), &ClassifierConfig::default());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].0, "label0");
    }

    #[test]
    fn test_truncation_to_max_predictions() {
        let probs = vec![0.5f32; 20];
        let out = rank_predictions(&probs, &labels(20), &ClassifierConfig::default());
        assert_eq!(out.len(), 8);
    }

    #[test]
    fn test_top_k_limits_candidates() {
        let config = ClassifierConfig {
            top_k: 2,
            min_score: 0.0,
            max_predictions: 8,
        };
        let probs = vec![0.1, 0.2, 0.3, 0.4];
        let out = rank_predictions(&probs, &labels(4), &config);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].0, "label3");
        assert_eq!(out[1].0, "label2");
    }

    #[test]
    fn test_missing_label_gets_placeholder() {
        let probs = vec![0.0, 0.9];
        let out = rank_predictions(&probs, &labels(1), &ClassifierConfig::default());
        assert_eq!(out[0].0, "class_1");
    }
}
