//! Normalizer: max-based rescaling of aggregate sums.
//!
//! Confidence is the largest normalized value. With max scaling it is
//! exactly 1.0 whenever any mass was aggregated and 0.0 otherwise.

use crate::types::{AggregateScores, NormalizedScores, TargetEmotion};

/// Rescale `agg` into [0, 1] and derive confidence.
///
/// All-zero (or non-positive) input yields all zeros and confidence 0.0.
/// Ties at the maximum all become 1.0.
pub fn normalize(agg: &AggregateScores) -> (NormalizedScores, f64) {
    let m = agg.max_value();
    if m.is_nan() || m <= 0.0 {
        return (NormalizedScores::zero(), 0.0);
    }

    let mut normalized = NormalizedScores::zero();
    for target in TargetEmotion::ALL {
        let value = (agg.get(target) / m).clamp(0.0, 1.0);
        normalized.set(target, value);
    }

    let confidence = normalized.max_value();
    (normalized, confidence)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EmotionScores;

    #[test]
    fn test_all_zero_stays_zero() {
        let (normalized, confidence) = normalize(&AggregateScores::zero());
        assert!(normalized.is_zero());
        assert_eq!(confidence, 0.0);
    }

    #[test]
    fn test_unique_max_becomes_one() {
        let agg = EmotionScores {
            pride: 0.2,
            nostalgia: 0.0,
            love: 0.6,
            hope: 0.3,
        };
        let (normalized, confidence) = normalize(&agg);
        assert_eq!(normalized.love, 1.0);
        assert!((normalized.pride - 0.2 / 0.6).abs() < 1e-12);
        assert!((normalized.hope - 0.5).abs() < 1e-12);
        assert_eq!(normalized.nostalgia, 0.0);
        assert_eq!(confidence, 1.0);
    }

    #[test]
    fn test_ties_all_become_one() {
        let agg = EmotionScores {
            pride: 0.4,
            nostalgia: 0.4,
            love: 0.1,
            hope: 0.0,
        };
        let (normalized, confidence) = normalize(&agg);
        assert_eq!(normalized.pride, 1.0);
        assert_eq!(normalized.nostalgia, 1.0);
        assert_eq!(confidence, 1.0);
    }

    #[test]
    fn test_confidence_is_binary_for_tiny_mass() {
        let mut agg = AggregateScores::zero();
        agg.add(TargetEmotion::Hope, 1e-9);
        let (normalized, confidence) = normalize(&agg);
        assert_eq!(normalized.hope, 1.0);
        assert_eq!(confidence, 1.0);
    }

    #[test]
    fn test_values_above_one_are_scaled_down() {
        let agg = EmotionScores {
            pride: 2.0,
            nostalgia: 0.0,
            love: 1.5,
            hope: 0.0,
        };
        let (normalized, _) = normalize(&agg);
        assert_eq!(normalized.pride, 1.0);
        assert!((normalized.love - 0.75).abs() < 1e-12);
    }
}
