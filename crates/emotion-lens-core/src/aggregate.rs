//! Aggregator: folds raw classifier output into per-target running sums.

use tracing::trace;

use crate::mapping::{normalize_label, MappingTable};
use crate::types::{AggregateScores, RawEmotion};

/// Aggregate using the built-in mapping table.
pub fn aggregate(raw: &[RawEmotion]) -> AggregateScores {
    aggregate_with(MappingTable::builtin(), raw)
}

/// Aggregate using an explicit mapping table.
///
/// Each mapped label adds `clamp(score) * weight` to its target. Unmapped
/// labels are skipped. Duplicates are NOT collapsed: both contribute.
/// Empty input yields all zeros.
pub fn aggregate_with(table: &MappingTable, raw: &[RawEmotion]) -> AggregateScores {
    let mut scores = AggregateScores::zero();

    for emotion in raw {
        let label = normalize_label(&emotion.label);
        match table.lookup(&label) {
            Some((target, weight)) => {
                scores.add(target, clamp_score(emotion.score) * weight);
            }
            None => {
                trace!(
                    label = %label,
                    score = emotion.score,
                    reason = skip_reason(table, &label),
                    "Skipping unmapped emotion label"
                );
            }
        }
    }

    scores
}

/// Why a label produced no contribution: listed as unmapped, or not listed.
fn skip_reason(table: &MappingTable, label: &str) -> &'static str {
    if table.contains(label) {
        "explicitly unmapped"
    } else {
        "unknown label"
    }
}

/// Clamp a classifier score into [0, 1]. NaN counts as 0.
#[inline]
pub fn clamp_score(score: f64) -> f64 {
    if score.is_nan() {
        0.0
    } else {
        score.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::BUILTIN_MAPPINGS;
    use crate::types::TargetEmotion;

    #[test]
    fn test_single_mapped_label_hits_one_target() {
        for &(label, target) in BUILTIN_MAPPINGS {
            let Some((target, weight)) = target else {
                continue;
            };
            let agg = aggregate(&[RawEmotion::new(label, 0.7)]);
            for t in TargetEmotion::ALL {
                if t == target {
                    assert!((agg.get(t) - 0.7 * weight).abs() < 1e-12, "{label} -> {t}");
                } else {
                    assert_eq!(agg.get(t), 0.0, "{label} leaked into {t}");
                }
            }
        }
    }

    #[test]
    fn test_unmapped_labels_contribute_nothing() {
        for label in ["neutral", "anger", "fear", "surprise", "disgust", ""] {
            assert!(aggregate(&[RawEmotion::new(label, 0.99)]).is_zero(), "{label}");
        }
    }

    #[test]
    fn test_skip_reason_tells_unmapped_from_unknown() {
        let table = MappingTable::builtin();
        assert_eq!(skip_reason(table, "anger"), "explicitly unmapped");
        assert_eq!(skip_reason(table, "neutral"), "explicitly unmapped");
        assert_eq!(skip_reason(table, "disgust"), "unknown label");
        assert_eq!(skip_reason(table, ""), "unknown label");
    }

    #[test]
    fn test_labels_are_normalized_before_lookup() {
        let agg = aggregate(&[RawEmotion::new("  Optimism ", 1.0)]);
        assert!((agg.hope - 0.95).abs() < 1e-12);
    }

    #[test]
    fn test_out_of_range_scores_are_clamped() {
        let agg = aggregate(&[
            RawEmotion::new("pride", 1.7),
            RawEmotion::new("love", -0.4),
            RawEmotion::new("joy", f64::NAN),
        ]);
        assert_eq!(agg.pride, 1.0);
        assert_eq!(agg.love, 0.0);
        assert_eq!(agg.hope, 0.0);
    }

    #[test]
    fn test_empty_input_is_all_zero() {
        assert!(aggregate(&[]).is_zero());
    }
}
