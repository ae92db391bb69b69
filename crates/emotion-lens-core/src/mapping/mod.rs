//! Source-label to target-emotion mapping table.
//!
//! A hand-curated, lossy narrowing from the classifier's open emotion
//! vocabulary onto the four target emotions. Weights are independent per
//! source label and do NOT sum to 1 across targets.
//!
//! | source label | target | weight |
//! |--------------|--------|--------|
//! | joy | hope | 0.80 |
//! | optimism | hope | 0.95 |
//! | proud | pride | 0.95 |
//! | pride | pride | 1.00 |
//! | sadness | nostalgia | 0.60 |
//! | love | love | 0.95 |
//! | affection | love | 0.90 |
//! | nostalgia | nostalgia | 0.95 |
//! | gratitude | love | 0.85 |
//! | neutral, anger, fear, surprise | - | unmapped |
//!
//! Any label not listed is unmapped. Changing this table is a
//! configuration change: bump [`MAPPING_TABLE_VERSION`].
//!
//! The built-in table is frozen on first use and never written again, so
//! concurrent readers need no locking.

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::types::TargetEmotion;

/// Version tag of [`BUILTIN_MAPPINGS`].
pub const MAPPING_TABLE_VERSION: &str = "2024-emotion-map-v1";

/// Built-in mapping rows: `(source label, Some((target, weight)))` or
/// `(source label, None)` for an explicit unmapped entry.
pub const BUILTIN_MAPPINGS: &[(&str, Option<(TargetEmotion, f64)>)] = &[
    ("joy", Some((TargetEmotion::Hope, 0.80))),
    ("optimism", Some((TargetEmotion::Hope, 0.95))),
    ("proud", Some((TargetEmotion::Pride, 0.95))),
    ("pride", Some((TargetEmotion::Pride, 1.00))),
    ("sadness", Some((TargetEmotion::Nostalgia, 0.60))),
    ("love", Some((TargetEmotion::Love, 0.95))),
    ("affection", Some((TargetEmotion::Love, 0.90))),
    ("nostalgia", Some((TargetEmotion::Nostalgia, 0.95))),
    ("gratitude", Some((TargetEmotion::Love, 0.85))),
    // Explicitly unmapped
    ("neutral", None),
    ("anger", None),
    ("fear", None),
    ("surprise", None),
];

static BUILTIN_TABLE: OnceLock<MappingTable> = OnceLock::new();

/// Frozen lookup from lowercase source label to `(target, weight)`.
///
/// A `None` value marks the label as explicitly unmapped.
#[derive(Debug, Clone)]
pub struct MappingTable {
    version: &'static str,
    entries: HashMap<&'static str, Option<(TargetEmotion, f64)>>,
}

impl MappingTable {
    /// The process-wide built-in table, built once on first access.
    pub fn builtin() -> &'static MappingTable {
        BUILTIN_TABLE.get_or_init(|| Self::build(MAPPING_TABLE_VERSION, BUILTIN_MAPPINGS))
    }

    /// Build a table from rows after validating them.
    ///
    /// # Errors
    /// - `InvalidLabel`: empty, untrimmed or non-lowercase label
    /// - `DuplicateLabel`: a label appears twice
    /// - `WeightOutOfRange`: a weight outside (0.0, 1.0]
    pub fn from_entries(
        version: &'static str,
        rows: &[(&'static str, Option<(TargetEmotion, f64)>)],
    ) -> Result<Self, MappingError> {
        validate_mappings(rows)?;
        Ok(Self::build(version, rows))
    }

    fn build(version: &'static str, rows: &[(&'static str, Option<(TargetEmotion, f64)>)]) -> Self {
        Self {
            version,
            entries: rows.iter().copied().collect(),
        }
    }

    /// Look up an already-normalized label.
    ///
    /// Absent labels and explicitly unmapped labels both yield `None`.
    pub fn lookup(&self, label: &str) -> Option<(TargetEmotion, f64)> {
        self.entries.get(label).copied().flatten()
    }

    /// Whether the table has a row (mapped or unmapped) for this label.
    pub fn contains(&self, label: &str) -> bool {
        self.entries.contains_key(label)
    }

    pub fn version(&self) -> &'static str {
        self.version
    }
}

/// Normalize a classifier label for lookup: trim and lowercase.
pub fn normalize_label(label: &str) -> String {
    label.trim().to_lowercase()
}

/// Mapping table validation error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MappingError {
    #[error("Source label {label:?} must be non-empty, trimmed and lowercase")]
    InvalidLabel { label: String },

    #[error("Source label {label:?} appears more than once")]
    DuplicateLabel { label: String },

    #[error("Weight for {label:?} is out of range (0.0, 1.0]: {weight}")]
    WeightOutOfRange { label: String, weight: f64 },
}

/// Validate mapping rows.
pub fn validate_mappings(
    rows: &[(&'static str, Option<(TargetEmotion, f64)>)],
) -> Result<(), MappingError> {
    let mut seen = std::collections::HashSet::with_capacity(rows.len());
    for &(label, target) in rows {
        if label.is_empty() || normalize_label(label) != label {
            return Err(MappingError::InvalidLabel {
                label: label.to_string(),
            });
        }
        if !seen.insert(label) {
            return Err(MappingError::DuplicateLabel {
                label: label.to_string(),
            });
        }
        if let Some((_, weight)) = target {
            if !(weight > 0.0 && weight <= 1.0) {
                return Err(MappingError::WeightOutOfRange {
                    label: label.to_string(),
                    weight,
                });
            }
        }
    }
    Ok(())
}
