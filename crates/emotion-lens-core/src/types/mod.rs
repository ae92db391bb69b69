//! Value types shared by the mapping table, aggregator, normalizer and
//! result assembly.
//!
//! Everything here is a plain value: no identity, no shared mutable state.

use serde::{Deserialize, Serialize};

// ============================================================================
// TARGET EMOTIONS
// ============================================================================

/// Number of target emotions.
pub const NUM_TARGETS: usize = 4;

/// The closed set of emotions the service reports.
///
/// Never inferred from classifier output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetEmotion {
    Pride,
    Nostalgia,
    Love,
    Hope,
}

impl TargetEmotion {
    /// All targets in reporting order.
    pub const ALL: [TargetEmotion; NUM_TARGETS] = [
        TargetEmotion::Pride,
        TargetEmotion::Nostalgia,
        TargetEmotion::Love,
        TargetEmotion::Hope,
    ];

    /// Lowercase name used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pride => "pride",
            Self::Nostalgia => "nostalgia",
            Self::Love => "love",
            Self::Hope => "hope",
        }
    }

    /// Position in [`TargetEmotion::ALL`].
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl std::fmt::Display for TargetEmotion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// CLASSIFIER OUTPUT
// ============================================================================

/// One `(label, score)` pair from the emotion classifier.
///
/// `score` is nominally in [0, 1] but is clamped again during aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEmotion {
    pub label: String,
    pub score: f64,
}

impl RawEmotion {
    pub fn new(label: impl Into<String>, score: f64) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

/// Sentiment judgment, passed through unmodified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    pub label: String,
    pub score: f64,
}

impl SentimentResult {
    pub fn new(label: impl Into<String>, score: f64) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

// ============================================================================
// SCORE RECORDS
// ============================================================================

/// One value per target emotion.
///
/// Serializes as an object with exactly the keys `pride`, `nostalgia`,
/// `love` and `hope`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EmotionScores {
    pub pride: f64,
    pub nostalgia: f64,
    pub love: f64,
    pub hope: f64,
}

/// Running sums produced by the aggregator.
pub type AggregateScores = EmotionScores;

/// Max-scaled scores in [0, 1] produced by the normalizer.
pub type NormalizedScores = EmotionScores;

impl EmotionScores {
    /// All four scores at 0.0.
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn get(&self, target: TargetEmotion) -> f64 {
        match target {
            TargetEmotion::Pride => self.pride,
            TargetEmotion::Nostalgia => self.nostalgia,
            TargetEmotion::Love => self.love,
            TargetEmotion::Hope => self.hope,
        }
    }

    pub fn set(&mut self, target: TargetEmotion, value: f64) {
        *self.slot_mut(target) = value;
    }

    pub fn add(&mut self, target: TargetEmotion, value: f64) {
        *self.slot_mut(target) += value;
    }

    fn slot_mut(&mut self, target: TargetEmotion) -> &mut f64 {
        match target {
            TargetEmotion::Pride => &mut self.pride,
            TargetEmotion::Nostalgia => &mut self.nostalgia,
            TargetEmotion::Love => &mut self.love,
            TargetEmotion::Hope => &mut self.hope,
        }
    }

    /// `(target, value)` pairs in reporting order.
    pub fn iter(&self) -> impl Iterator<Item = (TargetEmotion, f64)> + '_ {
        TargetEmotion::ALL.iter().map(move |&t| (t, self.get(t)))
    }

    /// Largest of the four values.
    pub fn max_value(&self) -> f64 {
        self.iter().map(|(_, v)| v).fold(f64::NEG_INFINITY, f64::max)
    }

    /// True when every value is exactly 0.0.
    pub fn is_zero(&self) -> bool {
        self.iter().all(|(_, v)| v == 0.0)
    }
}

// ============================================================================
// ANALYSIS RESULT
// ============================================================================

/// Output of one successful analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Normalized target scores.
    pub emotions: NormalizedScores,

    /// Maximum normalized score: 1.0 when anything was aggregated, else 0.0.
    pub confidence: f64,

    /// Sentiment, absent when the sentiment classifier is unavailable or failed.
    pub sentiment: Option<SentimentResult>,

    /// Classifier output as received, kept for diagnostics.
    #[serde(default)]
    pub raw_emotions: Vec<RawEmotion>,
}
