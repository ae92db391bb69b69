//! Classifier capability traits.
//!
//! Both classifiers are external black boxes. The engine only sees these
//! traits, so tests can substitute deterministic doubles.

use async_trait::async_trait;

use crate::error::ClassifierResult;
use crate::types::{RawEmotion, SentimentResult};

/// Open-vocabulary emotion classifier.
///
/// Returns zero or more `(label, score)` pairs. Labels are not duplicated
/// within one call by contract, and scores need not sum to 1.
#[async_trait]
pub trait EmotionClassifier: Send + Sync {
    async fn classify(&self, text: &str) -> ClassifierResult<Vec<RawEmotion>>;

    /// Identifier used in logs and the startup banner.
    fn name(&self) -> &str;
}

/// Closed-vocabulary sentiment classifier (e.g. POSITIVE / NEGATIVE).
#[async_trait]
pub trait SentimentClassifier: Send + Sync {
    /// `text` has already been truncated by the caller.
    async fn classify(&self, text: &str) -> ClassifierResult<SentimentResult>;

    fn name(&self) -> &str;
}
