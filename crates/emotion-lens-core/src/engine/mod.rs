//! Result assembly.
//!
//! Runs the emotion classifier, folds its output through the aggregator and
//! normalizer, and attaches an optional sentiment judgment.
//!
//! ```text
//! text ──► EmotionClassifier ──► aggregate ──► normalize ──┐
//!   │                                                      ├──► AnalysisResult
//!   └─► truncate(512) ──► SentimentClassifier (optional) ──┘
//! ```
//!
//! The engine holds no per-request state, imposes no deadline and never
//! retries. Callers that want a timeout wrap [`EmotionEngine::analyze`].

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, error, warn};

use crate::aggregate::aggregate_with;
use crate::error::{EngineError, EngineResult};
use crate::mapping::MappingTable;
use crate::normalize::normalize;
use crate::traits::{EmotionClassifier, SentimentClassifier};
use crate::types::{AnalysisResult, SentimentResult};

/// Default sentiment input bound, in characters.
pub const DEFAULT_SENTIMENT_MAX_CHARS: usize = 512;

/// Characters of input kept in [`EngineError::InferenceError`].
const TEXT_PREVIEW_CHARS: usize = 80;

/// Classifier capabilities loaded at process start.
///
/// `None` means the capability failed to initialize and stays unavailable
/// for the life of the process.
#[derive(Clone, Default)]
pub struct ClassifierHandles {
    pub emotion: Option<Arc<dyn EmotionClassifier>>,
    pub sentiment: Option<Arc<dyn SentimentClassifier>>,
}

impl ClassifierHandles {
    pub fn new(
        emotion: Option<Arc<dyn EmotionClassifier>>,
        sentiment: Option<Arc<dyn SentimentClassifier>>,
    ) -> Self {
        Self { emotion, sentiment }
    }

    pub fn emotion_available(&self) -> bool {
        self.emotion.is_some()
    }

    pub fn sentiment_available(&self) -> bool {
        self.sentiment.is_some()
    }
}

impl std::fmt::Debug for ClassifierHandles {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassifierHandles")
            .field("emotion", &self.emotion.as_ref().map(|c| c.name().to_string()))
            .field(
                "sentiment",
                &self.sentiment.as_ref().map(|c| c.name().to_string()),
            )
            .finish()
    }
}

/// Engine configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Sentiment input is cut to this many characters.
    pub sentiment_max_chars: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sentiment_max_chars: DEFAULT_SENTIMENT_MAX_CHARS,
        }
    }
}

/// Counters since process start.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineStats {
    /// Successful analyses.
    pub analyses: u64,

    /// Analyses failed by the emotion classifier.
    pub inference_errors: u64,

    /// Analyses rejected because the emotion classifier never loaded.
    pub unavailable: u64,

    /// Sentiment calls that failed. The analysis itself still succeeded.
    pub sentiment_failures: u64,
}

/// Emotion aggregation and normalization engine.
pub struct EmotionEngine {
    handles: ClassifierHandles,
    config: EngineConfig,
    table: &'static MappingTable,
    stats: RwLock<EngineStats>,
}

impl EmotionEngine {
    /// Create an engine with default configuration.
    pub fn new(handles: ClassifierHandles) -> Self {
        Self::with_config(handles, EngineConfig::default())
    }

    pub fn with_config(handles: ClassifierHandles, config: EngineConfig) -> Self {
        let table = MappingTable::builtin();
        debug!(
            mapping_version = table.version(),
            sentiment_max_chars = config.sentiment_max_chars,
            "Emotion engine created"
        );
        Self {
            handles,
            config,
            table,
            stats: RwLock::new(EngineStats::default()),
        }
    }

    /// Score `text` over the four target emotions.
    ///
    /// # Errors
    ///
    /// - `ModelUnavailable` when no emotion classifier was loaded
    /// - `InferenceError` when the emotion classifier fails on this input
    ///
    /// Sentiment problems never fail the analysis; they yield `sentiment: None`.
    pub async fn analyze(&self, text: &str) -> EngineResult<AnalysisResult> {
        let Some(emotion) = self.handles.emotion.as_ref() else {
            self.stats.write().unavailable += 1;
            return Err(EngineError::ModelUnavailable);
        };

        let raw = match emotion.classify(text).await {
            Ok(raw) => raw,
            Err(e) => {
                let preview = truncate_chars(text, TEXT_PREVIEW_CHARS);
                error!(
                    classifier = emotion.name(),
                    error = %e,
                    text_preview = %preview,
                    text_chars = text.chars().count(),
                    "Emotion classification failed"
                );
                self.stats.write().inference_errors += 1;
                return Err(EngineError::inference(e, preview));
            }
        };

        let aggregated = aggregate_with(self.table, &raw);
        let (emotions, confidence) = normalize(&aggregated);
        let sentiment = self.classify_sentiment(text).await;

        debug!(
            labels = raw.len(),
            confidence,
            has_sentiment = sentiment.is_some(),
            "Analysis complete"
        );

        self.stats.write().analyses += 1;

        Ok(AnalysisResult {
            emotions,
            confidence,
            sentiment,
            raw_emotions: raw,
        })
    }

    async fn classify_sentiment(&self, text: &str) -> Option<SentimentResult> {
        let sentiment = self.handles.sentiment.as_ref()?;
        let view = truncate_chars(text, self.config.sentiment_max_chars);
        match sentiment.classify(view).await {
            Ok(result) => Some(result),
            Err(e) => {
                warn!(
                    classifier = sentiment.name(),
                    error = %e,
                    "Sentiment classification failed, omitting sentiment"
                );
                self.stats.write().sentiment_failures += 1;
                None
            }
        }
    }

    pub fn emotion_available(&self) -> bool {
        self.handles.emotion_available()
    }

    pub fn sentiment_available(&self) -> bool {
        self.handles.sentiment_available()
    }

    /// Snapshot of the counters.
    pub fn stats(&self) -> EngineStats {
        self.stats.read().clone()
    }
}

/// Longest prefix of `text` holding at most `max_chars` characters.
///
/// Counts `char`s, never splits a code point.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
