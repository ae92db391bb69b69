//! Emotion aggregation and normalization engine.
//!
//! Turns open-vocabulary emotion probabilities from an external classifier
//! into a bounded score vector over four fixed target emotions, and attaches
//! an optional sentiment judgment.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                          EMOTION ENGINE                          │
//! ├──────────────────────────────────────────────────────────────────┤
//! │  classifier output → aggregate (MappingTable) → normalize → result│
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Components
//!
//! - **mapping**: frozen `label → (target, weight)` table
//! - **aggregate**: weighted per-target sums
//! - **normalize**: max-based rescaling and confidence
//! - **engine**: [`EmotionEngine::analyze`] over injected classifier handles
//! - **config**: layered configuration shared by the server and classifiers
//!
//! # Usage
//!
//! ```rust,ignore
//! use emotion_lens_core::{ClassifierHandles, EmotionEngine};
//!
//! async fn example(handles: ClassifierHandles) {
//!     let engine = EmotionEngine::new(handles);
//!     let result = engine.analyze("So proud of what we built").await.unwrap();
//!     println!("pride = {:.3}", result.emotions.pride);
//! }
//! ```

pub mod aggregate;
pub mod config;
pub mod engine;
pub mod error;
pub mod mapping;
pub mod normalize;
pub mod traits;
pub mod types;

// Re-exports
pub use aggregate::{aggregate, aggregate_with};
pub use config::Config;
pub use engine::{truncate_chars, ClassifierHandles, EmotionEngine, EngineConfig, EngineStats};
pub use error::{
    ClassifierError, ClassifierResult, ConfigError, ConfigResult, EngineError, EngineResult,
};
pub use mapping::{MappingError, MappingTable, MAPPING_TABLE_VERSION};
pub use normalize::normalize;
pub use traits::{EmotionClassifier, SentimentClassifier};
pub use types::{
    AggregateScores, AnalysisResult, EmotionScores, NormalizedScores, RawEmotion,
    SentimentResult, TargetEmotion,
};
