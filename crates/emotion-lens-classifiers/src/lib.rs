//! Classifier backends for emotion-lens.
//!
//! # Components
//!
//! - **http**: Hugging Face style inference endpoint client
//! - **lexicon**: offline keyword classifiers
//! - **loader**: builds [`ClassifierHandles`] from configuration at startup
//!
//! [`ClassifierHandles`]: emotion_lens_core::ClassifierHandles

pub mod http;
pub mod lexicon;
pub mod loader;

// Re-exports
pub use http::{HfInferenceClient, HttpClientConfig, HttpEmotionClassifier, HttpSentimentClassifier};
pub use lexicon::{LexiconEmotionClassifier, LexiconSentimentClassifier};
pub use loader::{load_classifiers, load_emotion, load_sentiment};
