//! Startup loading of classifier capabilities.
//!
//! Each capability is built once. A construction failure, a non-transient
//! warmup failure, or a transient one that outlasts the retry budget is
//! logged and leaves that handle empty for the life of the process.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, warn};

use emotion_lens_core::config::{ClassifierBackend, ClassifierConfig, Config};
use emotion_lens_core::{ClassifierHandles, ClassifierResult, EmotionClassifier, SentimentClassifier};

use crate::http::{HttpClientConfig, HttpEmotionClassifier, HttpSentimentClassifier};
use crate::lexicon::{LexiconEmotionClassifier, LexiconSentimentClassifier};

/// Text classified once at startup to warm the model.
pub const WARMUP_TEXT: &str = "warmup";

/// Build both capabilities from configuration.
pub async fn load_classifiers(config: &Config) -> ClassifierHandles {
    let emotion = load_emotion(&config.emotion).await;
    let sentiment = load_sentiment(&config.sentiment).await;

    let handles = ClassifierHandles::new(emotion, sentiment);
    info!(
        emotion_model_loaded = handles.emotion_available(),
        sentiment_model_loaded = handles.sentiment_available(),
        "Classifiers loaded"
    );
    handles
}

/// Build the emotion capability, or `None` if it is disabled or failed.
pub async fn load_emotion(cfg: &ClassifierConfig) -> Option<Arc<dyn EmotionClassifier>> {
    let built: ClassifierResult<Arc<dyn EmotionClassifier>> = match cfg.backend {
        ClassifierBackend::Disabled => {
            warn!("Emotion classifier disabled by configuration");
            return None;
        }
        ClassifierBackend::Http => HttpEmotionClassifier::new(HttpClientConfig::from(cfg))
            .map(|c| Arc::new(c) as Arc<dyn EmotionClassifier>),
        ClassifierBackend::Lexicon => {
            LexiconEmotionClassifier::new().map(|c| Arc::new(c) as Arc<dyn EmotionClassifier>)
        }
    };

    let classifier = match built {
        Ok(c) => c,
        Err(e) => {
            error!(
                backend = cfg.backend.as_str(),
                error = %e,
                "Failed to build emotion classifier"
            );
            return None;
        }
    };

    if cfg.warmup {
        let target = &classifier;
        let warmed = warm_up(classifier.name(), cfg, move || async move {
            target.classify(WARMUP_TEXT).await.map(|_| ())
        })
        .await;
        if let Err(e) = warmed {
            error!(
                classifier = classifier.name(),
                error = %e,
                "Emotion classifier warmup failed, marking unavailable"
            );
            return None;
        }
    }

    info!(classifier = classifier.name(), "Emotion classifier ready");
    Some(classifier)
}

/// Build the sentiment capability, or `None` if it is disabled or failed.
pub async fn load_sentiment(cfg: &ClassifierConfig) -> Option<Arc<dyn SentimentClassifier>> {
    let built: ClassifierResult<Arc<dyn SentimentClassifier>> = match cfg.backend {
        ClassifierBackend::Disabled => {
            warn!("Sentiment classifier disabled by configuration");
            return None;
        }
        ClassifierBackend::Http => HttpSentimentClassifier::new(HttpClientConfig::from(cfg))
            .map(|c| Arc::new(c) as Arc<dyn SentimentClassifier>),
        ClassifierBackend::Lexicon => {
            LexiconSentimentClassifier::new().map(|c| Arc::new(c) as Arc<dyn SentimentClassifier>)
        }
    };

    let classifier = match built {
        Ok(c) => c,
        Err(e) => {
            error!(
                backend = cfg.backend.as_str(),
                error = %e,
                "Failed to build sentiment classifier"
            );
            return None;
        }
    };

    if cfg.warmup {
        let target = &classifier;
        let warmed = warm_up(classifier.name(), cfg, move || async move {
            target.classify(WARMUP_TEXT).await.map(|_| ())
        })
        .await;
        if let Err(e) = warmed {
            error!(
                classifier = classifier.name(),
                error = %e,
                "Sentiment classifier warmup failed, marking unavailable"
            );
            return None;
        }
    }

    info!(classifier = classifier.name(), "Sentiment classifier ready");
    Some(classifier)
}

/// Repeat the warmup call until it succeeds or the error is final.
///
/// Only transient errors are retried. The delay doubles after each retry.
async fn warm_up<F, Fut>(name: &str, cfg: &ClassifierConfig, call: F) -> ClassifierResult<()>
where
    F: Fn() -> Fut,
    Fut: Future<Output = ClassifierResult<()>>,
{
    let attempts = cfg.warmup_attempts.max(1);
    let mut delay = Duration::from_millis(cfg.warmup_retry_delay_ms);
    let mut attempt = 1;

    loop {
        match call().await {
            Ok(()) => return Ok(()),
            Err(e) if e.is_transient() && attempt < attempts => {
                warn!(
                    classifier = name,
                    error = %e,
                    attempt,
                    max_attempts = attempts,
                    retry_in_ms = delay.as_millis() as u64,
                    "Warmup request failed, retrying"
                );
                tokio::time::sleep(delay).await;
                delay = delay.saturating_mul(2);
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
