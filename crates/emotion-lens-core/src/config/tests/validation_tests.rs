//! Tests for configuration validation.

use crate::config::{ClassifierBackend, Config};
use crate::error::ConfigError;

#[test]
fn test_validation_passes() {
    assert!(Config::default_config().validate().is_ok());
}

#[test]
fn test_validation_fails_zero_port() {
    let mut config = Config::default_config();
    config.server.port = 0;
    assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
}

#[test]
fn test_validation_fails_zero_request_timeout() {
    let mut config = Config::default_config();
    config.server.request_timeout_secs = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_validation_fails_zero_limits() {
    let mut config = Config::default_config();
    config.limits.max_text_chars = 0;
    assert!(config.validate().is_err());

    let mut config = Config::default_config();
    config.limits.sentiment_max_chars = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_validation_fails_sentiment_bound_above_text_bound() {
    let mut config = Config::default_config();
    config.limits.max_text_chars = 100;
    config.limits.sentiment_max_chars = 512;
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("sentiment_max_chars"));
}

#[test]
fn test_http_backend_requires_endpoint() {
    let mut config = Config::default_config();
    config.emotion.endpoint = "  ".to_string();
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("emotion.endpoint"));
}

#[test]
fn test_http_backend_requires_model() {
    let mut config = Config::default_config();
    config.sentiment.model = String::new();
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("sentiment.model"));
}

#[test]
fn test_non_http_backends_skip_endpoint_checks() {
    let mut config = Config::default_config();
    config.emotion.backend = ClassifierBackend::Lexicon;
    config.emotion.endpoint = String::new();
    config.sentiment.backend = ClassifierBackend::Disabled;
    config.sentiment.model = String::new();
    assert!(config.validate().is_ok());
}

#[test]
fn test_warmup_requires_an_attempt() {
    let mut config = Config::default_config();
    config.emotion.warmup_attempts = 0;
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("emotion.warmup_attempts"));

    config.emotion.warmup = false;
    assert!(config.validate().is_ok());
}
