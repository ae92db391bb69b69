//! Sub-configuration structures for emotion-lens components.

use serde::{Deserialize, Serialize};

pub const DEFAULT_EMOTION_MODEL: &str = "j-hartmann/emotion-english-distilroberta-base";
pub const DEFAULT_SENTIMENT_MODEL: &str = "distilbert-base-uncased-finetuned-sst-2-english";
pub const DEFAULT_INFERENCE_ENDPOINT: &str = "https://api-inference.huggingface.co/models";

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Bind address (default: "127.0.0.1")
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Port (default: 5001)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Deadline for one `/analyze` request in seconds (default: 30)
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5001
}

fn default_request_timeout_secs() -> u64 {
    30
}

/// Input bounds.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LimitsConfig {
    /// Longest accepted `/analyze` text, in characters (default: 5000)
    #[serde(default = "default_max_text_chars")]
    pub max_text_chars: usize,

    /// Sentiment input truncation, in characters (default: 512)
    #[serde(default = "default_sentiment_max_chars")]
    pub sentiment_max_chars: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_text_chars: default_max_text_chars(),
            sentiment_max_chars: default_sentiment_max_chars(),
        }
    }
}

fn default_max_text_chars() -> usize {
    5000
}

fn default_sentiment_max_chars() -> usize {
    512
}

/// Which implementation backs a classifier capability.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ClassifierBackend {
    /// Remote inference endpoint.
    #[default]
    Http,
    /// Offline keyword classifier.
    Lexicon,
    /// Never loaded. The capability reports unavailable.
    Disabled,
}

impl ClassifierBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Lexicon => "lexicon",
            Self::Disabled => "disabled",
        }
    }
}

/// One classifier capability.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClassifierConfig {
    #[serde(default)]
    pub backend: ClassifierBackend,

    /// Base URL of the inference service. The model id is appended.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Model id. Left empty in a file, it falls back to the default model.
    #[serde(default)]
    pub model: String,

    /// Bearer token sent to the inference service.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Per-call HTTP timeout in seconds (default: 30)
    #[serde(default = "default_classifier_timeout_secs")]
    pub timeout_secs: u64,

    /// Classify a short text once at startup (default: true)
    #[serde(default = "default_warmup")]
    pub warmup: bool,

    /// Warmup attempts before giving up on a cold or overloaded endpoint
    /// (default: 4)
    #[serde(default = "default_warmup_attempts")]
    pub warmup_attempts: u32,

    /// Delay before the first warmup retry, doubled on each further retry
    /// (default: 5000)
    #[serde(default = "default_warmup_retry_delay_ms")]
    pub warmup_retry_delay_ms: u64,
}

impl ClassifierConfig {
    pub fn emotion_default() -> Self {
        Self::with_model(DEFAULT_EMOTION_MODEL)
    }

    pub fn sentiment_default() -> Self {
        Self::with_model(DEFAULT_SENTIMENT_MODEL)
    }

    fn with_model(model: &str) -> Self {
        Self {
            backend: ClassifierBackend::default(),
            endpoint: default_endpoint(),
            model: model.to_string(),
            api_key: None,
            timeout_secs: default_classifier_timeout_secs(),
            warmup: default_warmup(),
            warmup_attempts: default_warmup_attempts(),
            warmup_retry_delay_ms: default_warmup_retry_delay_ms(),
        }
    }
}

fn default_endpoint() -> String {
    DEFAULT_INFERENCE_ENDPOINT.to_string()
}

fn default_classifier_timeout_secs() -> u64 {
    30
}

fn default_warmup() -> bool {
    true
}

fn default_warmup_attempts() -> u32 {
    4
}

fn default_warmup_retry_delay_ms() -> u64 {
    5000
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` takes precedence.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
