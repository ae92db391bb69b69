//! Error types for the emotion scoring engine.
//!
//! Two failure conditions leave the engine. Neither is retried internally;
//! retry policy belongs to whoever calls [`crate::EmotionEngine::analyze`].
//! Input validation errors never reach this layer.

use thiserror::Error;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors produced by [`crate::EmotionEngine::analyze`].
#[derive(Debug, Error)]
pub enum EngineError {
    /// The emotion classifier failed to initialize at process start.
    ///
    /// Permanent for the life of the process.
    #[error("emotion classifier is not available")]
    ModelUnavailable,

    /// The emotion classifier is loaded but failed on this input.
    #[error("emotion inference failed: {message}")]
    InferenceError {
        /// Cause reported by the classifier.
        message: String,
        /// Leading characters of the offending text, for diagnostics.
        text_preview: String,
    },
}

impl EngineError {
    /// Create an inference error from any error type.
    pub fn inference<E: std::fmt::Display>(e: E, text_preview: impl Into<String>) -> Self {
        Self::InferenceError {
            message: e.to_string(),
            text_preview: text_preview.into(),
        }
    }

    /// Whether this failure will recur for every request.
    pub fn is_permanent(&self) -> bool {
        matches!(self, Self::ModelUnavailable)
    }
}

/// Errors raised by a classifier capability.
#[derive(Debug, Error)]
pub enum ClassifierError {
    /// Transport-level failure talking to an inference endpoint.
    #[error("HTTP error: {message}")]
    Http { message: String },

    /// Inference endpoint answered with a non-success status.
    #[error("inference API returned {status}: {message}")]
    Api { status: u16, message: String },

    /// Inference endpoint answered with a body we cannot interpret.
    #[error("invalid classifier response: {message}")]
    InvalidResponse { message: String },

    /// Classifier did not answer in time.
    #[error("classifier timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// Classifier was constructed with an unusable configuration.
    #[error("classifier configuration error: {message}")]
    Config { message: String },
}

/// Result type for classifier operations.
pub type ClassifierResult<T> = Result<T, ClassifierError>;

impl ClassifierError {
    /// Create an invalid-response error from any error type.
    pub fn invalid_response<E: std::fmt::Display>(e: E) -> Self {
        Self::InvalidResponse {
            message: e.to_string(),
        }
    }

    /// Whether a later call may succeed: a cold or overloaded endpoint
    /// (503, 429) or a timeout.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Api { status, .. } => *status == 503 || *status == 429,
            Self::Timeout { .. } => true,
            _ => false,
        }
    }

    /// Create a configuration error from any error type.
    pub fn config<E: std::fmt::Display>(e: E) -> Self {
        Self::Config {
            message: e.to_string(),
        }
    }
}

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A configuration value failed validation.
    #[error("Configuration error: {0}")]
    Invalid(String),

    /// Configuration file could not be read.
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file is not valid TOML for [`crate::config::Config`].
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// Layered source loading failed.
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
