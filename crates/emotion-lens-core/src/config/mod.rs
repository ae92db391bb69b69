//! Configuration management for emotion-lens.

mod sub_configs;

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};

use crate::engine::EngineConfig;
use crate::error::{ConfigError, ConfigResult};

pub use sub_configs::{
    ClassifierBackend, ClassifierConfig, LimitsConfig, LoggingConfig, ServerConfig,
    DEFAULT_EMOTION_MODEL, DEFAULT_INFERENCE_ENDPOINT, DEFAULT_SENTIMENT_MODEL,
};

/// Environment variable selecting the environment-specific config file.
pub const ENV_SELECTOR: &str = "EMOTION_LENS_ENV";

/// Prefix of configuration overrides in the environment.
pub const ENV_PREFIX: &str = "EMOTION_LENS";

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
    #[serde(default = "ClassifierConfig::emotion_default")]
    pub emotion: ClassifierConfig,
    #[serde(default = "ClassifierConfig::sentiment_default")]
    pub sentiment: ClassifierConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

impl Config {
    /// Load configuration from files and environment.
    ///
    /// Configuration is loaded in order:
    /// 1. config/default.toml (base settings)
    /// 2. config/{EMOTION_LENS_ENV}.toml (environment-specific)
    /// 3. Environment variables with EMOTION_LENS__ prefix, e.g.
    ///    `EMOTION_LENS__SERVER__PORT=8080`
    pub fn load() -> ConfigResult<Self> {
        let env = std::env::var(ENV_SELECTOR).unwrap_or_else(|_| "development".to_string());

        let builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{}", env)).required(false))
            .add_source(env_source());

        let mut config: Config = builder.build()?.try_deserialize()?;
        config.fill_default_models();
        config.validate()?;
        Ok(config)
    }

    /// Load an explicit config file, then apply EMOTION_LENS__ environment
    /// overrides on top of it.
    pub fn load_from(path: &std::path::Path) -> ConfigResult<Self> {
        let builder = config::Config::builder()
            .add_source(config::File::from(path).required(true))
            .add_source(env_source());

        let mut config: Config = builder.build()?.try_deserialize()?;
        config.fill_default_models();
        config.validate()?;
        Ok(config)
    }

    /// Defaults for testing/development.
    pub fn default_config() -> Self {
        Self {
            server: ServerConfig::default(),
            limits: LimitsConfig::default(),
            emotion: ClassifierConfig::emotion_default(),
            sentiment: ClassifierConfig::sentiment_default(),
            logging: LoggingConfig::default(),
        }
    }

    /// Load configuration from a TOML file.
    pub fn from_file(path: &std::path::Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            source: e,
        })?;

        let mut config: Config = toml::from_str(&content)?;
        config.fill_default_models();
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values. Fails on the first problem.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.server.port == 0 {
            return Err(ConfigError::Invalid(
                "server.port must be greater than 0".into(),
            ));
        }

        if self.server.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "server.request_timeout_secs must be greater than 0".into(),
            ));
        }

        if self.limits.max_text_chars == 0 {
            return Err(ConfigError::Invalid(
                "limits.max_text_chars must be greater than 0".into(),
            ));
        }

        if self.limits.sentiment_max_chars == 0 {
            return Err(ConfigError::Invalid(
                "limits.sentiment_max_chars must be greater than 0".into(),
            ));
        }

        if self.limits.sentiment_max_chars > self.limits.max_text_chars {
            return Err(ConfigError::Invalid(format!(
                "limits.sentiment_max_chars ({}) must not exceed limits.max_text_chars ({})",
                self.limits.sentiment_max_chars, self.limits.max_text_chars
            )));
        }

        validate_classifier("emotion", &self.emotion)?;
        validate_classifier("sentiment", &self.sentiment)?;

        Ok(())
    }

    /// A section that sets only some keys (or only an env override) leaves
    /// `model` empty; fall back to the capability's default model.
    fn fill_default_models(&mut self) {
        if self.emotion.model.trim().is_empty() {
            self.emotion.model = DEFAULT_EMOTION_MODEL.to_string();
        }
        if self.sentiment.model.trim().is_empty() {
            self.sentiment.model = DEFAULT_SENTIMENT_MODEL.to_string();
        }
    }

    /// Engine settings derived from this configuration.
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            sentiment_max_chars: self.limits.sentiment_max_chars,
        }
    }
}

fn env_source() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
}

fn validate_classifier(section: &str, cfg: &ClassifierConfig) -> ConfigResult<()> {
    if cfg.warmup && cfg.warmup_attempts == 0 {
        return Err(ConfigError::Invalid(format!(
            "{}.warmup_attempts must be greater than 0 when warmup is enabled",
            section
        )));
    }

    if cfg.backend != ClassifierBackend::Http {
        return Ok(());
    }

    if cfg.endpoint.trim().is_empty() {
        return Err(ConfigError::Invalid(format!(
            "{}.endpoint must be set when backend = \"http\"",
            section
        )));
    }

    if cfg.model.trim().is_empty() {
        return Err(ConfigError::Invalid(format!(
            "{}.model must be set when backend = \"http\"",
            section
        )));
    }

    if cfg.timeout_secs == 0 {
        return Err(ConfigError::Invalid(format!(
            "{}.timeout_secs must be greater than 0",
            section
        )));
    }

    Ok(())
}
