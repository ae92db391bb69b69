//! HTTP routes.
//!
//! - `POST /analyze` - score one text
//! - `GET /health` - classifier availability

use std::sync::Arc;
use std::time::Duration;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use emotion_lens_core::config::{Config, LimitsConfig};
use emotion_lens_core::{EmotionEngine, NormalizedScores, SentimentResult};

use crate::error::{ApiError, ApiResult};

pub const SUCCESS_MESSAGE: &str = "Emotions analyzed successfully using ML model";

/// Shared state for all handlers.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<EmotionEngine>,
    pub limits: LimitsConfig,
    /// Deadline wrapped around each engine call.
    pub request_timeout: Duration,
}

impl AppState {
    pub fn new(engine: Arc<EmotionEngine>, limits: LimitsConfig, request_timeout: Duration) -> Self {
        Self {
            engine,
            limits,
            request_timeout,
        }
    }

    pub fn from_config(engine: Arc<EmotionEngine>, config: &Config) -> Self {
        Self::new(
            engine,
            config.limits.clone(),
            Duration::from_secs(config.server.request_timeout_secs),
        )
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("emotion_available", &self.engine.emotion_available())
            .field("sentiment_available", &self.engine.sentiment_available())
            .field("limits", &self.limits)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub success: bool,
    pub emotions: NormalizedScores,
    pub confidence: f64,
    pub sentiment: Option<SentimentResult>,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub emotion_model_loaded: bool,
    pub sentiment_model_loaded: bool,
}

/// Create the service router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/analyze", post(analyze_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

/// Strip surrounding whitespace, then reject blank or over-long text.
///
/// Returns the stripped text, which is what the engine sees. Length is
/// counted in characters after stripping.
pub fn validate_text(text: &str, max_chars: usize) -> ApiResult<&str> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ApiError::MissingText);
    }
    if text.chars().count() > max_chars {
        return Err(ApiError::TextTooLong { max_chars });
    }
    Ok(text)
}

pub async fn analyze_handler(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> ApiResult<Json<AnalyzeResponse>> {
    let Json(request) = payload.map_err(|rejection| {
        debug!(error = %rejection, "Rejected analyze body");
        ApiError::MissingText
    })?;

    let text = validate_text(&request.text, state.limits.max_text_chars)?;

    let result = tokio::time::timeout(state.request_timeout, state.engine.analyze(text))
        .await
        .map_err(|_| {
            warn!(
                timeout_secs = state.request_timeout.as_secs(),
                "Analysis exceeded request deadline"
            );
            ApiError::Timeout {
                timeout_secs: state.request_timeout.as_secs(),
            }
        })?
        .map_err(|e| {
            warn!(error = %e, permanent = e.is_permanent(), "Analysis failed");
            ApiError::from(e)
        })?;

    Ok(Json(AnalyzeResponse {
        success: true,
        emotions: result.emotions,
        confidence: result.confidence,
        sentiment: result.sentiment,
        message: SUCCESS_MESSAGE,
    }))
}

pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        emotion_model_loaded: state.engine.emotion_available(),
        sentiment_model_loaded: state.engine.sentiment_available(),
    })
}
