//! Request boundary errors.
//!
//! Every variant renders as `{"success": false, "error": "..."}`. Engine
//! failures share one generic message so internal detail never reaches
//! the caller.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use emotion_lens_core::EngineError;

/// Message returned for every engine-side failure.
pub const ANALYSIS_FAILED: &str = "Failed to analyze text";

/// Errors surfaced by the HTTP handlers and the CLI.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing, ill-typed or blank `text`, or an unparseable body.
    #[error("Text field is required")]
    MissingText,

    #[error("Text is too long (max {max_chars} characters)")]
    TextTooLong { max_chars: usize },

    #[error("{}", ANALYSIS_FAILED)]
    Engine(#[from] EngineError),

    /// Request deadline expired before the engine answered.
    #[error("{}", ANALYSIS_FAILED)]
    Timeout { timeout_secs: u64 },
}

/// Result type for request handling.
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingText | Self::TextTooLong { .. } => StatusCode::BAD_REQUEST,
            Self::Engine(EngineError::ModelUnavailable) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Engine(EngineError::InferenceError { .. }) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            success: false,
            error: self.to_string(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}
