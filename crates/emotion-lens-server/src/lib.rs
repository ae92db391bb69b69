//! emotion-lens HTTP service.
//!
//! Request validation, response shaping and the request deadline live here;
//! scoring lives in `emotion-lens-core`.

pub mod error;
pub mod logging;
pub mod routes;

pub use error::{ApiError, ApiResult};
pub use routes::{create_router, validate_text, AppState};
