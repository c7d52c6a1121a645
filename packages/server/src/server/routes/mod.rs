// HTTP routes
pub mod health;
pub mod listings;
pub mod locations;

pub use health::*;
pub use listings::*;
pub use locations::*;

use axum::{http::StatusCode, Json};
use serde::Serialize;

/// JSON error body for non-2xx responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub(crate) fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}
