//! Failures reported before a stream starts, mapped to HTTP statuses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use docsmith_core::{FieldError, ValidationErrors};
use serde_json::json;

pub const NOT_CONFIGURED_DETAIL: &str =
    "AI service is not configured. Please set ANTHROPIC_API_KEY.";

#[derive(Debug)]
pub enum ApiError {
    /// No upstream credential configured.
    NotConfigured,
    /// Payload violated the request model.
    Validation(ValidationErrors),
    /// Declared content type is not JSON.
    UnsupportedMediaType,
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::Validation(errors)
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Validation(ValidationErrors::single(FieldError::body(
            "json_invalid",
            format!("JSON decode error: {}", e),
        )))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotConfigured => (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "detail": NOT_CONFIGURED_DETAIL })),
            )
                .into_response(),
            ApiError::Validation(errors) => {
                tracing::info!(
                    target: "docsmith::gateway",
                    count = errors.len(),
                    "Rejected request payload"
                );
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(json!({ "detail": errors })),
                )
                    .into_response()
            }
            ApiError::UnsupportedMediaType => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                Json(json!({
                    "detail": "Expected request with `Content-Type: application/json`"
                })),
            )
                .into_response(),
        }
    }
}
