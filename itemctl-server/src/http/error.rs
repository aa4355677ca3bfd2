//! API error types with IntoResponse
//!
//! Errors are converted to responses with appropriate status codes.
//! Not-found responses carry no body; everything else is JSON.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::db::repos::DbError;
use crate::models::{FieldErrors, ValidationError};

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Field validation failed (400, errors keyed by field)
    Validation(FieldErrors),

    /// Resource not found (404, empty body)
    NotFound { resource: &'static str, id: String },

    /// Body could not be read as a JSON object (400 or 415)
    Rejected { status: StatusCode, detail: String },

    /// Database error (500, logged)
    Database(DbError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Validation(errors) => (StatusCode::BAD_REQUEST, Json(errors)).into_response(),
            Self::NotFound { resource, id } => {
                tracing::debug!(resource, id = %id, "not found");
                StatusCode::NOT_FOUND.into_response()
            }
            Self::Rejected { status, detail } => {
                (status, Json(json!({ "detail": detail }))).into_response()
            }
            Self::Database(e) => {
                // Log the actual error, return generic message
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "error": "internal_error",
                        "message": "an internal error occurred"
                    })),
                )
                    .into_response()
            }
        }
    }
}

impl From<FieldErrors> for ApiError {
    fn from(e: FieldErrors) -> Self {
        Self::Validation(e)
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e.into())
    }
}

impl From<DbError> for ApiError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::NotFound { resource, id } => Self::NotFound { resource, id },
            _ => Self::Database(e),
        }
    }
}
