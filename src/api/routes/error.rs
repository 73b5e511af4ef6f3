//! API error handling utilities.
//!
//! Every error response uses one envelope:
//! `{"status": <int>, "error": <short title>, "message": <detail>}`.
//! Layer-specific error kinds convert into [`ApiError`] here, which keeps
//! the kind-to-status mapping in a single place.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::{error, warn};

use crate::models::ValidationError;
use crate::services::filter_service::FilterError;
use crate::storage::StorageError;

/// API error response
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub title: &'static str,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            title: "Bad Request",
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            title: "Not Found",
            message: message.into(),
        }
    }

    pub fn unsupported_media_type(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNSUPPORTED_MEDIA_TYPE,
            title: "Unsupported Media Type",
            message: message.into(),
        }
    }

    pub fn method_not_allowed(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::METHOD_NOT_ALLOWED,
            title: "Method Not Allowed",
            message: message.into(),
        }
    }

    /// Generic 500; internals are logged server-side, never sent to clients.
    pub fn internal() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            title: "Internal Server Error",
            message: "An unexpected error occurred.".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({
            "status": self.status.as_u16(),
            "error": self.title,
            "message": self.message,
        });

        (self.status, axum::Json(body)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        warn!("Bad Request: {}", err);
        ApiError::bad_request(err.to_string())
    }
}

impl From<FilterError> for ApiError {
    fn from(err: FilterError) -> Self {
        warn!("Bad Request: {}", err);
        ApiError::bad_request(err.to_string())
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(id) => {
                warn!("Not Found: promotion {}", id);
                ApiError::not_found(format!("Promotion with id '{}' was not found.", id))
            }
            StorageError::InvalidRecord(message) => {
                warn!("Bad Request: {}", message);
                ApiError::bad_request(message)
            }
            StorageError::Database(detail) => {
                error!("Database error: {}", detail);
                ApiError::internal()
            }
        }
    }
}
