use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use favvid_core::{StorageError, ValidationError};
use thiserror::Error;
use tracing::{debug, error};

use crate::model::MessageResponse;

pub type Result<T> = std::result::Result<T, AppError>;

/// Errors a handler can answer with.
///
/// Client errors carry a JSON `{"message": ...}` body. Server errors answer
/// with the raw error text as plain text.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),
    #[error("Invalid ID: {0}")]
    InvalidId(String),
    #[error("Video not found")]
    NotFound(String),
    #[error("{0}")]
    Storage(StorageError),
    #[error("Failed to initialize video store: {0}")]
    StoreUnavailable(String),
}

impl From<StorageError> for AppError {
    fn from(error: StorageError) -> Self {
        match error {
            StorageError::NotFound(id) => AppError::NotFound(id),
            StorageError::InvalidId(message) => AppError::InvalidId(message),
            other => AppError::Storage(other),
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(error: ValidationError) -> Self {
        AppError::Validation(error.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::InvalidId(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Storage(_) | AppError::StoreUnavailable(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let AppError::NotFound(id) = &self {
            debug!(id = %id, "video not found");
        }
        let message = self.to_string();

        if status.is_server_error() {
            error!(error = %message, "request failed");
            return (status, message).into_response();
        }

        (status, Json(MessageResponse { message })).into_response()
    }
}
