use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::db::RepositoryError;
use crate::models::ErrorResponse;
use crate::storage::StorageError;

/// Request-path errors.
///
/// Callers only ever see a status code and a generic message; the detail
/// stays in the server log.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid file upload: {0}")]
    InvalidUpload(String),

    #[error("Storage write failed: {0}")]
    StorageWriteFailed(#[from] StorageError),

    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidUpload(_) => StatusCode::BAD_REQUEST,
            AppError::StorageWriteFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message exposed to the caller
    pub fn public_message(&self) -> &'static str {
        match self {
            AppError::InvalidUpload(_) => "Invalid file upload",
            AppError::StorageWriteFailed(_) => "Failed to upload image to S3",
            AppError::Database(RepositoryError::Insert(_)) => "Failed to save data to MongoDB",
            AppError::Database(RepositoryError::Query(_)) => "Failed to fetch data from MongoDB",
            AppError::Database(RepositoryError::Decode(_)) => "Failed to parse data from MongoDB",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!("{}", self);

        let body = ErrorResponse {
            error: self.public_message().to_string(),
        };

        (self.status_code(), Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
