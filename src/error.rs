use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::models::ErrorMessage;
use crate::storage::StorageError;

/// Custom error type for API endpoints
///
/// Every variant maps to one status code and a `{"message": ...}` body.
/// Backend failures are logged here and answered with a generic message so
/// no internal detail reaches the caller.
#[derive(Debug)]
pub enum ApiError {
    /// Request body could not be read, decoded, or failed validation
    InvalidBody(String),
    /// Requested hero has no record
    HeroNotFound(String),
    /// Delete targeted a hero that has no record
    NothingToDelete(String),
    /// Storage backend failure
    Storage(anyhow::Error),
    /// A fetched record could not be encoded
    Encode(serde_json::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InvalidBody(reason) => (StatusCode::BAD_REQUEST, reason),
            ApiError::HeroNotFound(id) => {
                tracing::info!("Hero not found: {}", id);
                (StatusCode::NOT_FOUND, format!("hero {} not found", id))
            }
            ApiError::NothingToDelete(id) => {
                tracing::info!("Nothing to delete for hero: {}", id);
                (StatusCode::NOT_FOUND, format!("hero {} not found", id))
            }
            ApiError::Storage(err) => {
                tracing::error!("Storage error: {:#}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
            ApiError::Encode(err) => {
                tracing::error!("Unable to encode hero: {}", err);
                (
                    StatusCode::NOT_IMPLEMENTED,
                    "unable to encode response".to_string(),
                )
            }
        };

        (status, Json(ErrorMessage { message })).into_response()
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::HeroNotExist(id) => ApiError::HeroNotFound(id),
            StorageError::NothingToDelete(id) => ApiError::NothingToDelete(id),
            StorageError::Validation(reason) => ApiError::InvalidBody(reason),
            StorageError::Backend(err) => ApiError::Storage(err),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Encode(err)
    }
}
