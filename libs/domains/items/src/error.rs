use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;

/// Message returned when a create request lacks one of the six item fields
pub const REQUIRED_FIELDS_MESSAGE: &str = "All fields are required";

#[derive(Debug, Error)]
pub enum ItemError {
    /// Carries the id as received so it can be logged; never echoed to clients.
    #[error("Item not found")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("Only image files are allowed (got '{0}')")]
    UnsupportedFileType(String),

    #[error("Invalid request body: {0}")]
    InvalidForm(String),

    /// Carries the extractor's rejection text for logging.
    #[error("Request body is too large")]
    PayloadTooLarge(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

pub type ItemResult<T> = Result<T, ItemError>;

impl From<ItemError> for AppError {
    fn from(err: ItemError) -> Self {
        let message = err.to_string();
        match err {
            ItemError::NotFound(id) => {
                tracing::debug!(item_id = %id, "Item lookup missed");
                AppError::NotFound(message)
            }
            ItemError::Validation(_)
            | ItemError::UnsupportedFileType(_)
            | ItemError::InvalidForm(_) => AppError::BadRequest(message),
            ItemError::PayloadTooLarge(detail) => {
                tracing::debug!(%detail, "Request body rejected");
                AppError::PayloadTooLarge(message)
            }
            ItemError::Database(_) | ItemError::Storage(_) => {
                AppError::InternalServerError(message)
            }
        }
    }
}

impl IntoResponse for ItemError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<mongodb::error::Error> for ItemError {
    fn from(err: mongodb::error::Error) -> Self {
        ItemError::Database(err.to_string())
    }
}

impl From<std::io::Error> for ItemError {
    fn from(err: std::io::Error) -> Self {
        ItemError::Storage(err.to_string())
    }
}
