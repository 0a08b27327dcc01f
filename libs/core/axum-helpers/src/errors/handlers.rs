use axum::{http::StatusCode, response::Response};

use super::error_response;

/// Fallback for unmatched routes.
pub async fn not_found() -> Response {
    error_response(StatusCode::NOT_FOUND, "The requested resource was not found")
}
