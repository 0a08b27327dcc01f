//! # Axum Helpers
//!
//! Shared plumbing for the HTTP services in this workspace.
//!
//! - **[`server`]**: router assembly, health endpoints, graceful shutdown
//! - **[`http`]**: CORS and security-header middleware
//! - **[`errors`]**: [`AppError`] and the `{"error": ...}` response body

pub mod errors;
pub mod http;
pub mod server;

pub use server::{
    HealthResponse, ReadyResponse, ShutdownCoordinator, create_production_app, create_router,
    health_router, ready_response, shutdown_signal,
};

pub use http::{cors_layer, parse_allowed_origins, security_headers};

pub use errors::{AppError, ErrorResponse, error_response};
