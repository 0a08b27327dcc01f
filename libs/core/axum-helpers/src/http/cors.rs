use axum::http::{HeaderValue, Method, header};
use std::time::Duration;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

/// Parse a comma-separated origin list, ignoring blank entries.
pub fn parse_allowed_origins(raw: &str) -> Result<Vec<HeaderValue>, String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .map_err(|e| format!("invalid origin '{origin}': {e}"))
        })
        .collect()
}

/// CORS layer for the public API.
///
/// With an empty origin list every origin is accepted, which is what a browser
/// front-end served from another host needs during development. A non-empty list
/// restricts requests to those origins.
pub fn cors_layer(allowed_origins: Vec<HeaderValue>) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .max_age(Duration::from_secs(3600));

    if allowed_origins.is_empty() {
        layer.allow_origin(Any).allow_headers(Any)
    } else {
        layer
            .allow_origin(AllowOrigin::list(allowed_origins))
            .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
    }
}
