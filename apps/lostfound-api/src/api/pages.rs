//! Landing page and stored images

use axum::Router;
use domain_items::uploads::UPLOADS_URL_PREFIX;
use std::path::Path;
use tower_http::services::{ServeDir, ServeFile};

/// `/` serves `index.html` from `static_dir`, `/static/*` the rest of that
/// directory and `/uploads/*` the stored item photos.
pub fn router(static_dir: &Path, upload_dir: &Path) -> Router {
    Router::new()
        .route_service("/", ServeFile::new(static_dir.join("index.html")))
        .nest_service("/static", ServeDir::new(static_dir))
        .nest_service(UPLOADS_URL_PREFIX, ServeDir::new(upload_dir))
}
