//! Items API routes
//!
//! Wires the items domain to MongoDB and the upload directory.

use axum::{Router, extract::DefaultBodyLimit};
use domain_items::{ImageStore, ItemService, MongoItemRepository, handlers};
use tracing::info;

use crate::state::AppState;

fn repository(state: &AppState) -> MongoItemRepository {
    MongoItemRepository::with_collection(&state.db, &state.config.items_collection)
}

pub fn router(state: &AppState) -> Router {
    let service = ItemService::new(
        repository(state),
        ImageStore::new(&state.config.uploads.dir),
    );

    handlers::router(service).layer(DefaultBodyLimit::max(state.config.uploads.max_bytes))
}

/// Create the upload directory and the collection indexes
pub async fn init_storage(state: &AppState) -> eyre::Result<()> {
    let images = ImageStore::new(&state.config.uploads.dir);
    images
        .ensure_dir()
        .await
        .map_err(|e| eyre::eyre!("Failed to create upload directory: {}", e))?;
    info!(dir = %images.dir().display(), "Upload directory ready");

    repository(state)
        .init_indexes()
        .await
        .map_err(|e| eyre::eyre!("Failed to create item indexes: {}", e))?;
    Ok(())
}
