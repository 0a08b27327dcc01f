use async_trait::async_trait;
use uuid::Uuid;

use crate::error::ItemResult;
use crate::models::{CreateItem, Item, ItemFilter, UpdateItem};

/// Persistence for items
///
/// Implementations assign ids and timestamps; callers hand over
/// already-validated input.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// Insert a new item
    async fn create(&self, input: CreateItem) -> ItemResult<Item>;

    /// Items matching `filter`, newest first
    async fn list(&self, filter: ItemFilter) -> ItemResult<Vec<Item>>;

    /// Apply the present fields of `input` and refresh `updated_at`.
    /// Fails with `NotFound` when no item has this id.
    async fn update(&self, id: Uuid, input: UpdateItem) -> ItemResult<Item>;

    /// Remove an item; fails with `NotFound` when it does not exist
    async fn delete(&self, id: Uuid) -> ItemResult<()>;
}
