//! Item Service - Business logic layer

use std::sync::Arc;
use tracing::{instrument, warn};
use uuid::Uuid;
use validator::Validate;

use crate::error::{ItemError, ItemResult, REQUIRED_FIELDS_MESSAGE};
use crate::models::{CreateItem, ImageUpload, Item, ItemFilter, ItemForm, UpdateItem};
use crate::repository::ItemRepository;
use crate::uploads::ImageStore;

/// Orchestrates image intake, validation and persistence.
///
/// Create and update run in two phases: an attached image is written to
/// the [`ImageStore`] first, then the text fields are checked and stored.
/// When the second phase fails the file stays behind and a warning names it.
pub struct ItemService<R: ItemRepository> {
    repository: Arc<R>,
    images: ImageStore,
}

impl<R: ItemRepository> ItemService<R> {
    pub fn new(repository: R, images: ImageStore) -> Self {
        Self {
            repository: Arc::new(repository),
            images,
        }
    }

    #[instrument(skip(self, form), fields(has_image = form.image.is_some()))]
    pub async fn create_item(&self, form: ItemForm) -> ItemResult<Item> {
        let image_url = self.store_image(form.image.as_ref()).await?;
        let input = CreateItem::from_fields(form.fields, image_url);

        if let Err(errors) = input.validate() {
            tracing::debug!(%errors, "Rejected incomplete item");
            warn_orphan(input.image_url.as_deref());
            return Err(ItemError::Validation(REQUIRED_FIELDS_MESSAGE.to_string()));
        }

        let image_url = input.image_url.clone();
        self.repository.create(input).await.inspect_err(|_| {
            warn_orphan(image_url.as_deref());
        })
    }

    #[instrument(skip(self))]
    pub async fn list_items(&self, filter: ItemFilter) -> ItemResult<Vec<Item>> {
        self.repository.list(filter).await
    }

    /// `id` is taken as received; anything that is not a UUID is reported
    /// as a missing item.
    #[instrument(skip(self, form), fields(has_image = form.image.is_some()))]
    pub async fn update_item(&self, id: &str, form: ItemForm) -> ItemResult<Item> {
        let image_url = self.store_image(form.image.as_ref()).await?;
        let input = UpdateItem::from_fields(form.fields, image_url);

        let result = match parse_id(id) {
            Ok(id) => self.repository.update(id, input.clone()).await,
            Err(e) => Err(e),
        };
        if result.is_err() {
            warn_orphan(input.image_url.as_deref());
        }
        result
    }

    #[instrument(skip(self))]
    pub async fn delete_item(&self, id: &str) -> ItemResult<()> {
        let id = parse_id(id)?;
        self.repository.delete(id).await
    }

    async fn store_image(&self, image: Option<&ImageUpload>) -> ItemResult<Option<String>> {
        match image {
            Some(upload) => self.images.save(upload).await.map(Some),
            None => Ok(None),
        }
    }
}

impl<R: ItemRepository> Clone for ItemService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            images: self.images.clone(),
        }
    }
}

fn parse_id(raw: &str) -> ItemResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| ItemError::NotFound(raw.to_string()))
}

fn warn_orphan(image_url: Option<&str>) {
    if let Some(image_url) = image_url {
        warn!(%image_url, "Stored image is not referenced by any item");
    }
}
