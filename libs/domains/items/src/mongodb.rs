//! MongoDB implementation of ItemRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures_util::TryStreamExt;
use mongodb::{
    Collection, Database, IndexModel,
    bson::{self, Document, doc},
    options::{IndexOptions, ReturnDocument},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use uuid::Uuid;

use crate::error::{ItemError, ItemResult};
use crate::models::{self, CreateItem, Item, ItemFilter, UpdateItem};
use crate::repository::ItemRepository;

pub const DEFAULT_COLLECTION: &str = "items";

/// Stored shape of an [`Item`].
///
/// Ids are BSON UUIDs (binary subtype 4) and timestamps are BSON dates so
/// that sorting on `createdAt` is chronological.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ItemDocument {
    #[serde(rename = "_id")]
    id: bson::Uuid,
    #[serde(rename = "type")]
    item_type: String,
    desc: String,
    location: String,
    date: String,
    time: String,
    email: String,
    #[serde(default)]
    image_url: Option<String>,
    created_at: bson::DateTime,
    updated_at: bson::DateTime,
}

impl From<&Item> for ItemDocument {
    fn from(item: &Item) -> Self {
        Self {
            id: to_bson_uuid(item.id),
            item_type: item.item_type.clone(),
            desc: item.desc.clone(),
            location: item.location.clone(),
            date: item.date.clone(),
            time: item.time.clone(),
            email: item.email.clone(),
            image_url: item.image_url.clone(),
            created_at: to_bson_date(item.created_at),
            updated_at: to_bson_date(item.updated_at),
        }
    }
}

impl From<ItemDocument> for Item {
    fn from(doc: ItemDocument) -> Self {
        Self {
            id: Uuid::from_bytes(doc.id.bytes()),
            item_type: doc.item_type,
            desc: doc.desc,
            location: doc.location,
            date: doc.date,
            time: doc.time,
            email: doc.email,
            image_url: doc.image_url,
            created_at: from_bson_date(doc.created_at),
            updated_at: from_bson_date(doc.updated_at),
        }
    }
}

fn to_bson_uuid(id: Uuid) -> bson::Uuid {
    bson::Uuid::from_bytes(id.into_bytes())
}

fn to_bson_date(at: DateTime<Utc>) -> bson::DateTime {
    bson::DateTime::from_millis(at.timestamp_millis())
}

fn from_bson_date(at: bson::DateTime) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp_millis(at.timestamp_millis()).unwrap_or_default()
}

pub struct MongoItemRepository {
    collection: Collection<ItemDocument>,
}

impl MongoItemRepository {
    /// Repository over the `items` collection of `db`
    pub fn new(db: &Database) -> Self {
        Self::with_collection(db, DEFAULT_COLLECTION)
    }

    pub fn with_collection(db: &Database, collection_name: &str) -> Self {
        Self {
            collection: db.collection::<ItemDocument>(collection_name),
        }
    }

    /// Create the `createdAt` index used by the list query. Idempotent.
    #[instrument(skip(self), fields(collection = %self.collection.name()))]
    pub async fn init_indexes(&self) -> ItemResult<()> {
        let index = IndexModel::builder()
            .keys(doc! { "createdAt": -1 })
            .options(
                IndexOptions::builder()
                    .name("created_at_desc".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(index).await?;
        tracing::info!("Item indexes ensured");
        Ok(())
    }

    /// Case-insensitive literal substring over desc, location and type
    fn build_filter(filter: &ItemFilter) -> Document {
        let Some(query) = filter.query() else {
            return doc! {};
        };
        let pattern = regex::escape(query);

        doc! {
            "$or": [
                { "desc": { "$regex": pattern.as_str(), "$options": "i" } },
                { "location": { "$regex": pattern.as_str(), "$options": "i" } },
                { "type": { "$regex": pattern.as_str(), "$options": "i" } },
            ]
        }
    }

    /// `$set` document for the present fields plus `updatedAt`
    fn build_update(input: &UpdateItem, updated_at: DateTime<Utc>) -> Document {
        let mut set = Document::new();
        let fields = [
            ("type", &input.item_type),
            ("desc", &input.desc),
            ("location", &input.location),
            ("date", &input.date),
            ("time", &input.time),
            ("email", &input.email),
            ("imageUrl", &input.image_url),
        ];
        for (key, value) in fields {
            if let Some(value) = value {
                set.insert(key, value.as_str());
            }
        }
        set.insert("updatedAt", to_bson_date(updated_at));

        doc! { "$set": set }
    }
}

#[async_trait]
impl ItemRepository for MongoItemRepository {
    #[instrument(skip(self, input), fields(item_type = %input.item_type))]
    async fn create(&self, input: CreateItem) -> ItemResult<Item> {
        let item = Item::new(input);

        self.collection
            .insert_one(ItemDocument::from(&item))
            .await?;

        tracing::info!(item_id = %item.id, "Item created successfully");
        Ok(item)
    }

    #[instrument(skip(self))]
    async fn list(&self, filter: ItemFilter) -> ItemResult<Vec<Item>> {
        let cursor = self
            .collection
            .find(Self::build_filter(&filter))
            .sort(doc! { "createdAt": -1, "_id": -1 })
            .await?;
        let documents: Vec<ItemDocument> = cursor.try_collect().await?;

        Ok(documents.into_iter().map(Item::from).collect())
    }

    #[instrument(skip(self, input))]
    async fn update(&self, id: Uuid, input: UpdateItem) -> ItemResult<Item> {
        let filter = doc! { "_id": to_bson_uuid(id) };
        let update = Self::build_update(&input, models::now());

        let updated = self
            .collection
            .find_one_and_update(filter, update)
            .return_document(ReturnDocument::After)
            .await?
            .ok_or_else(|| ItemError::NotFound(id.to_string()))?;

        tracing::info!(item_id = %id, "Item updated successfully");
        Ok(updated.into())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> ItemResult<()> {
        let result = self
            .collection
            .delete_one(doc! { "_id": to_bson_uuid(id) })
            .await?;

        if result.deleted_count == 0 {
            return Err(ItemError::NotFound(id.to_string()));
        }

        tracing::info!(item_id = %id, "Item deleted successfully");
        Ok(())
    }
}
