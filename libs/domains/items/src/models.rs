use axum::body::Bytes;
use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::error::{ItemError, ItemResult};

/// A lost or found report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Server-assigned identifier
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    /// Free-form category, e.g. "lost" or "found"
    #[serde(rename = "type")]
    pub item_type: String,
    /// What the item is
    pub desc: String,
    /// Where it was lost or found
    pub location: String,
    /// Date as entered by the reporter (not parsed)
    pub date: String,
    /// Time as entered by the reporter (not parsed)
    pub time: String,
    /// Reporter contact address
    pub email: String,
    /// `/uploads/<name>` when a photo was attached, otherwise null
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The six text fields a client may submit, each optional.
///
/// Used as the JSON and urlencoded request body; multipart parts are
/// assigned through [`ItemFields::set`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct ItemFields {
    #[serde(rename = "type")]
    pub item_type: Option<String>,
    pub desc: Option<String>,
    pub location: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub email: Option<String>,
}

impl ItemFields {
    /// Assign a named form part; unknown names are rejected.
    pub fn set(&mut self, name: &str, value: String) -> ItemResult<()> {
        let slot = match name {
            "type" => &mut self.item_type,
            "desc" => &mut self.desc,
            "location" => &mut self.location,
            "date" => &mut self.date,
            "time" => &mut self.time,
            "email" => &mut self.email,
            other => {
                return Err(ItemError::InvalidForm(format!("unexpected field '{other}'")));
            }
        };
        *slot = Some(value);
        Ok(())
    }
}

/// Image file received with a create or update request
#[derive(Debug, Clone)]
pub struct ImageUpload {
    /// File name as supplied by the client
    pub file_name: String,
    pub bytes: Bytes,
}

impl ImageUpload {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }
}

/// A parsed create/update request: text fields plus an optional image
#[derive(Debug, Clone, Default)]
pub struct ItemForm {
    pub fields: ItemFields,
    pub image: Option<ImageUpload>,
}

/// Input for a new item; every text field must be non-empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Validate)]
pub struct CreateItem {
    #[validate(length(min = 1))]
    pub item_type: String,
    #[validate(length(min = 1))]
    pub desc: String,
    #[validate(length(min = 1))]
    pub location: String,
    #[validate(length(min = 1))]
    pub date: String,
    #[validate(length(min = 1))]
    pub time: String,
    #[validate(length(min = 1))]
    pub email: String,
    pub image_url: Option<String>,
}

impl CreateItem {
    /// Absent fields become empty strings and fail validation.
    pub fn from_fields(fields: ItemFields, image_url: Option<String>) -> Self {
        Self {
            item_type: fields.item_type.unwrap_or_default(),
            desc: fields.desc.unwrap_or_default(),
            location: fields.location.unwrap_or_default(),
            date: fields.date.unwrap_or_default(),
            time: fields.time.unwrap_or_default(),
            email: fields.email.unwrap_or_default(),
            image_url,
        }
    }
}

/// Partial update; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateItem {
    pub item_type: Option<String>,
    pub desc: Option<String>,
    pub location: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub email: Option<String>,
    pub image_url: Option<String>,
}

impl UpdateItem {
    pub fn from_fields(fields: ItemFields, image_url: Option<String>) -> Self {
        Self {
            item_type: fields.item_type,
            desc: fields.desc,
            location: fields.location,
            date: fields.date,
            time: fields.time,
            email: fields.email,
            image_url,
        }
    }
}

/// Query parameters for listing items
#[derive(Debug, Clone, Default, Deserialize, ToSchema, IntoParams)]
pub struct ItemFilter {
    /// Case-insensitive substring matched against desc, location and type
    pub q: Option<String>,
}

impl ItemFilter {
    pub fn search(q: impl Into<String>) -> Self {
        Self { q: Some(q.into()) }
    }

    /// The search text, if any; an empty `q` lists everything.
    pub fn query(&self) -> Option<&str> {
        self.q.as_deref().filter(|q| !q.is_empty())
    }

    /// Whether `item` satisfies this filter
    pub fn matches(&self, item: &Item) -> bool {
        let Some(query) = self.query() else {
            return true;
        };
        let needle = query.to_lowercase();
        [&item.desc, &item.location, &item.item_type]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}

/// Body returned by a successful delete
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeleteResponse {
    pub success: bool,
}

/// Current time at the millisecond precision the store keeps
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

impl Item {
    pub fn new(input: CreateItem) -> Self {
        let now = now();
        Self {
            id: Uuid::now_v7(),
            item_type: input.item_type,
            desc: input.desc,
            location: input.location,
            date: input.date,
            time: input.time,
            email: input.email,
            image_url: input.image_url,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply_update(&mut self, update: UpdateItem) {
        let UpdateItem {
            item_type,
            desc,
            location,
            date,
            time,
            email,
            image_url,
        } = update;

        if let Some(item_type) = item_type {
            self.item_type = item_type;
        }
        if let Some(desc) = desc {
            self.desc = desc;
        }
        if let Some(location) = location {
            self.location = location;
        }
        if let Some(date) = date {
            self.date = date;
        }
        if let Some(time) = time {
            self.time = time;
        }
        if let Some(email) = email {
            self.email = email;
        }
        if image_url.is_some() {
            self.image_url = image_url;
        }
        self.updated_at = now().max(self.created_at);
    }
}
