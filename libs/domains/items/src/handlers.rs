use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
};
use axum_helpers::errors::responses::{
    BadRequestResponse, InternalServerErrorResponse, NotFoundResponse, PayloadTooLargeResponse,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;
use utoipa::{OpenApi, ToSchema};

use crate::error::{ItemError, ItemResult};
use crate::form::ItemPayload;
use crate::models::{DeleteResponse, Item, ItemFields, ItemFilter};
use crate::repository::ItemRepository;
use crate::service::ItemService;

/// OpenAPI documentation for the items API
#[derive(OpenApi)]
#[openapi(
    paths(list_items, create_item, update_item, delete_item),
    components(
        schemas(Item, ItemFields, ItemUploadForm, ItemFilter, DeleteResponse),
        responses(
            BadRequestResponse,
            NotFoundResponse,
            PayloadTooLargeResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Items", description = "Lost and found reports")
    )
)]
pub struct ApiDoc;

/// Multipart body accepted by create and update
#[derive(Deserialize, ToSchema)]
#[allow(dead_code)]
struct ItemUploadForm {
    #[serde(rename = "type")]
    item_type: Option<String>,
    desc: Option<String>,
    location: Option<String>,
    date: Option<String>,
    time: Option<String>,
    email: Option<String>,
    /// Photo file; jpg, jpeg, png, gif, bmp or webp
    #[schema(value_type = Option<String>)]
    image: Option<Vec<u8>>,
}

pub fn router<R: ItemRepository + 'static>(service: ItemService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_items).post(create_item))
        .route("/{id}", put(update_item).delete(delete_item))
        .with_state(shared_service)
}

/// List items, newest first, optionally filtered by `q`
#[utoipa::path(
    get,
    path = "",
    tag = "Items",
    params(ItemFilter),
    responses(
        (status = 200, description = "Matching items, newest first", body = Vec<Item>),
        (status = 400, response = BadRequestResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_items<R: ItemRepository>(
    State(service): State<Arc<ItemService<R>>>,
    query: Result<Query<ItemFilter>, QueryRejection>,
) -> ItemResult<Json<Vec<Item>>> {
    let Query(filter) = query.map_err(|e| ItemError::InvalidForm(e.body_text()))?;
    let query = filter.q.clone().unwrap_or_default();
    let items = service.list_items(filter).await?;
    info!(%query, count = items.len(), "Listed items");
    Ok(Json(items))
}

/// Report a lost or found item
#[utoipa::path(
    post,
    path = "",
    tag = "Items",
    request_body(content = ItemUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Item created", body = Item),
        (status = 400, response = BadRequestResponse),
        (status = 413, response = PayloadTooLargeResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_item<R: ItemRepository>(
    State(service): State<Arc<ItemService<R>>>,
    ItemPayload(form): ItemPayload,
) -> ItemResult<impl IntoResponse> {
    info!(
        fields = ?form.fields,
        image = form.image.as_ref().map(|i| i.file_name.as_str()),
        "Create item request"
    );
    let item = service.create_item(form).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// Change some fields of an item, or attach a new photo
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Items",
    params(
        ("id" = String, Path, description = "Item ID")
    ),
    request_body(content = ItemUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Updated item", body = Item),
        (status = 400, response = BadRequestResponse),
        (status = 404, response = NotFoundResponse),
        (status = 413, response = PayloadTooLargeResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_item<R: ItemRepository>(
    State(service): State<Arc<ItemService<R>>>,
    Path(id): Path<String>,
    ItemPayload(form): ItemPayload,
) -> ItemResult<Json<Item>> {
    info!(
        %id,
        fields = ?form.fields,
        image = form.image.as_ref().map(|i| i.file_name.as_str()),
        "Update item request"
    );
    let item = service.update_item(&id, form).await?;
    Ok(Json(item))
}

/// Delete an item; its photo stays on disk
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Items",
    params(
        ("id" = String, Path, description = "Item ID")
    ),
    responses(
        (status = 200, description = "Item deleted", body = DeleteResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_item<R: ItemRepository>(
    State(service): State<Arc<ItemService<R>>>,
    Path(id): Path<String>,
) -> ItemResult<Json<DeleteResponse>> {
    service.delete_item(&id).await?;
    Ok(Json(DeleteResponse { success: true }))
}
