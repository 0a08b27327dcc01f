//! Shared fixtures for handler tests: an in-memory repository and
//! multipart body builders.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::Request;
use domain_items::*;
use http_body_util::BodyExt;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use uuid::Uuid;

/// Keeps items in memory with the same ordering and search rules as MongoDB
#[derive(Default, Clone)]
pub struct InMemoryItemRepository {
    items: Arc<Mutex<Vec<Item>>>,
}

impl InMemoryItemRepository {
    pub fn len(&self) -> usize {
        self.items.lock().unwrap().len()
    }
}

#[async_trait]
impl ItemRepository for InMemoryItemRepository {
    async fn create(&self, input: CreateItem) -> ItemResult<Item> {
        let item = Item::new(input);
        self.items.lock().unwrap().push(item.clone());
        Ok(item)
    }

    async fn list(&self, filter: ItemFilter) -> ItemResult<Vec<Item>> {
        let mut items: Vec<Item> = self
            .items
            .lock()
            .unwrap()
            .iter()
            .filter(|item| filter.matches(item))
            .cloned()
            .collect();
        items.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(items)
    }

    async fn update(&self, id: Uuid, input: UpdateItem) -> ItemResult<Item> {
        let mut items = self.items.lock().unwrap();
        let item = items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or_else(|| ItemError::NotFound(id.to_string()))?;
        item.apply_update(input);
        Ok(item.clone())
    }

    async fn delete(&self, id: Uuid) -> ItemResult<()> {
        let mut items = self.items.lock().unwrap();
        let before = items.len();
        items.retain(|item| item.id != id);
        if items.len() == before {
            return Err(ItemError::NotFound(id.to_string()));
        }
        Ok(())
    }
}

/// Repository whose every call fails like an unreachable database
pub struct UnavailableRepository;

#[async_trait]
impl ItemRepository for UnavailableRepository {
    async fn create(&self, _: CreateItem) -> ItemResult<Item> {
        Err(ItemError::Database("server selection timeout".into()))
    }

    async fn list(&self, _: ItemFilter) -> ItemResult<Vec<Item>> {
        Err(ItemError::Database("server selection timeout".into()))
    }

    async fn update(&self, _: Uuid, _: UpdateItem) -> ItemResult<Item> {
        Err(ItemError::Database("server selection timeout".into()))
    }

    async fn delete(&self, _: Uuid) -> ItemResult<()> {
        Err(ItemError::Database("server selection timeout".into()))
    }
}

pub struct TestApp {
    pub router: Router,
    pub repository: InMemoryItemRepository,
    pub uploads: TempDir,
}

impl TestApp {
    pub fn new() -> Self {
        let repository = InMemoryItemRepository::default();
        let uploads = tempfile::tempdir().unwrap();
        let service = ItemService::new(repository.clone(), ImageStore::new(uploads.path()));
        Self {
            router: handlers::router(service),
            repository,
            uploads,
        }
    }

    pub fn uploaded_files(&self) -> Vec<String> {
        std::fs::read_dir(self.uploads.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect()
    }
}

pub const BOUNDARY: &str = "lostfound-test-boundary";

/// Builds a `multipart/form-data` body by hand
#[derive(Default)]
pub struct MultipartBody {
    body: Vec<u8>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, file_name: &str, content: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(content);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub fn request(mut self, method: &str, uri: &str) -> Request<Body> {
        self.body
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        Request::builder()
            .method(method)
            .uri(uri)
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(self.body))
            .unwrap()
    }
}

/// The six text fields of a complete report
pub fn report(
    item_type: &str,
    desc: &str,
    location: &str,
) -> MultipartBody {
    MultipartBody::new()
        .text("type", item_type)
        .text("desc", desc)
        .text("location", location)
        .text("date", "2024-03-01")
        .text("time", "14:30")
        .text("email", "a@b.com")
}

pub async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}
