//! Handler tests for the items domain
//!
//! These drive the items router with `oneshot` against an in-memory
//! repository and a temporary upload directory: body parsing, status codes,
//! response shapes and the files left on disk.

mod common;

use axum::body::Body;
use axum::extract::DefaultBodyLimit;
use axum::http::{Request, StatusCode};
use common::*;
use domain_items::*;
use serde_json::{Value, json};
use tower::ServiceExt; // For oneshot()
use uuid::Uuid;

/// Creates through the router; pauses so creation times differ.
async fn create(app: &TestApp, body: MultipartBody) -> Item {
    tokio::time::sleep(std::time::Duration::from_millis(2)).await;
    let response = app
        .router
        .clone()
        .oneshot(body.request("POST", "/"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    json_body(response.into_body()).await
}

async fn list(app: &TestApp, uri: &str) -> Vec<Item> {
    let response = app.router.clone().oneshot(get(uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    json_body(response.into_body()).await
}

#[tokio::test]
async fn test_create_item_returns_201_with_submitted_fields() {
    let app = TestApp::new();

    let response = app
        .router
        .clone()
        .oneshot(report("lost", "Black leather wallet", "Library 2nd floor").request("POST", "/"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["type"], "lost");
    assert_eq!(body["desc"], "Black leather wallet");
    assert_eq!(body["location"], "Library 2nd floor");
    assert_eq!(body["date"], "2024-03-01");
    assert_eq!(body["time"], "14:30");
    assert_eq!(body["email"], "a@b.com");
    assert!(body["imageUrl"].is_null());
    assert!(body["_id"].is_string());
    assert_eq!(body["createdAt"], body["updatedAt"]);
}

#[tokio::test]
async fn test_create_item_missing_any_field_returns_400() {
    let fields = ["type", "desc", "location", "date", "time", "email"];

    for missing in fields {
        let app = TestApp::new();
        let mut body = MultipartBody::new();
        for field in fields.iter().filter(|f| **f != missing) {
            body = body.text(field, "value");
        }

        let response = app
            .router
            .clone()
            .oneshot(body.request("POST", "/"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "missing {missing}");
        let error: Value = json_body(response.into_body()).await;
        assert_eq!(error, json!({ "error": "All fields are required" }));
        assert_eq!(app.repository.len(), 0);
    }
}

#[tokio::test]
async fn test_create_item_empty_field_returns_400() {
    let app = TestApp::new();
    let body = report("found", "", "Gym");

    let response = app
        .router
        .clone()
        .oneshot(body.request("POST", "/"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(app.repository.len(), 0);
}

#[tokio::test]
async fn test_create_item_with_json_body() {
    let app = TestApp::new();
    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({
                "type": "found",
                "desc": "Keys",
                "location": "Parking lot",
                "date": "2024-04-04",
                "time": "09:00",
                "email": "finder@example.com"
            })
            .to_string(),
        ))
        .unwrap();

    let response = app.router.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let item: Item = json_body(response.into_body()).await;
    assert_eq!(item.location, "Parking lot");
}

#[tokio::test]
async fn test_create_item_unknown_field_returns_400() {
    let app = TestApp::new();
    let body = report("lost", "Phone", "Bus").text("reward", "100");

    let response = app
        .router
        .clone()
        .oneshot(body.request("POST", "/"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(app.repository.len(), 0);
}

#[tokio::test]
async fn test_create_item_with_image_stores_file() {
    let app = TestApp::new();
    let body = report("found", "Blue umbrella", "Cafeteria").file("image", "umbrella.JPG", b"\xff\xd8\xff");

    let item = create(&app, body).await;

    let image_url = item.image_url.expect("image reference");
    let stored = image_url.strip_prefix("/uploads/").unwrap();
    assert!(stored.starts_with("umbrella-"));
    assert!(stored.ends_with(".JPG"));
    assert_eq!(app.uploaded_files(), vec![stored.to_string()]);
}

#[tokio::test]
async fn test_non_image_upload_is_rejected_and_not_stored() {
    let app = TestApp::new();
    let body = report("lost", "Laptop", "Lab").file("image", "installer.exe", b"MZ");

    let response = app
        .router
        .clone()
        .oneshot(body.request("POST", "/"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(app.uploaded_files().is_empty());
    assert_eq!(app.repository.len(), 0);
}

#[tokio::test]
async fn test_empty_query_lists_all_newest_first() {
    let app = TestApp::new();
    let first = create(&app, report("lost", "Wallet", "Library")).await;
    let second = create(&app, report("found", "Keys", "Gym")).await;
    let third = create(&app, report("lost", "Scarf", "Bus stop")).await;

    let items = list(&app, "/").await;
    let ids: Vec<_> = items.iter().map(|item| item.id).collect();
    assert_eq!(ids, vec![third.id, second.id, first.id]);

    let items = list(&app, "/?q=").await;
    assert_eq!(items.len(), 3);
}

#[tokio::test]
async fn test_query_matches_location_case_insensitively() {
    let app = TestApp::new();
    let library = create(&app, report("lost", "Wallet", "Main Library")).await;
    create(&app, report("found", "Keys", "Gym")).await;

    let items = list(&app, "/?q=LIBRARY").await;

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, library.id);
}

#[tokio::test]
async fn test_query_is_literal_substring() {
    let app = TestApp::new();
    create(&app, report("lost", "Glasses (black)", "Hall")).await;
    create(&app, report("lost", "Glasses black", "Hall")).await;

    let items = list(&app, "/?q=%28black%29").await;

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].desc, "Glasses (black)");
}

#[tokio::test]
async fn test_delete_removes_item_then_returns_404() {
    let app = TestApp::new();
    let item = create(&app, report("lost", "Wallet", "Library")).await;
    let uri = format!("/{}", item.id);

    let response = app.router.clone().oneshot(delete(&uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body, json!({ "success": true }));

    assert!(list(&app, "/").await.is_empty());

    let response = app.router.clone().oneshot(delete(&uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body, json!({ "error": "Item not found" }));
}

#[tokio::test]
async fn test_malformed_id_returns_404() {
    let app = TestApp::new();

    let response = app
        .router
        .clone()
        .oneshot(delete("/not-a-valid-id"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .router
        .clone()
        .oneshot(MultipartBody::new().text("desc", "x").request("PUT", "/not-a-valid-id"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_without_image_preserves_image_url() {
    let app = TestApp::new();
    let item = create(
        &app,
        report("found", "Umbrella", "Cafeteria").file("image", "umbrella.png", b"png"),
    )
    .await;

    let response = app
        .router
        .clone()
        .oneshot(
            MultipartBody::new()
                .text("location", "Front desk")
                .request("PUT", &format!("/{}", item.id)),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let updated: Item = json_body(response.into_body()).await;
    assert_eq!(updated.location, "Front desk");
    assert_eq!(updated.desc, "Umbrella");
    assert_eq!(updated.image_url, item.image_url);
    assert_eq!(updated.created_at, item.created_at);
    assert!(updated.updated_at >= item.updated_at);
}

#[tokio::test]
async fn test_update_with_image_replaces_image_url() {
    let app = TestApp::new();
    let item = create(
        &app,
        report("found", "Umbrella", "Cafeteria").file("image", "old.png", b"old"),
    )
    .await;

    let response = app
        .router
        .clone()
        .oneshot(
            MultipartBody::new()
                .file("image", "new.webp", b"new")
                .request("PUT", &format!("/{}", item.id)),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let updated: Item = json_body(response.into_body()).await;
    let image_url = updated.image_url.expect("new image reference");
    assert!(image_url.starts_with("/uploads/new-"));
    assert_ne!(Some(image_url), item.image_url);
    assert_eq!(app.uploaded_files().len(), 2);
}

#[tokio::test]
async fn test_update_accepts_empty_values() {
    let app = TestApp::new();
    let item = create(&app, report("lost", "Wallet", "Library")).await;

    let response = app
        .router
        .clone()
        .oneshot(
            MultipartBody::new()
                .text("desc", "")
                .request("PUT", &format!("/{}", item.id)),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let updated: Item = json_body(response.into_body()).await;
    assert_eq!(updated.desc, "");
}

#[tokio::test]
async fn test_round_trip_preserves_strings_exactly() {
    let app = TestApp::new();
    let created = create(
        &app,
        MultipartBody::new()
            .text("type", "  Lost ")
            .text("desc", "Café  Ünïcode wallet")
            .text("location", "Room 3B")
            .text("date", "01/03/2024")
            .text("time", "2pm")
            .text("email", "Mixed.Case@Example.com"),
    )
    .await;

    let items = list(&app, "/?q=caf%C3%A9").await;

    assert_eq!(items.len(), 1);
    let found = &items[0];
    assert_eq!(found.item_type, "  Lost ");
    assert_eq!(found.desc, "Café  Ünïcode wallet");
    assert_eq!(found.date, "01/03/2024");
    assert_eq!(found.time, "2pm");
    assert_eq!(found.email, "Mixed.Case@Example.com");
    assert_eq!(found, &created);
}

#[tokio::test]
async fn test_database_failure_returns_500() {
    let dir = tempfile::tempdir().unwrap();
    let service = ItemService::new(UnavailableRepository, ImageStore::new(dir.path()));
    let app = handlers::router(service);

    let response = app.oneshot(get("/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = json_body(response.into_body()).await;
    assert!(body["error"].as_str().unwrap().contains("server selection timeout"));
}

#[tokio::test]
async fn test_invalid_query_returns_json_400() {
    let app = TestApp::new();

    let response = app.router.clone().oneshot(get("/?q=a&q=b")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "application/json"
    );
    let body: Value = json_body(response.into_body()).await;
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_oversized_upload_returns_413() {
    let app = TestApp::new();
    let router = app.router.clone().layer(DefaultBodyLimit::max(64));
    let body = report("lost", "Camera", "Museum").file("image", "camera.png", &[0u8; 4096]);

    let response = router.oneshot(body.request("POST", "/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body, json!({ "error": "Request body is too large" }));
    assert!(app.uploaded_files().is_empty());
    assert_eq!(app.repository.len(), 0);
}

#[tokio::test]
async fn test_update_with_non_image_returns_400() {
    let app = TestApp::new();
    let item = create(
        &app,
        report("found", "Umbrella", "Cafeteria").file("image", "umbrella.png", b"png"),
    )
    .await;
    let original_files = app.uploaded_files();

    let response = app
        .router
        .clone()
        .oneshot(
            MultipartBody::new()
                .text("desc", "Red umbrella")
                .file("image", "payload.exe", b"MZ")
                .request("PUT", &format!("/{}", item.id)),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(app.uploaded_files(), original_files);
    let items = list(&app, "/").await;
    assert_eq!(items, vec![item]);
}

#[tokio::test]
async fn test_update_unknown_id_returns_404() {
    let app = TestApp::new();
    create(&app, report("lost", "Wallet", "Library")).await;

    let response = app
        .router
        .clone()
        .oneshot(
            MultipartBody::new()
                .text("desc", "Brown wallet")
                .request("PUT", &format!("/{}", Uuid::now_v7())),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body, json!({ "error": "Item not found" }));
    assert_eq!(list(&app, "/").await[0].desc, "Wallet");
}
