//! Tests for the HTTP surface
//!
//! Drives the router directly with tower's `oneshot`, verifying the
//! endpoint contracts and the error → status code mapping.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use filekv::{http, Config, Engine};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_app() -> (TempDir, Router) {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::builder().data_dir(temp_dir.path()).build();
    let app = http::router(Arc::new(Engine::new(config)));
    (temp_dir, app)
}

fn post_create(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/datastore/create")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_read(query: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(format!("/datastore/read{query}"))
        .body(Body::empty())
        .unwrap()
}

fn delete_key(query: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(format!("/datastore/delete{query}"))
        .body(Body::empty())
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

// =============================================================================
// Create
// =============================================================================

#[tokio::test]
async fn test_create_returns_success_envelope() {
    let (_temp, app) = setup_app();

    let response = app
        .oneshot(post_create(r#"{"b": {"b1": "1", "Time-To-Live": 50}}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body.get("status"), Some(&json!("success")));
    assert!(body.get("message").is_some());
}

#[tokio::test]
async fn test_create_rejects_malformed_json() {
    let (_temp, app) = setup_app();

    let response = app.oneshot(post_create("{ nope")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body.get("status"), Some(&json!("error")));
}

#[tokio::test]
async fn test_create_rejects_non_object_body() {
    let (_temp, app) = setup_app();

    let response = app.oneshot(post_create(r#"["a", "b"]"#)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_rejects_scalar_values() {
    let (_temp, app) = setup_app();

    let response = app.oneshot(post_create(r#"{"a": 42}"#)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body.get("status"), Some(&json!("error")));
}

#[tokio::test]
async fn test_create_duplicate_key_is_400() {
    let (_temp, app) = setup_app();

    let response = app
        .clone()
        .oneshot(post_create(r#"{"a": {"x": 1}}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(post_create(r#"{"a": {"x": 2}}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// =============================================================================
// Read
// =============================================================================

#[tokio::test]
async fn test_read_roundtrip_strips_created_at() {
    let (_temp, app) = setup_app();

    app.clone()
        .oneshot(post_create(
            r#"{"b": {"b1": "1", "b2": "2", "Time-To-Live": 50}}"#,
        ))
        .await
        .unwrap();

    let response = app.oneshot(get_read("?key=b")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body, json!({"b1": "1", "b2": "2", "Time-To-Live": 50}));
}

#[tokio::test]
async fn test_read_without_key_param_is_400() {
    let (_temp, app) = setup_app();

    let response = app.oneshot(get_read("")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body.get("status"), Some(&json!("error")));
}

#[tokio::test]
async fn test_read_unknown_key_is_404() {
    let (_temp, app) = setup_app();

    let response = app.oneshot(get_read("?key=ghost")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body.get("status"), Some(&json!("error")));
}

#[tokio::test]
async fn test_read_expired_key_is_404() {
    let (_temp, app) = setup_app();

    app.clone()
        .oneshot(post_create(r#"{"a": {"x": 1, "Time-To-Live": 0}}"#))
        .await
        .unwrap();

    let response = app.oneshot(get_read("?key=a")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_read_corrupt_store_is_500() {
    let (temp, app) = setup_app();

    let store_path = temp.path().join(&Config::default().store_file_name);
    std::fs::write(&store_path, b"not json at all").unwrap();

    let response = app.oneshot(get_read("?key=a")).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

// =============================================================================
// Delete
// =============================================================================

#[tokio::test]
async fn test_delete_then_read_is_404() {
    let (_temp, app) = setup_app();

    app.clone()
        .oneshot(post_create(r#"{"a": {"x": 1}}"#))
        .await
        .unwrap();

    let response = app.clone().oneshot(delete_key("?key=a")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body.get("status"), Some(&json!("success")));

    let response = app.oneshot(get_read("?key=a")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_without_key_param_is_400() {
    let (_temp, app) = setup_app();

    let response = app.oneshot(delete_key("")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_unknown_key_is_404() {
    let (_temp, app) = setup_app();

    let response = app.oneshot(delete_key("?key=ghost")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let (_temp, app) = setup_app();

    let request = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body.get("status"), Some(&json!("ok")));
}
