//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycle for each endpoint.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use mem_cache::{api::create_router, cache::CacheStore, AppState};
use serde_json::{json, Value};
use std::time::Duration;
use tower::ServiceExt;

// == Helper Functions ==

fn create_test_app(max_bytes: u64) -> Router {
    create_router(AppState::new(CacheStore::with_max_memory(max_bytes)))
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    (status, body_to_json(response.into_body()).await)
}

// == SET Endpoint Tests ==

#[tokio::test]
async fn test_set_endpoint_success() {
    let app = create_test_app(1024);

    let (status, json) = send(
        &app,
        json_request("PUT", "/set", json!({"key": "test_key", "value": "test_value"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(json["message"].as_str().unwrap().contains("test_key"));
    assert_eq!(json["size"], 10);
}

#[tokio::test]
async fn test_set_endpoint_empty_key() {
    let app = create_test_app(1024);

    let (status, json) = send(
        &app,
        json_request("PUT", "/set", json!({"key": "", "value": "v"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("empty"));
}

#[tokio::test]
async fn test_set_endpoint_over_budget() {
    let app = create_test_app(16);

    let (status, _) = send(
        &app,
        json_request("PUT", "/set", json!({"key": "a", "value": "0123456789"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, json) = send(
        &app,
        json_request("PUT", "/set", json!({"key": "b", "value": "0123456789"})),
    )
    .await;
    assert_eq!(status, StatusCode::INSUFFICIENT_STORAGE);
    assert!(json["error"].as_str().unwrap().contains("Memory limit"));

    let (status, _) = send(&app, empty_request("GET", "/get/b")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// == GET Endpoint Tests ==

#[tokio::test]
async fn test_set_then_get_nested_value() {
    let app = create_test_app(2048);
    let value = json!({"1": {"2": 3}, "list": [true, null, "x"]});

    let (status, _) = send(
        &app,
        json_request("PUT", "/set", json!({"key": "doc", "value": value.clone(), "ttl": 60})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, json) = send(&app, empty_request("GET", "/get/doc")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["key"], "doc");
    assert_eq!(json["value"], value);
    assert!(json["ttl_remaining_ms"].as_u64().unwrap() <= 60_000);
}

#[tokio::test]
async fn test_get_endpoint_expired_key() {
    let app = create_test_app(1024);

    let (status, _) = send(
        &app,
        json_request("PUT", "/set", json!({"key": "brief", "value": 1, "ttl": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    tokio::time::sleep(Duration::from_millis(1100)).await;

    let (status, _) = send(&app, empty_request("GET", "/get/brief")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_negative_ttl_never_expires() {
    let app = create_test_app(1024);

    send(
        &app,
        json_request("PUT", "/set", json!({"key": "k", "value": 1, "ttl": -10})),
    )
    .await;

    let (status, json) = send(&app, empty_request("GET", "/get/k")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(json.get("ttl_remaining_ms").is_none());
}

// == DELETE / EXISTS Endpoint Tests ==

#[tokio::test]
async fn test_delete_then_exists() {
    let app = create_test_app(1024);

    send(
        &app,
        json_request("PUT", "/set", json!({"key": "gone", "value": "soon"})),
    )
    .await;

    let (_, json) = send(&app, empty_request("GET", "/exists/gone")).await;
    assert_eq!(json["exists"], true);

    let (status, _) = send(&app, empty_request("DELETE", "/del/gone")).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, empty_request("DELETE", "/del/gone")).await;
    assert_eq!(status, StatusCode::OK);

    let (_, json) = send(&app, empty_request("GET", "/exists/gone")).await;
    assert_eq!(json["exists"], false);

    let (status, _) = send(&app, empty_request("GET", "/get/gone")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// == FLUSH / KEYS / MAX-MEMORY / STATS ==

#[tokio::test]
async fn test_flush_resets_keys_and_budget_usage() {
    let app = create_test_app(20);

    for key in ["a", "b"] {
        send(
            &app,
            json_request("PUT", "/set", json!({"key": key, "value": "0123456789"})),
        )
        .await;
    }

    let (_, json) = send(&app, empty_request("GET", "/keys")).await;
    assert_eq!(json["count"], 2);

    let (status, _) = send(&app, empty_request("POST", "/flush")).await;
    assert_eq!(status, StatusCode::OK);

    let (_, json) = send(&app, empty_request("GET", "/keys")).await;
    assert_eq!(json["count"], 0);

    let (status, _) = send(
        &app,
        json_request("PUT", "/set", json!({"key": "full", "value": "01234567890123456789"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_max_memory_endpoint() {
    let app = create_test_app(1024);

    let (status, json) = send(&app, json_request("PUT", "/max-memory", json!({"size": "2kb"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["max_memory"], "2KB");
    assert_eq!(json["max_memory_bytes"], 2048);

    let (_, json) = send(&app, json_request("PUT", "/max-memory", json!({"size": "bogus"}))).await;
    assert_eq!(json["max_memory"], "100MB");
    assert_eq!(json["max_memory_bytes"], 100 * 1024 * 1024);
}

#[tokio::test]
async fn test_stats_endpoint() {
    let app = create_test_app(1024);

    send(
        &app,
        json_request("PUT", "/set", json!({"key": "s", "value": "abc"})),
    )
    .await;
    send(&app, empty_request("GET", "/get/s")).await;
    send(&app, empty_request("GET", "/get/missing")).await;

    let (status, json) = send(&app, empty_request("GET", "/stats")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["hits"], 1);
    assert_eq!(json["misses"], 1);
    assert_eq!(json["total_entries"], 1);
    assert_eq!(json["used_bytes"], 3);
    assert_eq!(json["max_bytes"], 1024);
    assert_eq!(json["max_memory"], "1KB");
    assert_eq!(json["hit_rate"], 0.5);
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app(1024);

    let (status, json) = send(&app, empty_request("GET", "/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert!(json["timestamp"].is_string());
}

// == Live Server ==

#[tokio::test]
async fn test_live_server_round_trip() {
    let app = create_test_app(1024);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let client = reqwest::Client::new();
    let base = format!("http://{}", addr);

    let response = client
        .put(format!("{}/set", base))
        .json(&json!({"key": "live", "value": [1, 2, 3]}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);

    let body: Value = client
        .get(format!("{}/get/live", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["value"], json!([1, 2, 3]));

    server.abort();
}
