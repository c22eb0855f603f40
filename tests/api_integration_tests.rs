//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycle for each endpoint.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use popcache::{
    api::create_router,
    cache::{CacheHandle, CacheOptions, Ttl},
    AppState,
};
use serde_json::Value;
use std::time::Duration;
use tower::ServiceExt;

// == Helper Functions ==

fn test_options(max_key_count: usize) -> CacheOptions {
    CacheOptions::new(
        Duration::from_secs(60),
        Duration::from_secs(60),
        Ttl::Never,
        max_key_count,
    )
    .unwrap()
}

fn create_test_app() -> Router {
    create_router(AppState::new(CacheHandle::start(test_options(100))))
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn put_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("PUT")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

// == SET Endpoint Tests ==

#[tokio::test]
async fn test_set_endpoint_success() {
    let app = create_test_app();

    let response = app
        .oneshot(put_json("/set", r#"{"key":"test_key","value":"test_value"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["key"].as_str().unwrap(), "test_key");
    assert!(json["message"].as_str().unwrap().contains("test_key"));
}

#[tokio::test]
async fn test_set_endpoint_with_ttl() {
    let app = create_test_app();

    let response = app
        .clone()
        .oneshot(put_json(
            "/set",
            r#"{"key":"ttl_key","value":"ttl_value","ttl":60}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(put_json(
            "/set",
            r#"{"key":"forever","value":"v","ttl":"never"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_set_negative_ttl_rejected() {
    let app = create_test_app();

    let response = app
        .oneshot(put_json("/set", r#"{"key":"k","value":"v","ttl":-5}"#))
        .await
        .unwrap();

    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn test_set_null_value_deletes_key() {
    let app = create_test_app();

    app.clone()
        .oneshot(put_json("/set", r#"{"key":"doomed","value":"here"}"#))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(put_json("/set", r#"{"key":"doomed","value":null}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get("/get/doomed")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// == GET Endpoint Tests ==

#[tokio::test]
async fn test_get_endpoint_success() {
    let app = create_test_app();

    let set_response = app
        .clone()
        .oneshot(put_json("/set", r#"{"key":"get_key","value":"get_value"}"#))
        .await
        .unwrap();
    assert_eq!(set_response.status(), StatusCode::OK);

    let get_response = app.oneshot(get("/get/get_key")).await.unwrap();

    assert_eq!(get_response.status(), StatusCode::OK);
    let json = body_to_json(get_response.into_body()).await;
    assert_eq!(json["value"].as_str().unwrap(), "get_value");
}

#[tokio::test]
async fn test_get_endpoint_not_found() {
    let app = create_test_app();

    let response = app.oneshot(get("/get/nonexistent_key")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_to_json(response.into_body()).await;
    assert!(json["error"].as_str().unwrap().contains("nonexistent_key"));
}

// == DELETE Endpoint Tests ==

#[tokio::test]
async fn test_delete_endpoint_is_idempotent() {
    let app = create_test_app();

    app.clone()
        .oneshot(put_json("/set", r#"{"key":"delete_key","value":"v"}"#))
        .await
        .unwrap();

    let delete = || {
        Request::builder()
            .method("DELETE")
            .uri("/del/delete_key")
            .body(Body::empty())
            .unwrap()
    };

    let first = app.clone().oneshot(delete()).await.unwrap();
    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(body_to_json(first.into_body()).await["deleted"], true);

    let second = app.clone().oneshot(delete()).await.unwrap();
    assert_eq!(second.status(), StatusCode::OK);
    assert_eq!(body_to_json(second.into_body()).await["deleted"], false);

    let get_response = app.oneshot(get("/get/delete_key")).await.unwrap();
    assert_eq!(get_response.status(), StatusCode::NOT_FOUND);
}

// == KEYS Endpoint Tests ==

#[tokio::test]
async fn test_keys_endpoint_with_filter() {
    let app = create_test_app();

    for key in ["user:1", "user:2", "session:1"] {
        let body = format!(r#"{{"key":"{}","value":"v"}}"#, key);
        app.clone().oneshot(put_json("/set", &body)).await.unwrap();
    }

    let response = app.clone().oneshot(get("/keys")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["keys"].as_array().unwrap().len(), 3);

    let response = app.oneshot(get("/keys?filter=user")).await.unwrap();
    let json = body_to_json(response.into_body()).await;
    let mut keys: Vec<&str> = json["keys"]
        .as_array()
        .unwrap()
        .iter()
        .map(|k| k.as_str().unwrap())
        .collect();
    keys.sort();
    assert_eq!(keys, vec!["user:1", "user:2"]);
}

// == OPTIONS Endpoint Tests ==

#[tokio::test]
async fn test_options_roundtrip() {
    let app = create_test_app();

    let response = app.clone().oneshot(get("/options")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["defaultTtl"], "never");
    assert_eq!(json["maxKeyCount"], 100);

    let response = app
        .clone()
        .oneshot(put_json("/options", r#"{"defaultTtl":30,"maxKeyCount":5}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["defaultTtl"].as_f64().unwrap(), 30.0);
    assert_eq!(json["maxKeyCount"], 5);

    // Partial update leaves the other field alone
    let response = app
        .oneshot(put_json("/options", r#"{"maxKeyCount":7}"#))
        .await
        .unwrap();
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["defaultTtl"].as_f64().unwrap(), 30.0);
    assert_eq!(json["maxKeyCount"], 7);
}

#[tokio::test]
async fn test_options_zero_capacity_rejected() {
    let app = create_test_app();

    let response = app
        .clone()
        .oneshot(put_json("/options", r#"{"maxKeyCount":0}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app.oneshot(get("/options")).await.unwrap();
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["maxKeyCount"], 100);
}

// == PACKET Endpoint Tests ==

#[tokio::test]
async fn test_packet_endpoint() {
    let app = create_test_app();

    let packet = r#"{
        "actions": [
            { "setValue": [{"key":"a","value":"1"}, {"key":"b","value":"2"}] },
            { "getValue": [{"key":"a"}, {"key":"missing"}], "getKeys": [{}] },
            { "deleteKey": [{"key":"b"}, {"key":"b"}] }
        ]
    }"#;

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/packet")
                .header("content-type", "application/json")
                .body(Body::from(packet))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    let results = json["results"].as_array().unwrap();
    assert_eq!(results.len(), 3);

    assert_eq!(results[1]["getValue"][0]["value"], "1");
    assert!(results[1]["getValue"][1]["value"].is_null());
    assert_eq!(results[1]["getKeys"][0]["keys"].as_array().unwrap().len(), 2);

    assert_eq!(results[2]["deleteKey"][0]["deleted"], true);
    assert_eq!(results[2]["deleteKey"][1]["deleted"], false);
}

// == Eviction via API Tests ==

#[tokio::test]
async fn test_full_cache_evicts_most_popular() {
    let app = create_router(AppState::new(CacheHandle::start(test_options(2))));

    app.clone()
        .oneshot(put_json("/set", r#"{"key":"hot","value":"1"}"#))
        .await
        .unwrap();
    app.clone()
        .oneshot(put_json("/set", r#"{"key":"cold","value":"2"}"#))
        .await
        .unwrap();
    app.clone().oneshot(get("/get/hot")).await.unwrap();

    app.clone()
        .oneshot(put_json("/set", r#"{"key":"new","value":"3"}"#))
        .await
        .unwrap();

    let response = app.clone().oneshot(get("/get/hot")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let response = app.clone().oneshot(get("/get/cold")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let response = app.oneshot(get("/get/new")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

// == STATS Endpoint Tests ==

#[tokio::test]
async fn test_stats_endpoint() {
    let app = create_test_app();

    app.clone()
        .oneshot(put_json("/set", r#"{"key":"stats_key","value":"stats_value"}"#))
        .await
        .unwrap();
    app.clone().oneshot(get("/get/stats_key")).await.unwrap();
    app.clone().oneshot(get("/get/nonexistent")).await.unwrap();

    let response = app.oneshot(get("/stats")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;

    assert_eq!(json["hits"].as_u64().unwrap(), 1);
    assert_eq!(json["misses"].as_u64().unwrap(), 1);
    assert_eq!(json["total_entries"].as_u64().unwrap(), 1);
    assert!(json.get("hit_rate").is_some());
}

// == HEALTH Endpoint Tests ==

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app();

    let response = app.oneshot(get("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"].as_str().unwrap(), "healthy");
    assert!(json.get("timestamp").is_some());
}

// == Error Response Tests ==

#[tokio::test]
async fn test_invalid_json_request() {
    let app = create_test_app();

    let response = app
        .oneshot(put_json("/set", r#"{"invalid json"#))
        .await
        .unwrap();

    // Axum returns 422 for JSON parsing errors by default
    assert!(
        response.status() == StatusCode::BAD_REQUEST
            || response.status() == StatusCode::UNPROCESSABLE_ENTITY
    );
}

#[tokio::test]
async fn test_empty_key_request() {
    let app = create_test_app();

    let response = app
        .oneshot(put_json("/set", r#"{"key":"","value":"test"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_to_json(response.into_body()).await;
    assert!(json.get("error").is_some());
}

#[tokio::test]
async fn test_disposed_cache_returns_unavailable() {
    let cache = CacheHandle::start(test_options(10));
    let app = create_router(AppState::new(cache.clone()));

    cache.dispose().await;

    let response = app.oneshot(get("/stats")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

// == TTL Expiration via API Tests ==

#[tokio::test]
async fn test_ttl_expiration_via_api() {
    let app = create_test_app();

    let set_response = app
        .clone()
        .oneshot(put_json(
            "/set",
            r#"{"key":"ttl_test","value":"expires_soon","ttl":0.2}"#,
        ))
        .await
        .unwrap();
    assert_eq!(set_response.status(), StatusCode::OK);

    let get_response = app.clone().oneshot(get("/get/ttl_test")).await.unwrap();
    assert_eq!(get_response.status(), StatusCode::OK);

    tokio::time::sleep(Duration::from_millis(300)).await;

    let get_response = app.oneshot(get("/get/ttl_test")).await.unwrap();
    assert_eq!(get_response.status(), StatusCode::NOT_FOUND);
}
