//! Integration tests for the health endpoints and general HTTP behaviour.

mod common;

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use common::{body_json, get, post_json};
use dlife_core::types::DbId;
use dlife_search::{SearchError, SearchIndex};
use serde_json::{json, Value};
use tower::ServiceExt;

// ---------------------------------------------------------------------------
// Test: GET /health returns 200 with expected JSON fields
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_check_returns_ok_with_json() {
    let app = common::build_test_app();
    let response = get(&app, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn ready_reports_memory_storage() {
    let app = common::build_test_app();
    let response = get(&app, "/ready").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ready");
    assert_eq!(json["storage"], "memory");
}

// ---------------------------------------------------------------------------
// Test: Unknown route returns 404
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_route_returns_404() {
    let app = common::build_test_app();
    let response = get(&app, "/this-route-does-not-exist").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Test: x-request-id header is present in response
// ---------------------------------------------------------------------------

#[tokio::test]
async fn response_contains_x_request_id_header() {
    let app = common::build_test_app();
    let response = get(&app, "/health").await;

    let request_id = response.headers().get("x-request-id");
    assert!(
        request_id.is_some(),
        "Response must contain an x-request-id header"
    );

    // The value should be a valid UUID (36 chars with hyphens).
    let id_str = request_id.unwrap().to_str().unwrap();
    assert_eq!(id_str.len(), 36, "x-request-id should be a UUID string");
}

// ---------------------------------------------------------------------------
// Test: CORS preflight allows the configured origin
// ---------------------------------------------------------------------------

#[tokio::test]
async fn cors_preflight_returns_correct_headers() {
    let app = common::build_test_app();

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/rates")
        .header("Origin", "http://localhost:9000")
        .header("Access-Control-Request-Method", "POST")
        .header("Access-Control-Request-Headers", "content-type")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let allow_origin = response
        .headers()
        .get("access-control-allow-origin")
        .expect("Must have Access-Control-Allow-Origin header");
    assert_eq!(allow_origin, "http://localhost:9000");
}

#[tokio::test]
async fn cors_exposes_alert_headers() {
    let app = common::build_test_app();

    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/rates")
        .header("Origin", "http://localhost:9000")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let exposed = response
        .headers()
        .get("access-control-expose-headers")
        .expect("Must expose headers")
        .to_str()
        .unwrap()
        .to_string();
    assert!(exposed.contains("x-dlifeapp-alert"));
    assert!(exposed.contains("x-dlifeapp-params"));
}

// ---------------------------------------------------------------------------
// Test: an index outage fails the request after the row is stored
// ---------------------------------------------------------------------------

struct UnavailableIndex;

#[async_trait]
impl SearchIndex for UnavailableIndex {
    async fn index(&self, _index: &str, _id: DbId, _document: &Value) -> Result<(), SearchError> {
        Err(SearchError::Api {
            status: 503,
            body: "unavailable".into(),
        })
    }

    async fn remove(&self, _index: &str, _id: DbId) -> Result<(), SearchError> {
        Ok(())
    }

    async fn search(&self, _index: &str, _query: &str) -> Result<Vec<Value>, SearchError> {
        Ok(Vec::new())
    }
}

#[tokio::test]
async fn index_failure_returns_500_but_keeps_the_row() {
    let app = common::build_test_app_with_search(Arc::new(UnavailableIndex));

    let response = post_json(&app, "/api/rates", json!({"rate": 3})).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["code"], "INTERNAL_ERROR");

    let list = body_json(get(&app, "/api/rates").await).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
}
