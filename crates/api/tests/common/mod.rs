#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use dlife_search::{MemoryIndex, SearchIndex};
use http_body_util::BodyExt;
use tower::ServiceExt;

use dlife_api::config::ServerConfig;
use dlife_api::router::build_app_router;
use dlife_api::state::AppState;

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:9000` as CORS origin (matching the dev default)
/// and a 30-second request timeout. No database or Elasticsearch URL, so the
/// in-memory backends are used.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:9000".to_string()],
        request_timeout_secs: 30,
        app_name: "dlifeApp".to_string(),
        database_url: None,
        database_max_connections: 5,
        elasticsearch_url: None,
    }
}

/// Full application router over fresh in-memory stores and index.
pub fn build_test_app() -> Router {
    build_test_app_with_search(Arc::new(MemoryIndex::new()))
}

/// Full application router over in-memory stores and the given index.
pub fn build_test_app_with_search(search: Arc<dyn SearchIndex>) -> Router {
    let config = test_config();
    let state = AppState::in_memory(Arc::new(config.clone()), search);
    build_app_router(state, &config)
}

async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

fn json_request(method: Method, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn post_json(app: &Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, json_request(Method::POST, uri, body)).await
}

pub async fn put_json(app: &Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, json_request(Method::PUT, uri, body)).await
}

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn delete(app: &Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Value of a response header as a string.
pub fn header(response: &Response<Body>, name: &str) -> String {
    response
        .headers()
        .get(name)
        .unwrap_or_else(|| panic!("missing header {name}"))
        .to_str()
        .unwrap()
        .to_string()
}
