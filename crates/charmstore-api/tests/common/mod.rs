//! Shared helpers for charmstore-api integration tests.

// Each test binary uses a different subset of these helpers.
#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use tower::ServiceExt;

use charmstore_api::http::{create_router, AppState, RouterOptions};
use charmstore_storage::MemoryEntityStore;

/// Number of concurrent requests for the concurrency test.
pub const CONCURRENT_REQUEST_COUNT: usize = 50;

/// Largest response body read by the helpers.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Path of the shared fixture catalogue.
pub fn fixtures_path() -> String {
    format!("{}/../../fixtures/catalogue.json", env!("CARGO_MANIFEST_DIR"))
}

/// Store loaded from the fixture catalogue.
pub fn fixture_store() -> Arc<MemoryEntityStore> {
    Arc::new(MemoryEntityStore::from_fixtures(fixtures_path()).expect("fixtures load"))
}

/// Router over the fixture catalogue with the given options.
pub fn app_with(options: RouterOptions) -> axum::Router {
    create_router(AppState::with_store(fixture_store(), options))
}

/// Router over the fixture catalogue with default options.
pub fn app() -> axum::Router {
    app_with(RouterOptions::default())
}

/// Sends a GET and returns the status and decoded JSON body.
pub async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), MAX_BODY_BYTES)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}
