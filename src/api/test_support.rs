//! Shared fixtures for route tests.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tempfile::TempDir;
use tower::util::ServiceExt;

use crate::api::state::AppState;
use crate::storage::{EntityType, JsonlStore, StorageConfig};

/// Fresh temp-dir-backed state for one test.
pub fn setup_state() -> (TempDir, AppState) {
    let tmp = TempDir::new().unwrap();
    let state = AppState::new(StorageConfig::new(tmp.path().to_path_buf()));
    (tmp, state)
}

/// Write entities into the store under the given data dir.
pub fn write_entities<T: serde::Serialize>(data_dir: &std::path::Path, entity: EntityType, items: &[T]) {
    let config = StorageConfig::new(data_dir.to_path_buf());
    JsonlStore::for_entity(&config, entity)
        .write_all(items)
        .unwrap();
}

/// GET a URI and parse the JSON body.
pub async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, Value) {
    let resp = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

/// Send a JSON body with the given method and parse the response.
pub async fn send_json(
    app: axum::Router,
    method: &str,
    uri: &str,
    body: &Value,
) -> (StatusCode, Value) {
    let resp = app
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(body).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}
