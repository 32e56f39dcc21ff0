#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tempfile::TempDir;
use tower::ServiceExt;

use melodia_api::config::{AssetBackend, ServerConfig};
use melodia_api::router::build_app_router;
use melodia_api::state::AppState;
use melodia_storage::{AssetStore, LocalAssetStore};

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default)
/// and a 30-second request timeout.
pub fn test_config(upload_dir: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        upload_dir: upload_dir.to_path_buf(),
        max_upload_bytes: 1024 * 1024,
        assets: AssetBackend::Local,
    }
}

/// Build the full application router using `store` for uploads.
///
/// Goes through the same `build_app_router` as `main.rs` so integration
/// tests exercise the production middleware stack.
pub fn build_test_app_with_store(
    pool: PgPool,
    upload_dir: &Path,
    store: Arc<dyn AssetStore>,
) -> Router {
    let config = test_config(upload_dir);
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        assets: store,
    };
    build_app_router(state, &config)
}

/// Router backed by a local asset store in a fresh temp directory. The
/// directory lives as long as the returned `TempDir`.
pub fn build_test_app_with_uploads(pool: PgPool) -> (Router, TempDir) {
    let uploads = TempDir::new().unwrap();
    let store = Arc::new(LocalAssetStore::new(uploads.path()));
    let app = build_test_app_with_store(pool, uploads.path(), store);
    (app, uploads)
}

/// Router for tests that send no files.
pub fn build_test_app(pool: PgPool) -> Router {
    let uploads = std::env::temp_dir().join("melodia-api-tests");
    let store = Arc::new(LocalAssetStore::new(&uploads));
    build_test_app_with_store(pool, &uploads, store)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_empty(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

async fn send_json(
    app: Router,
    method: Method,
    uri: &str,
    json: serde_json::Value,
) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&json).unwrap()))
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, json: serde_json::Value) -> Response<Body> {
    send_json(app, Method::POST, uri, json).await
}

pub async fn patch_json(app: Router, uri: &str, json: serde_json::Value) -> Response<Body> {
    send_json(app, Method::PATCH, uri, json).await
}

/// One part of a multipart body.
pub enum Part<'a> {
    Text(&'a str, &'a str),
    /// Field name, file name, bytes.
    File(&'a str, &'a str, &'a [u8]),
}

const BOUNDARY: &str = "melodia-test-boundary";

pub async fn send_multipart(
    app: Router,
    method: Method,
    uri: &str,
    parts: &[Part<'_>],
) -> Response<Body> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File(name, file_name, bytes) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
                         Content-Type: image/png\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();
    send(app, request).await
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response.into_body().collect().await.unwrap().to_bytes().to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Create an artist through the API and return its JSON.
pub async fn create_artist(pool: &PgPool, id: &str, name: &str) -> serde_json::Value {
    let app = build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/artists",
        serde_json::json!({"id": id, "name": name}),
    )
    .await;
    assert_eq!(response.status(), 201, "artist fixture creation failed");
    body_json(response).await
}

/// A valid release body; callers override fields as needed.
pub fn release_body(title: &str, release_date: &str) -> serde_json::Value {
    serde_json::json!({
        "title": title,
        "type": "ALBUM",
        "releaseDate": release_date,
        "coverUrl": "u",
        "songIds": ["s1"],
    })
}

/// Create a release through the API and return its JSON.
pub async fn create_release(
    pool: &PgPool,
    artist_id: &str,
    body: serde_json::Value,
) -> serde_json::Value {
    let app = build_test_app(pool.clone());
    let response = post_json(app, &format!("/api/v1/artists/{artist_id}/releases"), body).await;
    assert_eq!(response.status(), 201, "release fixture creation failed");
    body_json(response).await
}
