//! Shared test utilities
#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use axum::{Router, body::Body, http::Response};
use cadence::api::{self, ApiState};
use cadence::voice::Voice;
use tempfile::TempDir;

/// Set up a static dir with a GUI page, an extensionless page and a stylesheet
#[must_use]
pub fn setup_static_dir() -> TempDir {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    std::fs::write(
        dir.path().join("training-gui.html"),
        "<html><body>training</body></html>",
    )
    .expect("failed to write index");
    std::fs::write(dir.path().join("about.html"), "<h1>about</h1>").expect("failed to write page");
    std::fs::create_dir(dir.path().join("css")).expect("failed to create css dir");
    std::fs::write(dir.path().join("css/app.css"), "body { margin: 0; }")
        .expect("failed to write stylesheet");
    dir
}

/// Build a test API router serving `static_dir` with a console voice
pub fn build_test_router(static_dir: &Path) -> Router {
    let state = Arc::new(ApiState {
        static_dir: static_dir.to_path_buf(),
        voice: Arc::new(Voice::console()),
    });
    api::router(state)
}

/// Read a response body as JSON
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read body");
    serde_json::from_slice(&body).expect("body is not JSON")
}

/// Read a response body as text
pub async fn body_text(response: Response<Body>) -> String {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read body");
    String::from_utf8(body.to_vec()).expect("body is not UTF-8")
}
