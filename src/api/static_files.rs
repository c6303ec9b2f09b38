//! Static GUI files

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    extract::{Request, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use tower::ServiceExt;
use tower_http::services::ServeFile;

use super::ApiState;

/// Page served for `/`
pub const INDEX_FILE: &str = "training-gui.html";

/// Fallback router serving files from the static dir
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new().fallback(serve).with_state(state)
}

async fn serve(State(state): State<Arc<ApiState>>, request: Request) -> Response {
    let path = request.uri().path().to_owned();

    let Some(relative) = resolve(&path) else {
        tracing::warn!(path = %path, "rejected path traversal");
        return (StatusCode::FORBIDDEN, Html("<h1>403 Forbidden</h1>")).into_response();
    };

    let Some(file) = find_file(&state.static_dir.join(relative)).await else {
        tracing::debug!(path = %path, "static file not found");
        return not_found();
    };

    match ServeFile::new(file).oneshot(request).await {
        Ok(response) => response.map(Body::new),
        Err(never) => match never {},
    }
}

/// Map a request path to a path under the static dir, or `None` if it escapes
fn resolve(path: &str) -> Option<PathBuf> {
    let trimmed = path.trim_start_matches('/');
    if trimmed.is_empty() {
        return Some(PathBuf::from(INDEX_FILE));
    }

    let mut out = PathBuf::new();
    for component in Path::new(trimmed).components() {
        match component {
            Component::Normal(part) => out.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(out)
}

/// The file itself, or with `.html` appended when it has no extension
async fn find_file(candidate: &Path) -> Option<PathBuf> {
    if is_file(candidate).await {
        return Some(candidate.to_path_buf());
    }
    if candidate.extension().is_some() {
        return None;
    }

    let with_html = candidate.with_extension("html");
    is_file(&with_html).await.then_some(with_html)
}

async fn is_file(path: &Path) -> bool {
    tokio::fs::metadata(path).await.is_ok_and(|m| m.is_file())
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Html("<h1>404 Not Found</h1>")).into_response()
}
