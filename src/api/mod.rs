//! HTTP API server for the training GUI

pub mod health;
mod static_files;
pub mod training;
pub mod voice;

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::Result;
use crate::config::ServerConfig;
use crate::voice::Voice;

/// Shared state for API handlers
#[derive(Clone)]
pub struct ApiState {
    /// Root of the static GUI files
    pub static_dir: PathBuf,
    /// Voice used by the voice test endpoint
    pub voice: Arc<Voice>,
}

/// Errors returned by the training API
///
/// The GUI reads a flat `error` string, so bodies look like
/// `{"error": "...", "code": "..."}`.
#[derive(Debug)]
pub enum ApiError {
    InvalidJson,
    NotFound,
    BadRequest(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorResponse {
            error: String,
            code: &'static str,
        }

        let (status, code, error) = match self {
            Self::InvalidJson => (StatusCode::BAD_REQUEST, "invalid_json", "Invalid JSON".to_string()),
            Self::NotFound => (
                StatusCode::NOT_FOUND,
                "not_found",
                "API endpoint not found".to_string(),
            ),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
        };

        (status, Json(ErrorResponse { error, code })).into_response()
    }
}

impl From<crate::Error> for ApiError {
    fn from(err: crate::Error) -> Self {
        Self::BadRequest(err.to_string())
    }
}

/// Builder for the API server
pub struct ApiServerBuilder {
    port: u16,
    static_dir: PathBuf,
    voice: Option<Voice>,
}

impl Default for ApiServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ApiServerBuilder {
    #[must_use]
    pub fn new() -> Self {
        let server = ServerConfig::default();
        Self {
            port: server.port,
            static_dir: server.static_dir,
            voice: None,
        }
    }

    /// Take port and static dir from config
    #[must_use]
    pub fn server_config(mut self, config: &ServerConfig) -> Self {
        self.port = config.port;
        self.static_dir.clone_from(&config.static_dir);
        self
    }

    #[must_use]
    pub const fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    #[must_use]
    pub fn static_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.static_dir = dir.into();
        self
    }

    #[must_use]
    pub fn voice(mut self, voice: Voice) -> Self {
        self.voice = Some(voice);
        self
    }

    /// Build the API server
    #[must_use]
    pub fn build(self) -> ApiServer {
        let state = Arc::new(ApiState {
            static_dir: self.static_dir,
            voice: Arc::new(self.voice.unwrap_or_else(Voice::console)),
        });

        ApiServer {
            state,
            port: self.port,
        }
    }
}

/// Build the router with all routes
///
/// Exposed so tests can drive it without binding a socket.
pub fn router(state: Arc<ApiState>) -> Router {
    let api = Router::new()
        .merge(training::router(state.clone()))
        .nest("/voice", voice::router(state.clone()))
        .fallback(api_not_found);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api", api)
        .merge(health::router())
        .fallback_service(static_files::router(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

async fn api_not_found() -> ApiError {
    ApiError::NotFound
}

/// API server
pub struct ApiServer {
    state: Arc<ApiState>,
    port: u16,
}

impl ApiServer {
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }

    #[must_use]
    pub fn state(&self) -> Arc<ApiState> {
        self.state.clone()
    }

    /// Run the API server until `shutdown` resolves
    ///
    /// # Errors
    ///
    /// Returns error if server fails to bind or run
    pub async fn run(self, shutdown: impl Future<Output = ()> + Send + 'static) -> Result<()> {
        let addr = format!("0.0.0.0:{}", self.port);
        let listener = TcpListener::bind(&addr).await.map_err(|e| {
            let hint = if e.kind() == std::io::ErrorKind::AddrInUse {
                format!(
                    " (port {} is already in use, try PORT={})",
                    self.port,
                    self.port.saturating_add(1)
                )
            } else {
                String::new()
            };
            crate::Error::Config(format!("failed to bind API server: {e}{hint}"))
        })?;

        tracing::info!(
            port = self.port,
            static_dir = %self.state.static_dir.display(),
            voice = %self.state.voice.provider(),
            "training GUI server listening"
        );

        axum::serve(listener, router(self.state))
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| crate::Error::Config(format!("API server error: {e}")))?;

        tracing::info!("training GUI server stopped");
        Ok(())
    }

    /// Run the API server in a background task
    #[must_use]
    pub fn spawn(self) -> tokio::task::JoinHandle<Result<()>> {
        tokio::spawn(async move { self.run(std::future::pending()).await })
    }
}
