// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! HTTP server setup: router, state, CORS and static file serving

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::api::handlers::{health_handler, version_handler};
use crate::api::predict_age::predict_age_handler;
use crate::config::NodeConfig;
use crate::inference::AgeModelManager;
use crate::vision::image_utils::MAX_IMAGE_SIZE;

/// Headroom on top of the raw image limit for multipart framing
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Shared state handed to every request handler
#[derive(Clone)]
pub struct AppState {
    /// Loaded age pipeline models; `None` until startup completes (or if
    /// loading failed, in which case /v1/predict-age returns 503)
    pub age_model_manager: Arc<RwLock<Option<Arc<AgeModelManager>>>>,
    /// Directory served at the root path (demo upload page)
    pub static_dir: PathBuf,
    /// Upload size limit enforced on the image field and the request body
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(static_dir: PathBuf, max_upload_bytes: usize) -> Self {
        Self {
            age_model_manager: Arc::new(RwLock::new(None)),
            static_dir,
            max_upload_bytes,
        }
    }

    /// State with no models loaded and the default upload limit, for tests
    pub fn new_for_test() -> Self {
        Self::new(PathBuf::from("./static"), MAX_IMAGE_SIZE)
    }
}

/// Build the application router
pub fn create_app(state: AppState) -> Router {
    let static_service = ServeDir::new(&state.static_dir);

    Router::new()
        .route("/health", get(health_handler))
        .route("/version", get(version_handler))
        .route("/v1/predict-age", post(predict_age_handler))
        .fallback_service(static_service)
        .layer(DefaultBodyLimit::max(
            state.max_upload_bytes + MULTIPART_OVERHEAD,
        ))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until the process is stopped
pub async fn start_server(config: &NodeConfig, state: AppState) -> anyhow::Result<()> {
    let app = create_app(state);

    let addr: SocketAddr = format!("{}:{}", config.api_host, config.api_port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("API server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
