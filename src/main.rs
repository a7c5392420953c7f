// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use fabstir_age_node::{
    api::{start_server, AppState},
    config::NodeConfig,
    inference::{AgeModelConfig, AgeModelManager},
    version,
};
use std::env;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    tracing::info!("Starting {}", version::get_version_string());

    let config = NodeConfig::from_env();
    tracing::info!(
        "Config: api={}:{}, models_dir={}, static_dir={}",
        config.api_host,
        config.api_port,
        config.models_dir.display(),
        config.static_dir.display()
    );

    let state = AppState::new(config.static_dir.clone(), config.max_upload_bytes);

    // Load the three pipeline models before accepting traffic. A failed load
    // leaves the server up in degraded mode so /health can report the issue.
    let model_config = AgeModelConfig::new(&config.models_dir);
    match AgeModelManager::new(model_config).await {
        Ok(manager) => {
            *state.age_model_manager.write().await = Some(Arc::new(manager));
            tracing::info!("Age pipeline ready");
        }
        Err(e) => {
            tracing::error!("Failed to load age pipeline models: {:#}", e);
            tracing::error!("Run the download-models binary or set MODELS_DIR");
        }
    }

    start_server(&config, state).await
}
