// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Health and version handlers

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::http_server::AppState;
use crate::inference::ModelInfo;
use crate::version;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub models: Vec<ModelInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issues: Option<Vec<String>>,
}

/// GET /health - Service health and per-model availability
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let manager_guard = state.age_model_manager.read().await;

    let response = match manager_guard.as_ref() {
        Some(manager) => HealthResponse {
            status: "healthy".to_string(),
            version: version::VERSION_NUMBER.to_string(),
            models: manager.model_info(),
            issues: None,
        },
        None => HealthResponse {
            status: "degraded".to_string(),
            version: version::VERSION_NUMBER.to_string(),
            models: vec![],
            issues: Some(vec!["age pipeline models not loaded".to_string()]),
        },
    };

    Json(response)
}

/// GET /version - Build and feature information
pub async fn version_handler() -> Json<serde_json::Value> {
    Json(version::get_version_info())
}
