// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Environment-based node configuration

use std::env;
use std::path::PathBuf;

use crate::vision::image_utils::MAX_IMAGE_SIZE;

/// Runtime configuration, read from environment variables (with `.env`
/// support via dotenv in main).
#[derive(Debug, Clone)]
pub struct NodeConfig {
    /// Interface to bind the API server on (`API_HOST`, default 127.0.0.1)
    pub api_host: String,
    /// API port (`API_PORT`, default 8003)
    pub api_port: u16,
    /// Directory holding the three ONNX model files (`MODELS_DIR`)
    pub models_dir: PathBuf,
    /// Directory with the demo upload page (`STATIC_DIR`)
    pub static_dir: PathBuf,
    /// Maximum accepted image upload size (`MAX_UPLOAD_BYTES`, default 10MB)
    pub max_upload_bytes: usize,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            api_host: "127.0.0.1".to_string(),
            api_port: 8003,
            models_dir: PathBuf::from("./models"),
            static_dir: PathBuf::from("./static"),
            max_upload_bytes: MAX_IMAGE_SIZE,
        }
    }
}

impl NodeConfig {
    /// Read configuration from the environment, falling back to defaults
    /// for anything unset or unparsable.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let api_host = env::var("API_HOST").unwrap_or(defaults.api_host);
        let api_port = env::var("API_PORT")
            .ok()
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(defaults.api_port);
        let models_dir = env::var("MODELS_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.models_dir);
        let static_dir = env::var("STATIC_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.static_dir);
        let max_upload_bytes = env::var("MAX_UPLOAD_BYTES")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(defaults.max_upload_bytes);

        Self {
            api_host,
            api_port,
            models_dir,
            static_dir,
            max_upload_bytes,
        }
    }
}
