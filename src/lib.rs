// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod config;
pub mod inference;
pub mod models;
pub mod pipeline;
pub mod version;
pub mod vision;

pub use api::{create_app, start_server, ApiError, AppState, PredictAgeResponse};
pub use config::NodeConfig;
pub use inference::{AgeModelConfig, AgeModelManager, ModelInfo};
pub use pipeline::{postprocess, AgeGroup, AgePrediction};
pub use vision::{decode_image_bytes, preprocess_for_extractor};
