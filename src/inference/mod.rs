// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! ONNX Runtime wrappers for the three age-pipeline models
//!
//! All three models run on CPU. The pipeline is sequential (features ->
//! bracket -> age), so there is no benefit in loading them on separate
//! execution providers.

pub mod feature_extractor;
pub mod generalist;
pub mod model_manager;
pub mod specialist;

pub use feature_extractor::FeatureExtractorModel;
pub use generalist::GeneralistModel;
pub use model_manager::{AgeModelConfig, AgeModelManager, ModelInfo};
pub use specialist::SpecialistModel;

use anyhow::{Context, Result};
use ort::ep::CPU as CPUExecutionProvider;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use std::path::Path;

/// Dimension of the face feature vector produced by the extractor
pub const FEATURE_DIM: usize = 2622;

/// Build an ONNX Runtime session for a model file
///
/// CPU execution provider, full graph optimization, a small fixed thread
/// pool per session.
pub(crate) fn build_session(model_path: &Path) -> Result<Session> {
    if !model_path.exists() {
        anyhow::bail!("ONNX model file not found: {}", model_path.display());
    }

    Session::builder()
        .context("Failed to create session builder")?
        .with_execution_providers([CPUExecutionProvider::default().build()])
        .map_err(ort::Error::<()>::from)
        .context("Failed to set CPU execution provider")?
        .with_optimization_level(GraphOptimizationLevel::Level3)
        .map_err(ort::Error::<()>::from)
        .context("Failed to set optimization level")?
        .with_intra_threads(4)
        .map_err(ort::Error::<()>::from)
        .context("Failed to set intra threads")?
        .commit_from_file(model_path)
        .with_context(|| format!("Failed to load ONNX model from {}", model_path.display()))
}
