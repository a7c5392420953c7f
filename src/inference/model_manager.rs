// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Model manager for the three-step age pipeline

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use ndarray::Array4;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{FeatureExtractorModel, GeneralistModel, SpecialistModel};
use crate::pipeline::AgeGroup;

/// File names expected inside the models directory
pub const FEATURE_EXTRACTOR_FILE: &str = "feature_extractor.onnx";
pub const GENERALIST_FILE: &str = "generalist.onnx";
pub const SPECIALIST_FILE: &str = "specialist.onnx";

/// Configuration for loading the age models
#[derive(Debug, Clone)]
pub struct AgeModelConfig {
    /// Directory containing the three ONNX files
    pub models_dir: PathBuf,
}

impl Default for AgeModelConfig {
    fn default() -> Self {
        Self {
            models_dir: PathBuf::from("./models"),
        }
    }
}

impl AgeModelConfig {
    pub fn new<P: AsRef<Path>>(models_dir: P) -> Self {
        Self {
            models_dir: models_dir.as_ref().to_path_buf(),
        }
    }

    pub fn feature_extractor_path(&self) -> PathBuf {
        self.models_dir.join(FEATURE_EXTRACTOR_FILE)
    }

    pub fn generalist_path(&self) -> PathBuf {
        self.models_dir.join(GENERALIST_FILE)
    }

    pub fn specialist_path(&self) -> PathBuf {
        self.models_dir.join(SPECIALIST_FILE)
    }
}

/// Availability of a loaded model, reported by /health
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfo {
    pub name: String,
    pub available: bool,
}

/// Manager owning the three pipeline models
///
/// Unlike optional vision features, the age pipeline needs all three models;
/// a missing file fails the load instead of degrading.
pub struct AgeModelManager {
    feature_extractor: Arc<FeatureExtractorModel>,
    generalist: Arc<GeneralistModel>,
    specialist: Arc<SpecialistModel>,
}

impl AgeModelManager {
    /// Load all three models from the configured directory
    pub async fn new(config: AgeModelConfig) -> Result<Self> {
        let feature_extractor = FeatureExtractorModel::new(config.feature_extractor_path())
            .await
            .context("Failed to load feature extractor")?;

        let generalist = GeneralistModel::new(config.generalist_path())
            .await
            .context("Failed to load generalist model")?;

        let specialist = SpecialistModel::new(config.specialist_path())
            .await
            .context("Failed to load specialist model")?;

        info!(
            "Age pipeline models loaded from {}",
            config.models_dir.display()
        );

        Ok(Self {
            feature_extractor: Arc::new(feature_extractor),
            generalist: Arc::new(generalist),
            specialist: Arc::new(specialist),
        })
    }

    /// Step 1: extract the face feature vector from a preprocessed image
    pub fn predict_features(&self, input: Array4<f32>) -> Result<Vec<f32>> {
        self.feature_extractor.extract(input)
    }

    /// Step 2: bracket logits for a feature vector
    pub fn predict_bracket(&self, features: &[f32]) -> Result<Vec<f32>> {
        self.generalist.classify(features)
    }

    /// Step 3: raw regression output for a feature vector and bracket
    pub fn predict_age_raw(&self, features: &[f32], group: AgeGroup) -> Result<f32> {
        self.specialist.regress(features, group.one_hot())
    }

    /// Per-model availability for health reporting
    pub fn model_info(&self) -> Vec<ModelInfo> {
        vec![
            ModelInfo {
                name: "feature-extractor".to_string(),
                available: true,
            },
            ModelInfo {
                name: "generalist".to_string(),
                available: true,
            },
            ModelInfo {
                name: "specialist".to_string(),
                available: true,
            },
        ]
    }
}
