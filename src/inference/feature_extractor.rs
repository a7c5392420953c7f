// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Face feature extractor (ResNet50 backbone + dense projection)

use anyhow::{Context, Result};
use ndarray::{Array4, Axis};
use ort::session::Session;
use ort::value::Value;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::info;

use super::FEATURE_DIM;

/// ONNX wrapper for the feature extractor
///
/// Input: `[1, 3, 224, 224]` NCHW f32 (see `vision::preprocessing`)
/// Output: `[1, 2622]` face feature vector
///
/// The session is behind an `Arc<Mutex>` so the model can be shared across
/// request handlers.
#[derive(Clone)]
pub struct FeatureExtractorModel {
    session: Arc<Mutex<Session>>,
}

impl std::fmt::Debug for FeatureExtractorModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeatureExtractorModel")
            .field("feature_dim", &FEATURE_DIM)
            .finish_non_exhaustive()
    }
}

impl FeatureExtractorModel {
    /// Load the extractor from an ONNX file
    pub async fn new<P: AsRef<Path>>(model_path: P) -> Result<Self> {
        let session = super::build_session(model_path.as_ref())?;
        info!(
            "Feature extractor loaded from {}",
            model_path.as_ref().display()
        );

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
        })
    }

    /// Run the extractor on a preprocessed image tensor
    pub fn extract(&self, input: Array4<f32>) -> Result<Vec<f32>> {
        let mut session = self
            .session
            .lock()
            .map_err(|_| anyhow::anyhow!("Feature extractor session lock poisoned"))?;

        let outputs = session.run(ort::inputs![
            "input" => Value::from_array(input)?
        ])?;

        let output = outputs[0]
            .try_extract_array::<f32>()
            .context("Failed to extract feature tensor")?;

        let shape = output.shape();
        if shape.len() != 2 || shape[1] != FEATURE_DIM {
            anyhow::bail!(
                "Feature extractor output has unexpected shape {:?} (expected [1, {}])",
                shape,
                FEATURE_DIM
            );
        }

        Ok(output.index_axis(Axis(0), 0).iter().copied().collect())
    }
}
