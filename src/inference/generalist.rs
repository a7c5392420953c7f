// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Generalist model: classifies face features into an age bracket

use anyhow::{Context, Result};
use ndarray::{Array2, Axis};
use ort::session::Session;
use ort::value::Value;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::info;

use super::FEATURE_DIM;
use crate::pipeline::NUM_AGE_GROUPS;

/// ONNX wrapper for the bracket classifier
///
/// Input: `[1, 2622]` face features
/// Output: `[1, 4]` logits over the age brackets
#[derive(Clone)]
pub struct GeneralistModel {
    session: Arc<Mutex<Session>>,
}

impl std::fmt::Debug for GeneralistModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneralistModel")
            .field("num_classes", &NUM_AGE_GROUPS)
            .finish_non_exhaustive()
    }
}

impl GeneralistModel {
    /// Load the classifier from an ONNX file
    pub async fn new<P: AsRef<Path>>(model_path: P) -> Result<Self> {
        let session = super::build_session(model_path.as_ref())?;
        info!(
            "Generalist model loaded from {}",
            model_path.as_ref().display()
        );

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
        })
    }

    /// Classify a feature vector into bracket logits
    pub fn classify(&self, features: &[f32]) -> Result<Vec<f32>> {
        if features.len() != FEATURE_DIM {
            anyhow::bail!(
                "Expected {} features, got {}",
                FEATURE_DIM,
                features.len()
            );
        }

        let input = Array2::from_shape_vec((1, FEATURE_DIM), features.to_vec())
            .context("Failed to create features array")?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| anyhow::anyhow!("Generalist session lock poisoned"))?;

        let outputs = session.run(ort::inputs![
            "features" => Value::from_array(input)?
        ])?;

        let output = outputs[0]
            .try_extract_array::<f32>()
            .context("Failed to extract bracket logits")?;

        let shape = output.shape();
        if shape.len() != 2 || shape[1] != NUM_AGE_GROUPS {
            anyhow::bail!(
                "Generalist output has unexpected shape {:?} (expected [1, {}])",
                shape,
                NUM_AGE_GROUPS
            );
        }

        Ok(output.index_axis(Axis(0), 0).iter().copied().collect())
    }
}
