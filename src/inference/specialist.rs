// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Specialist model: regresses a precise age inside a bracket

use anyhow::{Context, Result};
use ndarray::Array2;
use ort::session::Session;
use ort::value::Value;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::info;

use super::FEATURE_DIM;
use crate::pipeline::NUM_AGE_GROUPS;

/// ONNX wrapper for the age regressor
///
/// Inputs: `features` `[1, 2622]` and `age_group` `[1, 4]` one-hot bracket
/// Output: `[1, 1]` raw regression scalar; post-processing squashes it with
/// a sigmoid into a relative position inside the bracket's age range.
#[derive(Clone)]
pub struct SpecialistModel {
    session: Arc<Mutex<Session>>,
}

impl std::fmt::Debug for SpecialistModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpecialistModel").finish_non_exhaustive()
    }
}

impl SpecialistModel {
    /// Load the regressor from an ONNX file
    pub async fn new<P: AsRef<Path>>(model_path: P) -> Result<Self> {
        let session = super::build_session(model_path.as_ref())?;
        info!(
            "Specialist model loaded from {}",
            model_path.as_ref().display()
        );

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
        })
    }

    /// Regress the raw age output for a feature vector and bracket encoding
    pub fn regress(&self, features: &[f32], one_hot: [f32; NUM_AGE_GROUPS]) -> Result<f32> {
        if features.len() != FEATURE_DIM {
            anyhow::bail!(
                "Expected {} features, got {}",
                FEATURE_DIM,
                features.len()
            );
        }

        let features_input = Array2::from_shape_vec((1, FEATURE_DIM), features.to_vec())
            .context("Failed to create features array")?;
        let group_input = Array2::from_shape_vec((1, NUM_AGE_GROUPS), one_hot.to_vec())
            .context("Failed to create age_group array")?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| anyhow::anyhow!("Specialist session lock poisoned"))?;

        let outputs = session.run(ort::inputs![
            "features" => Value::from_array(features_input)?,
            "age_group" => Value::from_array(group_input)?
        ])?;

        let output = outputs[0]
            .try_extract_array::<f32>()
            .context("Failed to extract regression output")?;

        output
            .iter()
            .next()
            .copied()
            .context("Specialist produced an empty output tensor")
    }
}
