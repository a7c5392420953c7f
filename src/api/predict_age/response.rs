// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Age prediction response types

use serde::{Deserialize, Serialize};

use crate::pipeline::{AgeGroup, AgePrediction};

/// Name reported in the `model` response field
pub const PIPELINE_MODEL_NAME: &str = "face-age-pipeline";

/// Per-bracket softmax probability
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupProbability {
    /// Bracket label
    pub group: String,
    /// Softmax probability (0.0-1.0)
    pub probability: f32,
}

/// Response from the age prediction endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictAgeResponse {
    /// Selected age bracket label
    pub age_group: String,
    /// Estimated age in years
    pub predicted_age: u32,
    /// Confidence percentage (10.0-95.0)
    pub confidence: f32,
    /// Softmax probability per bracket
    pub group_probabilities: Vec<GroupProbability>,
    /// Processing time in milliseconds
    pub processing_time_ms: u64,
    /// Model pipeline identifier
    pub model: String,
    /// Provider (always "host")
    pub provider: String,
}

impl PredictAgeResponse {
    pub fn from_prediction(prediction: &AgePrediction, processing_time_ms: u64) -> Self {
        let group_probabilities = AgeGroup::ALL
            .iter()
            .zip(prediction.group_probabilities.iter())
            .map(|(group, &probability)| GroupProbability {
                group: group.label().to_string(),
                probability,
            })
            .collect();

        Self {
            age_group: prediction.age_group.label().to_string(),
            predicted_age: prediction.predicted_age,
            confidence: prediction.confidence,
            group_probabilities,
            processing_time_ms,
            model: PIPELINE_MODEL_NAME.to_string(),
            provider: "host".to_string(),
        }
    }
}
