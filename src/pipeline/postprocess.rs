// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Post-processing of the generalist and specialist model outputs
//!
//! This is the arithmetic that turns the raw model outputs into a calibrated
//! age plus a bracket confidence:
//! - softmax over the generalist logits selects the bracket and gives its
//!   probability
//! - the specialist's raw output is squashed with a sigmoid and mapped to a
//!   position inside the bracket's age range
//! - the bracket probability is discounted when the predicted age sits near
//!   a bracket boundary, where the classifier is least reliable

use thiserror::Error;

use super::age_groups::{AgeGroup, NUM_AGE_GROUPS};

/// Confidence is reported as a percentage clamped into this range
pub const MIN_CONFIDENCE: f32 = 10.0;
pub const MAX_CONFIDENCE: f32 = 95.0;

/// Floor of the boundary discount; predictions at the exact edge of a
/// bracket keep at least half of the classifier's probability mass
pub const BOUNDARY_PENALTY_FLOOR: f32 = 0.5;

#[derive(Debug, Error)]
pub enum PostprocessError {
    #[error("Expected {NUM_AGE_GROUPS} bracket logits, got {0}")]
    WrongLogitCount(usize),

    #[error("Prediction resulted in NaN values")]
    NotANumber,
}

/// Final result of the three-model pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct AgePrediction {
    /// Selected age bracket
    pub age_group: AgeGroup,
    /// Estimated age in years, always inside the bracket bounds
    pub predicted_age: u32,
    /// Confidence percentage in [10.0, 95.0]
    pub confidence: f32,
    /// Softmax probabilities per bracket, class-index order
    pub group_probabilities: [f32; NUM_AGE_GROUPS],
}

/// Numerically stable softmax (max-subtracted)
pub fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|&l| (l - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.iter().map(|&e| e / sum).collect()
}

/// Logistic sigmoid
pub fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

/// Select the winning bracket from the generalist logits
///
/// Softmax is monotonic, so argmax over logits and over probabilities agree;
/// the request handler uses this to pick the specialist's bracket input
/// before post-processing runs. Ties resolve to the lowest class index.
pub fn select_bracket(logits: &[f32]) -> Result<AgeGroup, PostprocessError> {
    if logits.len() != NUM_AGE_GROUPS {
        return Err(PostprocessError::WrongLogitCount(logits.len()));
    }

    if logits.iter().any(|l| l.is_nan()) {
        return Err(PostprocessError::NotANumber);
    }

    let mut class_index = 0;
    for (index, &logit) in logits.iter().enumerate().skip(1) {
        if logit > logits[class_index] {
            class_index = index;
        }
    }

    AgeGroup::from_class_index(class_index).ok_or(PostprocessError::NotANumber)
}

/// Convert the generalist logits and the specialist's raw regression output
/// into an age prediction.
///
/// The specialist outputs an unbounded scalar; `sigmoid` maps it to a
/// relative position in `[0, 1]` inside the selected bracket's range. The
/// rounded age is clamped back into the bracket so rounding can never step
/// outside it.
pub fn postprocess(
    bracket_logits: &[f32],
    specialist_raw: f32,
) -> Result<AgePrediction, PostprocessError> {
    if bracket_logits.len() != NUM_AGE_GROUPS {
        return Err(PostprocessError::WrongLogitCount(bracket_logits.len()));
    }

    let probs = softmax(bracket_logits);
    let age_group = select_bracket(bracket_logits)?;
    let group_confidence = probs[age_group.class_index()];
    let (min_age, max_age) = age_group.bounds();
    let age_range = (max_age - min_age) as f32;

    let relative_position = sigmoid(specialist_raw);
    let raw_age = min_age as f32 + age_range * relative_position;

    if raw_age.is_nan() || group_confidence.is_nan() {
        return Err(PostprocessError::NotANumber);
    }

    let predicted_age = (raw_age.round() as u32).clamp(min_age, max_age);

    // Discount the bracket probability near the bracket edges, where the
    // classifier and regressor disagree the most
    let rel_in_range = (predicted_age - min_age) as f32 / age_range;
    let boundary_distance = rel_in_range.min(1.0 - rel_in_range);
    let boundary_penalty = (boundary_distance * 2.0).max(BOUNDARY_PENALTY_FLOOR);

    let confidence =
        (group_confidence * boundary_penalty * 100.0).clamp(MIN_CONFIDENCE, MAX_CONFIDENCE);

    if confidence.is_nan() {
        return Err(PostprocessError::NotANumber);
    }

    let mut group_probabilities = [0.0; NUM_AGE_GROUPS];
    group_probabilities.copy_from_slice(&probs);

    Ok(AgePrediction {
        age_group,
        predicted_age,
        confidence,
        group_probabilities,
    })
}
