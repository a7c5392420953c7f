// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Age prediction endpoint handler

use axum::extract::{Multipart, State};
use axum::Json;
use std::time::Instant;
use tracing::{debug, info, warn};

use super::request::read_image_upload;
use super::response::PredictAgeResponse;
use crate::api::errors::ApiError;
use crate::api::http_server::AppState;
use crate::pipeline::{postprocess, select_bracket};
use crate::vision::{decode_image_bytes, preprocess_for_extractor};

/// POST /v1/predict-age - Estimate age from an uploaded face image
///
/// Three-step pipeline:
/// 1. Extract face features with the convolutional backbone
/// 2. Classify the features into an age bracket (generalist model)
/// 3. Regress a precise age inside the bracket (specialist model)
///
/// # Request
/// Multipart form with an `image` field holding the raw image bytes
/// (PNG, JPEG, WebP, GIF or BMP).
///
/// # Response
/// - `ageGroup`: Bracket label (Child, YoungAdult, MiddleAge, Senior)
/// - `predictedAge`: Estimated age in years, inside the bracket bounds
/// - `confidence`: Percentage in [10, 95]
/// - `groupProbabilities`: Softmax probability per bracket
/// - `processingTimeMs`, `model`, `provider`
///
/// # Errors
/// - 400 Bad Request: missing/empty/oversized/undecodable image
/// - 503 Service Unavailable: pipeline models not loaded
/// - 500 Internal Server Error: inference or post-processing failure
pub async fn predict_age_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<PredictAgeResponse>, ApiError> {
    let started = Instant::now();

    // 1. Pull the image out of the multipart body
    let image_bytes = read_image_upload(&mut multipart, state.max_upload_bytes).await?;

    // 2. Decode and validate
    let (image, image_info) = decode_image_bytes(&image_bytes).map_err(|e| {
        warn!("Failed to decode uploaded image: {}", e);
        ApiError::InvalidRequest(format!("Invalid image: {}", e))
    })?;

    debug!(
        "Decoded upload: {}x{} {:?}, {} bytes",
        image_info.width, image_info.height, image_info.format, image_info.size_bytes
    );

    // 3. Get the model manager from state
    let manager_guard = state.age_model_manager.read().await;
    let manager = manager_guard.as_ref().ok_or_else(|| {
        warn!("Age pipeline not available");
        ApiError::ServiceUnavailable("Age pipeline models not loaded".to_string())
    })?;

    // 4. Preprocess and extract features
    let tensor = preprocess_for_extractor(&image);
    let features = manager.predict_features(tensor).map_err(|e| {
        warn!("Feature extraction failed: {}", e);
        ApiError::InternalError(format!("Feature extraction error: {}", e))
    })?;

    // 5. Classify into a bracket
    let bracket_logits = manager.predict_bracket(&features).map_err(|e| {
        warn!("Bracket classification failed: {}", e);
        ApiError::InternalError(format!("Age group prediction error: {}", e))
    })?;

    let age_group = select_bracket(&bracket_logits).map_err(|e| {
        warn!("Bracket selection failed: {}", e);
        ApiError::InternalError(format!("Age group prediction error: {}", e))
    })?;

    // 6. Regress the precise age inside the bracket
    let specialist_raw = manager
        .predict_age_raw(&features, age_group)
        .map_err(|e| {
            warn!("Specialist regression failed: {}", e);
            ApiError::InternalError(format!("Age prediction error: {}", e))
        })?;

    // 7. Post-process into age + confidence
    let prediction = postprocess(&bracket_logits, specialist_raw).map_err(|e| {
        warn!("Post-processing failed: {}", e);
        ApiError::InternalError(format!("Age prediction error: {}", e))
    })?;

    let elapsed_ms = started.elapsed().as_millis() as u64;
    info!(
        "Age prediction complete: {} ({} years, {:.1}% confidence, {}ms)",
        prediction.age_group.label(),
        prediction.predicted_age,
        prediction.confidence,
        elapsed_ms
    );

    Ok(Json(PredictAgeResponse::from_prediction(
        &prediction,
        elapsed_ms,
    )))
}
