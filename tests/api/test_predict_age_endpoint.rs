// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Endpoint tests for POST /v1/predict-age
//!
//! These tests run the handler through the full router without any models
//! loaded, covering the request validation and service-unavailable paths.
//! Paths that need the real ONNX artifacts are exercised in
//! test_real_pipeline (ignored unless the models are downloaded).

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use fabstir_age_node::api::http_server::{create_app, AppState};
use fabstir_age_node::inference::{AgeModelConfig, AgeModelManager};
use std::path::PathBuf;
use std::sync::Arc;
use tower::util::ServiceExt;

// 1x1 red PNG
const TINY_PNG_BASE64: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mP8z8DwHwAFBQIAX8jx0gAAAABJRU5ErkJggg==";

const BOUNDARY: &str = "age-node-test-boundary";

/// Build a multipart/form-data body with a single field
fn multipart_body(field_name: &str, filename: &str, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field_name}\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn multipart_request(field_name: &str, data: &[u8]) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/v1/predict-age")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(field_name, "face.png", data)))
        .unwrap()
}

async fn response_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_valid_image_without_models_returns_503() {
    let app = create_app(AppState::new_for_test());
    let png = STANDARD.decode(TINY_PNG_BASE64).unwrap();

    let response = app.oneshot(multipart_request("image", &png)).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let body = response_json(response).await;
    assert_eq!(body["error_type"], "service_unavailable");
}

#[tokio::test]
async fn test_missing_image_field_returns_400() {
    let app = create_app(AppState::new_for_test());
    let png = STANDARD.decode(TINY_PNG_BASE64).unwrap();

    // Field named "photo" instead of "image"
    let response = app.oneshot(multipart_request("photo", &png)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = response_json(response).await;
    assert_eq!(body["error_type"], "validation_error");
    assert_eq!(body["details"]["field"], "image");
}

#[tokio::test]
async fn test_empty_image_field_returns_400() {
    let app = create_app(AppState::new_for_test());

    let response = app.oneshot(multipart_request("image", &[])).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = response_json(response).await;
    assert_eq!(body["error_type"], "validation_error");
}

#[tokio::test]
async fn test_image_over_configured_limit_returns_400() {
    // State with a 16-byte upload limit; the field carries 64 bytes
    let state = AppState::new(PathBuf::from("./static"), 16);
    let app = create_app(state);

    let response = app
        .oneshot(multipart_request("image", &[0u8; 64]))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = response_json(response).await;
    assert_eq!(body["error_type"], "validation_error");
    assert_eq!(body["details"]["field"], "image");
}

#[tokio::test]
async fn test_undecodable_image_returns_400() {
    let app = create_app(AppState::new_for_test());

    let response = app
        .oneshot(multipart_request("image", &[0x01, 0x02, 0x03, 0x04, 0x05]))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = response_json(response).await;
    assert_eq!(body["error_type"], "invalid_request");
}

#[tokio::test]
async fn test_corrupted_png_returns_400() {
    let app = create_app(AppState::new_for_test());

    // PNG magic, then garbage
    let response = app
        .oneshot(multipart_request(
            "image",
            &[0x89, 0x50, 0x4E, 0x47, 0xDE, 0xAD, 0xBE, 0xEF],
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_error_responses_carry_request_id() {
    let app = create_app(AppState::new_for_test());

    let response = app
        .oneshot(multipart_request("photo", b"irrelevant"))
        .await
        .unwrap();
    let body = response_json(response).await;
    assert!(body["request_id"].is_string());
}

/// Full pipeline test against the real ONNX artifacts.
///
/// Run with `cargo test -- --ignored` after fetching the models with the
/// download-models binary into ./models.
#[tokio::test]
#[ignore]
async fn test_real_pipeline_prediction() {
    let manager = AgeModelManager::new(AgeModelConfig::default())
        .await
        .expect("models must be downloaded to ./models");

    let state = AppState::new_for_test();
    *state.age_model_manager.write().await = Some(Arc::new(manager));

    let app = create_app(state);
    let png = STANDARD.decode(TINY_PNG_BASE64).unwrap();

    let response = app.oneshot(multipart_request("image", &png)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    let age = body["predictedAge"].as_u64().unwrap();
    let confidence = body["confidence"].as_f64().unwrap();
    assert!((1..=90).contains(&age));
    assert!((10.0..=95.0).contains(&confidence));
    assert!(body["groupProbabilities"].as_array().unwrap().len() == 4);
}
