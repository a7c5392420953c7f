// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Age prediction API endpoint module
//!
//! Provides POST /v1/predict-age for estimating age from an uploaded face
//! image.

pub mod handler;
pub mod request;
pub mod response;

pub use handler::predict_age_handler;
pub use request::read_image_upload;
pub use response::{GroupProbability, PredictAgeResponse};
