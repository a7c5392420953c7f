// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Age bracket definitions and post-processing of model outputs

pub mod age_groups;
pub mod postprocess;

pub use age_groups::{AgeGroup, NUM_AGE_GROUPS};
pub use postprocess::{
    postprocess, select_bracket, sigmoid, softmax, AgePrediction, PostprocessError,
};
