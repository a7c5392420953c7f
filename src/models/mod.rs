// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Model artifact management

pub mod downloading;

pub use downloading::{DownloadConfig, ModelDownloader, ModelSource};
