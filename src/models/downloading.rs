// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! HTTP download of the ONNX model artifacts
//!
//! Fetches any of the three pipeline models missing from the models
//! directory. Downloads stream to a `.part` file and are renamed into place
//! only after completion (and checksum verification when a digest is
//! configured), so an interrupted download never leaves a truncated model.

use anyhow::{Context, Result};
use futures::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};

/// A single downloadable model artifact
#[derive(Debug, Clone)]
pub struct ModelSource {
    /// File name inside the models directory (e.g. "generalist.onnx")
    pub filename: String,
    /// HTTP(S) URL to fetch from
    pub url: String,
    /// Expected SHA-256 digest (hex), verified when present
    pub sha256: Option<String>,
}

#[derive(Debug, Clone)]
pub struct DownloadConfig {
    pub models_dir: PathBuf,
    pub sources: Vec<ModelSource>,
    /// Request timeout per download
    pub timeout_secs: u64,
    /// Hide the progress bar (for non-interactive use)
    pub quiet: bool,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            models_dir: PathBuf::from("./models"),
            sources: vec![],
            timeout_secs: 600,
            quiet: false,
        }
    }
}

pub struct ModelDownloader {
    config: DownloadConfig,
    client: reqwest::Client,
}

impl ModelDownloader {
    pub fn new(config: DownloadConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { config, client })
    }

    /// Download every configured model that is not already on disk.
    /// Returns the paths of the files fetched in this run.
    pub async fn download_missing(&self) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(&self.config.models_dir)
            .await
            .with_context(|| {
                format!(
                    "Failed to create models directory {}",
                    self.config.models_dir.display()
                )
            })?;

        let mut fetched = Vec::new();

        for source in &self.config.sources {
            let target = self.config.models_dir.join(&source.filename);
            if target.exists() {
                info!("{} already present, skipping", source.filename);
                continue;
            }

            self.download_one(source, &target).await?;
            fetched.push(target);
        }

        Ok(fetched)
    }

    async fn download_one(&self, source: &ModelSource, target: &Path) -> Result<()> {
        info!("Downloading {} from {}", source.filename, source.url);

        let response = self
            .client
            .get(&source.url)
            .send()
            .await
            .with_context(|| format!("Request to {} failed", source.url))?
            .error_for_status()
            .with_context(|| format!("Server rejected download of {}", source.filename))?;

        let total_bytes = response.content_length().unwrap_or(0);
        let progress = if self.config.quiet {
            ProgressBar::hidden()
        } else {
            let bar = ProgressBar::new(total_bytes);
            bar.set_style(
                ProgressStyle::with_template(
                    "{msg} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})",
                )
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
            );
            bar.set_message(source.filename.clone());
            bar
        };

        let part_path = target.with_extension("onnx.part");
        let mut file = fs::File::create(&part_path)
            .await
            .with_context(|| format!("Failed to create {}", part_path.display()))?;

        let mut hasher = Sha256::new();
        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.context("Download stream error")?;
            hasher.update(&chunk);
            file.write_all(&chunk)
                .await
                .context("Failed to write model chunk")?;
            progress.inc(chunk.len() as u64);
        }

        file.flush().await.context("Failed to flush model file")?;
        drop(file);
        progress.finish_and_clear();

        if let Some(expected) = &source.sha256 {
            let actual = hex::encode(hasher.finalize());
            if !actual.eq_ignore_ascii_case(expected) {
                fs::remove_file(&part_path).await.ok();
                anyhow::bail!(
                    "Checksum mismatch for {}: expected {}, got {}",
                    source.filename,
                    expected,
                    actual
                );
            }
        } else {
            warn!("No checksum configured for {}", source.filename);
        }

        fs::rename(&part_path, target)
            .await
            .with_context(|| format!("Failed to move {} into place", target.display()))?;

        info!("{} downloaded", source.filename);
        Ok(())
    }
}
