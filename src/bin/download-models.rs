// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! CLI for fetching the age pipeline model artifacts

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use fabstir_age_node::inference::model_manager::{
    FEATURE_EXTRACTOR_FILE, GENERALIST_FILE, SPECIALIST_FILE,
};
use fabstir_age_node::models::{DownloadConfig, ModelDownloader, ModelSource};

#[derive(Parser, Debug)]
#[command(name = "download-models")]
#[command(about = "Download the ONNX models for the age pipeline")]
struct Args {
    /// Directory to place the model files in
    #[arg(long, env = "MODELS_DIR", default_value = "./models")]
    models_dir: PathBuf,

    /// Base URL serving the model files
    #[arg(long, env = "MODELS_BASE_URL")]
    base_url: String,

    /// Suppress the progress bars
    #[arg(long, default_value_t = false)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let base = args.base_url.trim_end_matches('/');

    let sources = [FEATURE_EXTRACTOR_FILE, GENERALIST_FILE, SPECIALIST_FILE]
        .iter()
        .map(|filename| ModelSource {
            filename: filename.to_string(),
            url: format!("{}/{}", base, filename),
            sha256: None,
        })
        .collect();

    let config = DownloadConfig {
        models_dir: args.models_dir,
        sources,
        quiet: args.quiet,
        ..Default::default()
    };

    let downloader = ModelDownloader::new(config)?;
    let fetched = downloader.download_missing().await?;

    if fetched.is_empty() {
        tracing::info!("All model files already present");
    } else {
        tracing::info!("Downloaded {} model file(s)", fetched.len());
    }

    Ok(())
}
