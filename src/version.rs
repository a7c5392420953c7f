// Version information for the Fabstir Age Node

/// Full version string with feature description
pub const VERSION: &str = "v0.3.0-bracket-confidence-2025-08-28";

/// Semantic version number
pub const VERSION_NUMBER: &str = "0.3.0";

/// Build date
pub const BUILD_DATE: &str = "2025-08-28";

/// Supported features in this version
pub const FEATURES: &[&str] = &[
    "multipart-upload",
    "onnx-cpu-inference",
    "three-step-age-pipeline",
    "bracket-confidence-calibration",
    "static-demo-page",
];

/// Get formatted version string for logging
pub fn get_version_string() -> String {
    format!("Fabstir Age Node {} ({})", VERSION_NUMBER, BUILD_DATE)
}

/// Get full version info for API responses
pub fn get_version_info() -> serde_json::Value {
    serde_json::json!({
        "version": VERSION_NUMBER,
        "build": VERSION,
        "date": BUILD_DATE,
        "features": FEATURES,
    })
}
