// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Multipart upload extraction for the age prediction endpoint

use axum::extract::Multipart;

use crate::api::errors::ApiError;

/// Multipart field name carrying the image bytes
pub const IMAGE_FIELD: &str = "image";

/// Pull the image bytes out of a multipart upload
///
/// Accepts the first field named `image`; other fields are skipped. The
/// content-type header of the part is ignored since the format is sniffed
/// from the bytes anyway. `max_bytes` is the configured upload limit.
pub async fn read_image_upload(
    multipart: &mut Multipart,
    max_bytes: usize,
) -> Result<Vec<u8>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::InvalidRequest(format!("Malformed multipart body: {}", e)))?
    {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::InvalidRequest(format!("Failed to read image field: {}", e)))?;

        if bytes.is_empty() {
            return Err(ApiError::ValidationError {
                field: IMAGE_FIELD.to_string(),
                message: "image field is empty".to_string(),
            });
        }

        if bytes.len() > max_bytes {
            return Err(ApiError::ValidationError {
                field: IMAGE_FIELD.to_string(),
                message: format!("image exceeds maximum size of {} bytes", max_bytes),
            });
        }

        return Ok(bytes.to_vec());
    }

    Err(ApiError::ValidationError {
        field: IMAGE_FIELD.to_string(),
        message: "image field is required".to_string(),
    })
}
