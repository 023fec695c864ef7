// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Multipart image upload extraction

use axum::http::StatusCode;
use axum_extra::extract::{multipart::MultipartError, Multipart};
use image::RgbImage;
use std::collections::HashMap;
use tracing::debug;

use super::errors::ApiError;
use crate::vision::{decode_image_bytes_with_limit, ImageInfo};

/// One uploaded file
#[derive(Debug, Clone)]
pub struct Upload {
    pub filename: Option<String>,
    pub bytes: Vec<u8>,
}

/// A decoded upload ready for inspection
pub struct UploadedImage {
    pub filename: Option<String>,
    pub image: RgbImage,
    pub info: ImageInfo,
}

/// Read the named fields out of a multipart body. Other fields are ignored; a
/// repeated field keeps its last value.
pub async fn read_fields(
    mut multipart: Multipart,
    wanted: &[&str],
    max_bytes: usize,
) -> Result<HashMap<String, Upload>, ApiError> {
    let mut uploads = HashMap::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, "Malformed multipart body"))?
    {
        let name = match field.name() {
            Some(name) if wanted.contains(&name) => name.to_string(),
            other => {
                debug!("Ignoring multipart field {:?}", other);
                continue;
            }
        };
        let filename = field.file_name().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| multipart_error(e, &format!("Failed to read field '{}'", name)))?;

        if bytes.len() > max_bytes {
            return Err(ApiError::ValidationError {
                field: name,
                message: format!(
                    "upload is {} bytes, limit is {} bytes",
                    bytes.len(),
                    max_bytes
                ),
            });
        }

        debug!("Received '{}': {} bytes", name, bytes.len());
        uploads.insert(
            name,
            Upload {
                filename,
                bytes: bytes.to_vec(),
            },
        );
    }

    Ok(uploads)
}

/// Bodies cut off by the request size limit surface as 413
fn multipart_error(e: MultipartError, context: &str) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge(format!("{}: request body exceeds the upload limit", context))
    } else {
        ApiError::InvalidRequest(format!("{}: {}", context, e))
    }
}

/// Take a required field from [`read_fields`] output and decode it
pub fn take_image(
    uploads: &mut HashMap<String, Upload>,
    field: &str,
    max_bytes: usize,
) -> Result<UploadedImage, ApiError> {
    let upload = uploads
        .remove(field)
        .ok_or_else(|| ApiError::missing_field(field))?;

    let (image, info) =
        decode_image_bytes_with_limit(&upload.bytes, max_bytes).map_err(|e| {
            ApiError::ValidationError {
                field: field.to_string(),
                message: format!("Invalid image: {}", e),
            }
        })?;

    Ok(UploadedImage {
        filename: upload.filename,
        image,
        info,
    })
}
