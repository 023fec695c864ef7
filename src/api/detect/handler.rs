// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Single-image damage detection handler

use axum::{extract::State, Json};
use axum_extra::extract::Multipart;
use tracing::{debug, info};

use super::response::{DetectResponse, ImageInfoView};
use crate::api::errors::ApiError;
use crate::api::http_server::AppState;
use crate::api::upload::{read_fields, take_image};
use crate::damage::report::{detection_views, DetectSummary};
use crate::vision::jpeg_data_url;

pub const FILE_FIELD: &str = "file";

/// POST /api/detect - Detect, grade and price damage on one photo
///
/// # Request
/// Multipart form with a `file` field holding a PNG, JPEG, WebP, GIF or BMP image.
///
/// # Errors
/// - 400 Bad Request: missing `file` field, oversize or undecodable image
/// - 502 Bad Gateway: the detection model call failed
/// - 500 Internal Server Error: annotated image could not be encoded
pub async fn detect_handler(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<DetectResponse>, ApiError> {
    let mut uploads = read_fields(multipart, &[FILE_FIELD], state.max_upload_bytes).await?;
    let upload = take_image(&mut uploads, FILE_FIELD, state.max_upload_bytes)?;

    debug!(
        "Detect request: {:?}, {}x{}, {} bytes",
        upload.filename, upload.info.width, upload.info.height, upload.info.size_bytes
    );

    let detections = state.inspector.inspect(&upload.image).await?;

    let annotated = state.annotator.render(&upload.image, &detections, None);
    let annotated_image = jpeg_data_url(&annotated)?;

    let summary = DetectSummary::from_detections(&detections);
    info!(
        "Detect complete: {} damage(s), ${} estimated",
        summary.total_damages, summary.total_estimated_cost
    );

    Ok(Json(DetectResponse {
        success: true,
        timestamp: chrono::Utc::now().to_rfc3339(),
        image_info: ImageInfoView::new(upload.filename, &upload.info),
        summary,
        detections: detection_views(&detections),
        annotated_image,
    }))
}
