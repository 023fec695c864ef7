// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Pickup/return comparison handler

use axum::{extract::State, Json};
use axum_extra::extract::Multipart;
use tracing::{debug, info};

use super::response::{CompareResponse, ComparisonSummary};
use crate::api::errors::ApiError;
use crate::api::http_server::AppState;
use crate::api::upload::{read_fields, take_image};
use crate::damage::annotate::GREEN;
use crate::damage::report::detection_views;
use crate::damage::SeverityColorMap;
use crate::vision::jpeg_data_url;

pub const PICKUP_FIELD: &str = "pickup_image";
pub const RETURN_FIELD: &str = "return_image";

/// POST /api/compare - Find damage present at return but not at pickup
///
/// # Request
/// Multipart form with `pickup_image` and `return_image` fields.
///
/// # Errors
/// - 400 Bad Request: either image missing, oversize or undecodable
/// - 502 Bad Gateway: either detection call failed (no partial result)
/// - 500 Internal Server Error: annotated images could not be encoded
pub async fn compare_handler(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<CompareResponse>, ApiError> {
    let limit = state.max_upload_bytes;
    let mut uploads = read_fields(multipart, &[PICKUP_FIELD, RETURN_FIELD], limit).await?;
    let pickup = take_image(&mut uploads, PICKUP_FIELD, limit)?;
    let returned = take_image(&mut uploads, RETURN_FIELD, limit)?;

    debug!(
        "Compare request: pickup {}x{}, return {}x{}",
        pickup.info.width, pickup.info.height, returned.info.width, returned.info.height
    );

    let result = state
        .inspector
        .compare_images(&pickup.image, &returned.image)
        .await?;

    let pickup_colors = SeverityColorMap::uniform(GREEN);
    let pickup_annotated = state.annotator.render(
        &pickup.image,
        &result.pickup_damages,
        Some(&pickup_colors),
    );
    let return_annotated = state
        .annotator
        .render(&returned.image, &result.new_damages, None);

    let message = result.summary();
    info!("Compare complete: {}", message);

    Ok(Json(CompareResponse {
        success: true,
        timestamp: chrono::Utc::now().to_rfc3339(),
        comparison_summary: ComparisonSummary::from(&result),
        new_damages: detection_views(&result.new_damages),
        pickup_annotated: jpeg_data_url(&pickup_annotated)?,
        return_annotated: jpeg_data_url(&return_annotated)?,
        message,
    }))
}
