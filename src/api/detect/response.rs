// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Detection response types

use serde::{Deserialize, Serialize};

use crate::damage::report::{DetectSummary, DetectionView};
use crate::vision::ImageInfo;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageInfoView {
    pub filename: Option<String>,
    /// `"<width>x<height>"`
    pub size: String,
    pub format: String,
}

impl ImageInfoView {
    pub fn new(filename: Option<String>, info: &ImageInfo) -> Self {
        Self {
            filename,
            size: info.size_label(),
            format: info.format_label().to_string(),
        }
    }
}

/// Response from POST /api/detect
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectResponse {
    pub success: bool,
    pub timestamp: String,
    pub image_info: ImageInfoView,
    pub summary: DetectSummary,
    pub detections: Vec<DetectionView>,
    /// JPEG data URL
    pub annotated_image: String,
}
