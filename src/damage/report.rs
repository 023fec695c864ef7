// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Presentation views of detections shared by the HTTP API and the CLI

use serde::{Deserialize, Serialize};

use super::detection::{
    estimated_total_cost, severity_breakdown, BoundingBox, Detection, SeverityBreakdown,
};
use super::severity::Severity;

/// Round to 4 decimal places for presentation
pub fn round_confidence(confidence: f64) -> f64 {
    (confidence * 10_000.0).round() / 10_000.0
}

/// A detection as it appears in API responses and CLI reports
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DetectionView {
    pub class: String,
    pub confidence: f64,
    pub severity: Severity,
    pub estimated_cost: u32,
    pub bbox: BoundingBox,
}

impl From<&Detection> for DetectionView {
    fn from(detection: &Detection) -> Self {
        Self {
            class: detection.class.label().to_string(),
            confidence: round_confidence(detection.confidence),
            severity: detection.severity,
            estimated_cost: detection.estimated_cost,
            bbox: detection.bbox,
        }
    }
}

pub fn detection_views(detections: &[Detection]) -> Vec<DetectionView> {
    detections.iter().map(DetectionView::from).collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectSummary {
    pub total_damages: usize,
    pub total_estimated_cost: u64,
    pub severity_breakdown: SeverityBreakdown,
}

impl DetectSummary {
    pub fn from_detections(detections: &[Detection]) -> Self {
        Self {
            total_damages: detections.len(),
            total_estimated_cost: estimated_total_cost(detections),
            severity_breakdown: severity_breakdown(detections),
        }
    }
}
