// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Conversion of raw model predictions into enriched damage detections

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::classes::DamageClass;
use super::costs::CostTable;
use super::severity::{Severity, SeverityPolicy};

/// A prediction as returned by the inference service (center-form box, pixel space)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPrediction {
    pub class: String,
    pub confidence: f64,
    /// Box center x
    pub x: f64,
    /// Box center y
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Source image dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl ImageSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

/// Axis-aligned box with integer corners in source-image pixel space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl BoundingBox {
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Convert a center/width/height box to corner form, rounding each corner
    pub fn from_center(xc: f64, yc: f64, width: f64, height: f64) -> Self {
        Self {
            x1: (xc - width / 2.0).round() as i32,
            y1: (yc - height / 2.0).round() as i32,
            x2: (xc + width / 2.0).round() as i32,
            y2: (yc + height / 2.0).round() as i32,
        }
    }

    pub fn width(&self) -> i64 {
        self.x2 as i64 - self.x1 as i64
    }

    pub fn height(&self) -> i64 {
        self.y2 as i64 - self.y1 as i64
    }

    /// True when either side has non-positive length
    pub fn is_degenerate(&self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }

    /// Area in square pixels; zero for degenerate boxes
    pub fn area(&self) -> i64 {
        if self.is_degenerate() {
            0
        } else {
            self.width() * self.height()
        }
    }
}

/// A damage finding with its severity and repair estimate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Detection {
    pub class: DamageClass,
    pub confidence: f64,
    pub bbox: BoundingBox,
    pub severity: Severity,
    pub estimated_cost: u32,
}

/// Count of detections per severity tier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityBreakdown {
    pub minor: usize,
    pub moderate: usize,
    pub severe: usize,
}

impl SeverityBreakdown {
    pub fn total(&self) -> usize {
        self.minor + self.moderate + self.severe
    }
}

/// Binds a severity policy and a cost table
#[derive(Debug, Clone, Copy)]
pub struct DamageInterpreter<'a> {
    policy: &'a SeverityPolicy,
    costs: &'a CostTable,
}

impl DamageInterpreter<'static> {
    pub fn standard() -> Self {
        Self {
            policy: SeverityPolicy::standard(),
            costs: CostTable::standard(),
        }
    }
}

impl Default for DamageInterpreter<'static> {
    fn default() -> Self {
        Self::standard()
    }
}

impl<'a> DamageInterpreter<'a> {
    pub fn new(policy: &'a SeverityPolicy, costs: &'a CostTable) -> Self {
        Self { policy, costs }
    }

    pub fn policy(&self) -> &'a SeverityPolicy {
        self.policy
    }

    pub fn costs(&self) -> &'a CostTable {
        self.costs
    }

    /// Enrich a single prediction
    pub fn interpret(&self, prediction: &RawPrediction, image_size: ImageSize) -> Detection {
        let class = DamageClass::from_label(&prediction.class);
        let bbox = BoundingBox::from_center(
            prediction.x,
            prediction.y,
            prediction.width,
            prediction.height,
        );
        let severity = self
            .policy
            .estimate(&bbox, &class, image_size.height, image_size.width);
        if self.costs.get(&class).is_none() {
            warn!("No repair costs for '{}', using fallback", class);
        }
        let estimated_cost = self.costs.cost(&class, severity);

        debug!(
            "{} at ({}, {}, {}, {}) -> {} (${})",
            class, bbox.x1, bbox.y1, bbox.x2, bbox.y2, severity, estimated_cost
        );

        Detection {
            class,
            confidence: prediction.confidence,
            bbox,
            severity,
            estimated_cost,
        }
    }

    /// One detection per prediction, in input order. Nothing is filtered or merged.
    pub fn build_detections(
        &self,
        predictions: &[RawPrediction],
        image_size: ImageSize,
    ) -> Vec<Detection> {
        predictions
            .iter()
            .map(|prediction| self.interpret(prediction, image_size))
            .collect()
    }
}

/// Build detections with the standard policy and cost table
pub fn build_detections(predictions: &[RawPrediction], image_size: ImageSize) -> Vec<Detection> {
    DamageInterpreter::standard().build_detections(predictions, image_size)
}

pub fn estimated_total_cost(detections: &[Detection]) -> u64 {
    detections
        .iter()
        .map(|detection| detection.estimated_cost as u64)
        .sum()
}

pub fn severity_breakdown(detections: &[Detection]) -> SeverityBreakdown {
    detections
        .iter()
        .fold(SeverityBreakdown::default(), |mut breakdown, detection| {
            match detection.severity {
                Severity::Minor => breakdown.minor += 1,
                Severity::Moderate => breakdown.moderate += 1,
                Severity::Severe => breakdown.severe += 1,
            }
            breakdown
        })
}
