// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Vehicle damage interpretation
//!
//! Turns raw object-detection predictions into severity-graded, priced detections,
//! renders annotated images and diffs pickup/return inspections.

pub mod annotate;
pub mod classes;
pub mod compare;
pub mod costs;
pub mod detection;
pub mod inspector;
pub mod report;
pub mod severity;

pub use annotate::{render, AnnotationStyle, Annotator, SeverityColorMap};
pub use classes::{DamageCategory, DamageClass};
pub use compare::{compare, ComparisonResult};
pub use costs::{estimated_cost, CostTable, RepairCosts, CURRENCY, FALLBACK_COST};
pub use detection::{
    build_detections, estimated_total_cost, severity_breakdown, BoundingBox, DamageInterpreter,
    Detection, ImageSize, RawPrediction, SeverityBreakdown,
};
pub use inspector::DamageInspector;
pub use report::{detection_views, round_confidence, DetectSummary, DetectionView};
pub use severity::{estimate_severity, Severity, SeverityPolicy, SeverityThresholds};
