// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod cli;
pub mod config;
pub mod damage;
pub mod version;
pub mod vision;

// Re-export main types
pub use config::{InferenceConfig, NodeConfig, ServerConfig};
pub use damage::{
    build_detections, compare, estimated_total_cost, render, severity_breakdown, ComparisonResult,
    DamageClass, DamageInspector, Detection, RawPrediction, Severity,
};
pub use vision::{DamageDetector, InferenceError, RoboflowClient};
