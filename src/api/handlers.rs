// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Service info and catalogue handlers

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::http_server::AppState;
use crate::damage::{CostTable, DamageCategory, DamageClass, RepairCosts, CURRENCY};
use crate::version;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootResponse {
    pub message: String,
    pub version: String,
    /// Build string, date and feature list
    pub build: serde_json::Value,
    pub endpoints: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorStatus {
    pub name: String,
    pub reachable: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// "healthy", or "degraded" when the detector is unreachable
    pub status: String,
    pub timestamp: String,
    pub model: String,
    pub damage_classes: usize,
    pub detector: DetectorStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DamageClassesResponse {
    pub total_classes: usize,
    pub classes: Vec<String>,
    pub categories: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepairCostsResponse {
    pub currency: String,
    /// Keyed by model label
    pub costs: BTreeMap<String, RepairCosts>,
}

/// GET /
pub async fn root_handler() -> Json<RootResponse> {
    let endpoints = [
        ("health", "/api/health"),
        ("detect", "/api/detect"),
        ("compare", "/api/compare"),
        ("damage_classes", "/api/damage-classes"),
        ("repair_costs", "/api/repair-costs"),
    ]
    .into_iter()
    .map(|(name, path)| (name.to_string(), path.to_string()))
    .collect();

    Json(RootResponse {
        message: "Vehicle Damage Detection API".to_string(),
        version: version::VERSION_NUMBER.to_string(),
        build: version::get_version_info(),
        endpoints,
    })
}

/// GET /api/health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let detector = state.inspector.detector();
    let reachable = detector.health_check().await;

    Json(HealthResponse {
        status: if reachable { "healthy" } else { "degraded" }.to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        model: detector.model_id().to_string(),
        damage_classes: DamageClass::KNOWN.len(),
        detector: DetectorStatus {
            name: detector.name().to_string(),
            reachable,
        },
    })
}

/// GET /api/damage-classes
pub async fn damage_classes_handler() -> Json<DamageClassesResponse> {
    let labels = |classes: &[DamageClass]| -> Vec<String> {
        classes.iter().map(|c| c.label().to_string()).collect()
    };

    let categories = DamageCategory::ALL
        .iter()
        .map(|category| (category.key().to_string(), labels(&category.classes())))
        .collect();

    Json(DamageClassesResponse {
        total_classes: DamageClass::KNOWN.len(),
        classes: labels(&DamageClass::KNOWN),
        categories,
    })
}

/// GET /api/repair-costs
pub async fn repair_costs_handler() -> Json<RepairCostsResponse> {
    let costs = CostTable::standard()
        .entries()
        .map(|(class, costs)| (class.label().to_string(), *costs))
        .collect();

    Json(RepairCostsResponse {
        currency: CURRENCY.to_string(),
        costs,
    })
}
