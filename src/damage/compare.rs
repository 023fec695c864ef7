// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Pickup vs return damage diffing
//!
//! Matching is by per-class counts only, not by location. For each class, the first
//! `min(pickup, return)` return-side detections (in return order) are taken to be
//! pre-existing; any beyond that are new.

use serde::Serialize;
use std::collections::HashMap;

use super::classes::DamageClass;
use super::detection::{estimated_total_cost, Detection};

/// Outcome of comparing a pickup photo with a return photo
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonResult {
    pub pickup_damages: Vec<Detection>,
    pub return_damages: Vec<Detection>,
    pub new_damages: Vec<Detection>,
    pub total_new_cost: u64,
}

impl ComparisonResult {
    /// Human-readable one-liner for reports
    pub fn summary(&self) -> String {
        format!(
            "Found {} new damage(s). Estimated cost: ${}",
            self.new_damages.len(),
            self.total_new_cost
        )
    }

    pub fn has_new_damage(&self) -> bool {
        !self.new_damages.is_empty()
    }
}

pub fn compare(pickup_detections: &[Detection], return_detections: &[Detection]) -> ComparisonResult {
    let mut pickup_counts: HashMap<&DamageClass, usize> = HashMap::new();
    for detection in pickup_detections {
        *pickup_counts.entry(&detection.class).or_insert(0) += 1;
    }

    let mut seen: HashMap<&DamageClass, usize> = HashMap::new();
    let mut new_damages = Vec::new();
    for detection in return_detections {
        let occurrence = seen.entry(&detection.class).or_insert(0);
        *occurrence += 1;
        if *occurrence > pickup_counts.get(&detection.class).copied().unwrap_or(0) {
            new_damages.push(detection.clone());
        }
    }

    let total_new_cost = estimated_total_cost(&new_damages);

    ComparisonResult {
        pickup_damages: pickup_detections.to_vec(),
        return_damages: return_detections.to_vec(),
        new_damages,
        total_new_cost,
    }
}
