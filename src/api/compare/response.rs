// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Comparison response types

use serde::{Deserialize, Serialize};

use crate::damage::report::DetectionView;
use crate::damage::ComparisonResult;

/// Counts for each side of the comparison
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ComparisonSummary {
    pub pickup_damages: usize,
    pub return_damages: usize,
    pub new_damages: usize,
    pub total_new_cost: u64,
}

impl From<&ComparisonResult> for ComparisonSummary {
    fn from(result: &ComparisonResult) -> Self {
        Self {
            pickup_damages: result.pickup_damages.len(),
            return_damages: result.return_damages.len(),
            new_damages: result.new_damages.len(),
            total_new_cost: result.total_new_cost,
        }
    }
}

/// Response from POST /api/compare
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompareResponse {
    pub success: bool,
    pub timestamp: String,
    pub comparison_summary: ComparisonSummary,
    pub new_damages: Vec<DetectionView>,
    /// Pickup photo with every pickup damage outlined in green
    pub pickup_annotated: String,
    /// Return photo with only the new damages outlined
    pub return_annotated: String,
    pub message: String,
}
