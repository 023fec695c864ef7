// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Severity estimation from bounding-box geometry
//!
//! Severity is driven by a single signal, the damage ratio (box area over image
//! area). Each class resolves to a pair of thresholds through [`SeverityPolicy`];
//! safety-relevant classes (windscreens, major structural dents) use stricter ones.
//! Both comparisons are strict, so a ratio sitting exactly on a threshold falls into
//! the lower tier.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

use super::classes::DamageClass;
use super::detection::BoundingBox;

/// Damage severity, ordered minor < moderate < severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Minor,
    Moderate,
    Severe,
}

impl Severity {
    pub const ALL: [Severity; 3] = [Severity::Minor, Severity::Moderate, Severity::Severe];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Minor => "minor",
            Severity::Moderate => "moderate",
            Severity::Severe => "severe",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Damage-ratio cut-offs for one class
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeverityThresholds {
    /// Ratios strictly above this are severe
    pub severe: f64,
    /// Ratios strictly above this (and not severe) are moderate
    pub moderate: f64,
}

impl SeverityThresholds {
    pub const STANDARD: SeverityThresholds = SeverityThresholds {
        severe: 0.08,
        moderate: 0.03,
    };

    pub const CRITICAL: SeverityThresholds = SeverityThresholds {
        severe: 0.05,
        moderate: 0.02,
    };

    pub fn classify(&self, damage_ratio: f64) -> Severity {
        if damage_ratio > self.severe {
            Severity::Severe
        } else if damage_ratio > self.moderate {
            Severity::Moderate
        } else {
            Severity::Minor
        }
    }
}

/// Classes whose damage is safety-relevant and judged on stricter thresholds
pub const CRITICAL_CLASSES: [DamageClass; 3] = [
    DamageClass::MajorRearBumperDent,
    DamageClass::FrontWindscreenDamage,
    DamageClass::RearWindscreenDamage,
];

/// Per-class threshold table with a default for every class not listed
#[derive(Debug, Clone)]
pub struct SeverityPolicy {
    overrides: HashMap<DamageClass, SeverityThresholds>,
    default: SeverityThresholds,
}

impl SeverityPolicy {
    pub fn new(default: SeverityThresholds) -> Self {
        Self {
            overrides: HashMap::new(),
            default,
        }
    }

    /// Assign thresholds to a specific class
    pub fn with_class(mut self, class: DamageClass, thresholds: SeverityThresholds) -> Self {
        self.overrides.insert(class, thresholds);
        self
    }

    /// The policy the service runs with: critical classes get the strict pair,
    /// everything else (including unrecognized labels) the standard pair.
    pub fn standard() -> &'static SeverityPolicy {
        static POLICY: OnceLock<SeverityPolicy> = OnceLock::new();
        POLICY.get_or_init(|| {
            CRITICAL_CLASSES.iter().fold(
                SeverityPolicy::new(SeverityThresholds::STANDARD),
                |policy, class| policy.with_class(class.clone(), SeverityThresholds::CRITICAL),
            )
        })
    }

    pub fn thresholds_for(&self, class: &DamageClass) -> SeverityThresholds {
        self.overrides.get(class).copied().unwrap_or(self.default)
    }

    pub fn is_critical(&self, class: &DamageClass) -> bool {
        self.overrides.contains_key(class)
    }

    /// Estimate severity of a box inside an image of the given dimensions
    pub fn estimate(
        &self,
        bbox: &BoundingBox,
        class: &DamageClass,
        image_height: u32,
        image_width: u32,
    ) -> Severity {
        match damage_ratio(bbox, image_height, image_width) {
            Some(ratio) => self.thresholds_for(class).classify(ratio),
            None => Severity::Minor,
        }
    }
}

/// Box area over image area; `None` for degenerate boxes or empty images
pub fn damage_ratio(bbox: &BoundingBox, image_height: u32, image_width: u32) -> Option<f64> {
    let image_area = image_height as f64 * image_width as f64;
    if bbox.is_degenerate() || image_area <= 0.0 {
        return None;
    }
    Some(bbox.area() as f64 / image_area)
}

/// Estimate severity using the standard policy
pub fn estimate_severity(
    bbox: &BoundingBox,
    damage_class: &DamageClass,
    image_height: u32,
    image_width: u32,
) -> Severity {
    SeverityPolicy::standard().estimate(bbox, damage_class, image_height, image_width)
}
