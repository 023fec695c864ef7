// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Repair cost estimation matrix

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::OnceLock;

use super::classes::DamageClass;
use super::severity::Severity;

/// Cost returned for any class without a table entry, whatever the severity
pub const FALLBACK_COST: u32 = 100;

/// Currency of every value in the table
pub const CURRENCY: &str = "USD";

/// Repair cost for each severity tier of one class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepairCosts {
    pub minor: u32,
    pub moderate: u32,
    pub severe: u32,
}

impl RepairCosts {
    pub const fn new(minor: u32, moderate: u32, severe: u32) -> Self {
        Self {
            minor,
            moderate,
            severe,
        }
    }

    pub fn for_severity(&self, severity: Severity) -> u32 {
        match severity {
            Severity::Minor => self.minor,
            Severity::Moderate => self.moderate,
            Severity::Severe => self.severe,
        }
    }
}

/// Read-only mapping from damage class to repair costs
#[derive(Debug, Clone, Default)]
pub struct CostTable {
    entries: BTreeMap<DamageClass, RepairCosts>,
}

impl CostTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, class: DamageClass, costs: RepairCosts) -> Self {
        self.entries.insert(class, costs);
        self
    }

    /// The cost matrix the service runs with
    pub fn standard() -> &'static CostTable {
        static TABLE: OnceLock<CostTable> = OnceLock::new();
        TABLE.get_or_init(|| {
            use crate::damage::classes::DamageClass::*;
            [
                // Dents
                (BonnetDent, RepairCosts::new(150, 400, 800)),
                (DoorOuterDent, RepairCosts::new(100, 350, 700)),
                (FenderDent, RepairCosts::new(120, 380, 750)),
                (FrontBumperDent, RepairCosts::new(100, 300, 600)),
                (PillarDent, RepairCosts::new(200, 500, 1000)),
                (QuarterPanelDent, RepairCosts::new(150, 400, 800)),
                (RearBumperDent, RepairCosts::new(100, 300, 600)),
                (RoofDent, RepairCosts::new(200, 600, 1200)),
                (MediumBodyPanelDent, RepairCosts::new(150, 400, 900)),
                (MajorRearBumperDent, RepairCosts::new(300, 700, 1500)),
                (RunningBoardDent, RepairCosts::new(80, 250, 500)),
                // Scratches
                (DoorOuterScratch, RepairCosts::new(50, 150, 400)),
                (FrontBumperScratch, RepairCosts::new(50, 150, 350)),
                (RearBumperScratch, RepairCosts::new(50, 150, 350)),
                // Paint
                (DoorOuterPaintTrace, RepairCosts::new(60, 180, 450)),
                (PaintChip, RepairCosts::new(40, 120, 300)),
                (PaintTrace, RepairCosts::new(50, 150, 400)),
                // Glass and lights
                (FrontWindscreenDamage, RepairCosts::new(200, 500, 1000)),
                (RearWindscreenDamage, RepairCosts::new(200, 500, 1000)),
                (HeadlightDamage, RepairCosts::new(150, 400, 800)),
                (TaillightDamage, RepairCosts::new(100, 300, 600)),
                (SignlightDamage, RepairCosts::new(80, 200, 400)),
                (SideMirrorDamage, RepairCosts::new(100, 300, 600)),
            ]
            .into_iter()
            .fold(CostTable::new(), |table, (class, costs)| {
                table.with_entry(class, costs)
            })
        })
    }

    pub fn get(&self, class: &DamageClass) -> Option<&RepairCosts> {
        self.entries.get(class)
    }

    /// Cost of repairing `class` at `severity`, or [`FALLBACK_COST`] when the class
    /// has no entry.
    pub fn cost(&self, class: &DamageClass, severity: Severity) -> u32 {
        self.entries
            .get(class)
            .map(|costs| costs.for_severity(severity))
            .unwrap_or(FALLBACK_COST)
    }

    /// Entries in catalogue order
    pub fn entries(&self) -> impl Iterator<Item = (&DamageClass, &RepairCosts)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Look up a repair cost in the standard table
pub fn estimated_cost(damage_class: &DamageClass, severity: Severity) -> u32 {
    CostTable::standard().cost(damage_class, severity)
}
