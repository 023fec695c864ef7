// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use std::fmt::Write;

use crate::damage::{CostTable, DamageCategory, CURRENCY};

fn category_title(category: DamageCategory) -> &'static str {
    match category {
        DamageCategory::Dents => "Dents",
        DamageCategory::Scratches => "Scratches",
        DamageCategory::Paint => "Paint",
        DamageCategory::GlassLights => "Glass & Lights",
    }
}

/// Class catalogue grouped by category
pub fn format_classes() -> String {
    let mut out = String::new();
    for category in DamageCategory::ALL {
        let classes = category.classes();
        let _ = writeln!(out, "{} ({})", category_title(category), classes.len());
        for class in classes {
            let _ = writeln!(out, "  {}", class);
        }
    }
    out
}

/// Cost matrix as an aligned table
pub fn format_costs() -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<26} {:>8} {:>9} {:>8}   ({})",
        "class", "minor", "moderate", "severe", CURRENCY
    );
    for (class, costs) in CostTable::standard().entries() {
        let _ = writeln!(
            out,
            "{:<26} {:>8} {:>9} {:>8}",
            class.label(),
            costs.minor,
            costs.moderate,
            costs.severe
        );
    }
    out
}
