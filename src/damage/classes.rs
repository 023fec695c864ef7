// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Damage class catalogue
//!
//! The detection model is trained on a fixed set of 23 labels. Labels the service
//! returns outside that set are kept verbatim as [`DamageClass::Unrecognized`] so
//! they still flow through severity and cost estimation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A damage category reported by the detection model
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DamageClass {
    BonnetDent,
    DoorOuterDent,
    DoorOuterPaintTrace,
    DoorOuterScratch,
    FenderDent,
    FrontBumperDent,
    FrontBumperScratch,
    FrontWindscreenDamage,
    HeadlightDamage,
    MajorRearBumperDent,
    MediumBodyPanelDent,
    PaintChip,
    PaintTrace,
    PillarDent,
    QuarterPanelDent,
    RearBumperDent,
    RearBumperScratch,
    RearWindscreenDamage,
    RoofDent,
    RunningBoardDent,
    SideMirrorDamage,
    SignlightDamage,
    TaillightDamage,
    /// A label outside the trained set, carried as returned
    Unrecognized(String),
}

impl DamageClass {
    /// Every label the model is trained on, in catalogue order
    pub const KNOWN: [DamageClass; 23] = [
        DamageClass::BonnetDent,
        DamageClass::DoorOuterDent,
        DamageClass::DoorOuterPaintTrace,
        DamageClass::DoorOuterScratch,
        DamageClass::FenderDent,
        DamageClass::FrontBumperDent,
        DamageClass::FrontBumperScratch,
        DamageClass::FrontWindscreenDamage,
        DamageClass::HeadlightDamage,
        DamageClass::MajorRearBumperDent,
        DamageClass::MediumBodyPanelDent,
        DamageClass::PaintChip,
        DamageClass::PaintTrace,
        DamageClass::PillarDent,
        DamageClass::QuarterPanelDent,
        DamageClass::RearBumperDent,
        DamageClass::RearBumperScratch,
        DamageClass::RearWindscreenDamage,
        DamageClass::RoofDent,
        DamageClass::RunningBoardDent,
        DamageClass::SideMirrorDamage,
        DamageClass::SignlightDamage,
        DamageClass::TaillightDamage,
    ];

    /// Parse a model label. Matching is exact; anything else becomes `Unrecognized`.
    pub fn from_label(label: &str) -> Self {
        match label {
            "bonnet-dent" => DamageClass::BonnetDent,
            "doorouter-dent" => DamageClass::DoorOuterDent,
            "doorouter-paint-trace" => DamageClass::DoorOuterPaintTrace,
            "doorouter-scratch" => DamageClass::DoorOuterScratch,
            "fender-dent" => DamageClass::FenderDent,
            "front-bumper-dent" => DamageClass::FrontBumperDent,
            "front-bumper-scratch" => DamageClass::FrontBumperScratch,
            "Front-Windscreen-Damage" => DamageClass::FrontWindscreenDamage,
            "Headlight-Damage" => DamageClass::HeadlightDamage,
            "Major-Rear-Bumper-Dent" => DamageClass::MajorRearBumperDent,
            "medium-Bodypanel-Dent" => DamageClass::MediumBodyPanelDent,
            "paint-chip" => DamageClass::PaintChip,
            "paint-trace" => DamageClass::PaintTrace,
            "pillar-dent" => DamageClass::PillarDent,
            "quaterpanel-dent" => DamageClass::QuarterPanelDent,
            "rear-bumper-dent" => DamageClass::RearBumperDent,
            "rear-bumper-scratch" => DamageClass::RearBumperScratch,
            "Rear-windscreen-Damage" => DamageClass::RearWindscreenDamage,
            "roof-dent" => DamageClass::RoofDent,
            "RunningBoard-Dent" => DamageClass::RunningBoardDent,
            "Sidemirror-Damage" => DamageClass::SideMirrorDamage,
            "Signlight-Damage" => DamageClass::SignlightDamage,
            "Taillight-Damage" => DamageClass::TaillightDamage,
            other => DamageClass::Unrecognized(other.to_string()),
        }
    }

    /// The label exactly as the model emits it
    pub fn label(&self) -> &str {
        match self {
            DamageClass::BonnetDent => "bonnet-dent",
            DamageClass::DoorOuterDent => "doorouter-dent",
            DamageClass::DoorOuterPaintTrace => "doorouter-paint-trace",
            DamageClass::DoorOuterScratch => "doorouter-scratch",
            DamageClass::FenderDent => "fender-dent",
            DamageClass::FrontBumperDent => "front-bumper-dent",
            DamageClass::FrontBumperScratch => "front-bumper-scratch",
            DamageClass::FrontWindscreenDamage => "Front-Windscreen-Damage",
            DamageClass::HeadlightDamage => "Headlight-Damage",
            DamageClass::MajorRearBumperDent => "Major-Rear-Bumper-Dent",
            DamageClass::MediumBodyPanelDent => "medium-Bodypanel-Dent",
            DamageClass::PaintChip => "paint-chip",
            DamageClass::PaintTrace => "paint-trace",
            DamageClass::PillarDent => "pillar-dent",
            DamageClass::QuarterPanelDent => "quaterpanel-dent",
            DamageClass::RearBumperDent => "rear-bumper-dent",
            DamageClass::RearBumperScratch => "rear-bumper-scratch",
            DamageClass::RearWindscreenDamage => "Rear-windscreen-Damage",
            DamageClass::RoofDent => "roof-dent",
            DamageClass::RunningBoardDent => "RunningBoard-Dent",
            DamageClass::SideMirrorDamage => "Sidemirror-Damage",
            DamageClass::SignlightDamage => "Signlight-Damage",
            DamageClass::TaillightDamage => "Taillight-Damage",
            DamageClass::Unrecognized(label) => label,
        }
    }

    /// Whether this label is part of the trained set
    pub fn is_known(&self) -> bool {
        !matches!(self, DamageClass::Unrecognized(_))
    }

    /// Whether the label falls into `category` (case-insensitive substring match)
    pub fn in_category(&self, category: DamageCategory) -> bool {
        let label = self.label().to_lowercase();
        category
            .keywords()
            .iter()
            .any(|keyword| label.contains(keyword))
    }
}

impl fmt::Display for DamageClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<String> for DamageClass {
    fn from(label: String) -> Self {
        DamageClass::from_label(&label)
    }
}

impl From<DamageClass> for String {
    fn from(class: DamageClass) -> Self {
        class.label().to_string()
    }
}

/// Coarse grouping used by the catalogue endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DamageCategory {
    Dents,
    Scratches,
    Paint,
    GlassLights,
}

impl DamageCategory {
    pub const ALL: [DamageCategory; 4] = [
        DamageCategory::Dents,
        DamageCategory::Scratches,
        DamageCategory::Paint,
        DamageCategory::GlassLights,
    ];

    /// Key used in JSON output
    pub fn key(&self) -> &'static str {
        match self {
            DamageCategory::Dents => "dents",
            DamageCategory::Scratches => "scratches",
            DamageCategory::Paint => "paint",
            DamageCategory::GlassLights => "glass_lights",
        }
    }

    fn keywords(&self) -> &'static [&'static str] {
        match self {
            DamageCategory::Dents => &["dent"],
            DamageCategory::Scratches => &["scratch"],
            DamageCategory::Paint => &["paint"],
            DamageCategory::GlassLights => &["windscreen", "light", "mirror"],
        }
    }

    /// Known classes in this category, in catalogue order
    pub fn classes(&self) -> Vec<DamageClass> {
        DamageClass::KNOWN
            .iter()
            .filter(|class| class.in_category(*self))
            .cloned()
            .collect()
    }
}
