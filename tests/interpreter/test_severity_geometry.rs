// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Severity tiers from box geometry, through the public API

use fabstir_damage_node::damage::{
    build_detections, estimate_severity, estimated_total_cost, severity_breakdown, BoundingBox,
    DamageClass, ImageSize, RawPrediction, Severity,
};

fn raw(class: &str, x: f64, y: f64, width: f64, height: f64) -> RawPrediction {
    RawPrediction {
        class: class.to_string(),
        confidence: 0.75,
        x,
        y,
        width,
        height,
    }
}

/// Box with the given area in a 100x100 image (area/10000 is the ratio)
fn box_with_area(width: i32, height: i32) -> BoundingBox {
    BoundingBox::new(0, 0, width, height)
}

#[test]
fn test_standard_thresholds() {
    let class = DamageClass::DoorOuterDent;
    // 0.08 exactly -> moderate
    assert_eq!(estimate_severity(&box_with_area(80, 10), &class, 100, 100), Severity::Moderate);
    // 0.09 -> severe
    assert_eq!(estimate_severity(&box_with_area(90, 10), &class, 100, 100), Severity::Severe);
    // 0.03 exactly -> minor
    assert_eq!(estimate_severity(&box_with_area(30, 10), &class, 100, 100), Severity::Minor);
    // 0.04 -> moderate
    assert_eq!(estimate_severity(&box_with_area(40, 10), &class, 100, 100), Severity::Moderate);
}

#[test]
fn test_critical_thresholds() {
    for class in [
        DamageClass::FrontWindscreenDamage,
        DamageClass::RearWindscreenDamage,
        DamageClass::MajorRearBumperDent,
    ] {
        assert_eq!(estimate_severity(&box_with_area(50, 10), &class, 100, 100), Severity::Moderate);
        assert_eq!(estimate_severity(&box_with_area(60, 10), &class, 100, 100), Severity::Severe);
        assert_eq!(estimate_severity(&box_with_area(20, 10), &class, 100, 100), Severity::Minor);
        assert_eq!(estimate_severity(&box_with_area(30, 10), &class, 100, 100), Severity::Moderate);
    }
}

#[test]
fn test_degenerate_geometry_is_minor() {
    let class = DamageClass::RoofDent;
    assert_eq!(
        estimate_severity(&BoundingBox::new(10, 10, 10, 90), &class, 100, 100),
        Severity::Minor
    );
    assert_eq!(
        estimate_severity(&BoundingBox::new(90, 90, 10, 10), &class, 100, 100),
        Severity::Minor
    );
    assert_eq!(
        estimate_severity(&BoundingBox::new(0, 0, 50, 50), &class, 0, 100),
        Severity::Minor
    );
}

#[test]
fn test_front_bumper_scenario() {
    let detections = build_detections(
        &[raw("front-bumper-dent", 200.0, 200.0, 100.0, 100.0)],
        ImageSize::new(640, 480),
    );

    assert_eq!(detections.len(), 1);
    assert_eq!(detections[0].bbox, BoundingBox::new(150, 150, 250, 250));
    assert_eq!(detections[0].bbox.area(), 10_000);
    assert_eq!(detections[0].severity, Severity::Moderate);
    assert_eq!(detections[0].estimated_cost, 300);
    assert_eq!(detections[0].confidence, 0.75);
}

#[test]
fn test_empty_inputs() {
    let detections = build_detections(&[], ImageSize::new(640, 480));
    assert!(detections.is_empty());
    assert_eq!(estimated_total_cost(&detections), 0);
    assert_eq!(severity_breakdown(&detections).total(), 0);
}

#[test]
fn test_order_is_preserved_without_filtering() {
    let predictions = vec![
        raw("Taillight-Damage", 10.0, 10.0, 2.0, 2.0),
        raw("Taillight-Damage", 10.0, 10.0, 2.0, 2.0),
        raw("bonnet-dent", 50.0, 50.0, 60.0, 60.0),
    ];
    let detections = build_detections(&predictions, ImageSize::new(100, 100));

    let classes: Vec<&str> = detections.iter().map(|d| d.class.label()).collect();
    assert_eq!(classes, vec!["Taillight-Damage", "Taillight-Damage", "bonnet-dent"]);
    assert_eq!(detections[2].severity, Severity::Severe);
    assert_eq!(estimated_total_cost(&detections), 100 + 100 + 800);

    let breakdown = severity_breakdown(&detections);
    assert_eq!((breakdown.minor, breakdown.moderate, breakdown.severe), (2, 0, 1));
}
