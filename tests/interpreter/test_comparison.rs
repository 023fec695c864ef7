// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Count-based pickup/return diffing and annotation output

use fabstir_damage_node::damage::{
    annotate::{GREEN, ORANGE},
    build_detections, compare, render, BoundingBox, DamageClass, Detection, ImageSize,
    RawPrediction, Severity, SeverityColorMap,
};
use image::{Rgb, RgbImage};

fn detection(class: DamageClass, x1: i32, severity: Severity, cost: u32) -> Detection {
    Detection {
        class,
        confidence: 0.9,
        bbox: BoundingBox::new(x1, 40, x1 + 20, 60),
        severity,
        estimated_cost: cost,
    }
}

fn a(x1: i32) -> Detection {
    detection(DamageClass::FenderDent, x1, Severity::Moderate, 380)
}

fn b(x1: i32) -> Detection {
    detection(DamageClass::SideMirrorDamage, x1, Severity::Minor, 100)
}

#[test]
fn test_second_occurrence_only() {
    let result = compare(&[a(0)], &[a(10), a(50)]);
    assert_eq!(result.new_damages, vec![a(50)]);
    assert_eq!(result.total_new_cost, 380);
}

#[test]
fn test_absent_from_pickup() {
    let result = compare(&[], &[b(0)]);
    assert_eq!(result.new_damages, vec![b(0)]);
    assert_eq!(result.summary(), "Found 1 new damage(s). Estimated cost: $100");
}

#[test]
fn test_fewer_on_return_is_never_new() {
    let result = compare(&[a(0), a(30)], &[a(0)]);
    assert!(result.new_damages.is_empty());
    assert_eq!(result.total_new_cost, 0);
}

#[test]
fn test_location_is_ignored() {
    // Same counts, different places: nothing new
    let result = compare(&[a(0), b(0)], &[b(70), a(90)]);
    assert!(!result.has_new_damage());
}

#[test]
fn test_render_round_trip_is_identity_without_detections() {
    let image = RgbImage::from_pixel(80, 80, Rgb([12, 34, 56]));
    let once = render(&image, &[], None);
    let twice = render(&once, &[], None);
    assert_eq!(once, image);
    assert_eq!(twice, once);
}

#[test]
fn test_render_pickup_in_green() {
    let image = RgbImage::from_pixel(120, 120, Rgb([12, 34, 56]));
    let pickup = vec![a(30)];

    let default_colors = render(&image, &pickup, None);
    assert_eq!(*default_colors.get_pixel(30, 50), ORANGE);

    let green = SeverityColorMap::uniform(GREEN);
    let existing = render(&image, &pickup, Some(&green));
    assert_eq!(*existing.get_pixel(30, 50), GREEN);
    assert_eq!(*image.get_pixel(30, 50), Rgb([12, 34, 56]));
}

#[test]
fn test_render_survives_far_off_predictions() {
    let far = |x: f64, y: f64| RawPrediction {
        class: "roof-dent".to_string(),
        confidence: 0.9,
        x,
        y,
        width: 10.0,
        height: 10.0,
    };
    let detections = build_detections(
        &[far(50.0, -3e9), far(3e9, 50.0), far(-3e9, 50.0), far(50.0, 3e9)],
        ImageSize::new(100, 100),
    );
    assert_eq!(detections[0].bbox.y1, i32::MIN);
    assert_eq!(detections[1].bbox.x1, i32::MAX);

    let image = RgbImage::from_pixel(100, 100, Rgb([12, 34, 56]));
    let out = render(&image, &detections, None);
    assert_eq!(out, image);
}
