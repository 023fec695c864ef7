// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! POST /api/detect tests
//!
//! Drives the router with a scripted detector and hand-built multipart bodies.

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::Value;
use tower::util::ServiceExt; // for `oneshot`

use crate::common::{
    app_with, app_with_limit, marked_image, multipart_body, noisy_image, png_bytes, prediction,
    ScriptedDetector,
};

async fn post_detect(detector: ScriptedDetector, parts: &[(&str, &str, Vec<u8>)]) -> (StatusCode, Value) {
    post_detect_to(app_with(detector), parts).await
}

async fn post_detect_to(app: axum::Router, parts: &[(&str, &str, Vec<u8>)]) -> (StatusCode, Value) {
    let (content_type, body) = multipart_body(parts);

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/detect")
        .header("content-type", content_type)
        .body(Body::from(body))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_detect_front_bumper_dent() {
    let detector = ScriptedDetector::new().with_script(
        0,
        vec![prediction("front-bumper-dent", 200.0, 200.0, 100.0, 100.0)],
    );
    let image = png_bytes(&marked_image(640, 480, 0));

    let (status, json) = post_detect(detector, &[("file", "car.png", image)]).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["image_info"]["filename"], "car.png");
    assert_eq!(json["image_info"]["size"], "640x480");
    assert_eq!(json["image_info"]["format"], "PNG");

    assert_eq!(json["summary"]["total_damages"], 1);
    assert_eq!(json["summary"]["total_estimated_cost"], 300);
    assert_eq!(
        json["summary"]["severity_breakdown"],
        serde_json::json!({"minor": 0, "moderate": 1, "severe": 0})
    );

    let detection = &json["detections"][0];
    assert_eq!(detection["class"], "front-bumper-dent");
    assert_eq!(detection["confidence"], 0.8765);
    assert_eq!(detection["severity"], "moderate");
    assert_eq!(detection["estimated_cost"], 300);
    assert_eq!(
        detection["bbox"],
        serde_json::json!({"x1": 150, "y1": 150, "x2": 250, "y2": 250})
    );
}

#[tokio::test]
async fn test_annotated_image_is_jpeg_of_same_size() {
    let detector = ScriptedDetector::new().with_script(
        0,
        vec![prediction("roof-dent", 50.0, 50.0, 40.0, 40.0)],
    );
    let image = png_bytes(&marked_image(120, 90, 0));

    let (status, json) = post_detect(detector, &[("file", "roof.png", image)]).await;
    assert_eq!(status, StatusCode::OK);

    let data_url = json["annotated_image"].as_str().unwrap();
    let encoded = data_url
        .strip_prefix("data:image/jpeg;base64,")
        .expect("jpeg data url");
    let decoded = image::load_from_memory(&STANDARD.decode(encoded).unwrap()).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (120, 90));
}

#[tokio::test]
async fn test_no_damage_is_success() {
    let detector = ScriptedDetector::new().with_script(0, vec![]);
    let image = png_bytes(&marked_image(64, 64, 0));

    let (status, json) = post_detect(detector, &[("file", "clean.png", image)]).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["summary"]["total_damages"], 0);
    assert_eq!(json["summary"]["total_estimated_cost"], 0);
    assert_eq!(json["detections"], serde_json::json!([]));
}

#[tokio::test]
async fn test_unrecognized_label_uses_fallback_cost() {
    let detector = ScriptedDetector::new().with_script(
        0,
        vec![prediction("hubcap-missing", 10.0, 10.0, 4.0, 4.0)],
    );
    let image = png_bytes(&marked_image(100, 100, 0));

    let (status, json) = post_detect(detector, &[("file", "wheel.png", image)]).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["detections"][0]["class"], "hubcap-missing");
    assert_eq!(json["detections"][0]["estimated_cost"], 100);
}

#[tokio::test]
async fn test_extra_fields_are_ignored() {
    let detector = ScriptedDetector::new().with_script(0, vec![]);
    let image = png_bytes(&marked_image(32, 32, 0));

    let (status, _) = post_detect(
        detector,
        &[("note", "note.txt", b"hello".to_vec()), ("file", "car.png", image)],
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_missing_file_field() {
    let detector = ScriptedDetector::new().with_script(0, vec![]);
    let image = png_bytes(&marked_image(32, 32, 0));

    let (status, json) = post_detect(detector, &[("image", "car.png", image)]).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error_type"], "validation_error");
    assert_eq!(json["details"]["field"], "file");
}

#[tokio::test]
async fn test_undecodable_upload() {
    let detector = ScriptedDetector::new().with_script(0, vec![]);

    let (status, json) = post_detect(
        detector,
        &[("file", "car.png", b"definitely not an image".to_vec())],
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["message"].as_str().unwrap().contains("Invalid image"));
}

#[tokio::test]
async fn test_detector_failure_is_bad_gateway() {
    // Marker 7 has no script, so the detector fails
    let detector = ScriptedDetector::new();
    let image = png_bytes(&marked_image(32, 32, 7));

    let (status, json) = post_detect(detector, &[("file", "car.png", image)]).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(json["error_type"], "upstream_failure");
}

#[tokio::test]
async fn test_upload_over_per_image_limit() {
    let image = png_bytes(&noisy_image(200, 200, 0));
    assert!(image.len() > 50_000);

    let app = app_with_limit(ScriptedDetector::new().with_script(0, vec![]), 50_000);
    let (status, json) = post_detect_to(app, &[("file", "big.png", image)]).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error_type"], "validation_error");
    assert_eq!(json["details"]["field"], "file");
}

#[tokio::test]
async fn test_body_over_request_limit() {
    // 1 KB per image allows a body of 2 KB plus multipart slack
    let image = png_bytes(&noisy_image(200, 200, 0));
    assert!(image.len() > 2 * 1_000 + 64 * 1024);

    let app = app_with_limit(ScriptedDetector::new().with_script(0, vec![]), 1_000);
    let (status, json) = post_detect_to(app, &[("file", "huge.png", image)]).await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(json["error_type"], "payload_too_large");
}
