// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! RoboflowClient against a local stub of the hosted inference API

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use fabstir_damage_node::{
    config::InferenceConfig,
    vision::{DamageDetector, InferenceError, RoboflowClient},
};
use image::{Rgb, RgbImage};
use serde_json::json;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

const API_KEY: &str = "rf-test-key";

/// What the stub saw for each inference call
#[derive(Debug, Clone)]
struct Captured {
    model_path: String,
    api_key: Option<String>,
    content_type: Option<String>,
    image_dims: Option<(u32, u32)>,
}

#[derive(Clone)]
struct StubState {
    captured: Arc<Mutex<Vec<Captured>>>,
    reply_status: StatusCode,
    reply_body: String,
    delay: Duration,
}

async fn infer_stub(
    State(state): State<StubState>,
    Path((project, version)): Path<(String, String)>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, String) {
    let image_dims = STANDARD
        .decode(body.trim())
        .ok()
        .and_then(|bytes| image::load_from_memory(&bytes).ok())
        .map(|img| (img.width(), img.height()));

    state.captured.lock().unwrap().push(Captured {
        model_path: format!("{}/{}", project, version),
        api_key: query.get("api_key").cloned(),
        content_type: headers
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        image_dims,
    });

    tokio::time::sleep(state.delay).await;
    (state.reply_status, state.reply_body.clone())
}

async fn spawn_stub(status: StatusCode, body: serde_json::Value, delay: Duration) -> (SocketAddr, StubState) {
    let state = StubState {
        captured: Arc::new(Mutex::new(Vec::new())),
        reply_status: status,
        reply_body: body.to_string(),
        delay,
    };

    let app = Router::new()
        .route("/", get(|| async { Json(json!({"ok": true})) }))
        .route("/:project/:version", post(infer_stub))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (addr, state)
}

fn config_for(addr: SocketAddr) -> InferenceConfig {
    InferenceConfig {
        api_key: Some(API_KEY.to_string()),
        model_id: "car-damage/2".to_string(),
        api_url: format!("http://{}/", addr),
        confidence_threshold: 0.25,
        timeout_secs: 5,
    }
}

fn test_image() -> RgbImage {
    RgbImage::from_pixel(64, 48, Rgb([120, 80, 40]))
}

fn roboflow_reply() -> serde_json::Value {
    json!({
        "inference_id": "abc",
        "time": 0.042,
        "image": {"width": 64, "height": 48},
        "predictions": [
            {"x": 20.0, "y": 20.0, "width": 10.0, "height": 8.0, "confidence": 0.91,
             "class": "Headlight-Damage", "class_id": 8, "detection_id": "d1"},
            {"x": 40.0, "y": 30.0, "width": 6.0, "height": 6.0, "confidence": 0.12,
             "class": "paint-chip", "class_id": 14, "detection_id": "d2"}
        ]
    })
}

#[tokio::test]
async fn test_infer_posts_base64_jpeg_and_filters() {
    let (addr, stub) = spawn_stub(StatusCode::OK, roboflow_reply(), Duration::ZERO).await;
    let client = RoboflowClient::new(&config_for(addr)).unwrap();

    let predictions = client.infer(&test_image()).await.unwrap();

    assert_eq!(predictions.len(), 1);
    assert_eq!(predictions[0].class, "Headlight-Damage");
    assert_eq!(predictions[0].width, 10.0);

    let captured = stub.captured.lock().unwrap().clone();
    assert_eq!(captured.len(), 1);
    assert_eq!(captured[0].model_path, "car-damage/2");
    assert_eq!(captured[0].api_key.as_deref(), Some(API_KEY));
    assert_eq!(
        captured[0].content_type.as_deref(),
        Some("application/x-www-form-urlencoded")
    );
    assert_eq!(captured[0].image_dims, Some((64, 48)));
}

#[tokio::test]
async fn test_lower_threshold_keeps_more() {
    let (addr, _) = spawn_stub(StatusCode::OK, roboflow_reply(), Duration::ZERO).await;
    let mut config = config_for(addr);
    config.confidence_threshold = 0.0;
    let client = RoboflowClient::new(&config).unwrap();

    assert_eq!(client.infer(&test_image()).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_missing_predictions_is_empty() {
    let (addr, _) = spawn_stub(StatusCode::OK, json!({"time": 0.01}), Duration::ZERO).await;
    let client = RoboflowClient::new(&config_for(addr)).unwrap();

    assert!(client.infer(&test_image()).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_error_status() {
    let (addr, _) = spawn_stub(
        StatusCode::FORBIDDEN,
        json!({"message": "Forbidden"}),
        Duration::ZERO,
    )
    .await;
    let client = RoboflowClient::new(&config_for(addr)).unwrap();

    match client.infer(&test_image()).await.unwrap_err() {
        InferenceError::Status { status, body } => {
            assert_eq!(status, 403);
            assert!(body.contains("Forbidden"));
        }
        other => panic!("expected status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_malformed_response() {
    let (addr, _) = spawn_stub(
        StatusCode::OK,
        json!({"predictions": "not-a-list"}),
        Duration::ZERO,
    )
    .await;
    let client = RoboflowClient::new(&config_for(addr)).unwrap();

    let err = client.infer(&test_image()).await.unwrap_err();
    assert!(matches!(err, InferenceError::MalformedResponse(_)));
}

#[tokio::test]
async fn test_timeout() {
    let (addr, _) = spawn_stub(StatusCode::OK, roboflow_reply(), Duration::from_secs(3)).await;
    let mut config = config_for(addr);
    config.timeout_secs = 1;
    let client = RoboflowClient::new(&config).unwrap();

    let err = client.infer(&test_image()).await.unwrap_err();
    assert!(matches!(err, InferenceError::Timeout { timeout_secs: 1 }));
}

#[tokio::test]
async fn test_unreachable_service_hides_key() {
    // Bind then drop to get a port nobody listens on
    let addr = {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };
    let client = RoboflowClient::new(&config_for(addr)).unwrap();

    let err = client.infer(&test_image()).await.unwrap_err();
    assert!(matches!(err, InferenceError::Transport(_)));
    assert!(!err.to_string().contains(API_KEY));
    assert!(!client.health_check().await);
}

#[tokio::test]
async fn test_health_check() {
    let (addr, _) = spawn_stub(StatusCode::OK, roboflow_reply(), Duration::ZERO).await;
    let client = RoboflowClient::new(&config_for(addr)).unwrap();
    assert!(client.health_check().await);
}
