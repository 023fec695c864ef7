// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! HTTP server: router construction and startup

use anyhow::Result;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::signal;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use super::compare::compare_handler;
use super::detect::detect_handler;
use super::handlers::{damage_classes_handler, health_handler, repair_costs_handler, root_handler};
use crate::config::ServerConfig;
use crate::damage::{Annotator, DamageInspector};
use crate::vision::DamageDetector;

/// Slack on top of the image bytes for multipart framing
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Shared state for all handlers
#[derive(Clone)]
pub struct AppState {
    pub inspector: DamageInspector,
    pub annotator: Arc<Annotator>,
    /// Per-image upload limit in bytes
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(
        detector: Arc<dyn DamageDetector>,
        annotator: Annotator,
        max_upload_bytes: usize,
    ) -> Self {
        Self {
            inspector: DamageInspector::new(detector),
            annotator: Arc::new(annotator),
            max_upload_bytes,
        }
    }
}

/// Build the router with all routes and layers
pub fn create_app(state: AppState) -> Router {
    // Compare uploads two images
    let body_limit = state.max_upload_bytes * 2 + MULTIPART_OVERHEAD_BYTES;

    Router::new()
        .route("/", get(root_handler))
        .route("/api/health", get(health_handler))
        .route("/api/detect", post(detect_handler))
        .route("/api/compare", post(compare_handler))
        .route("/api/damage-classes", get(damage_classes_handler))
        .route("/api/repair-costs", get(repair_costs_handler))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until Ctrl+C
pub async fn start_server(config: &ServerConfig, state: AppState) -> Result<()> {
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    info!("Damage API listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = signal::ctrl_c().await;
            info!("Shutdown signal received");
        })
        .await?;

    Ok(())
}
