// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{anyhow, Result};
use fabstir_damage_node::{
    api::{start_server, AppState},
    config::{self, NodeConfig},
    damage::{AnnotationStyle, Annotator},
    vision::{DamageDetector, RoboflowClient},
};
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // .env may carry RUST_LOG, so it is loaded before the subscriber
    config::load_env(None);
    tracing_subscriber::fmt::init();

    println!("Starting {}", fabstir_damage_node::version::get_version_string());
    println!("BUILD VERSION: {}", fabstir_damage_node::version::VERSION);
    println!();

    let config = NodeConfig::from_env();
    config.validate().map_err(|e| anyhow!("Invalid configuration: {}", e))?;
    info!("Configuration: {:?}", config);

    if !config.has_api_key() {
        return Err(anyhow!(
            "ROBOFLOW_API_KEY is not set. Export it or add it to a .env file."
        ));
    }

    let detector = RoboflowClient::new(&config.inference)?;
    if !detector.health_check().await {
        warn!(
            "Detection endpoint {} did not respond; requests will fail until it does",
            config.inference.api_url
        );
    }

    let style = match &config.font_path {
        Some(path) => AnnotationStyle::with_font_path(path)?,
        None => AnnotationStyle::with_system_font(),
    };
    if !style.has_font() {
        warn!("No annotation font available; labels will be drawn without text");
    }

    let state = AppState::new(
        Arc::new(detector),
        Annotator::new(style),
        config.server.max_upload_bytes,
    );

    start_server(&config.server, state).await?;

    println!("Goodbye!");
    Ok(())
}
