// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Hosted damage detection via the Roboflow inference API
//!
//! [`DamageDetector`] is the seam between the damage core and whatever model
//! produces raw predictions. [`RoboflowClient`] is the production implementation.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use image::RgbImage;
use reqwest::Client;
use std::fmt;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info};

use super::image_utils::{encode_jpeg_base64, ImageError};
use crate::config::InferenceConfig;
use crate::damage::detection::RawPrediction;

#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("Failed to encode image for inference: {0}")]
    Encode(#[from] ImageError),

    #[error("Inference request failed: {0}")]
    Transport(String),

    #[error("Inference timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("Inference service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed inference response: {0}")]
    MalformedResponse(String),
}

/// Produces raw predictions for an RGB image
#[async_trait]
pub trait DamageDetector: Send + Sync {
    /// Detector name for logs and health reports
    fn name(&self) -> &str;

    fn model_id(&self) -> &str;

    async fn infer(&self, image: &RgbImage) -> Result<Vec<RawPrediction>, InferenceError>;

    /// Whether the backing service answers at all
    async fn health_check(&self) -> bool;
}

#[derive(serde::Deserialize)]
struct InferenceResponse {
    #[serde(default)]
    predictions: Vec<RawPrediction>,
}

/// Parse a detection response body, keeping predictions at or above `threshold`
pub fn parse_predictions(body: &str, threshold: f64) -> Result<Vec<RawPrediction>, InferenceError> {
    let response: InferenceResponse =
        serde_json::from_str(body).map_err(|e| InferenceError::MalformedResponse(e.to_string()))?;

    let total = response.predictions.len();
    let kept: Vec<RawPrediction> = response
        .predictions
        .into_iter()
        .filter(|p| p.confidence >= threshold)
        .collect();

    if kept.len() < total {
        debug!(
            "Dropped {} of {} predictions below confidence {}",
            total - kept.len(),
            total,
            threshold
        );
    }
    Ok(kept)
}

/// Client for the Roboflow hosted detection endpoint
pub struct RoboflowClient {
    client: Client,
    endpoint: String,
    model_id: String,
    api_key: String,
    confidence_threshold: f64,
    timeout_secs: u64,
}

impl fmt::Debug for RoboflowClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoboflowClient")
            .field("endpoint", &self.endpoint)
            .field("model_id", &self.model_id)
            .field("confidence_threshold", &self.confidence_threshold)
            .finish_non_exhaustive()
    }
}

impl RoboflowClient {
    /// Create a client from inference settings. Fails when no API key is configured.
    pub fn new(config: &InferenceConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| anyhow!("ROBOFLOW_API_KEY is not set"))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let endpoint = config.api_url.trim_end_matches('/').to_string();
        info!(
            "Roboflow client configured: endpoint={}, model={}, confidence_threshold={}",
            endpoint, config.model_id, config.confidence_threshold
        );

        Ok(Self {
            client,
            endpoint,
            model_id: config.model_id.clone(),
            api_key,
            confidence_threshold: config.confidence_threshold,
            timeout_secs: config.timeout_secs,
        })
    }

    pub fn confidence_threshold(&self) -> f64 {
        self.confidence_threshold
    }

    fn transport_error(&self, e: reqwest::Error) -> InferenceError {
        if e.is_timeout() {
            InferenceError::Timeout {
                timeout_secs: self.timeout_secs,
            }
        } else {
            // The request URL carries the API key
            InferenceError::Transport(e.without_url().to_string())
        }
    }
}

#[async_trait]
impl DamageDetector for RoboflowClient {
    fn name(&self) -> &str {
        "roboflow"
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }

    async fn infer(&self, image: &RgbImage) -> Result<Vec<RawPrediction>, InferenceError> {
        let start = Instant::now();
        let payload = encode_jpeg_base64(image)?;
        debug!(
            "Roboflow request: model={}, image={}x{}, payload={} bytes",
            self.model_id,
            image.width(),
            image.height(),
            payload.len()
        );

        let response = self
            .client
            .post(format!("{}/{}", self.endpoint, self.model_id))
            .query(&[("api_key", self.api_key.as_str())])
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(payload)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            return Err(InferenceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let predictions = parse_predictions(&body, self.confidence_threshold)?;
        debug!(
            "Roboflow returned {} predictions in {}ms",
            predictions.len(),
            start.elapsed().as_millis()
        );
        Ok(predictions)
    }

    async fn health_check(&self) -> bool {
        match self.client.get(&self.endpoint).send().await {
            Ok(resp) => !resp.status().is_server_error(),
            Err(e) => {
                debug!("Roboflow health check failed: {}", e.without_url());
                false
            }
        }
    }
}
