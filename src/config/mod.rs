// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Node configuration loaded from environment variables

use std::env;
use std::fmt;
use std::path::{Path, PathBuf};

pub const DEFAULT_MODEL_ID: &str = "car-damage-detection-5ioys-4z3z4/2";
pub const DEFAULT_API_URL: &str = "https://serverless.roboflow.com";
pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.25;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Load a `.env` file (the working directory's when `path` is `None`) and default
/// `RUST_LOG` to `info`. Variables already set in the process win. Call this before
/// installing the tracing subscriber.
pub fn load_env(path: Option<&Path>) {
    let _ = match path {
        Some(path) => dotenv::from_path(path),
        None => dotenv::dotenv().map(|_| ()),
    };
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
}

/// Settings for the hosted detection model
#[derive(Clone)]
pub struct InferenceConfig {
    /// Roboflow API key; required to run inference
    pub api_key: Option<String>,
    pub model_id: String,
    pub api_url: String,
    /// Predictions below this confidence are dropped by the adapter
    pub confidence_threshold: f64,
    pub timeout_secs: u64,
}

// Hand-written so the key never reaches logs
impl fmt::Debug for InferenceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InferenceConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model_id", &self.model_id)
            .field("api_url", &self.api_url)
            .field("confidence_threshold", &self.confidence_threshold)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model_id: DEFAULT_MODEL_ID.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// HTTP server settings
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_upload_bytes: usize,
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct NodeConfig {
    pub inference: InferenceConfig,
    pub server: ServerConfig,
    /// TTF/OTF used for label text; system fonts are tried when unset
    pub font_path: Option<PathBuf>,
}

impl NodeConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source. Unparseable values fall
    /// back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            inference: InferenceConfig {
                api_key: non_empty("ROBOFLOW_API_KEY"),
                model_id: non_empty("ROBOFLOW_MODEL_ID").unwrap_or(defaults.inference.model_id),
                api_url: non_empty("ROBOFLOW_API_URL").unwrap_or(defaults.inference.api_url),
                confidence_threshold: lookup("CONFIDENCE_THRESHOLD")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.inference.confidence_threshold),
                timeout_secs: lookup("INFERENCE_TIMEOUT_SECS")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.inference.timeout_secs),
            },
            server: ServerConfig {
                host: non_empty("HOST").unwrap_or(defaults.server.host),
                port: lookup("API_PORT")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.server.port),
                max_upload_bytes: lookup("MAX_UPLOAD_BYTES")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.server.max_upload_bytes),
            },
            font_path: non_empty("DAMAGE_FONT_PATH").map(PathBuf::from),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        let threshold = self.inference.confidence_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(format!(
                "Confidence threshold must be between 0 and 1, got {}",
                threshold
            ));
        }
        if self.inference.timeout_secs == 0 {
            return Err("Inference timeout must be greater than 0".to_string());
        }
        if self.inference.model_id.is_empty() {
            return Err("Model id must not be empty".to_string());
        }
        if self.server.max_upload_bytes == 0 {
            return Err("Upload limit must be greater than 0".to_string());
        }
        Ok(())
    }

    pub fn has_api_key(&self) -> bool {
        self.inference.api_key.is_some()
    }
}
