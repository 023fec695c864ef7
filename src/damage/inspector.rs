// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Detector + interpreter pipeline for single images and pickup/return pairs

use image::RgbImage;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

use super::compare::{compare, ComparisonResult};
use super::detection::{estimated_total_cost, Detection, DamageInterpreter, ImageSize};
use crate::vision::inference::{DamageDetector, InferenceError};

/// Runs inference and turns the raw predictions into priced detections
#[derive(Clone)]
pub struct DamageInspector {
    detector: Arc<dyn DamageDetector>,
    interpreter: DamageInterpreter<'static>,
}

impl DamageInspector {
    pub fn new(detector: Arc<dyn DamageDetector>) -> Self {
        Self::with_interpreter(detector, DamageInterpreter::standard())
    }

    pub fn with_interpreter(
        detector: Arc<dyn DamageDetector>,
        interpreter: DamageInterpreter<'static>,
    ) -> Self {
        Self {
            detector,
            interpreter,
        }
    }

    pub fn detector(&self) -> &dyn DamageDetector {
        self.detector.as_ref()
    }

    pub fn interpreter(&self) -> &DamageInterpreter<'static> {
        &self.interpreter
    }

    /// Detect damage on one image
    pub async fn inspect(&self, image: &RgbImage) -> Result<Vec<Detection>, InferenceError> {
        let start = Instant::now();
        let predictions = self.detector.infer(image).await?;
        let detections = self
            .interpreter
            .build_detections(&predictions, ImageSize::new(image.width(), image.height()));

        info!(
            "Inspection complete: {} damage(s), ${} estimated, {}ms",
            detections.len(),
            estimated_total_cost(&detections),
            start.elapsed().as_millis()
        );
        Ok(detections)
    }

    /// Inspect both images concurrently and diff them. Fails if either inference fails.
    pub async fn compare_images(
        &self,
        pickup_image: &RgbImage,
        return_image: &RgbImage,
    ) -> Result<ComparisonResult, InferenceError> {
        let (pickup, returned) =
            tokio::try_join!(self.inspect(pickup_image), self.inspect(return_image))?;

        let result = compare(&pickup, &returned);
        info!("Comparison complete: {}", result.summary());
        Ok(result)
    }
}
