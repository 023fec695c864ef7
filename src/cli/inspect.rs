// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{anyhow, Context, Result};
use clap::Args;
use image::RgbImage;
use std::fmt::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

use crate::config::NodeConfig;
use crate::damage::annotate::GREEN;
use crate::damage::report::{detection_views, DetectSummary, DetectionView};
use crate::damage::{
    AnnotationStyle, Annotator, ComparisonResult, DamageInspector, Detection, SeverityColorMap,
};
use crate::vision::{decode_image_bytes, RoboflowClient};

/// Arguments for the detect command
#[derive(Args, Debug)]
pub struct DetectArgs {
    /// Photo to inspect
    #[arg(long)]
    pub image: PathBuf,

    /// Write the annotated image here (format from extension)
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the compare command
#[derive(Args, Debug)]
pub struct CompareArgs {
    /// Photo taken at pickup
    #[arg(long)]
    pub pickup: PathBuf,

    /// Photo taken at return
    #[arg(long = "return")]
    pub return_image: PathBuf,

    /// Directory for pickup_annotated.jpg and return_annotated.jpg
    #[arg(long)]
    pub output_dir: Option<PathBuf>,
}

/// Build an inspector and annotator from environment configuration
pub fn from_env() -> Result<(DamageInspector, Annotator)> {
    let config = NodeConfig::from_env();
    config.validate().map_err(|e| anyhow!(e))?;

    let client = RoboflowClient::new(&config.inference)
        .context("Set ROBOFLOW_API_KEY in the environment or a .env file")?;
    let style = match &config.font_path {
        Some(path) => AnnotationStyle::with_font_path(path)?,
        None => AnnotationStyle::with_system_font(),
    };

    Ok((
        DamageInspector::new(Arc::new(client)),
        Annotator::new(style),
    ))
}

/// Load and decode an image file
pub async fn load_image(path: &Path) -> Result<RgbImage> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    let (image, info) =
        decode_image_bytes(&bytes).with_context(|| format!("failed to decode {}", path.display()))?;
    info!(
        "Loaded {}: {} {}",
        path.display(),
        info.format_label(),
        info.size_label()
    );
    Ok(image)
}

fn save_image(image: &RgbImage, path: &Path) -> Result<()> {
    image
        .save(path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    println!("Annotated image written to {}", path.display());
    Ok(())
}

/// Detect damage on one photo
pub async fn detect(args: DetectArgs) -> Result<()> {
    let (inspector, annotator) = from_env()?;
    let report = run_detect(&args, &inspector, &annotator).await?;
    print!("{}", report);
    Ok(())
}

/// Run detection and return the printable report
pub async fn run_detect(
    args: &DetectArgs,
    inspector: &DamageInspector,
    annotator: &Annotator,
) -> Result<String> {
    let image = load_image(&args.image).await?;
    let detections = inspector.inspect(&image).await?;

    if let Some(output) = &args.output {
        save_image(&annotator.render(&image, &detections, None), output)?;
    }

    if args.json {
        let report = serde_json::json!({
            "summary": DetectSummary::from_detections(&detections),
            "detections": detection_views(&detections),
        });
        Ok(format!("{}\n", serde_json::to_string_pretty(&report)?))
    } else {
        Ok(format_detections(&detections))
    }
}

/// Compare pickup and return photos
pub async fn compare(args: CompareArgs) -> Result<()> {
    let (inspector, annotator) = from_env()?;
    let report = run_compare(&args, &inspector, &annotator).await?;
    print!("{}", report);
    Ok(())
}

/// Run the comparison and return the printable report
pub async fn run_compare(
    args: &CompareArgs,
    inspector: &DamageInspector,
    annotator: &Annotator,
) -> Result<String> {
    let (pickup_image, return_image) =
        tokio::try_join!(load_image(&args.pickup), load_image(&args.return_image))?;
    let result = inspector
        .compare_images(&pickup_image, &return_image)
        .await?;

    if let Some(dir) = &args.output_dir {
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("failed to create {}", dir.display()))?;
        let green = SeverityColorMap::uniform(GREEN);
        save_image(
            &annotator.render(&pickup_image, &result.pickup_damages, Some(&green)),
            &dir.join("pickup_annotated.jpg"),
        )?;
        save_image(
            &annotator.render(&return_image, &result.new_damages, None),
            &dir.join("return_annotated.jpg"),
        )?;
    }

    Ok(format_comparison(&result))
}

/// Table of detections followed by a totals line
pub fn format_detections(detections: &[Detection]) -> String {
    let mut out = String::new();
    if detections.is_empty() {
        out.push_str("No damage detected.\n");
        return out;
    }

    let _ = writeln!(
        out,
        "{:<26} {:>6} {:<9} {:>6}  bbox",
        "class", "conf", "severity", "cost"
    );
    for view in detections.iter().map(DetectionView::from) {
        let _ = writeln!(
            out,
            "{:<26} {:>5.1}% {:<9} {:>6}  ({}, {}, {}, {})",
            view.class,
            view.confidence * 100.0,
            view.severity.as_str(),
            format!("${}", view.estimated_cost),
            view.bbox.x1,
            view.bbox.y1,
            view.bbox.x2,
            view.bbox.y2
        );
    }

    let summary = DetectSummary::from_detections(detections);
    let breakdown = summary.severity_breakdown;
    let _ = writeln!(
        out,
        "\n{} damage(s), estimated ${} (minor {}, moderate {}, severe {})",
        summary.total_damages,
        summary.total_estimated_cost,
        breakdown.minor,
        breakdown.moderate,
        breakdown.severe
    );
    out
}

pub fn format_comparison(result: &ComparisonResult) -> String {
    let mut out = format!(
        "Pickup: {} damage(s), return: {} damage(s)\n",
        result.pickup_damages.len(),
        result.return_damages.len()
    );
    if result.has_new_damage() {
        out.push_str("\nNew damage:\n");
        out.push_str(&format_detections(&result.new_damages));
    }
    let _ = writeln!(out, "{}", result.summary());
    out
}
