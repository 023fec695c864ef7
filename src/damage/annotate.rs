// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Annotated image rendering
//!
//! Draws an outline per detection in its severity colour, with a filled label strip
//! above the box reading `"<class> (<confidence>%)"`. The input image is never
//! modified; a new buffer is returned.

use ab_glyph::{FontVec, PxScale};
use anyhow::{anyhow, Result};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_text_mut, text_size};
use imageproc::rect::Rect;
use std::path::Path;
use tracing::{debug, info};

use super::detection::Detection;
use super::severity::Severity;

pub const YELLOW: Rgb<u8> = Rgb([255, 255, 0]);
pub const ORANGE: Rgb<u8> = Rgb([255, 165, 0]);
pub const RED: Rgb<u8> = Rgb([255, 0, 0]);
pub const GREEN: Rgb<u8> = Rgb([0, 128, 0]);

const LABEL_TEXT_COLOR: Rgb<u8> = Rgb([255, 255, 255]);

/// Font locations tried by [`AnnotationStyle::with_system_font`]
const SYSTEM_FONT_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Outline colour for each severity tier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeverityColorMap {
    pub minor: Rgb<u8>,
    pub moderate: Rgb<u8>,
    pub severe: Rgb<u8>,
}

impl Default for SeverityColorMap {
    fn default() -> Self {
        Self {
            minor: YELLOW,
            moderate: ORANGE,
            severe: RED,
        }
    }
}

impl SeverityColorMap {
    /// Same colour for every tier, e.g. green for damage already present at pickup
    pub fn uniform(color: Rgb<u8>) -> Self {
        Self {
            minor: color,
            moderate: color,
            severe: color,
        }
    }

    pub fn color_for(&self, severity: Severity) -> Rgb<u8> {
        match severity {
            Severity::Minor => self.minor,
            Severity::Moderate => self.moderate,
            Severity::Severe => self.severe,
        }
    }
}

/// Drawing parameters. Without a font the label strips are drawn but left blank.
pub struct AnnotationStyle {
    pub font: Option<FontVec>,
    pub font_scale: f32,
    pub line_thickness: i32,
    pub label_height: u32,
    /// Minimum strip width per label character
    pub label_char_width: u32,
}

impl Default for AnnotationStyle {
    fn default() -> Self {
        Self {
            font: None,
            font_scale: 20.0,
            line_thickness: 3,
            label_height: 25,
            label_char_width: 10,
        }
    }
}

impl AnnotationStyle {
    pub fn with_font_path(font_path: &Path) -> Result<Self> {
        let font_data = std::fs::read(font_path)
            .map_err(|e| anyhow!("failed to read font {}: {}", font_path.display(), e))?;
        let font = FontVec::try_from_vec(font_data)
            .map_err(|_| anyhow!("failed to parse font file: {}", font_path.display()))?;

        Ok(Self {
            font: Some(font),
            ..Self::default()
        })
    }

    /// Load the first readable system font, or fall back to blank label strips
    pub fn with_system_font() -> Self {
        for path in SYSTEM_FONT_PATHS {
            if let Ok(style) = Self::with_font_path(Path::new(path)) {
                info!("Loaded annotation font: {}", path);
                return style;
            }
        }

        debug!("No system font found, label text will be skipped");
        Self::default()
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }
}

/// Renders detections onto copies of images
#[derive(Default)]
pub struct Annotator {
    style: AnnotationStyle,
}

impl Annotator {
    pub fn new(style: AnnotationStyle) -> Self {
        Self { style }
    }

    pub fn style(&self) -> &AnnotationStyle {
        &self.style
    }

    pub fn render(
        &self,
        image: &RgbImage,
        detections: &[Detection],
        colors: Option<&SeverityColorMap>,
    ) -> RgbImage {
        let default_colors = SeverityColorMap::default();
        let colors = colors.unwrap_or(&default_colors);

        let mut canvas = image.clone();
        for detection in detections {
            let color = colors.color_for(detection.severity);
            self.draw_box(&mut canvas, detection, color);
            self.draw_label(&mut canvas, detection, color);
        }
        canvas
    }

    fn draw_box(&self, canvas: &mut RgbImage, detection: &Detection, color: Rgb<u8>) {
        let bbox = &detection.bbox;
        if bbox.is_degenerate() {
            return;
        }

        // Corners are inclusive; the outline grows inward
        let (x1, y1, x2, y2) = (
            bbox.x1 as i64,
            bbox.y1 as i64,
            bbox.x2 as i64,
            bbox.y2 as i64,
        );
        let t = self.style.line_thickness.max(1) as i64;
        fill_clipped(canvas, x1, y1, x2, y1 + t - 1, color);
        fill_clipped(canvas, x1, y2 - t + 1, x2, y2, color);
        fill_clipped(canvas, x1, y1, x1 + t - 1, y2, color);
        fill_clipped(canvas, x2 - t + 1, y1, x2, y2, color);
    }

    fn draw_label(&self, canvas: &mut RgbImage, detection: &Detection, color: Rgb<u8>) {
        let text = label_text(detection);
        let height = self.style.label_height.max(1) as i64;
        let x = detection.bbox.x1 as i64;
        let y = detection.bbox.y1 as i64 - self.style.label_height as i64;
        let width = self.label_width(&text) as i64;

        let visible = fill_clipped(canvas, x, y, x + width - 1, y + height - 1, color);

        // Text is only placed when its strip lands on the canvas, so the
        // coordinates are close enough to it to fit in i32
        if let (true, Some(font)) = (visible, &self.style.font) {
            let scale = PxScale::from(self.style.font_scale);
            draw_text_mut(
                canvas,
                LABEL_TEXT_COLOR,
                (x + 5) as i32,
                (y + 3) as i32,
                scale,
                font,
                &text,
            );
        }
    }

    /// Strip width: at least `label_char_width` per character, widened to the
    /// measured text extent when a font is loaded.
    fn label_width(&self, text: &str) -> u32 {
        let by_chars = text.chars().count() as u32 * self.style.label_char_width;
        let measured = match &self.style.font {
            Some(font) => text_size(PxScale::from(self.style.font_scale), font, text).0 + 10,
            None => 0,
        };
        by_chars.max(measured).max(1)
    }
}

/// Fill the inclusive rectangle `(x1, y1)..=(x2, y2)` after clipping it to the
/// canvas. Returns false when nothing of it is visible.
fn fill_clipped(canvas: &mut RgbImage, x1: i64, y1: i64, x2: i64, y2: i64, color: Rgb<u8>) -> bool {
    let max_x = (canvas.width() as i64 - 1).min(i32::MAX as i64);
    let max_y = (canvas.height() as i64 - 1).min(i32::MAX as i64);
    let (left, top) = (x1.max(0), y1.max(0));
    let (right, bottom) = (x2.min(max_x), y2.min(max_y));
    if left > right || top > bottom {
        return false;
    }

    let rect = Rect::at(left as i32, top as i32)
        .of_size((right - left + 1) as u32, (bottom - top + 1) as u32);
    draw_filled_rect_mut(canvas, rect, color);
    true
}

/// `"<class> (<confidence*100 to 1 decimal>%)"`
pub fn label_text(detection: &Detection) -> String {
    format!(
        "{} ({:.1}%)",
        detection.class,
        detection.confidence * 100.0
    )
}

/// Render with the default style and an optional colour override.
///
/// The default style carries no font, so label strips are drawn without text. Use
/// [`Annotator::new`] with a font-bearing [`AnnotationStyle`] for labelled output.
pub fn render(
    image: &RgbImage,
    detections: &[Detection],
    severity_color_map: Option<&SeverityColorMap>,
) -> RgbImage {
    Annotator::default().render(image, detections, severity_color_map)
}
