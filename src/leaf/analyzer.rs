//! Leaf health scoring from the share of green pixels in HSV space.

use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

/// Inclusive band treated as "green", on the 8-bit OpenCV scale
/// (hue 0-180, saturation and value 0-255). The saturation/value floor
/// excludes near-black, near-white, and grayish pixels.
const GREEN_HUE_MIN: f32 = 25.0;
const GREEN_HUE_MAX: f32 = 85.0;
const GREEN_SAT_MIN: f32 = 40.0;
const GREEN_VAL_MIN: f32 = 40.0;

const HEALTHY_ABOVE: f64 = 0.70;
const MODERATE_ABOVE: f64 = 0.40;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("image file not found at {0}")]
    NotFound(PathBuf),
    #[error("failed to process image: {0}")]
    InvalidImage(String),
    #[error("error reading image")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HealthStatus {
    Healthy,
    Moderate,
    Unhealthy,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthAssessment {
    pub health_status: HealthStatus,
    pub green_percentage: f64,
    pub recommendations: Vec<&'static str>,
}

/// Classify leaf health from raw image bytes.
///
/// The image is decoded, converted to HSV, and the share of pixels inside
/// the green band becomes the score. HSV separates color identity from
/// brightness, so a fixed hue band holds up across lighting conditions where
/// a raw RGB threshold would not.
pub fn analyze_image(bytes: &[u8]) -> Result<HealthAssessment, AnalysisError> {
    let img =
        image::load_from_memory(bytes).map_err(|e| AnalysisError::InvalidImage(e.to_string()))?;
    let rgb = img.to_rgb8();

    let total = rgb.width() as u64 * rgb.height() as u64;
    if total == 0 {
        return Err(AnalysisError::InvalidImage("image has no pixels".into()));
    }

    let green = rgb
        .pixels()
        .filter(|p| is_green(p.0[0], p.0[1], p.0[2]))
        .count() as u64;
    let ratio = green as f64 / total as f64;

    let health_status = classify(ratio);
    Ok(HealthAssessment {
        health_status,
        green_percentage: round2(ratio * 100.0),
        recommendations: recommendations(health_status),
    })
}

/// Analyze a previously saved upload.
pub async fn analyze_file(path: &Path) -> Result<HealthAssessment, AnalysisError> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(AnalysisError::NotFound(path.to_path_buf()))
        }
        Err(e) => return Err(AnalysisError::Io(e)),
    };
    analyze_image(&bytes)
}

fn is_green(r: u8, g: u8, b: u8) -> bool {
    let (h, s, v) = rgb_to_hsv(r, g, b);
    (GREEN_HUE_MIN..=GREEN_HUE_MAX).contains(&h) && s >= GREEN_SAT_MIN && v >= GREEN_VAL_MIN
}

/// RGB to HSV on the 8-bit OpenCV scale: hue in [0, 180), saturation and
/// value in [0, 255].
fn rgb_to_hsv(r: u8, g: u8, b: u8) -> (f32, f32, f32) {
    let (r, g, b) = (r as f32, g as f32, b as f32);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let value = max;
    let saturation = if max == 0.0 { 0.0 } else { 255.0 * delta / max };
    let hue = if delta == 0.0 {
        0.0
    } else if max == r {
        60.0 * (g - b) / delta
    } else if max == g {
        120.0 + 60.0 * (b - r) / delta
    } else {
        240.0 + 60.0 * (r - g) / delta
    };
    let hue = if hue < 0.0 { hue + 360.0 } else { hue };
    (hue / 2.0, saturation, value)
}

/// Ties go to the lower bucket: exactly 0.70 is Moderate, exactly 0.40 is
/// Unhealthy.
fn classify(ratio: f64) -> HealthStatus {
    if ratio > HEALTHY_ABOVE {
        HealthStatus::Healthy
    } else if ratio > MODERATE_ABOVE {
        HealthStatus::Moderate
    } else {
        HealthStatus::Unhealthy
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Fixed, ordered advice per health tier.
fn recommendations(status: HealthStatus) -> Vec<&'static str> {
    match status {
        HealthStatus::Healthy => vec!["Continue current care regime", "Regular watering"],
        HealthStatus::Moderate => vec![
            "Increase watering",
            "Check for pests",
            "Consider fertilization",
        ],
        HealthStatus::Unhealthy => vec![
            "Urgent attention needed",
            "Check for disease",
            "Adjust sunlight exposure",
        ],
    }
}
