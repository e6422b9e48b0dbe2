use super::scene::SceneConfig;
use crate::hough::{HoughCircleParams, HoughLineParams};
use serde::Deserialize;
use std::path::PathBuf;

/// Configuration of the `hough_lines` tool.
#[derive(Debug, Deserialize)]
pub struct HoughToolConfig {
    #[serde(default)]
    pub scene: SceneConfig,
    /// Binarization level applied to the scene before voting.
    #[serde(default = "default_threshold")]
    pub threshold: u8,
    #[serde(default)]
    pub lines: HoughLineParams,
    /// Circle detection runs only when this section is present.
    #[serde(default)]
    pub circles: Option<HoughCircleParams>,
    #[serde(default)]
    pub report: HoughReportConfig,
    pub output: HoughOutputConfig,
}

fn default_threshold() -> u8 {
    128
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct HoughReportConfig {
    /// Upper bound on the number of lines and circles written out.
    pub max_detections: usize,
    /// Drop detections weaker than this fraction of the strongest one.
    pub min_relative_intensity: f64,
}

impl Default for HoughReportConfig {
    fn default() -> Self {
        Self {
            max_detections: 16,
            min_relative_intensity: 0.0,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct HoughOutputConfig {
    pub report_json: PathBuf,
}
