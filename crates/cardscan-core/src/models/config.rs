//! Configuration structures for the scanning pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::contact::rules::IndicatorMatch;

/// Main configuration for the cardscan pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CardscanConfig {
    /// OCR configuration.
    pub ocr: OcrConfig,

    /// Image preprocessing configuration.
    pub preprocessing: PreprocessingConfig,

    /// Contact extraction configuration.
    pub extraction: ExtractionConfig,

    /// Model configuration.
    pub models: ModelConfig,
}

/// OCR engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Minimum recognition confidence for a text box to be kept (0.0 - 1.0).
    pub recognition_threshold: f32,

    /// Keep `[UNK]` tokens emitted by the recognizer instead of blanking them.
    pub keep_unk: bool,

    /// Re-order boxes top-to-bottom, left-to-right before extraction.
    pub sort_reading_order: bool,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            recognition_threshold: 0.0,
            keep_unk: false,
            sort_reading_order: true,
        }
    }
}

/// Image preprocessing applied before OCR.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessingConfig {
    /// Convert to grayscale.
    pub grayscale: bool,

    /// Resize to this width, keeping aspect ratio (None = keep size).
    pub target_width: Option<u32>,

    /// Contrast adjustment passed to the image crate (0.0 = unchanged).
    pub contrast: f32,
}

impl Default for PreprocessingConfig {
    fn default() -> Self {
        Self {
            grayscale: true,
            target_width: Some(1000),
            contrast: 20.0,
        }
    }
}

/// Contact extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Region code for phone normalization (e.g. "IN"). None = plain digit-run matching.
    pub phone_region: Option<String>,

    /// Accept a short line as a name only if it carries an honorific.
    pub require_honorific: bool,

    /// Lower-case matched email and website values.
    pub lowercase_email: bool,

    /// How address indicator words are matched against a line.
    pub address_match: IndicatorMatch,

    /// Route lines containing company keywords (Ltd, Inc, ...) to company first.
    pub company_keywords: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            phone_region: None,
            require_honorific: false,
            lowercase_email: false,
            address_match: IndicatorMatch::Substring,
            company_keywords: false,
        }
    }
}

/// OCR model file locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Directory containing model files.
    pub model_dir: PathBuf,

    /// Text detection model file name.
    pub detection_model: String,

    /// Text recognition model file name.
    pub recognition_model: String,

    /// Character dictionary file name.
    pub dictionary: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("models"),
            detection_model: "det.onnx".to_string(),
            recognition_model: "latin_rec.onnx".to_string(),
            dictionary: "latin_dict.txt".to_string(),
        }
    }
}

impl ModelConfig {
    /// Full paths of (detection, recognition, dictionary) inside `dir`.
    pub fn paths_in(&self, dir: &std::path::Path) -> (PathBuf, PathBuf, PathBuf) {
        (
            dir.join(&self.detection_model),
            dir.join(&self.recognition_model),
            dir.join(&self.dictionary),
        )
    }
}

impl CardscanConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}
