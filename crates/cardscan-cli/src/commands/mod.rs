//! Subcommands and the helpers they share.

pub mod batch;
pub mod config;
pub mod scan;

use std::path::{Path, PathBuf};

use clap::Args;
use tracing::debug;

use cardscan_core::models::config::{CardscanConfig, ExtractionConfig};
use cardscan_core::models::contact::ContactRecord;
use cardscan_core::{ContactExtractor, PureOcrEngine};

/// Extraction options shared by `scan` and `batch`.
#[derive(Args, Clone, Default)]
pub struct ExtractionArgs {
    /// Normalize phone numbers for this region (e.g. IN, US, GB)
    #[arg(long)]
    pub region: Option<String>,

    /// Only accept short lines as names when they carry an honorific (Mr, Dr, ...)
    #[arg(long)]
    pub require_honorific: bool,

    /// Lower-case extracted email and website
    #[arg(long)]
    pub lowercase: bool,

    /// Route lines with company keywords (Ltd, Inc, ...) to company first
    #[arg(long)]
    pub company_keywords: bool,
}

impl ExtractionArgs {
    /// Overlay flags given on the command line onto the configured values.
    pub fn apply(&self, config: &mut ExtractionConfig) {
        if let Some(region) = &self.region {
            config.phone_region = Some(region.clone());
        }
        config.require_honorific |= self.require_honorific;
        config.lowercase_email |= self.lowercase;
        config.company_keywords |= self.company_keywords;
    }
}

/// How an input file is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// Raster image that needs OCR.
    Image,
    /// Text file with one recognized line per line.
    Lines,
}

/// Classify an input path by extension.
pub fn input_kind(path: &Path) -> Option<InputKind> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match extension.as_str() {
        "png" | "jpg" | "jpeg" | "webp" | "tiff" | "tif" | "bmp" => Some(InputKind::Image),
        "txt" => Some(InputKind::Lines),
        _ => None,
    }
}

/// Default configuration file location.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("cardscan")
        .join("config.json")
}

/// Load the explicit config file, else the default one if present, else defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<CardscanConfig> {
    if let Some(path) = config_path {
        return Ok(CardscanConfig::from_file(Path::new(path))?);
    }

    let default_path = default_config_path();
    if default_path.exists() {
        debug!("Using config from {}", default_path.display());
        Ok(CardscanConfig::from_file(&default_path)?)
    } else {
        Ok(CardscanConfig::default())
    }
}

/// Build the extractor from config plus command-line overrides.
pub fn build_extractor(
    config: &CardscanConfig,
    args: &ExtractionArgs,
) -> anyhow::Result<ContactExtractor> {
    let mut extraction = config.extraction.clone();
    args.apply(&mut extraction);
    Ok(ContactExtractor::from_config(&extraction)?)
}

/// Load the OCR engine once from the model directory.
pub fn load_engine(
    model_dir: Option<&Path>,
    config: &CardscanConfig,
) -> anyhow::Result<PureOcrEngine> {
    let model_dir = model_dir.unwrap_or(config.models.model_dir.as_path());
    debug!("Loading OCR models from {}", model_dir.display());

    PureOcrEngine::from_dir(model_dir, &config.models, config.ocr.clone()).map_err(|e| {
        anyhow::anyhow!(
            "{}\n\nPlace {}, {} and {} in {} or pass --model-dir.",
            e,
            config.models.detection_model,
            config.models.recognition_model,
            config.models.dictionary,
            model_dir.display()
        )
    })
}

/// Plain text rendering of a record, one field per line.
pub fn format_record_text(record: &ContactRecord) -> String {
    let mut output = String::new();

    for field in cardscan_core::ContactField::ALL {
        let value = record.get(field);
        let label = format!("{}:", capitalize(field.as_str()));
        output.push_str(&format!(
            "{:<9}{}\n",
            label,
            if value.is_empty() { "-" } else { value }
        ));
    }

    output
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_kind() {
        assert_eq!(input_kind(Path::new("card.JPG")), Some(InputKind::Image));
        assert_eq!(input_kind(Path::new("card.txt")), Some(InputKind::Lines));
        assert_eq!(input_kind(Path::new("card.pdf")), None);
    }

    #[test]
    fn test_flags_override_config() {
        let mut config = ExtractionConfig::default();
        ExtractionArgs {
            region: Some("IN".to_string()),
            require_honorific: true,
            ..Default::default()
        }
        .apply(&mut config);

        assert_eq!(config.phone_region.as_deref(), Some("IN"));
        assert!(config.require_honorific);
        assert!(!config.lowercase_email);
    }

    #[test]
    fn test_format_record_text() {
        let record = ContactRecord {
            name: "Jane Smith".to_string(),
            ..Default::default()
        };
        let text = format_record_text(&record);
        assert!(text.starts_with("Name:    Jane Smith\n"));
        assert!(text.contains("Phone:   -\n"));
    }
}
