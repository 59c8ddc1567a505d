//! Image preprocessing for card OCR.

use image::{imageops::FilterType, DynamicImage, GenericImageView};
use tracing::debug;

use crate::models::config::PreprocessingConfig;

/// Grayscale, resize and contrast steps applied before recognition.
#[derive(Debug, Clone)]
pub struct CardPreprocessor {
    grayscale: bool,
    target_width: Option<u32>,
    contrast: f32,
}

impl CardPreprocessor {
    /// Create a preprocessor that leaves images unchanged.
    pub fn new() -> Self {
        Self {
            grayscale: false,
            target_width: None,
            contrast: 0.0,
        }
    }

    /// Create a preprocessor from configuration.
    pub fn from_config(config: &PreprocessingConfig) -> Self {
        Self {
            grayscale: config.grayscale,
            target_width: config.target_width,
            contrast: config.contrast,
        }
    }

    pub fn with_grayscale(mut self, grayscale: bool) -> Self {
        self.grayscale = grayscale;
        self
    }

    /// Resize to this width, keeping aspect ratio.
    pub fn with_target_width(mut self, width: Option<u32>) -> Self {
        self.target_width = width;
        self
    }

    /// Contrast adjustment; positive increases, negative decreases.
    pub fn with_contrast(mut self, contrast: f32) -> Self {
        self.contrast = contrast;
        self
    }

    /// Apply the configured steps.
    pub fn apply(&self, image: &DynamicImage) -> DynamicImage {
        let (width, height) = image.dimensions();
        let mut out = if self.grayscale {
            image.grayscale()
        } else {
            image.clone()
        };

        if let Some(target) = self.target_width {
            if target > 0 && width > 0 && target != width {
                let (new_width, new_height) = scaled_dimensions(width, height, target);
                out = out.resize_exact(new_width, new_height, FilterType::Lanczos3);
                debug!(
                    "Resized card image {}x{} -> {}x{}",
                    width, height, new_width, new_height
                );
            }
        }

        if self.contrast != 0.0 {
            out = out.adjust_contrast(self.contrast);
        }

        out
    }
}

impl Default for CardPreprocessor {
    fn default() -> Self {
        Self::from_config(&PreprocessingConfig::default())
    }
}

fn scaled_dimensions(width: u32, height: u32, target_width: u32) -> (u32, u32) {
    let scale = target_width as f64 / width as f64;
    let new_height = ((height as f64 * scale).round() as u32).max(1);
    (target_width, new_height)
}
