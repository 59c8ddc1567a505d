//! OCR boundary: engine handles, recognized text, and image preprocessing.

mod preprocessing;
#[cfg(feature = "native")]
mod pure_engine;

pub use preprocessing::CardPreprocessor;
#[cfg(feature = "native")]
pub use pure_engine::PureOcrEngine;

use image::DynamicImage;
use serde::{Deserialize, Serialize};

use crate::error::OcrError;

/// A detected text box with its coordinates and content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextBox {
    /// Bounding box coordinates (x1, y1, x2, y2, x3, y3, x4, y4) for quadrilateral.
    pub bbox: [f32; 8],

    /// Recognized text content.
    pub text: String,

    /// Recognition confidence score (0.0 - 1.0).
    pub confidence: f32,
}

impl TextBox {
    /// Create a box with no geometry, for text that did not come from an image.
    pub fn text_only(text: impl Into<String>) -> Self {
        Self {
            bbox: [0.0; 8],
            text: text.into(),
            confidence: 1.0,
        }
    }

    /// Get the axis-aligned bounding rectangle.
    pub fn rect(&self) -> (f32, f32, f32, f32) {
        let xs = [self.bbox[0], self.bbox[2], self.bbox[4], self.bbox[6]];
        let ys = [self.bbox[1], self.bbox[3], self.bbox[5], self.bbox[7]];

        let min_x = xs.iter().cloned().fold(f32::INFINITY, f32::min);
        let max_x = xs.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
        let min_y = ys.iter().cloned().fold(f32::INFINITY, f32::min);
        let max_y = ys.iter().cloned().fold(f32::NEG_INFINITY, f32::max);

        (min_x, min_y, max_x, max_y)
    }
}

/// Result of OCR processing on an image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrResult {
    /// Recognized text boxes, in engine order unless re-sorted.
    pub boxes: Vec<TextBox>,

    /// Processing time in milliseconds.
    pub processing_time_ms: u64,

    /// Image dimensions (width, height).
    pub image_size: (u32, u32),
}

impl OcrResult {
    /// Create an empty result.
    pub fn empty(width: u32, height: u32) -> Self {
        Self {
            boxes: Vec::new(),
            processing_time_ms: 0,
            image_size: (width, height),
        }
    }

    /// Text of each box, one entry per box.
    pub fn lines(&self) -> Vec<String> {
        self.boxes.iter().map(|b| b.text.clone()).collect()
    }

    /// Full text (boxes joined with newlines).
    pub fn text(&self) -> String {
        self.boxes
            .iter()
            .map(|b| b.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Lines, or `NoText` if nothing non-blank was recognized.
    pub fn recognized(&self) -> RecognizedText {
        RecognizedText::from_lines(self.lines())
    }

    /// Sort boxes by reading order (top-to-bottom, left-to-right).
    pub fn sort_by_reading_order(&mut self) {
        self.boxes.sort_by(|a, b| {
            let (ax, ay, _, _) = a.rect();
            let (bx, by, _, _) = b.rect();

            // Group by approximate vertical position (within 20 pixels)
            let row_a = (ay / 20.0) as i32;
            let row_b = (by / 20.0) as i32;

            if row_a != row_b {
                row_a.cmp(&row_b)
            } else {
                ax.partial_cmp(&bx).unwrap_or(std::cmp::Ordering::Equal)
            }
        });
    }
}

/// Outcome of recognition: text lines, or an explicit "nothing found".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognizedText {
    /// At least one non-blank line.
    Lines(Vec<String>),
    /// The engine found no text.
    NoText,
}

impl RecognizedText {
    /// Wrap lines, mapping all-blank input to `NoText`.
    pub fn from_lines(lines: Vec<String>) -> Self {
        if lines.iter().all(|l| l.trim().is_empty()) {
            RecognizedText::NoText
        } else {
            RecognizedText::Lines(lines)
        }
    }

    /// Lines as a slice (empty for `NoText`).
    pub fn lines(&self) -> &[String] {
        match self {
            RecognizedText::Lines(lines) => lines,
            RecognizedText::NoText => &[],
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, RecognizedText::NoText)
    }
}

/// An OCR engine handle.
///
/// Built once by the host and passed to whatever needs recognition; the
/// handle owns any loaded models for its lifetime.
pub trait OcrBackend {
    /// Short engine name for logs and metadata.
    fn name(&self) -> &str;

    /// Recognize text in an image.
    fn recognize(&self, image: &DynamicImage) -> Result<OcrResult, OcrError>;
}

/// Backend that returns a fixed set of lines regardless of the image.
///
/// Used for pre-recognized text (e.g. `.txt` inputs) and in tests.
#[derive(Debug, Clone, Default)]
pub struct StaticText {
    lines: Vec<String>,
}

impl StaticText {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    /// Split newline-separated text into lines.
    pub fn from_text(text: &str) -> Self {
        Self::new(text.lines())
    }
}

impl OcrBackend for StaticText {
    fn name(&self) -> &str {
        "static"
    }

    fn recognize(&self, image: &DynamicImage) -> Result<OcrResult, OcrError> {
        let mut result = OcrResult::empty(image.width(), image.height());
        result.boxes = self.lines.iter().map(TextBox::text_only).collect();
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn boxed(text: &str, x: f32, y: f32) -> TextBox {
        TextBox {
            bbox: [x, y, x + 50.0, y, x + 50.0, y + 10.0, x, y + 10.0],
            text: text.to_string(),
            confidence: 0.9,
        }
    }

    #[test]
    fn test_sort_by_reading_order() {
        let mut result = OcrResult::empty(200, 200);
        result.boxes = vec![
            boxed("bottom", 10.0, 150.0),
            boxed("right", 120.0, 12.0),
            boxed("left", 10.0, 10.0),
        ];
        result.sort_by_reading_order();
        assert_eq!(result.lines(), vec!["left", "right", "bottom"]);
        assert_eq!(result.text(), "left\nright\nbottom");
    }

    #[test]
    fn test_recognized_text_no_text() {
        assert_eq!(RecognizedText::from_lines(vec![]), RecognizedText::NoText);
        assert_eq!(
            RecognizedText::from_lines(vec!["  ".to_string()]),
            RecognizedText::NoText
        );
        assert!(RecognizedText::NoText.lines().is_empty());
    }

    #[test]
    fn test_static_text_backend() {
        let backend = StaticText::from_text("Jane Smith\njane@acme.com");
        let image = DynamicImage::new_rgb8(10, 10);
        let result = backend.recognize(&image).unwrap();
        assert_eq!(result.lines(), vec!["Jane Smith", "jane@acme.com"]);
        assert_eq!(result.image_size, (10, 10));
    }
}
