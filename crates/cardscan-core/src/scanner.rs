//! Card scanning pipeline: preprocess, recognize, extract.

use std::path::Path;
use std::time::Instant;

use image::DynamicImage;
use serde::Serialize;
use tracing::{info, warn};

use crate::contact::ContactExtractor;
use crate::error::Result;
use crate::models::contact::ContactRecord;
use crate::ocr::{CardPreprocessor, OcrBackend, RecognizedText};

/// Result of scanning one card.
#[derive(Debug, Clone, Serialize)]
pub struct ScanResult {
    /// Extracted contact.
    pub record: ContactRecord,
    /// Lines the extractor saw, in the order it saw them.
    pub lines: Vec<String>,
    /// Scan warnings (no text, missing fields, ignored duplicates).
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

impl ScanResult {
    /// True if recognition produced no text.
    pub fn no_text(&self) -> bool {
        self.lines.iter().all(|l| l.trim().is_empty())
    }
}

/// Scans card images with an injected OCR engine.
pub struct CardScanner<B: OcrBackend> {
    backend: B,
    preprocessor: CardPreprocessor,
    extractor: ContactExtractor,
}

impl<B: OcrBackend> CardScanner<B> {
    /// Create a scanner with default preprocessing and extraction.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            preprocessor: CardPreprocessor::default(),
            extractor: ContactExtractor::default(),
        }
    }

    pub fn with_preprocessor(mut self, preprocessor: CardPreprocessor) -> Self {
        self.preprocessor = preprocessor;
        self
    }

    pub fn with_extractor(mut self, extractor: ContactExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    /// The OCR engine handle.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Recognize text only.
    pub fn recognize(&self, image: &DynamicImage) -> Result<RecognizedText> {
        let prepared = self.preprocessor.apply(image);
        let result = self.backend.recognize(&prepared)?;
        Ok(result.recognized())
    }

    /// Scan a decoded image.
    pub fn scan(&self, image: &DynamicImage) -> Result<ScanResult> {
        let start = Instant::now();
        let recognized = self.recognize(image)?;
        let mut result = self.scan_recognized(recognized);
        result.processing_time_ms = start.elapsed().as_millis() as u64;

        info!(
            "Scanned card with {}: {} lines, {} fields in {}ms",
            self.backend.name(),
            result.lines.len(),
            result.record.filled_count(),
            result.processing_time_ms
        );

        Ok(result)
    }

    /// Open and scan an image file.
    pub fn scan_path(&self, path: &Path) -> Result<ScanResult> {
        let image = image::open(path)?;
        self.scan(&image)
    }

    /// Run extraction on already-recognized lines.
    pub fn scan_lines<S: AsRef<str>>(&self, lines: &[S]) -> ScanResult {
        let owned = lines.iter().map(|l| l.as_ref().to_string()).collect();
        self.scan_recognized(RecognizedText::from_lines(owned))
    }

    fn scan_recognized(&self, recognized: RecognizedText) -> ScanResult {
        let start = Instant::now();

        match recognized {
            RecognizedText::NoText => {
                warn!("No text detected on card");
                ScanResult {
                    record: ContactRecord::new(),
                    lines: Vec::new(),
                    warnings: vec!["No text detected".to_string()],
                    processing_time_ms: start.elapsed().as_millis() as u64,
                }
            }
            RecognizedText::Lines(lines) => {
                let extraction = self.extractor.extract_detailed(&lines);
                ScanResult {
                    record: extraction.record,
                    lines,
                    warnings: extraction.warnings,
                    processing_time_ms: start.elapsed().as_millis() as u64,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CardscanError, OcrError};
    use crate::ocr::{OcrResult, StaticText};
    use pretty_assertions::assert_eq;

    struct FailingBackend;

    impl OcrBackend for FailingBackend {
        fn name(&self) -> &str {
            "failing"
        }

        fn recognize(&self, _image: &DynamicImage) -> std::result::Result<OcrResult, OcrError> {
            Err(OcrError::Recognition("engine crashed".to_string()))
        }
    }

    #[test]
    fn test_scan_with_static_backend() {
        let scanner = CardScanner::new(StaticText::new([
            "Dr. Arjun Rao",
            "arjun@rao-clinic.in",
            "+91 98450 12345",
        ]));
        let result = scanner.scan(&DynamicImage::new_rgb8(100, 60)).unwrap();

        assert_eq!(result.record.name, "Dr. Arjun Rao");
        assert_eq!(result.record.email, "arjun@rao-clinic.in");
        assert_eq!(result.record.phone, "+91 98450 12345");
        assert_eq!(result.lines.len(), 3);
        assert!(!result.no_text());
    }

    #[test]
    fn test_no_text_is_not_an_error() {
        let scanner = CardScanner::new(StaticText::default());
        let result = scanner.scan(&DynamicImage::new_rgb8(100, 60)).unwrap();

        assert!(result.record.is_empty());
        assert!(result.no_text());
        assert_eq!(result.warnings, vec!["No text detected".to_string()]);
    }

    #[test]
    fn test_ocr_failure_propagates() {
        let scanner = CardScanner::new(FailingBackend);
        let err = scanner.scan(&DynamicImage::new_rgb8(10, 10)).unwrap_err();
        assert!(matches!(err, CardscanError::Ocr(OcrError::Recognition(_))));
    }

    #[test]
    fn test_scan_lines_skips_ocr() {
        let scanner = CardScanner::new(FailingBackend);
        let result = scanner.scan_lines(&["Jane Smith", "www.acme.com"]);
        assert_eq!(result.record.name, "Jane Smith");
        assert_eq!(result.record.website, "www.acme.com");
    }

    #[test]
    fn test_scan_path_missing_file() {
        let scanner = CardScanner::new(StaticText::default());
        let err = scanner
            .scan_path(Path::new("/nonexistent/card.png"))
            .unwrap_err();
        assert!(matches!(err, CardscanError::Image(_)));
    }
}
