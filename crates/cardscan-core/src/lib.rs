//! Core library for business card scanning.
//!
//! This crate provides:
//! - OCR boundary (engine handle, recognized text, image preprocessing)
//! - Contact field extraction (name, phone, email, company, website, address)
//! - Single-row spreadsheet export and import of extracted contacts

pub mod contact;
pub mod error;
pub mod export;
pub mod models;
pub mod ocr;
pub mod scanner;

pub use contact::{ContactExtractor, ExtractionResult, LineClaim};
pub use error::{CardscanError, ExportError, OcrError, Result};
pub use models::config::CardscanConfig;
pub use models::contact::{ContactField, ContactRecord};
pub use ocr::{CardPreprocessor, OcrBackend, OcrResult, RecognizedText, StaticText, TextBox};
#[cfg(feature = "native")]
pub use ocr::PureOcrEngine;
pub use scanner::{CardScanner, ScanResult};
