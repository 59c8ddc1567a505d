//! Contact field extraction from recognized card lines.

mod extractor;
pub mod rules;

pub use extractor::{ContactExtractor, ExtractionResult, LineClaim};
