//! Rule-based field extractors for business card lines.

pub mod address;
pub mod email;
pub mod name;
pub mod patterns;
pub mod phone;
pub mod website;

pub use address::{AddressExtractor, IndicatorMatch};
pub use email::{CaseMode, EmailExtractor};
pub use name::{NameHeuristic, NamePolicy};
pub use phone::{normalize_phone, PhoneExtractor, PhoneMode, Region};
pub use website::WebsiteExtractor;

use crate::models::contact::ContactField;

/// Trait for single-line field extractors.
///
/// Implementations are stateless; which record slot is free is decided by
/// the caller.
pub trait FieldExtractor: Send + Sync {
    /// The field this extractor fills.
    fn field(&self) -> ContactField;

    /// Extract the first occurrence of the field from a line.
    fn extract(&self, line: &str) -> Option<ExtractionMatch> {
        self.extract_all(line).into_iter().next()
    }

    /// Extract all occurrences of the field from a line.
    fn extract_all(&self, line: &str) -> Vec<ExtractionMatch>;
}

/// A value matched in a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionMatch {
    /// Extracted (possibly normalized) value.
    pub value: String,
    /// Byte span in the source line.
    pub position: Option<(usize, usize)>,
    /// Source text that was matched.
    pub source: String,
}

impl ExtractionMatch {
    pub fn new(value: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            position: None,
            source: source.into(),
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }
}
