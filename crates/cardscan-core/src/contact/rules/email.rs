//! Email address extraction.

use serde::{Deserialize, Serialize};

use super::patterns::EMAIL;
use super::{ExtractionMatch, FieldExtractor};
use crate::models::contact::ContactField;

/// Casing applied to matched email and website values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseMode {
    /// Keep the text as recognized.
    #[default]
    Preserve,
    /// Lower-case the matched text.
    Lowercase,
}

impl CaseMode {
    pub fn apply(&self, s: &str) -> String {
        match self {
            CaseMode::Preserve => s.to_string(),
            CaseMode::Lowercase => s.to_lowercase(),
        }
    }
}

/// Email field extractor.
pub struct EmailExtractor {
    case: CaseMode,
}

impl EmailExtractor {
    /// Create a new email extractor that preserves case.
    pub fn new() -> Self {
        Self {
            case: CaseMode::Preserve,
        }
    }

    /// Set casing of the stored value.
    pub fn with_case(mut self, case: CaseMode) -> Self {
        self.case = case;
        self
    }
}

impl Default for EmailExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for EmailExtractor {
    fn field(&self) -> ContactField {
        ContactField::Email
    }

    fn extract_all(&self, line: &str) -> Vec<ExtractionMatch> {
        EMAIL
            .find_iter(line)
            .map(|m| {
                ExtractionMatch::new(self.case.apply(m.as_str()), m.as_str())
                    .with_position(m.start(), m.end())
            })
            .collect()
    }
}
