//! Address detection by indicator vocabulary.

use serde::{Deserialize, Serialize};

use super::patterns::{ADDRESS_INDICATORS, ADDRESS_WORD};
use super::{ExtractionMatch, FieldExtractor};
use crate::models::contact::ContactField;

/// How indicator words are looked up in a line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorMatch {
    /// Indicator may appear anywhere, including inside other words
    /// ("Gandhinagar", "Towers").
    #[default]
    Substring,
    /// Indicator must appear as a whole word ("St." matches, "Stephen" does not).
    WholeWord,
}

/// Address field extractor.
///
/// A line containing any indicator is stored whole, trimmed.
pub struct AddressExtractor {
    mode: IndicatorMatch,
}

impl AddressExtractor {
    pub fn new() -> Self {
        Self {
            mode: IndicatorMatch::Substring,
        }
    }

    pub fn with_mode(mut self, mode: IndicatorMatch) -> Self {
        self.mode = mode;
        self
    }

    /// Check whether a line carries an address indicator.
    pub fn is_address(&self, line: &str) -> bool {
        match self.mode {
            IndicatorMatch::WholeWord => ADDRESS_WORD.is_match(line),
            IndicatorMatch::Substring => {
                let lower = line.to_lowercase();
                ADDRESS_INDICATORS.iter().any(|w| lower.contains(w))
            }
        }
    }
}

impl Default for AddressExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for AddressExtractor {
    fn field(&self) -> ContactField {
        ContactField::Address
    }

    fn extract_all(&self, line: &str) -> Vec<ExtractionMatch> {
        let trimmed = line.trim();
        if trimmed.is_empty() || !self.is_address(trimmed) {
            return Vec::new();
        }
        vec![ExtractionMatch::new(trimmed, line)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_whole_line_is_stored() {
        let m = AddressExtractor::new()
            .extract("  123 Main Street, Springfield ")
            .unwrap();
        assert_eq!(m.value, "123 Main Street, Springfield");
    }

    #[test]
    fn test_regional_indicators() {
        let extractor = AddressExtractor::new();
        assert!(extractor.is_address("45, Gandhi Nagar, Bengaluru"));
        assert!(extractor.is_address("B-12 Sector 18 Noida"));
        assert!(extractor.is_address("FLAT 4, GREEN COLONY"));
    }

    #[test]
    fn test_indicator_inside_word() {
        let extractor = AddressExtractor::new();
        assert!(extractor.is_address("Gandhinagar, Gujarat"));
        assert!(extractor.is_address("Prestige Towers, Bengaluru"));
        assert!(!extractor.is_address("Jane Smith"));
    }

    #[test]
    fn test_whole_word_vs_substring() {
        let line = "Christopher Stone";
        assert!(AddressExtractor::new().is_address(line));
        assert!(!AddressExtractor::new()
            .with_mode(IndicatorMatch::WholeWord)
            .is_address(line));
    }
}
