//! Single-pass contact extractor over OCR lines.

use tracing::{debug, trace};

use crate::error::CardscanError;
use crate::models::config::ExtractionConfig;
use crate::models::contact::{ContactField, ContactRecord};

use super::rules::{
    AddressExtractor, CaseMode, EmailExtractor, FieldExtractor, IndicatorMatch, NameHeuristic,
    NamePolicy, PhoneExtractor, Region, WebsiteExtractor,
};

/// A line that was claimed by one field during the scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineClaim {
    /// Index of the line in the input sequence.
    pub index: usize,
    /// Field whose rule claimed the line.
    pub field: ContactField,
    /// Value the rule produced.
    pub value: String,
    /// False if the field was already filled by an earlier line.
    pub stored: bool,
}

/// Record plus a trace of how it was built.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// Extracted contact.
    pub record: ContactRecord,
    /// One entry per line that some rule claimed, in input order.
    pub claims: Vec<LineClaim>,
    /// Extraction warnings.
    pub warnings: Vec<String>,
}

/// Rule-based contact extractor.
///
/// Lines are visited once, in input order. Each non-empty line is tried
/// against email, phone, website and address rules in that order, then the
/// name/company fallback; the first rule that matches claims the line and
/// later rules never see it. A field keeps the first value stored in it.
pub struct ContactExtractor {
    rules: Vec<Box<dyn FieldExtractor>>,
    fallback: NameHeuristic,
}

impl ContactExtractor {
    /// Create an extractor with default rules.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Create a builder.
    pub fn builder() -> ContactExtractorBuilder {
        ContactExtractorBuilder::new()
    }

    /// Create an extractor from configuration.
    pub fn from_config(config: &ExtractionConfig) -> Result<Self, CardscanError> {
        let region = match config.phone_region.as_deref() {
            Some(code) => Some(Region::from_code(code).ok_or_else(|| {
                CardscanError::Config(format!("unknown phone region: {}", code))
            })?),
            None => None,
        };

        let case = if config.lowercase_email {
            CaseMode::Lowercase
        } else {
            CaseMode::Preserve
        };

        let policy = if config.require_honorific {
            NamePolicy::RequireHonorific
        } else {
            NamePolicy::Lenient
        };

        Ok(Self::builder()
            .with_case(case)
            .with_phone_region(region)
            .with_address_match(config.address_match)
            .with_name_policy(policy)
            .with_company_keywords(config.company_keywords)
            .build())
    }

    /// Extract a contact record from OCR lines.
    pub fn extract<S: AsRef<str>>(&self, lines: &[S]) -> ContactRecord {
        self.extract_detailed(lines).record
    }

    /// Extract from newline-separated text.
    pub fn extract_from_text(&self, text: &str) -> ContactRecord {
        let lines: Vec<&str> = text.lines().collect();
        self.extract(&lines)
    }

    /// Extract a contact record and report which line filled which field.
    pub fn extract_detailed<S: AsRef<str>>(&self, lines: &[S]) -> ExtractionResult {
        let mut record = ContactRecord::new();
        let mut claims = Vec::new();
        let mut warnings = Vec::new();

        for (index, raw) in lines.iter().enumerate() {
            let line = raw.as_ref().trim();
            if line.is_empty() {
                continue;
            }

            match self.claim_line(index, line, &mut record) {
                Some(claim) => {
                    if claim.stored {
                        debug!("Line {} -> {}: {:?}", index, claim.field, claim.value);
                    } else {
                        trace!("Line {} matched {} but field already set", index, claim.field);
                        warnings.push(format!(
                            "Ignored duplicate {} on line {}: {}",
                            claim.field,
                            index + 1,
                            claim.value
                        ));
                    }
                    claims.push(claim);
                }
                None => trace!("Line {} unclaimed: {:?}", index, line),
            }
        }

        for field in record.missing_fields() {
            warnings.push(format!("Could not extract {}", field));
        }

        debug!(
            "Extracted {}/{} fields from {} lines",
            record.filled_count(),
            ContactField::ALL.len(),
            lines.len()
        );

        ExtractionResult {
            record,
            claims,
            warnings,
        }
    }

    fn claim_line(&self, index: usize, line: &str, record: &mut ContactRecord) -> Option<LineClaim> {
        for rule in &self.rules {
            if let Some(m) = rule.extract(line) {
                let field = rule.field();
                let stored = record.set_if_empty(field, m.value.clone());
                return Some(LineClaim {
                    index,
                    field,
                    value: m.value,
                    stored,
                });
            }
        }

        let field = self.fallback.classify(line, record)?;
        let stored = record.set_if_empty(field, line);
        Some(LineClaim {
            index,
            field,
            value: line.to_string(),
            stored,
        })
    }
}

impl Default for ContactExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for ContactExtractor.
pub struct ContactExtractorBuilder {
    case: CaseMode,
    phone_region: Option<Region>,
    address_match: IndicatorMatch,
    name_policy: NamePolicy,
    company_keywords: bool,
}

impl ContactExtractorBuilder {
    pub fn new() -> Self {
        Self {
            case: CaseMode::Preserve,
            phone_region: None,
            address_match: IndicatorMatch::Substring,
            name_policy: NamePolicy::Lenient,
            company_keywords: false,
        }
    }

    /// Set casing of stored email and website values.
    pub fn with_case(mut self, case: CaseMode) -> Self {
        self.case = case;
        self
    }

    /// Normalize phones against a region (None = plain digit runs).
    pub fn with_phone_region(mut self, region: Option<Region>) -> Self {
        self.phone_region = region;
        self
    }

    pub fn with_address_match(mut self, mode: IndicatorMatch) -> Self {
        self.address_match = mode;
        self
    }

    pub fn with_name_policy(mut self, policy: NamePolicy) -> Self {
        self.name_policy = policy;
        self
    }

    pub fn with_company_keywords(mut self, enabled: bool) -> Self {
        self.company_keywords = enabled;
        self
    }

    pub fn build(self) -> ContactExtractor {
        let phone = match self.phone_region {
            Some(region) => PhoneExtractor::regional(region),
            None => PhoneExtractor::new(),
        };

        let rules: Vec<Box<dyn FieldExtractor>> = vec![
            Box::new(EmailExtractor::new().with_case(self.case)),
            Box::new(phone),
            Box::new(WebsiteExtractor::new().with_case(self.case)),
            Box::new(AddressExtractor::new().with_mode(self.address_match)),
        ];

        ContactExtractor {
            rules,
            fallback: NameHeuristic::new()
                .with_policy(self.name_policy)
                .with_company_keywords(self.company_keywords),
        }
    }
}

impl Default for ContactExtractorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_card() -> Vec<&'static str> {
        vec![
            "Jane Smith",
            "Acme Software Pvt Ltd",
            "+91 98765 43210",
            "jane@acme.com",
            "www.acme.com",
            "42, MG Road, Bengaluru",
        ]
    }

    #[test]
    fn test_empty_input() {
        let record = ContactExtractor::new().extract::<&str>(&[]);
        assert!(record.is_empty());
        assert_eq!(record, ContactRecord::default());
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let record = ContactExtractor::new().extract(&["", "   ", "\t"]);
        assert!(record.is_empty());
    }

    #[test]
    fn test_full_card() {
        let record = ContactExtractor::new().extract(&sample_card());

        assert_eq!(record.name, "Jane Smith");
        assert_eq!(record.company, "Acme Software Pvt Ltd");
        assert_eq!(record.phone, "+91 98765 43210");
        assert_eq!(record.email, "jane@acme.com");
        assert_eq!(record.website, "www.acme.com");
        assert_eq!(record.address, "42, MG Road, Bengaluru");
    }

    #[test]
    fn test_deterministic() {
        let extractor = ContactExtractor::new();
        let lines = sample_card();
        assert_eq!(extractor.extract(&lines), extractor.extract(&lines));
    }

    #[test]
    fn test_duplicate_email_keeps_first() {
        let result = ContactExtractor::new().extract_detailed(&[
            "John Doe",
            "john@example.com",
            "john@example.com",
        ]);

        assert_eq!(result.record.name, "John Doe");
        assert_eq!(result.record.email, "john@example.com");
        assert!(result.record.company.is_empty());
        assert_eq!(result.claims.len(), 3);
        assert!(!result.claims[2].stored);
    }

    #[test]
    fn test_first_match_wins_per_field() {
        let record = ContactExtractor::new().extract(&[
            "www.first.com",
            "www.second.com",
            "1 Park Avenue",
            "9 Elm Street",
        ]);
        assert_eq!(record.website, "www.first.com");
        assert_eq!(record.address, "1 Park Avenue");
    }

    #[test]
    fn test_address_line_not_reused() {
        let record = ContactExtractor::new().extract(&["123 Main Street, Springfield"]);
        assert_eq!(record.address, "123 Main Street, Springfield");
        assert!(record.name.is_empty());
        assert!(record.company.is_empty());
    }

    #[test]
    fn test_address_indicator_inside_word() {
        let record = ContactExtractor::new().extract(&["Gandhinagar, Gujarat"]);
        assert_eq!(record.address, "Gandhinagar, Gujarat");
        assert!(record.name.is_empty());

        let record =
            ContactExtractor::new().extract(&["Jane Smith", "Prestige Towers, Bengaluru"]);
        assert_eq!(record.name, "Jane Smith");
        assert_eq!(record.address, "Prestige Towers, Bengaluru");
        assert!(record.company.is_empty());
    }

    #[test]
    fn test_whole_word_address_opt_in() {
        let record = ContactExtractor::builder()
            .with_address_match(IndicatorMatch::WholeWord)
            .build()
            .extract(&["Gandhinagar, Gujarat"]);
        assert_eq!(record.name, "Gandhinagar, Gujarat");
        assert!(record.address.is_empty());
    }

    #[test]
    fn test_address_beats_name() {
        let record = ContactExtractor::new().extract(&["Green Colony"]);
        assert_eq!(record.address, "Green Colony");
        assert!(record.name.is_empty());
    }

    #[test]
    fn test_name_company_fallback_order() {
        let record = ContactExtractor::new().extract(&["Acme Software Pvt Ltd", "Jane Smith"]);
        assert_eq!(record.company, "Acme Software Pvt Ltd");
        assert_eq!(record.name, "Jane Smith");
    }

    #[test]
    fn test_website_in_sentence() {
        let record = ContactExtractor::new().extract(&["Visit www.example.com today"]);
        assert!(record.website.contains("www.example.com"));
        assert!(record.company.is_empty());
    }

    #[test]
    fn test_two_numbers_on_one_line() {
        let record = ContactExtractor::new().extract(&["Jane Smith", "98765 43210 98765 43211"]);
        assert_eq!(record.phone, "98765 43210");
        assert!(record.company.is_empty());
    }

    #[test]
    fn test_line_contributes_to_one_field() {
        // email wins; the phone digits on the same line are not taken
        let record = ContactExtractor::new().extract(&["jane@acme.com | 98765 43210"]);
        assert_eq!(record.email, "jane@acme.com");
        assert!(record.phone.is_empty());
    }

    #[test]
    fn test_each_field_from_at_most_one_line() {
        let result = ContactExtractor::new().extract_detailed(&sample_card());
        for field in ContactField::ALL {
            let stored = result
                .claims
                .iter()
                .filter(|c| c.field == field && c.stored)
                .count();
            assert!(stored <= 1, "{} stored {} times", field, stored);
        }
    }

    #[test]
    fn test_regional_phone_from_config() {
        let config = ExtractionConfig {
            phone_region: Some("IN".to_string()),
            ..Default::default()
        };
        let extractor = ContactExtractor::from_config(&config).unwrap();
        let record = extractor.extract(&["Mobile: 098450 12345"]);
        assert_eq!(record.phone, "+91 9845012345");
    }

    #[test]
    fn test_unknown_region_is_config_error() {
        let config = ExtractionConfig {
            phone_region: Some("ZZ".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            ContactExtractor::from_config(&config),
            Err(CardscanError::Config(_))
        ));
    }

    #[test]
    fn test_honorific_policy() {
        let extractor = ContactExtractor::builder()
            .with_name_policy(NamePolicy::RequireHonorific)
            .build();
        let record = extractor.extract(&["Priya Sharma", "Dr. Arjun Rao"]);
        assert_eq!(record.company, "Priya Sharma");
        assert_eq!(record.name, "Dr. Arjun Rao");
    }

    #[test]
    fn test_lowercase_email_and_website() {
        let extractor = ContactExtractor::builder()
            .with_case(CaseMode::Lowercase)
            .build();
        let record = extractor.extract(&["Jane@Acme.COM", "WWW.ACME.COM"]);
        assert_eq!(record.email, "jane@acme.com");
        assert_eq!(record.website, "www.acme.com");
    }

    #[test]
    fn test_extract_from_text() {
        let text = "Jane Smith\n\njane@acme.com\n  Acme Labs Private Limited  \n";
        let record = ContactExtractor::new().extract_from_text(text);
        assert_eq!(record.name, "Jane Smith");
        assert_eq!(record.email, "jane@acme.com");
        assert_eq!(record.company, "Acme Labs Private Limited");
    }

    #[test]
    fn test_warnings_list_missing_fields() {
        let result = ContactExtractor::new().extract_detailed(&["Jane Smith"]);
        assert!(result.warnings.contains(&"Could not extract email".to_string()));
        assert!(!result.warnings.contains(&"Could not extract name".to_string()));
    }

    #[test]
    fn test_shared_across_threads() {
        let extractor = std::sync::Arc::new(ContactExtractor::new());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let extractor = extractor.clone();
                std::thread::spawn(move || {
                    let email = format!("user{}@example.com", i);
                    extractor.extract(&[email.as_str()]).email
                })
            })
            .collect();

        for (i, handle) in handles.into_iter().enumerate() {
            assert_eq!(handle.join().unwrap(), format!("user{}@example.com", i));
        }
    }
}
