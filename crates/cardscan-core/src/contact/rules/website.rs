//! Website extraction.

use super::email::CaseMode;
use super::patterns::WEBSITE;
use super::{ExtractionMatch, FieldExtractor};
use crate::models::contact::ContactField;

/// Website field extractor for `www.` and `http(s)://` addresses.
pub struct WebsiteExtractor {
    case: CaseMode,
}

impl WebsiteExtractor {
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

impl Default for WebsiteExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for WebsiteExtractor {
    fn field(&self) -> ContactField {
        ContactField::Website
    }

    fn extract_all(&self, line: &str) -> Vec<ExtractionMatch> {
        WEBSITE
            .find_iter(line)
            .map(|m| {
                ExtractionMatch::new(self.case.apply(m.as_str()), m.as_str())
                    .with_position(m.start(), m.end())
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_extract_www_inside_sentence() {
        let m = WebsiteExtractor::new()
            .extract("Visit www.example.com today")
            .unwrap();
        assert_eq!(m.value, "www.example.com");
    }

    #[test]
    fn test_extract_url_with_path() {
        let m = WebsiteExtractor::new()
            .extract("https://acme.co.in/contact")
            .unwrap();
        assert_eq!(m.value, "https://acme.co.in/contact");
    }

    #[test]
    fn test_lowercase_mode() {
        let m = WebsiteExtractor::new()
            .with_case(CaseMode::Lowercase)
            .extract("WWW.Acme.COM")
            .unwrap();
        assert_eq!(m.value, "www.acme.com");
    }

    #[test]
    fn test_bare_domain_not_matched() {
        assert!(WebsiteExtractor::new().extract("acme.com").is_none());
    }
}
