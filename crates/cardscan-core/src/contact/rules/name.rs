//! Name/company fallback for lines no pattern claimed.

use super::patterns::{COMPANY_WORD, HONORIFICS};
use crate::models::contact::{ContactField, ContactRecord};

/// Maximum words in a line accepted as a person's name.
pub const MAX_NAME_WORDS: usize = 3;

/// When a short line is accepted as a name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NamePolicy {
    /// Any line of up to three words.
    #[default]
    Lenient,
    /// Up to three words, one of which is an honorific (Mr, Dr, ...).
    RequireHonorific,
}

/// Classifies unclaimed lines as name or company by word count.
#[derive(Debug, Clone, Default)]
pub struct NameHeuristic {
    policy: NamePolicy,
    company_keywords: bool,
}

impl NameHeuristic {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(mut self, policy: NamePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Send lines containing company keywords to `company` before the name test.
    pub fn with_company_keywords(mut self, enabled: bool) -> Self {
        self.company_keywords = enabled;
        self
    }

    /// Decide which still-empty field a trimmed line should fill, if any.
    pub fn classify(&self, line: &str, record: &ContactRecord) -> Option<ContactField> {
        let words = line.split_whitespace().count();
        if words == 0 {
            return None;
        }

        if self.company_keywords
            && !record.has(ContactField::Company)
            && COMPANY_WORD.is_match(line)
        {
            return Some(ContactField::Company);
        }

        if words <= MAX_NAME_WORDS && !record.has(ContactField::Name) && self.accepts_name(line) {
            return Some(ContactField::Name);
        }

        if words > 1 && !record.has(ContactField::Company) {
            return Some(ContactField::Company);
        }

        None
    }

    fn accepts_name(&self, line: &str) -> bool {
        match self.policy {
            NamePolicy::Lenient => true,
            NamePolicy::RequireHonorific => has_honorific(line),
        }
    }
}

/// Check whether any word of the line is an honorific ("Dr.", "mr", ...).
pub fn has_honorific(line: &str) -> bool {
    line.split_whitespace().any(|word| {
        let word = word.trim_end_matches(['.', ',']).to_lowercase();
        HONORIFICS.contains(&word.as_str())
    })
}
