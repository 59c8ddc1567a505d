//! Regex patterns and indicator vocabularies for business card lines.

use lazy_static::lazy_static;
use regex::Regex;

/// Words and abbreviations that mark a line as a postal address.
pub const ADDRESS_INDICATORS: &[&str] = &[
    "street", "st", "road", "rd", "avenue", "ave", "lane", "ln", "boulevard", "blvd",
    "drive", "highway", "floor", "suite", "building", "bldg", "block", "plot", "apartment",
    "apt", "tower", "complex", "nagar", "colony", "sector", "layout", "marg", "chowk",
    "cross", "phase", "district", "pincode",
];

/// Title prefixes that signal a person's name.
pub const HONORIFICS: &[&str] = &[
    "mr", "mrs", "ms", "miss", "dr", "prof", "sir", "shri", "smt",
];

/// Words that mark a line as an organization name.
pub const COMPANY_KEYWORDS: &[&str] = &[
    "ltd", "limited", "pvt", "private", "inc", "llc", "llp", "corp", "corporation",
    "gmbh", "software", "solutions", "technologies", "systems", "services", "consulting",
    "enterprises", "industries",
];

fn word_alternation(words: &[&str]) -> String {
    format!(r"(?i)\b(?:{})\b", words.join("|"))
}

lazy_static! {
    // Email: local-part@domain.tld
    pub static ref EMAIL: Regex = Regex::new(
        r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}"
    ).unwrap();

    // Phone candidate: digit run with optional leading + and separators
    pub static ref PHONE: Regex = Regex::new(
        r"\+?\(?\d[\d\s().\-]{6,}\d"
    ).unwrap();

    // Website: www.domain.tld or http(s)://domain.tld, optional path
    pub static ref WEBSITE: Regex = Regex::new(
        r"(?i)\b(?:https?://(?:www\.)?|www\.)[A-Za-z0-9-]+(?:\.[A-Za-z0-9-]+)*\.[A-Za-z]{2,}(?:/[^\s]*)?"
    ).unwrap();

    pub static ref ADDRESS_WORD: Regex = Regex::new(&word_alternation(ADDRESS_INDICATORS)).unwrap();

    pub static ref COMPANY_WORD: Regex = Regex::new(&word_alternation(COMPANY_KEYWORDS)).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_word_respects_boundaries() {
        assert!(ADDRESS_WORD.is_match("12 Baker St."));
        assert!(ADDRESS_WORD.is_match("Sector 62, Noida"));
        assert!(!ADDRESS_WORD.is_match("Stephen Christopher"));
    }

    #[test]
    fn test_website_requires_prefix() {
        assert!(WEBSITE.is_match("https://acme.io"));
        assert!(WEBSITE.is_match("WWW.ACME.CO.IN"));
        assert!(!WEBSITE.is_match("acme.io"));
    }
}
