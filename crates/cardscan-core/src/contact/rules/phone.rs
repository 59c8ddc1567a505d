//! Telephone number extraction and regional normalization.

use serde::{Deserialize, Serialize};

use super::patterns::PHONE;
use super::{ExtractionMatch, FieldExtractor};
use crate::models::contact::ContactField;

/// Minimum digits for a plain digit-run match.
const MIN_DIGITS: usize = 8;
/// Maximum digits of an E.164 number.
const MAX_DIGITS: usize = 15;

/// Regions with known numbering plans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Region {
    India,
    UnitedStates,
    UnitedKingdom,
    Poland,
    Germany,
    Australia,
    Singapore,
    UnitedArabEmirates,
}

/// Numbering plan facts needed for normalization.
struct Plan {
    calling_code: &'static str,
    trunk_prefix: &'static str,
    min_len: usize,
    max_len: usize,
}

impl Region {
    pub const ALL: [Region; 8] = [
        Region::India,
        Region::UnitedStates,
        Region::UnitedKingdom,
        Region::Poland,
        Region::Germany,
        Region::Australia,
        Region::Singapore,
        Region::UnitedArabEmirates,
    ];

    /// ISO 3166-1 alpha-2 code.
    pub fn code(&self) -> &'static str {
        match self {
            Region::India => "IN",
            Region::UnitedStates => "US",
            Region::UnitedKingdom => "GB",
            Region::Poland => "PL",
            Region::Germany => "DE",
            Region::Australia => "AU",
            Region::Singapore => "SG",
            Region::UnitedArabEmirates => "AE",
        }
    }

    /// Parse an ISO alpha-2 code (case-insensitive).
    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim().to_uppercase();
        Self::ALL.into_iter().find(|r| r.code() == code)
    }

    /// Country calling code without the leading `+`.
    pub fn calling_code(&self) -> &'static str {
        self.plan().calling_code
    }

    fn plan(&self) -> Plan {
        let (calling_code, trunk_prefix, min_len, max_len) = match self {
            Region::India => ("91", "0", 10, 10),
            Region::UnitedStates => ("1", "1", 10, 10),
            Region::UnitedKingdom => ("44", "0", 9, 10),
            Region::Poland => ("48", "", 9, 9),
            Region::Germany => ("49", "0", 6, 11),
            Region::Australia => ("61", "0", 9, 9),
            Region::Singapore => ("65", "", 8, 8),
            Region::UnitedArabEmirates => ("971", "0", 8, 9),
        };
        Plan {
            calling_code,
            trunk_prefix,
            min_len,
            max_len,
        }
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// How phone candidates are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhoneMode {
    /// Accept any digit run of plausible length, stored as written.
    Pattern,
    /// Accept only numbers valid for the region's plan, stored as `+<cc> <number>`.
    Regional(Region),
}

/// Phone field extractor.
pub struct PhoneExtractor {
    mode: PhoneMode,
}

impl PhoneExtractor {
    /// Create a new extractor using plain digit-run matching.
    pub fn new() -> Self {
        Self {
            mode: PhoneMode::Pattern,
        }
    }

    /// Create an extractor that normalizes against a default region.
    pub fn regional(region: Region) -> Self {
        Self {
            mode: PhoneMode::Regional(region),
        }
    }

    pub fn mode(&self) -> PhoneMode {
        self.mode
    }
}

impl Default for PhoneExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for PhoneExtractor {
    fn field(&self) -> ContactField {
        ContactField::Phone
    }

    fn extract_all(&self, line: &str) -> Vec<ExtractionMatch> {
        let mut results = Vec::new();

        for m in PHONE.find_iter(line) {
            let run = m.as_str();
            let pieces = if digit_count(run) > MAX_DIGITS {
                split_run(run)
            } else {
                vec![(0, run.len())]
            };

            for (start, end) in pieces {
                let candidate = &run[start..end];
                let value = match self.mode {
                    PhoneMode::Pattern => {
                        if !(MIN_DIGITS..=MAX_DIGITS).contains(&digit_count(candidate)) {
                            continue;
                        }
                        candidate.to_string()
                    }
                    PhoneMode::Regional(region) => match normalize_phone(candidate, region) {
                        Some(v) => v,
                        None => continue,
                    },
                };

                results.push(
                    ExtractionMatch::new(value, candidate)
                        .with_position(m.start() + start, m.start() + end),
                );
            }
        }

        results
    }
}

fn digit_count(text: &str) -> usize {
    text.chars().filter(|c| c.is_ascii_digit()).count()
}

/// Split a run holding several numbers at whitespace into phone-sized pieces.
///
/// Returns byte spans within `run`. A segmentation covering every group is
/// preferred; otherwise the shortest phone-sized prefixes are taken left to right.
fn split_run(run: &str) -> Vec<(usize, usize)> {
    let mut groups = Vec::new();
    let mut start = None;
    for (i, c) in run.char_indices() {
        match (c.is_whitespace(), start) {
            (false, None) => start = Some(i),
            (true, Some(s)) => {
                groups.push((s, i, digit_count(&run[s..i])));
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        groups.push((s, run.len(), digit_count(&run[s..])));
    }

    if let Some(pieces) = segment(&groups) {
        return pieces;
    }

    let mut pieces = Vec::new();
    let mut i = 0;
    while i < groups.len() {
        match shortest_piece(&groups[i..]) {
            Some(k) => {
                pieces.push((groups[i].0, groups[i + k - 1].1));
                i += k;
            }
            None => i += 1,
        }
    }
    pieces
}

/// Number of leading groups forming the shortest phone-sized piece.
fn shortest_piece(groups: &[(usize, usize, usize)]) -> Option<usize> {
    let mut digits = 0;
    for (k, group) in groups.iter().enumerate() {
        digits += group.2;
        if digits > MAX_DIGITS {
            return None;
        }
        if digits >= MIN_DIGITS {
            return Some(k + 1);
        }
    }
    None
}

fn segment(groups: &[(usize, usize, usize)]) -> Option<Vec<(usize, usize)>> {
    if groups.is_empty() {
        return Some(Vec::new());
    }

    let mut digits = 0;
    for (k, group) in groups.iter().enumerate() {
        digits += group.2;
        if digits > MAX_DIGITS {
            break;
        }
        if digits >= MIN_DIGITS {
            if let Some(mut rest) = segment(&groups[k + 1..]) {
                rest.insert(0, (groups[0].0, group.1));
                return Some(rest);
            }
        }
    }
    None
}

/// Normalize a written phone number to international form `+<cc> <number>`.
///
/// Numbers written with `+` or `00` are read as international; anything
/// else is read as a national number of `region` (with or without trunk
/// prefix or a bare calling code). Returns `None` if the digits do not fit
/// any known plan.
pub fn normalize_phone(text: &str, region: Region) -> Option<String> {
    let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }

    if text.trim_start().starts_with('+') {
        return format_international(&digits, region);
    }
    if let Some(rest) = digits.strip_prefix("00") {
        return format_international(rest, region);
    }

    let plan = region.plan();
    let fits = |n: &str| (plan.min_len..=plan.max_len).contains(&n.len());

    if !plan.trunk_prefix.is_empty() {
        if let Some(national) = digits.strip_prefix(plan.trunk_prefix) {
            if fits(national) {
                return Some(format!("+{} {}", plan.calling_code, national));
            }
        }
    }
    if fits(&digits) {
        return Some(format!("+{} {}", plan.calling_code, digits));
    }
    if let Some(national) = digits.strip_prefix(plan.calling_code) {
        if fits(national) {
            return Some(format!("+{} {}", plan.calling_code, national));
        }
    }

    None
}

/// Split international digits into calling code and national number.
fn format_international(digits: &str, preferred: Region) -> Option<String> {
    let regions = std::iter::once(preferred).chain(Region::ALL.into_iter().filter(|r| *r != preferred));

    for region in regions {
        let plan = region.plan();
        if let Some(national) = digits.strip_prefix(plan.calling_code) {
            if (plan.min_len..=plan.max_len).contains(&national.len()) {
                return Some(format!("+{} {}", plan.calling_code, national));
            }
        }
    }

    // Unknown plan: keep the number if it is E.164-sized.
    if (MIN_DIGITS..=MAX_DIGITS).contains(&digits.len()) {
        Some(format!("+{}", digits))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_pattern_mode_keeps_written_form() {
        let m = PhoneExtractor::new()
            .extract("Tel: +1 (555) 123-4567")
            .unwrap();
        assert_eq!(m.value, "+1 (555) 123-4567");
    }

    #[test]
    fn test_pattern_mode_rejects_short_runs() {
        assert!(PhoneExtractor::new().extract("Suite 1200").is_none());
        assert!(PhoneExtractor::new().extract("PIN 560 001").is_none());
    }

    #[test]
    fn test_adjacent_numbers_are_split() {
        let matches = PhoneExtractor::new().extract_all("98765 43210 98765 43211");
        let values: Vec<_> = matches.iter().map(|m| m.value.as_str()).collect();
        assert_eq!(values, vec!["98765 43210", "98765 43211"]);
        assert_eq!(matches[1].position, Some((12, 23)));
    }

    #[test]
    fn test_adjacent_numbers_regional() {
        let m = PhoneExtractor::regional(Region::India)
            .extract("98765 43210 98450 12345")
            .unwrap();
        assert_eq!(m.value, "+91 9876543210");
    }

    #[test]
    fn test_normalize_indian_numbers() {
        let expected = Some("+91 9876543210".to_string());
        assert_eq!(normalize_phone("+91 98765 43210", Region::India), expected);
        assert_eq!(normalize_phone("098765 43210", Region::India), expected);
        assert_eq!(normalize_phone("98765-43210", Region::India), expected);
        assert_eq!(normalize_phone("91 98765 43210", Region::India), expected);
        assert_eq!(normalize_phone("0091 98765 43210", Region::India), expected);
    }

    #[test]
    fn test_normalize_foreign_number_with_plus() {
        assert_eq!(
            normalize_phone("+44 20 7946 0958", Region::India),
            Some("+44 2079460958".to_string())
        );
    }

    #[test]
    fn test_normalize_rejects_wrong_length() {
        assert_eq!(normalize_phone("12345678", Region::India), None);
    }

    #[test]
    fn test_regional_extractor() {
        let extractor = PhoneExtractor::regional(Region::India);
        let m = extractor.extract("Mob. 98450 12345").unwrap();
        assert_eq!(m.value, "+91 9845012345");
        assert_eq!(m.source, "98450 12345");

        assert!(extractor.extract("Fax 1234 5678").is_none());
    }

    #[test]
    fn test_region_from_code() {
        assert_eq!(Region::from_code("in"), Some(Region::India));
        assert_eq!(Region::from_code("XX"), None);
    }
}
