//! WASM bindings for business card contact extraction.
//!
//! OCR runs in the browser (or any JS engine); the recognized lines are
//! handed to these bindings for field extraction and spreadsheet export.

use wasm_bindgen::prelude::*;

use cardscan_core::contact::rules::{CaseMode, IndicatorMatch, NamePolicy, Region};
use cardscan_core::models::contact::ContactRecord;
use cardscan_core::{export, ContactExtractor};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Extract a contact from an array of recognized lines.
#[wasm_bindgen(js_name = extractContact)]
pub fn extract_contact(lines: js_sys::Array) -> Result<JsValue, JsValue> {
    let lines = array_to_lines(&lines);
    to_js(&ContactExtractor::new().extract(&lines))
}

/// Extract a contact from newline-separated text.
#[wasm_bindgen(js_name = extractContactFromText)]
pub fn extract_contact_from_text(text: &str) -> Result<JsValue, JsValue> {
    to_js(&ContactExtractor::new().extract_from_text(text))
}

/// Serialize a contact object as a single-row CSV table.
#[wasm_bindgen(js_name = contactToCsv)]
pub fn contact_to_csv(contact: JsValue) -> Result<String, JsValue> {
    let record: ContactRecord = serde_wasm_bindgen::from_value(contact)?;
    export::to_csv_string(&record).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Read a contact object back from a CSV table.
#[wasm_bindgen(js_name = contactFromCsv)]
pub fn contact_from_csv(data: &str) -> Result<JsValue, JsValue> {
    let record = export::from_csv_str(data).map_err(|e| JsValue::from_str(&e.to_string()))?;
    to_js(&record)
}

/// Configurable extractor for browser use.
#[wasm_bindgen]
pub struct CardExtractor {
    region: Option<Region>,
    require_honorific: bool,
    lowercase: bool,
    address_match: IndicatorMatch,
    company_keywords: bool,
    extractor: ContactExtractor,
}

#[wasm_bindgen]
impl CardExtractor {
    /// Create an extractor with default rules.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            region: None,
            require_honorific: false,
            lowercase: false,
            address_match: IndicatorMatch::default(),
            company_keywords: false,
            extractor: ContactExtractor::new(),
        }
    }

    /// Normalize phone numbers for a region code ("IN", "US", ...). Empty string disables.
    #[wasm_bindgen(js_name = setPhoneRegion)]
    pub fn set_phone_region(&mut self, code: &str) -> Result<(), JsValue> {
        self.region = if code.trim().is_empty() {
            None
        } else {
            Some(
                Region::from_code(code)
                    .ok_or_else(|| JsValue::from_str(&format!("unknown phone region: {}", code)))?,
            )
        };
        self.rebuild();
        Ok(())
    }

    /// Only accept short lines as names when they carry an honorific.
    #[wasm_bindgen(js_name = setRequireHonorific)]
    pub fn set_require_honorific(&mut self, required: bool) {
        self.require_honorific = required;
        self.rebuild();
    }

    /// Lower-case extracted email and website.
    #[wasm_bindgen(js_name = setLowercase)]
    pub fn set_lowercase(&mut self, lowercase: bool) {
        self.lowercase = lowercase;
        self.rebuild();
    }

    /// Address indicator matching: "substring" (default) or "whole_word".
    #[wasm_bindgen(js_name = setAddressMatch)]
    pub fn set_address_match(&mut self, mode: &str) -> Result<(), JsValue> {
        self.address_match = match mode.trim().to_lowercase().as_str() {
            "substring" => IndicatorMatch::Substring,
            "whole_word" | "wholeword" => IndicatorMatch::WholeWord,
            other => {
                return Err(JsValue::from_str(&format!(
                    "unknown address match mode: {}",
                    other
                )))
            }
        };
        self.rebuild();
        Ok(())
    }

    /// Route lines with company keywords (Ltd, Inc, ...) to company first.
    #[wasm_bindgen(js_name = setCompanyKeywords)]
    pub fn set_company_keywords(&mut self, enabled: bool) {
        self.company_keywords = enabled;
        self.rebuild();
    }

    /// Extract a contact from an array of lines.
    #[wasm_bindgen]
    pub fn extract(&self, lines: js_sys::Array) -> Result<JsValue, JsValue> {
        let lines = array_to_lines(&lines);
        to_js(&self.extractor.extract(&lines))
    }

    /// Extract with the list of warnings (missing fields, ignored duplicates).
    #[wasm_bindgen(js_name = extractWithWarnings)]
    pub fn extract_with_warnings(&self, lines: js_sys::Array) -> Result<JsValue, JsValue> {
        let lines = array_to_lines(&lines);
        let result = self.extractor.extract_detailed(&lines);

        #[derive(serde::Serialize)]
        struct ExtractOutput {
            contact: ContactRecord,
            warnings: Vec<String>,
        }

        to_js(&ExtractOutput {
            contact: result.record,
            warnings: result.warnings,
        })
    }

    fn rebuild(&mut self) {
        self.extractor = ContactExtractor::builder()
            .with_phone_region(self.region)
            .with_name_policy(if self.require_honorific {
                NamePolicy::RequireHonorific
            } else {
                NamePolicy::Lenient
            })
            .with_case(if self.lowercase {
                CaseMode::Lowercase
            } else {
                CaseMode::Preserve
            })
            .with_address_match(self.address_match)
            .with_company_keywords(self.company_keywords)
            .build();
    }
}

impl Default for CardExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Non-string array entries become empty lines, which the extractor skips.
fn array_to_lines(lines: &js_sys::Array) -> Vec<String> {
    lines
        .iter()
        .map(|v| v.as_string().unwrap_or_default())
        .collect()
}

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn lines(items: &[&str]) -> js_sys::Array {
        items.iter().map(|s| JsValue::from_str(s)).collect()
    }

    fn record(value: JsValue) -> ContactRecord {
        serde_wasm_bindgen::from_value(value).unwrap()
    }

    #[wasm_bindgen_test]
    fn test_extract_contact() {
        let value = extract_contact(lines(&["Jane Smith", "jane@acme.com"])).unwrap();
        let contact = record(value);
        assert_eq!(contact.name, "Jane Smith");
        assert_eq!(contact.email, "jane@acme.com");
    }

    #[wasm_bindgen_test]
    fn test_csv_round_trip() {
        let value = extract_contact_from_text("Jane Smith\nwww.acme.com").unwrap();
        let csv = contact_to_csv(value).unwrap();
        let back = record(contact_from_csv(&csv).unwrap());
        assert_eq!(back.website, "www.acme.com");
    }

    #[wasm_bindgen_test]
    fn test_regional_extractor() {
        let mut extractor = CardExtractor::new();
        extractor.set_phone_region("IN").unwrap();
        let contact = record(extractor.extract(lines(&["98765 43210"])).unwrap());
        assert_eq!(contact.phone, "+91 9876543210");
        assert!(extractor.set_phone_region("ZZ").is_err());
    }

    #[wasm_bindgen_test]
    fn test_address_match_and_company_keywords() {
        let mut extractor = CardExtractor::new();
        extractor.set_address_match("whole_word").unwrap();
        let contact = record(extractor.extract(lines(&["Gandhinagar, Gujarat"])).unwrap());
        assert_eq!(contact.name, "Gandhinagar, Gujarat");
        assert!(extractor.set_address_match("fuzzy").is_err());

        extractor.set_company_keywords(true);
        let contact = record(extractor.extract(lines(&["Acme Pvt Ltd", "Jane Smith"])).unwrap());
        assert_eq!(contact.company, "Acme Pvt Ltd");
        assert_eq!(contact.name, "Jane Smith");
    }
}
