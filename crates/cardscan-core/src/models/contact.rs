//! Contact record extracted from a single business card.

use serde::{Deserialize, Serialize};

/// The six semantic fields of a business card.
///
/// Declaration order is the export column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactField {
    Name,
    Phone,
    Email,
    Company,
    Website,
    Address,
}

impl ContactField {
    /// All fields in export column order.
    pub const ALL: [ContactField; 6] = [
        ContactField::Name,
        ContactField::Phone,
        ContactField::Email,
        ContactField::Company,
        ContactField::Website,
        ContactField::Address,
    ];

    /// Column/key name of the field.
    pub fn as_str(&self) -> &'static str {
        match self {
            ContactField::Name => "name",
            ContactField::Phone => "phone",
            ContactField::Email => "email",
            ContactField::Company => "company",
            ContactField::Website => "website",
            ContactField::Address => "address",
        }
    }

    /// Parse a column name (case-insensitive).
    pub fn from_column(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        Self::ALL.into_iter().find(|f| f.as_str() == s)
    }
}

impl std::fmt::Display for ContactField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured contact data. An empty string means the field was not found.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactRecord {
    /// Person name.
    pub name: String,

    /// Telephone number.
    pub phone: String,

    /// Email address.
    pub email: String,

    /// Company or organization.
    pub company: String,

    /// Website URL or domain.
    pub website: String,

    /// Postal address, stored as the full card line.
    pub address: String,
}

impl ContactRecord {
    /// Create an all-empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the value of a field.
    pub fn get(&self, field: ContactField) -> &str {
        match field {
            ContactField::Name => &self.name,
            ContactField::Phone => &self.phone,
            ContactField::Email => &self.email,
            ContactField::Company => &self.company,
            ContactField::Website => &self.website,
            ContactField::Address => &self.address,
        }
    }

    fn slot_mut(&mut self, field: ContactField) -> &mut String {
        match field {
            ContactField::Name => &mut self.name,
            ContactField::Phone => &mut self.phone,
            ContactField::Email => &mut self.email,
            ContactField::Company => &mut self.company,
            ContactField::Website => &mut self.website,
            ContactField::Address => &mut self.address,
        }
    }

    /// Overwrite a field unconditionally. Used when re-reading exports
    /// and when a user edits the record.
    pub fn set(&mut self, field: ContactField, value: impl Into<String>) {
        *self.slot_mut(field) = value.into();
    }

    /// Store `value` only if the field is still empty.
    ///
    /// Returns `true` if the value was written. Empty values are never written.
    pub fn set_if_empty(&mut self, field: ContactField, value: impl Into<String>) -> bool {
        let value = value.into();
        let slot = self.slot_mut(field);
        if !slot.is_empty() || value.is_empty() {
            return false;
        }
        *slot = value;
        true
    }

    /// Check whether a field has a value.
    pub fn has(&self, field: ContactField) -> bool {
        !self.get(field).is_empty()
    }

    /// Check if no field has a value.
    pub fn is_empty(&self) -> bool {
        ContactField::ALL.iter().all(|f| !self.has(*f))
    }

    /// Number of populated fields.
    pub fn filled_count(&self) -> usize {
        ContactField::ALL.iter().filter(|f| self.has(**f)).count()
    }

    /// Fields that are still empty, in column order.
    pub fn missing_fields(&self) -> Vec<ContactField> {
        ContactField::ALL
            .into_iter()
            .filter(|f| !self.has(*f))
            .collect()
    }

    /// Field values in column order.
    pub fn values(&self) -> [&str; 6] {
        ContactField::ALL.map(|f| self.get(f))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_set_if_empty_keeps_first_value() {
        let mut record = ContactRecord::new();
        assert!(record.set_if_empty(ContactField::Email, "a@example.com"));
        assert!(!record.set_if_empty(ContactField::Email, "b@example.com"));
        assert_eq!(record.email, "a@example.com");
    }

    #[test]
    fn test_set_if_empty_ignores_empty_value() {
        let mut record = ContactRecord::new();
        assert!(!record.set_if_empty(ContactField::Name, ""));
        assert!(record.is_empty());
    }

    #[test]
    fn test_missing_fields() {
        let mut record = ContactRecord::new();
        record.set(ContactField::Phone, "+91 9876543210");
        record.set(ContactField::Website, "www.example.com");

        assert_eq!(record.filled_count(), 2);
        assert_eq!(
            record.missing_fields(),
            vec![
                ContactField::Name,
                ContactField::Email,
                ContactField::Company,
                ContactField::Address,
            ]
        );
    }

    #[test]
    fn test_field_from_column() {
        assert_eq!(ContactField::from_column(" Email "), Some(ContactField::Email));
        assert_eq!(ContactField::from_column("fax"), None);
    }
}
