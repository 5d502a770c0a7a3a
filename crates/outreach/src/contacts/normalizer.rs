//! Mapping raw records onto the canonical contact shape.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use crate::contacts::mapping::{CanonicalField, FieldMapping};
use crate::ingest::RawRecord;
use crate::template::{CompanyRef, ContactPayload, PersonContext};

/// A normalized contact. Every field is optional; a contact is only retained
/// when it has an email, both name parts, or a full name. The originating
/// record travels along for display and re-export.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Contact {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(rename = "originalData")]
    pub source: RawRecord,
}

impl Contact {
    /// Whether this contact carries enough data to be worth keeping.
    pub fn is_retainable(&self) -> bool {
        self.email.is_some()
            || (self.first_name.is_some() && self.last_name.is_some())
            || self.full_name.is_some()
    }

    /// Canonical fields present on this contact, in canonical order.
    pub fn present_fields(&self) -> Vec<&'static str> {
        let pairs: [(CanonicalField, bool); 13] = [
            (CanonicalField::FirstName, self.first_name.is_some()),
            (CanonicalField::LastName, self.last_name.is_some()),
            (CanonicalField::FullName, self.full_name.is_some()),
            (CanonicalField::Email, self.email.is_some()),
            (CanonicalField::Title, self.title.is_some()),
            (CanonicalField::Company, self.company.is_some()),
            (CanonicalField::Domain, self.domain.is_some()),
            (CanonicalField::LinkedinUrl, self.linkedin_url.is_some()),
            (CanonicalField::Phone, self.phone.is_some()),
            (CanonicalField::City, self.city.is_some()),
            (CanonicalField::State, self.state.is_some()),
            (CanonicalField::Country, self.country.is_some()),
            (CanonicalField::Industry, self.industry.is_some()),
        ];
        pairs
            .into_iter()
            .filter_map(|(field, present)| present.then(|| field.as_str()))
            .collect()
    }

    fn field_mut(&mut self, field: CanonicalField) -> &mut Option<String> {
        match field {
            CanonicalField::FirstName => &mut self.first_name,
            CanonicalField::LastName => &mut self.last_name,
            CanonicalField::FullName => &mut self.full_name,
            CanonicalField::Email => &mut self.email,
            CanonicalField::Title => &mut self.title,
            CanonicalField::Company => &mut self.company,
            CanonicalField::Domain => &mut self.domain,
            CanonicalField::LinkedinUrl => &mut self.linkedin_url,
            CanonicalField::Phone => &mut self.phone,
            CanonicalField::City => &mut self.city,
            CanonicalField::State => &mut self.state,
            CanonicalField::Country => &mut self.country,
            CanonicalField::Industry => &mut self.industry,
        }
    }
}

impl From<&Contact> for ContactPayload {
    fn from(contact: &Contact) -> Self {
        ContactPayload {
            person: PersonContext {
                first_name: contact.first_name.clone(),
                last_name: contact.last_name.clone(),
                full_name: contact.full_name.clone(),
                email: contact.email.clone(),
                title: contact.title.clone(),
                linkedin_url: contact.linkedin_url.clone(),
                city: contact.city.clone(),
                state: contact.state.clone(),
                country: contact.country.clone(),
                location: None,
            },
            company: contact.company.clone().map(CompanyRef::Name),
            company_name: None,
        }
    }
}

/// Normalizes raw records against a synonym table. Deterministic: the same
/// records and mapping always produce the same contacts. Records failing the
/// retention invariant are dropped.
pub fn normalize(records: &[RawRecord], mapping: &FieldMapping) -> Vec<Contact> {
    records
        .iter()
        .filter_map(|record| {
            let contact = normalize_record(record, mapping);
            contact.is_retainable().then_some(contact)
        })
        .collect()
}

fn normalize_record(record: &RawRecord, mapping: &FieldMapping) -> Contact {
    let mut contact = Contact {
        source: record.clone(),
        ..Contact::default()
    };

    for (field, synonyms) in mapping.iter() {
        if let Some(value) = match_column(record, synonyms) {
            *contact.field_mut(field) = Some(value.to_string());
        }
    }

    derive_names(&mut contact);

    if let Some(email) = contact.email.take() {
        contact.email = Some(email.to_lowercase().trim().to_string());
    }
    if let Some(domain) = contact.domain.take() {
        contact.domain = Some(clean_domain(&domain));
    }

    contact
}

/// Finds the first column matching any synonym. Both sides are compared in
/// lower case; a match is equality or either string containing the other.
/// Synonym-list order decides ties, not column order.
fn match_column<'a>(record: &'a RawRecord, synonyms: &[String]) -> Option<&'a str> {
    for synonym in synonyms {
        let synonym = synonym.to_lowercase();
        for (column, value) in record {
            let column = column.to_lowercase();
            if column == synonym || column.contains(&synonym) || synonym.contains(&column) {
                return Some(value.as_str());
            }
        }
    }
    None
}

/// Fills in whichever of fullName / firstName+lastName is missing from the
/// other. A one-word full name yields no split.
fn derive_names(contact: &mut Contact) {
    if contact.full_name.is_none()
        && (contact.first_name.is_some() || contact.last_name.is_some())
    {
        let joined = format!(
            "{} {}",
            contact.first_name.as_deref().unwrap_or_default(),
            contact.last_name.as_deref().unwrap_or_default()
        )
        .trim()
        .to_string();
        if !joined.is_empty() {
            contact.full_name = Some(joined);
        }
    }

    if let Some(full_name) = contact.full_name.clone() {
        if contact.first_name.is_none() || contact.last_name.is_none() {
            let parts: Vec<&str> = full_name.split_whitespace().collect();
            if parts.len() >= 2 {
                contact
                    .first_name
                    .get_or_insert_with(|| parts[0].to_string());
                contact
                    .last_name
                    .get_or_insert_with(|| parts[1..].join(" "));
            }
        }
    }
}

/// Strips a leading scheme and `www.` plus any trailing slash, then lower-cases.
fn clean_domain(raw: &str) -> String {
    static PREFIX: OnceLock<Regex> = OnceLock::new();
    let prefix = PREFIX.get_or_init(|| {
        Regex::new(r"^(https?://)?(www\.)?").expect("static domain prefix pattern")
    });

    let stripped = prefix.replace(raw, "");
    let stripped = stripped.strip_suffix('/').unwrap_or(&stripped);
    stripped.to_lowercase().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn record(pairs: &[(&str, &str)]) -> RawRecord {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn maps_synonym_columns() {
        let records = vec![record(&[
            ("E-Mail", "Ana@Acme.IO"),
            ("Given_Name", "Ana"),
            ("Surname", "Lima"),
            ("Organization", "Acme"),
        ])];
        let contacts = normalize(&records, &FieldMapping::default());
        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].email.as_deref(), Some("ana@acme.io"));
        assert_eq!(contacts[0].first_name.as_deref(), Some("Ana"));
        assert_eq!(contacts[0].company.as_deref(), Some("Acme"));
    }

    #[test]
    fn substring_matching_goes_both_ways() {
        // Column contains the synonym.
        let records = vec![record(&[("Work Email Address", "a@b.com")])];
        let contacts = normalize(&records, &FieldMapping::default());
        assert_eq!(contacts[0].email.as_deref(), Some("a@b.com"));

        // Synonym contains the column.
        let records = vec![record(&[("mail", "c@d.com"), ("name", "Jo Doe")])];
        let contacts = normalize(&records, &FieldMapping::default());
        assert_eq!(contacts[0].email.as_deref(), Some("c@d.com"));
    }

    #[test]
    fn full_name_is_derived_from_parts() {
        // Override the table so the name-part columns cannot also satisfy a
        // fullName synonym by substring overlap.
        let mut overrides = BTreeMap::new();
        overrides.insert(CanonicalField::FirstName, vec!["fn".to_string()]);
        overrides.insert(CanonicalField::LastName, vec!["ln".to_string()]);
        overrides.insert(CanonicalField::FullName, vec!["full".to_string()]);
        let mapping = FieldMapping::default().merged(&overrides);

        let records = vec![record(&[("fn", "Jane"), ("ln", "Doe")])];
        let contacts = normalize(&records, &mapping);
        assert_eq!(contacts[0].full_name.as_deref(), Some("Jane Doe"));
    }

    #[test]
    fn name_part_columns_also_satisfy_the_full_name_synonym() {
        // The bidirectional substring rule makes "first_name" match the
        // fullName synonym "name", so fullName picks up that column's value
        // instead of the joined parts. Faithful behavior, not a bug to fix.
        let records = vec![record(&[("first_name", "Jane"), ("last_name", "Doe")])];
        let contacts = normalize(&records, &FieldMapping::default());
        assert_eq!(contacts[0].first_name.as_deref(), Some("Jane"));
        assert_eq!(contacts[0].last_name.as_deref(), Some("Doe"));
        assert_eq!(contacts[0].full_name.as_deref(), Some("Jane"));
    }

    #[test]
    fn parts_are_derived_from_full_name() {
        let records = vec![record(&[("Full Name", "Jane Doe")])];
        let contacts = normalize(&records, &FieldMapping::default());
        assert_eq!(contacts[0].first_name.as_deref(), Some("Jane"));
        assert_eq!(contacts[0].last_name.as_deref(), Some("Doe"));

        let records = vec![record(&[("Full Name", "Jane Anne Doe")])];
        let contacts = normalize(&records, &FieldMapping::default());
        assert_eq!(contacts[0].first_name.as_deref(), Some("Jane"));
        assert_eq!(contacts[0].last_name.as_deref(), Some("Anne Doe"));
    }

    #[test]
    fn single_word_full_name_is_not_split() {
        let records = vec![record(&[("full_name", "Prince")])];
        let contacts = normalize(&records, &FieldMapping::default());
        assert_eq!(contacts[0].full_name.as_deref(), Some("Prince"));
        assert!(contacts[0].first_name.is_none());
        assert!(contacts[0].last_name.is_none());
    }

    #[test]
    fn domain_is_cleaned() {
        let records = vec![record(&[
            ("email", "a@b.com"),
            ("company_domain", "https://www.Example.com/"),
        ])];
        let contacts = normalize(&records, &FieldMapping::default());
        assert_eq!(contacts[0].domain.as_deref(), Some("example.com"));
    }

    #[test]
    fn rows_without_essential_data_are_dropped() {
        let records = vec![
            record(&[("title", "CTO"), ("city", "Austin")]),
            record(&[("email", "keep@example.com")]),
            record(&[("phone", "+1-555-0100")]),
        ];
        let contacts = normalize(&records, &FieldMapping::default());
        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].email.as_deref(), Some("keep@example.com"));
    }

    #[test]
    fn mapping_overrides_take_effect() {
        let mut overrides = BTreeMap::new();
        overrides.insert(CanonicalField::Email, vec!["correo".to_string()]);
        let mapping = FieldMapping::default().merged(&overrides);

        let records = vec![record(&[("Correo", "a@b.com")])];
        let contacts = normalize(&records, &mapping);
        assert_eq!(contacts[0].email.as_deref(), Some("a@b.com"));
    }

    #[test]
    fn original_record_travels_along() {
        let records = vec![record(&[("email", "a@b.com"), ("Custom Col", "x")])];
        let contacts = normalize(&records, &FieldMapping::default());
        assert_eq!(
            contacts[0].source.get("Custom Col").map(String::as_str),
            Some("x")
        );
    }
}
