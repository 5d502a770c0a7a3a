//! The canonical field set and its injectable synonym table.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A contact attribute the system understands regardless of how the source
/// file labels its columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CanonicalField {
    FirstName,
    LastName,
    FullName,
    Email,
    Title,
    Company,
    Domain,
    LinkedinUrl,
    Phone,
    City,
    State,
    Country,
    Industry,
}

impl CanonicalField {
    pub const ALL: [CanonicalField; 13] = [
        CanonicalField::FirstName,
        CanonicalField::LastName,
        CanonicalField::FullName,
        CanonicalField::Email,
        CanonicalField::Title,
        CanonicalField::Company,
        CanonicalField::Domain,
        CanonicalField::LinkedinUrl,
        CanonicalField::Phone,
        CanonicalField::City,
        CanonicalField::State,
        CanonicalField::Country,
        CanonicalField::Industry,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CanonicalField::FirstName => "firstName",
            CanonicalField::LastName => "lastName",
            CanonicalField::FullName => "fullName",
            CanonicalField::Email => "email",
            CanonicalField::Title => "title",
            CanonicalField::Company => "company",
            CanonicalField::Domain => "domain",
            CanonicalField::LinkedinUrl => "linkedinUrl",
            CanonicalField::Phone => "phone",
            CanonicalField::City => "city",
            CanonicalField::State => "state",
            CanonicalField::Country => "country",
            CanonicalField::Industry => "industry",
        }
    }
}

/// Synonym table: for each canonical field, the raw column names accepted for
/// it, in match-priority order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldMapping {
    table: BTreeMap<CanonicalField, Vec<String>>,
}

impl Default for FieldMapping {
    fn default() -> Self {
        let mut table = BTreeMap::new();
        let defaults: [(CanonicalField, &[&str]); 13] = [
            (
                CanonicalField::FirstName,
                &["first_name", "firstname", "first name", "fname", "given_name"],
            ),
            (
                CanonicalField::LastName,
                &[
                    "last_name",
                    "lastname",
                    "last name",
                    "lname",
                    "family_name",
                    "surname",
                ],
            ),
            (
                CanonicalField::FullName,
                &["name", "full_name", "fullname", "full name", "contact_name"],
            ),
            (
                CanonicalField::Email,
                &[
                    "email",
                    "email_address",
                    "contact_email",
                    "e-mail",
                    "emailaddress",
                ],
            ),
            (
                CanonicalField::Title,
                &["title", "job_title", "position", "role", "designation"],
            ),
            (
                CanonicalField::Company,
                &["company", "company_name", "organization", "employer", "org"],
            ),
            (
                CanonicalField::Domain,
                &["domain", "company_domain", "website", "company_website"],
            ),
            (
                CanonicalField::LinkedinUrl,
                &["linkedin", "linkedin_url", "linkedin_profile", "li_url"],
            ),
            (
                CanonicalField::Phone,
                &["phone", "phone_number", "contact_number", "mobile", "telephone"],
            ),
            (CanonicalField::City, &["city", "location_city", "town"]),
            (
                CanonicalField::State,
                &["state", "province", "region", "location_state"],
            ),
            (CanonicalField::Country, &["country", "location_country"]),
            (
                CanonicalField::Industry,
                &["industry", "sector", "business_type"],
            ),
        ];
        for (field, synonyms) in defaults {
            table.insert(field, synonyms.iter().map(|s| s.to_string()).collect());
        }
        Self { table }
    }
}

impl FieldMapping {
    /// Returns a new table with the given per-field overrides applied on top
    /// of this one. An override replaces the whole synonym list for its
    /// field. Pure: neither input is modified.
    pub fn merged(&self, overrides: &BTreeMap<CanonicalField, Vec<String>>) -> FieldMapping {
        let mut table = self.table.clone();
        for (field, synonyms) in overrides {
            table.insert(*field, synonyms.clone());
        }
        FieldMapping { table }
    }

    pub fn synonyms(&self, field: CanonicalField) -> &[String] {
        self.table.get(&field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (CanonicalField, &[String])> + '_ {
        self.table.iter().map(|(field, list)| (*field, list.as_slice()))
    }
}
