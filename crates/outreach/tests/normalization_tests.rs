//! Table-driven tests for contact normalization.
//!
//! Cases cover column matching, name derivation in both directions, value
//! cleanup, and the retention filter.

use outreach::contacts::{normalize, FieldMapping};
use outreach::ingest::RawRecord;

/// One normalization test case: a single raw record and the expected
/// canonical values (None = field must be absent).
struct NormalizationCase {
    name: &'static str,
    columns: &'static [(&'static str, &'static str)],
    retained: bool,
    first_name: Option<&'static str>,
    last_name: Option<&'static str>,
    full_name: Option<&'static str>,
    email: Option<&'static str>,
    domain: Option<&'static str>,
}

const CASES: &[NormalizationCase] = &[
    // The fullName synonym "name" substring-matches the first_name column,
    // so fullName takes that column's value rather than the joined parts.
    // This mirrors the matching rule exactly; see the derivation cases below
    // for the split direction.
    NormalizationCase {
        name: "exact_synonyms",
        columns: &[("email", "Ana@Acme.IO"), ("first_name", "Ana"), ("last_name", "Lima")],
        retained: true,
        first_name: Some("Ana"),
        last_name: Some("Lima"),
        full_name: Some("Ana"),
        email: Some("ana@acme.io"),
        domain: None,
    },
    NormalizationCase {
        name: "case_insensitive_headers",
        columns: &[("E-MAIL", "x@y.com"), ("SURNAME", "Doe"), ("GIVEN_NAME", "Jane")],
        retained: true,
        first_name: Some("Jane"),
        last_name: Some("Doe"),
        full_name: Some("Jane"),
        email: Some("x@y.com"),
        domain: None,
    },
    NormalizationCase {
        name: "substring_column_match",
        columns: &[("Work Email Address", "w@y.com")],
        retained: true,
        first_name: None,
        last_name: None,
        full_name: None,
        email: Some("w@y.com"),
        domain: None,
    },
    NormalizationCase {
        name: "full_name_split",
        columns: &[("Full Name", "Jane Doe")],
        retained: true,
        first_name: Some("Jane"),
        last_name: Some("Doe"),
        full_name: Some("Jane Doe"),
        email: None,
        domain: None,
    },
    NormalizationCase {
        name: "full_name_split_multi_token_surname",
        columns: &[("contact_name", "Ana Maria da Silva")],
        retained: true,
        first_name: Some("Ana"),
        last_name: Some("Maria da Silva"),
        full_name: Some("Ana Maria da Silva"),
        email: None,
        domain: None,
    },
    NormalizationCase {
        name: "single_token_name_not_split",
        columns: &[("full_name", "Prince")],
        retained: true,
        first_name: None,
        last_name: None,
        full_name: Some("Prince"),
        email: None,
        domain: None,
    },
    // A bare "name" column is contained in the first_name and last_name
    // synonyms too, so all three name fields receive it.
    NormalizationCase {
        name: "bare_name_column_floods_all_name_fields",
        columns: &[("name", "Prince")],
        retained: true,
        first_name: Some("Prince"),
        last_name: Some("Prince"),
        full_name: Some("Prince"),
        email: None,
        domain: None,
    },
    NormalizationCase {
        name: "domain_cleanup",
        columns: &[("email", "a@b.com"), ("company_domain", "https://www.Example.com/")],
        retained: true,
        first_name: None,
        last_name: None,
        full_name: None,
        email: Some("a@b.com"),
        domain: Some("example.com"),
    },
    NormalizationCase {
        name: "domain_without_scheme",
        columns: &[("email", "a@b.com"), ("domain", "Example.ORG")],
        retained: true,
        first_name: None,
        last_name: None,
        full_name: None,
        email: Some("a@b.com"),
        domain: Some("example.org"),
    },
    NormalizationCase {
        name: "dropped_without_essentials",
        columns: &[("title", "CTO"), ("city", "Austin")],
        retained: false,
        first_name: None,
        last_name: None,
        full_name: None,
        email: None,
        domain: None,
    },
    NormalizationCase {
        name: "fname_column_also_fills_full_name",
        columns: &[("fname", "OnlyFirst")],
        retained: true,
        first_name: Some("OnlyFirst"),
        last_name: None,
        full_name: Some("OnlyFirst"),
        email: None,
        domain: None,
    },
];

fn record(columns: &[(&str, &str)]) -> RawRecord {
    columns
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn normalization_cases() {
    let mapping = FieldMapping::default();

    for case in CASES {
        let contacts = normalize(&[record(case.columns)], &mapping);

        if !case.retained {
            assert!(contacts.is_empty(), "case '{}' should be dropped", case.name);
            continue;
        }

        assert_eq!(contacts.len(), 1, "case '{}' should be retained", case.name);
        let contact = &contacts[0];
        assert_eq!(
            contact.first_name.as_deref(),
            case.first_name,
            "case '{}': firstName",
            case.name
        );
        assert_eq!(
            contact.last_name.as_deref(),
            case.last_name,
            "case '{}': lastName",
            case.name
        );
        assert_eq!(
            contact.full_name.as_deref(),
            case.full_name,
            "case '{}': fullName",
            case.name
        );
        assert_eq!(contact.email.as_deref(), case.email, "case '{}': email", case.name);
        assert_eq!(
            contact.domain.as_deref(),
            case.domain,
            "case '{}': domain",
            case.name
        );
    }
}

#[test]
fn normalization_is_deterministic() {
    let mapping = FieldMapping::default();
    let records: Vec<RawRecord> = CASES.iter().map(|c| record(c.columns)).collect();

    let first = normalize(&records, &mapping);
    let second = normalize(&records, &mapping);

    assert_eq!(first.len(), second.len());
    for (a, b) in first.iter().zip(second.iter()) {
        assert_eq!(a.email, b.email);
        assert_eq!(a.full_name, b.full_name);
        assert_eq!(a.source, b.source);
    }
}
