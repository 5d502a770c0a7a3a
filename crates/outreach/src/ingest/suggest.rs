//! Column-mapping suggestions for the upload preview.

use std::collections::BTreeMap;

use crate::contacts::CanonicalField;

/// Short match fragments per canonical field, looser than the full synonym
/// table on purpose: suggestions only have to be a good first guess.
const RULES: [(CanonicalField, &[&str]); 13] = [
    (CanonicalField::FirstName, &["first", "fname", "given"]),
    (CanonicalField::LastName, &["last", "lname", "family", "surname"]),
    (CanonicalField::FullName, &["name", "contact"]),
    (CanonicalField::Email, &["email", "mail"]),
    (CanonicalField::Title, &["title", "job", "position", "role"]),
    (CanonicalField::Company, &["company", "org", "employer"]),
    (CanonicalField::Domain, &["domain", "website"]),
    (CanonicalField::LinkedinUrl, &["linkedin", "li_"]),
    (CanonicalField::Phone, &["phone", "mobile", "tel"]),
    (CanonicalField::City, &["city", "town"]),
    (CanonicalField::State, &["state", "province", "region"]),
    (CanonicalField::Country, &["country"]),
    (CanonicalField::Industry, &["industry", "sector"]),
];

/// Suggests, per canonical field, which of the given columns probably holds
/// it. The first rule fragment that matches any column (either containing
/// the other, case-insensitive) wins.
pub fn suggest_mappings(columns: &[String]) -> BTreeMap<CanonicalField, String> {
    let lowered: Vec<(String, &String)> = columns
        .iter()
        .map(|column| (column.to_lowercase(), column))
        .collect();

    let mut suggestions = BTreeMap::new();
    for (field, fragments) in RULES {
        for fragment in fragments {
            let matched = lowered
                .iter()
                .find(|(lower, _)| lower.contains(fragment) || fragment.contains(lower.as_str()));
            if let Some((_, original)) = matched {
                suggestions.entry(field).or_insert_with(|| (*original).clone());
                break;
            }
        }
    }

    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn suggests_obvious_headers() {
        let suggestions = suggest_mappings(&columns(&[
            "First Name",
            "Surname",
            "E-Mail Address",
            "Company",
            "LinkedIn Profile",
        ]));
        assert_eq!(
            suggestions.get(&CanonicalField::FirstName).map(String::as_str),
            Some("First Name")
        );
        assert_eq!(
            suggestions.get(&CanonicalField::LastName).map(String::as_str),
            Some("Surname")
        );
        assert_eq!(
            suggestions.get(&CanonicalField::Email).map(String::as_str),
            Some("E-Mail Address")
        );
        assert_eq!(
            suggestions.get(&CanonicalField::LinkedinUrl).map(String::as_str),
            Some("LinkedIn Profile")
        );
    }

    #[test]
    fn unknown_columns_get_no_suggestion() {
        let suggestions = suggest_mappings(&columns(&["Budget", "Quarter"]));
        assert!(suggestions.get(&CanonicalField::Email).is_none());
    }

    #[test]
    fn first_matching_fragment_wins() {
        let suggestions = suggest_mappings(&columns(&["job_title", "position"]));
        assert_eq!(
            suggestions.get(&CanonicalField::Title).map(String::as_str),
            Some("job_title")
        );
    }
}
