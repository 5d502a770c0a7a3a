//! The substitution pass and the placeholder catalog.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::template::context::{CompanyContext, PersonContext};

/// Renders a template against person, company, and custom data.
///
/// One combined mapping is built (person, then company, then custom); a key
/// provided again later overwrites the value in place without changing its
/// position. Every entry is applied as a literal global find/replace, so an
/// unknown placeholder like `{{unknownField}}` survives untouched while a
/// known key with no data is replaced by the empty string. Pure function,
/// safe to call concurrently.
pub fn render(
    template: &str,
    person: &PersonContext,
    company: &CompanyContext,
    custom: &BTreeMap<String, String>,
) -> String {
    let mut mapping: Vec<(String, String)> = Vec::new();

    let person_fields: [(&str, &str, String); 10] = [
        ("firstName", "First_Name", opt(&person.first_name)),
        ("lastName", "Last_Name", opt(&person.last_name)),
        ("fullName", "Full_Name", person.display_name()),
        ("title", "Title", opt(&person.title)),
        ("email", "Email", opt(&person.email)),
        ("linkedinUrl", "LinkedIn_URL", opt(&person.linkedin_url)),
        ("location", "Location", person.location_display()),
        ("city", "City", person.city().unwrap_or_default().to_string()),
        ("state", "State", person.state().unwrap_or_default().to_string()),
        ("country", "Country", person.country().unwrap_or_default().to_string()),
    ];

    for (curly, _, value) in &person_fields {
        put(&mut mapping, format!("{{{{{}}}}}", curly), value.clone());
    }
    for (_, bracket, value) in &person_fields {
        put(&mut mapping, format!("[{}]", bracket), value.clone());
    }

    let company_fields: [(&str, &str, String); 7] = [
        ("companyName", "Company_Name", opt(&company.name)),
        ("companyDomain", "Company_Domain", opt(&company.domain)),
        ("companyWebsite", "Company_Website", opt(&company.website)),
        ("companyIndustry", "Company_Industry", opt(&company.industry)),
        (
            "companyEmployeeCount",
            "Company_Employee_Count",
            company
                .employee_count
                .map(|n| n.to_string())
                .unwrap_or_default(),
        ),
        (
            "companyLocation",
            "Company_Location",
            company.location_display(),
        ),
        ("companyPhone", "Company_Phone", opt(&company.phone)),
    ];

    for (curly, _, value) in &company_fields {
        put(&mut mapping, format!("{{{{{}}}}}", curly), value.clone());
    }
    for (_, bracket, value) in &company_fields {
        put(&mut mapping, format!("[{}]", bracket), value.clone());
    }

    for (key, value) in custom {
        put(&mut mapping, format!("{{{{{}}}}}", key), value.clone());
        put(&mut mapping, format!("[{}]", key), value.clone());
    }

    let mut output = template.to_string();
    for (needle, value) in &mapping {
        output = output.replace(needle.as_str(), value.as_str());
    }
    output
}

fn opt(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

/// Inserts or updates an entry, keeping the position of the first insert.
fn put(mapping: &mut Vec<(String, String)>, key: String, value: String) {
    match mapping.iter_mut().find(|(k, _)| *k == key) {
        Some(entry) => entry.1 = value,
        None => mapping.push((key, value)),
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExampleTemplate {
    pub subject: &'static str,
    pub body: &'static str,
}

/// The static placeholder guide served to template editors.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateCatalog {
    pub supported_formats: Vec<&'static str>,
    pub person_placeholders: Vec<&'static str>,
    pub company_placeholders: Vec<&'static str>,
    pub custom_placeholders: Vec<&'static str>,
    pub example_template: ExampleTemplate,
}

pub fn placeholder_catalog() -> TemplateCatalog {
    TemplateCatalog {
        supported_formats: vec![
            "{{variable}} - Curly braces format",
            "[Variable_Name] - Square brackets format",
        ],
        person_placeholders: vec![
            "{{firstName}} or [First_Name]",
            "{{lastName}} or [Last_Name]",
            "{{fullName}} or [Full_Name]",
            "{{title}} or [Title]",
            "{{email}} or [Email]",
            "{{linkedinUrl}} or [LinkedIn_URL]",
            "{{location}} or [Location]",
            "{{city}} or [City]",
            "{{state}} or [State]",
            "{{country}} or [Country]",
        ],
        company_placeholders: vec![
            "{{companyName}} or [Company_Name]",
            "{{companyDomain}} or [Company_Domain]",
            "{{companyWebsite}} or [Company_Website]",
            "{{companyIndustry}} or [Company_Industry]",
            "{{companyEmployeeCount}} or [Company_Employee_Count]",
            "{{companyLocation}} or [Company_Location]",
            "{{companyPhone}} or [Company_Phone]",
        ],
        custom_placeholders: vec![
            "[Event_Name] - Name of your event",
            "[Organization_Name] - Your organization name",
            "[Sender_Name] - Name of the person sending",
            "[Social_Links] - Your social media links",
            "[Contact_Information] - Your contact details",
        ],
        example_template: ExampleTemplate {
            subject: "Partnership opportunity with {{companyName}}",
            body: "Hi {{firstName}},\n\n\
                I came across {{companyName}} and was impressed by your work in \
                {{companyIndustry}}.\n\n\
                As {{title}} at {{companyName}}, you might be interested in a \
                partnership opportunity that could benefit your team.\n\n\
                Best regards,\n[Sender_Name]\n\n\
                P.S. I'd love to connect on LinkedIn if you're open to it: {{linkedinUrl}}",
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person() -> PersonContext {
        PersonContext {
            first_name: Some("Ana".to_string()),
            last_name: Some("Lima".to_string()),
            title: Some("CTO".to_string()),
            email: Some("ana@acme.io".to_string()),
            city: Some("Austin".to_string()),
            state: Some("TX".to_string()),
            ..PersonContext::default()
        }
    }

    fn company() -> CompanyContext {
        CompanyContext {
            name: Some("Acme".to_string()),
            industry: Some("software".to_string()),
            employee_count: Some(250),
            ..CompanyContext::default()
        }
    }

    #[test]
    fn renders_both_syntaxes() {
        let output = render(
            "Hi {{firstName}}, welcome to [Company_Name] ({{companyEmployeeCount}} people)",
            &person(),
            &company(),
            &BTreeMap::new(),
        );
        assert_eq!(output, "Hi Ana, welcome to Acme (250 people)");
    }

    #[test]
    fn renders_person_and_company_example() {
        let person = PersonContext {
            first_name: Some("Ana".to_string()),
            ..PersonContext::default()
        };
        let company = CompanyContext {
            name: Some("Acme".to_string()),
            ..CompanyContext::default()
        };
        let output = render(
            "Hi {{firstName}}, welcome to {{companyName}}",
            &person,
            &company,
            &BTreeMap::new(),
        );
        assert_eq!(output, "Hi Ana, welcome to Acme");
    }

    #[test]
    fn unknown_placeholders_are_left_verbatim() {
        let output = render(
            "Hello {{unknownField}} and [Unknown_Key]",
            &person(),
            &company(),
            &BTreeMap::new(),
        );
        assert_eq!(output, "Hello {{unknownField}} and [Unknown_Key]");
    }

    #[test]
    fn known_keys_without_data_become_empty() {
        let output = render(
            "Site: {{companyWebsite}}.",
            &person(),
            &company(),
            &BTreeMap::new(),
        );
        assert_eq!(output, "Site: .");
    }

    #[test]
    fn full_name_is_derived_from_parts() {
        let output = render("[Full_Name]", &person(), &company(), &BTreeMap::new());
        assert_eq!(output, "Ana Lima");
    }

    #[test]
    fn location_joins_city_and_state() {
        let output = render("{{location}}", &person(), &company(), &BTreeMap::new());
        assert_eq!(output, "Austin, TX");
    }

    #[test]
    fn custom_keys_get_both_forms() {
        let mut custom = BTreeMap::new();
        custom.insert("Event_Name".to_string(), "DevSummit".to_string());
        let output = render(
            "{{Event_Name}} aka [Event_Name]",
            &person(),
            &company(),
            &custom,
        );
        assert_eq!(output, "DevSummit aka DevSummit");
    }

    #[test]
    fn custom_keys_override_person_keys_in_place() {
        let mut custom = BTreeMap::new();
        custom.insert("firstName".to_string(), "Friend".to_string());
        let output = render("Hi {{firstName}}", &person(), &company(), &custom);
        assert_eq!(output, "Hi Friend");
    }

    #[test]
    fn rendering_is_idempotent_on_unmatched_placeholders() {
        let template = "{{unknownField}} stays";
        let once = render(template, &person(), &company(), &BTreeMap::new());
        let twice = render(&once, &person(), &company(), &BTreeMap::new());
        assert_eq!(once, twice);
    }
}
