//! Contextual data consumed by the rendering pass.
//!
//! Contacts arrive in mixed shapes: flat rows from an uploaded file, or
//! nested person/company objects from a prospect search. These types absorb
//! both (snake_case aliases, nested or flat locations, company as a bare
//! name or a full object).

use serde::{Deserialize, Serialize};

/// City/state/country fragment, used by both person and company records.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LocationParts {
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub address: Option<String>,
}

/// Person-side data for one rendering.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonContext {
    #[serde(alias = "first_name")]
    pub first_name: Option<String>,
    #[serde(alias = "last_name")]
    pub last_name: Option<String>,
    #[serde(alias = "name", alias = "full_name")]
    pub full_name: Option<String>,
    pub title: Option<String>,
    pub email: Option<String>,
    #[serde(alias = "linkedin_url")]
    pub linkedin_url: Option<String>,
    pub location: Option<LocationParts>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
}

impl PersonContext {
    pub fn city(&self) -> Option<&str> {
        self.location
            .as_ref()
            .and_then(|l| l.city.as_deref())
            .or(self.city.as_deref())
    }

    pub fn state(&self) -> Option<&str> {
        self.location
            .as_ref()
            .and_then(|l| l.state.as_deref())
            .or(self.state.as_deref())
    }

    pub fn country(&self) -> Option<&str> {
        self.location
            .as_ref()
            .and_then(|l| l.country.as_deref())
            .or(self.country.as_deref())
    }

    /// The full name, deriving "first last" when only the parts are present.
    pub fn display_name(&self) -> String {
        if let Some(full) = self.full_name.as_deref() {
            if !full.trim().is_empty() {
                return full.trim().to_string();
            }
        }
        join_nonempty(
            &[self.first_name.as_deref(), self.last_name.as_deref()],
            " ",
        )
    }

    pub fn location_display(&self) -> String {
        join_nonempty(&[self.city(), self.state()], ", ")
    }
}

/// Company-side data for one rendering.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompanyContext {
    pub name: Option<String>,
    #[serde(alias = "primary_domain")]
    pub domain: Option<String>,
    #[serde(alias = "website_url")]
    pub website: Option<String>,
    pub industry: Option<String>,
    #[serde(alias = "estimated_num_employees")]
    pub employee_count: Option<u64>,
    pub location: Option<LocationParts>,
    pub phone: Option<String>,
}

impl CompanyContext {
    pub fn location_display(&self) -> String {
        let location = self.location.as_ref();
        join_nonempty(
            &[
                location.and_then(|l| l.city.as_deref()),
                location.and_then(|l| l.state.as_deref()),
            ],
            ", ",
        )
    }
}

/// A company reference on an inbound contact: either a bare name (file
/// uploads) or a full object (prospect search results).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CompanyRef {
    Name(String),
    Details(Box<CompanyContext>),
}

/// One inbound contact, as accepted by the personalization endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactPayload {
    #[serde(flatten)]
    pub person: PersonContext,
    pub company: Option<CompanyRef>,
    pub company_name: Option<String>,
}

impl ContactPayload {
    /// The company data used for rendering, from whichever shape is present.
    pub fn company_context(&self) -> CompanyContext {
        match &self.company {
            Some(CompanyRef::Details(details)) => (**details).clone(),
            Some(CompanyRef::Name(name)) if !name.trim().is_empty() => CompanyContext {
                name: Some(name.trim().to_string()),
                ..CompanyContext::default()
            },
            _ => CompanyContext {
                name: self.company_name.clone(),
                ..CompanyContext::default()
            },
        }
    }

    pub fn display_name(&self) -> Option<String> {
        let name = self.person.display_name();
        (!name.is_empty()).then_some(name)
    }

    pub fn display_company(&self) -> Option<String> {
        self.company_context().name
    }
}

fn join_nonempty(parts: &[Option<&str>], separator: &str) -> String {
    parts
        .iter()
        .filter_map(|p| *p)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(separator)
}
