//! Search inputs, wire shapes, and the transformed result types.

use serde::{Deserialize, Serialize};

use crate::template::LocationParts;

/// A filter value callers may give as one string or a list of strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            OneOrMany::One(value) => vec![value],
            OneOrMany::Many(values) => values,
        }
    }
}

fn default_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    25
}

/// People-search criteria as accepted from callers.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PeopleSearchQuery {
    pub organization_name: Option<OneOrMany>,
    pub organization_domain: Option<String>,
    pub organization_industries: Option<OneOrMany>,
    pub organization_num_employees_ranges: Option<OneOrMany>,
    pub organization_locations: Option<OneOrMany>,
    pub person_titles: Option<OneOrMany>,
    pub person_seniorities: Option<OneOrMany>,
    pub person_departments: Option<OneOrMany>,
    pub person_locations: Option<OneOrMany>,
    pub q: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub reveal_personal_emails: Option<bool>,
    pub reveal_phone_number: Option<bool>,
}

impl PeopleSearchQuery {
    /// Whether any search criterion was provided at all.
    pub fn has_criteria(&self) -> bool {
        self.organization_name.is_some()
            || self.organization_domain.is_some()
            || self.organization_industries.is_some()
            || self.organization_num_employees_ranges.is_some()
            || self.organization_locations.is_some()
            || self.person_titles.is_some()
            || self.person_seniorities.is_some()
            || self.person_departments.is_some()
            || self.person_locations.is_some()
            || self.q.is_some()
    }
}

/// The request body sent to the people-search endpoint. Field names follow
/// the provider's wire format.
#[derive(Debug, Clone, Serialize)]
pub struct SearchRequest {
    pub page: u32,
    pub per_page: u32,
    pub reveal_personal_emails: bool,
    pub reveal_phone_number: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_names: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_industries: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_num_employees_ranges: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_locations: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub person_titles: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub person_seniorities: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub person_departments: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub person_locations: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
}

/// Provider results per page are capped at 100.
pub const MAX_PER_PAGE: u32 = 100;

impl From<PeopleSearchQuery> for SearchRequest {
    fn from(query: PeopleSearchQuery) -> Self {
        SearchRequest {
            page: query.page.unwrap_or_else(default_page),
            per_page: query.per_page.unwrap_or_else(default_per_page).min(MAX_PER_PAGE),
            reveal_personal_emails: query.reveal_personal_emails.unwrap_or(false),
            reveal_phone_number: query.reveal_phone_number.unwrap_or(false),
            organization_names: query.organization_name.map(OneOrMany::into_vec),
            organization_domain: query.organization_domain,
            organization_industries: query.organization_industries.map(OneOrMany::into_vec),
            organization_num_employees_ranges: query
                .organization_num_employees_ranges
                .map(OneOrMany::into_vec),
            organization_locations: query.organization_locations.map(OneOrMany::into_vec),
            person_titles: query.person_titles.map(OneOrMany::into_vec),
            person_seniorities: query.person_seniorities.map(OneOrMany::into_vec),
            person_departments: query.person_departments.map(OneOrMany::into_vec),
            person_locations: query.person_locations.map(OneOrMany::into_vec),
            q: query.q,
        }
    }
}

// Wire shapes of the provider response.

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct SearchResponse {
    pub people: Option<Vec<ApiPerson>>,
    pub pagination: Option<ApiPagination>,
    pub credits_used: Option<u64>,
    pub request_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ApiPerson {
    pub id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub name: Option<String>,
    pub title: Option<String>,
    pub email: Option<String>,
    pub email_status: Option<String>,
    pub linkedin_url: Option<String>,
    pub photo_url: Option<String>,
    pub headline: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub organization: Option<ApiOrganization>,
    pub departments: Option<Vec<String>>,
    pub seniority: Option<String>,
    pub is_likely_to_engage: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ApiOrganization {
    pub id: Option<String>,
    pub name: Option<String>,
    pub primary_domain: Option<String>,
    pub website_url: Option<String>,
    pub industry: Option<String>,
    pub estimated_num_employees: Option<u64>,
    pub linkedin_url: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub raw_address: Option<String>,
    pub phone: Option<String>,
    pub founded_year: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ApiPagination {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub total_entries: Option<u64>,
    pub total_pages: Option<u32>,
}

// Transformed, caller-facing result types.

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin_url: Option<String>,
    pub location: LocationParts,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub founded_year: Option<i32>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headline: Option<String>,
    pub location: LocationParts,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<Company>,
    pub departments: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seniority: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_likely_to_engage: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
    pub total_entries: u64,
    pub total_pages: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeopleSearchPage {
    pub people: Vec<Person>,
    pub pagination: Pagination,
    pub credits_used: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl From<ApiOrganization> for Company {
    fn from(org: ApiOrganization) -> Self {
        Company {
            id: org.id,
            name: org.name,
            domain: org.primary_domain,
            website: org.website_url,
            industry: org.industry,
            employee_count: org.estimated_num_employees,
            linkedin_url: org.linkedin_url,
            location: LocationParts {
                city: org.city,
                state: org.state,
                country: org.country,
                address: org.raw_address,
            },
            phone: org.phone,
            founded_year: org.founded_year,
        }
    }
}

impl From<ApiPerson> for Person {
    fn from(person: ApiPerson) -> Self {
        Person {
            id: person.id,
            first_name: person.first_name,
            last_name: person.last_name,
            full_name: person.name,
            title: person.title,
            email: person.email,
            email_status: person.email_status,
            linkedin_url: person.linkedin_url,
            photo_url: person.photo_url,
            headline: person.headline,
            location: LocationParts {
                city: person.city,
                state: person.state,
                country: person.country,
                address: None,
            },
            company: person.organization.map(Company::from),
            departments: person.departments.unwrap_or_default(),
            seniority: person.seniority,
            is_likely_to_engage: person.is_likely_to_engage,
        }
    }
}

impl SearchResponse {
    pub(crate) fn into_page(self, requested_page: u32, requested_per_page: u32) -> PeopleSearchPage {
        let pagination = self.pagination.unwrap_or_default();
        PeopleSearchPage {
            people: self
                .people
                .unwrap_or_default()
                .into_iter()
                .map(Person::from)
                .collect(),
            pagination: Pagination {
                page: pagination.page.unwrap_or(requested_page),
                per_page: pagination.per_page.unwrap_or(requested_per_page),
                total_entries: pagination.total_entries.unwrap_or(0),
                total_pages: pagination.total_pages.unwrap_or(0),
            },
            credits_used: self.credits_used.unwrap_or(0),
            request_id: self.request_id,
        }
    }
}
