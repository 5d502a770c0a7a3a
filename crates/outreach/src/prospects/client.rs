//! HTTP client for the people-search endpoint.

use log::{debug, info};
use reqwest::Client;
use serde::Serialize;

use crate::error::ProspectError;
use crate::prospects::types::{PeopleSearchPage, PeopleSearchQuery, SearchRequest, SearchResponse};

/// Default API root, overridable for self-hosted proxies and tests.
const DEFAULT_BASE_URL: &str = "https://api.apollo.io/api/v1";

/// Maximum length of an error body carried into logs and messages.
const MAX_ERROR_BODY_LENGTH: usize = 200;

/// Truncates an API error body so failures stay loggable without flooding
/// output or leaking whole payloads.
fn truncate_error_body(body: &str) -> String {
    if body.len() > MAX_ERROR_BODY_LENGTH {
        format!("{}... (truncated)", &body[..MAX_ERROR_BODY_LENGTH])
    } else {
        body.to_string()
    }
}

/// Thin client over the people-data provider. Holds the key and base URL;
/// every call is a single request/response exchange.
#[derive(Clone)]
pub struct ProspectClient {
    http: Client,
    api_key: String,
    base_url: String,
}

/// What the usage endpoint reports about the configured key.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageInfo {
    pub configured: bool,
    pub api_key: String,
    pub available_endpoints: Vec<&'static str>,
    pub limitations: Vec<&'static str>,
}

impl ProspectClient {
    pub fn new(api_key: impl Into<String>, base_url: Option<String>) -> Self {
        Self {
            http: Client::new(),
            api_key: api_key.into(),
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        }
    }

    /// Builds a client from `PROSPECT_API_KEY` / `PROSPECT_API_URL`. A
    /// missing key yields a client whose calls fail with `MissingApiKey`,
    /// so the rest of the application can run without the integration.
    pub fn from_env() -> Self {
        Self::new(
            std::env::var("PROSPECT_API_KEY").unwrap_or_default(),
            std::env::var("PROSPECT_API_URL").ok().filter(|v| !v.is_empty()),
        )
    }

    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }

    /// Searches people matching the given criteria and returns one result
    /// page in the transformed shape.
    pub async fn search_people(
        &self,
        query: PeopleSearchQuery,
    ) -> Result<PeopleSearchPage, ProspectError> {
        if !self.is_configured() {
            return Err(ProspectError::MissingApiKey);
        }

        let request = SearchRequest::from(query);
        debug!(
            "Searching people: page={} per_page={}",
            request.page, request.per_page
        );

        let response = self
            .http
            .post(format!("{}/mixed_people/search", self.base_url))
            .header("Cache-Control", "no-cache")
            .header("x-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProspectError::Api {
                status: status.as_u16(),
                message: truncate_error_body(&body),
            });
        }

        let parsed: SearchResponse = response.json().await?;
        let page = parsed.into_page(request.page, request.per_page);
        info!(
            "People search returned {} of {} matches (credits used: {})",
            page.people.len(),
            page.pagination.total_entries,
            page.credits_used
        );
        Ok(page)
    }

    /// Validates the configuration with a minimal one-result probe.
    pub async fn validate(&self) -> Result<(), ProspectError> {
        let probe = PeopleSearchQuery {
            q: Some("CEO".to_string()),
            per_page: Some(1),
            ..PeopleSearchQuery::default()
        };
        self.search_people(probe).await.map(|_| ())
    }

    /// Key presence and coverage notes for the usage endpoint. The key is
    /// masked down to a short prefix.
    pub fn usage(&self) -> UsageInfo {
        let masked = if self.api_key.len() > 8 {
            format!("{}...", &self.api_key[..8])
        } else if self.is_configured() {
            "configured".to_string()
        } else {
            "Not configured".to_string()
        };

        UsageInfo {
            configured: self.is_configured(),
            api_key: masked,
            available_endpoints: vec!["People Search"],
            limitations: vec![
                "Only the people-search endpoint is available with this key",
                "Maximum 100 results per page",
                "Rate limits apply based on the provider plan",
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_fails_before_any_request() {
        let client = ProspectClient::new("", None);
        assert!(!client.is_configured());

        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();
        let result = runtime.block_on(client.search_people(PeopleSearchQuery::default()));
        assert!(matches!(result, Err(ProspectError::MissingApiKey)));
    }

    #[test]
    fn usage_masks_the_key() {
        let client = ProspectClient::new("abcdefghijklmnop", None);
        let usage = client.usage();
        assert!(usage.configured);
        assert_eq!(usage.api_key, "abcdefgh...");

        let unconfigured = ProspectClient::new("", None).usage();
        assert!(!unconfigured.configured);
        assert_eq!(unconfigured.api_key, "Not configured");
    }

    #[test]
    fn long_error_bodies_are_truncated() {
        let long = "x".repeat(500);
        let truncated = truncate_error_body(&long);
        assert!(truncated.len() < 250);
        assert!(truncated.ends_with("(truncated)"));

        assert_eq!(truncate_error_body("short"), "short");
    }
}
