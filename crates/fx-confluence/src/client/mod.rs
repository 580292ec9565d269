//! Confluence REST API client.
//!
//! Provides sync HTTP client for the Confluence Cloud REST API
//! with HTTP Basic (email + API token) authentication.

mod pages;
mod versions;

use std::time::Duration;

use serde::de::DeserializeOwned;
use ureq::Agent;
use ureq::http::Response;

use crate::auth::BasicAuth;
use crate::error::ConfluenceError;

/// Default HTTP timeout in seconds.
const DEFAULT_TIMEOUT: u64 = 30;

/// Confluence REST API client.
pub struct ConfluenceClient {
    agent: Agent,
    base_url: String,
    auth: BasicAuth,
}

impl ConfluenceClient {
    /// Create client with Basic authentication.
    ///
    /// # Arguments
    /// * `base_url` - Confluence base URL (e.g. `https://example.atlassian.net/wiki`)
    /// * `auth` - Encoded credentials
    /// * `timeout` - Global per-request timeout (`None` uses 30 seconds)
    #[must_use]
    pub fn new(base_url: &str, auth: BasicAuth, timeout: Option<Duration>) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(
                timeout.unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT)),
            ))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_owned(),
            auth,
        }
    }

    /// Create client from config values (convenience constructor).
    #[must_use]
    pub fn from_config(base_url: &str, email: &str, api_token: &str, timeout_secs: u64) -> Self {
        Self::new(
            base_url,
            BasicAuth::new(email, api_token),
            Some(Duration::from_secs(timeout_secs)),
        )
    }

    /// Get the API base URL.
    fn api_url(&self) -> String {
        format!("{}/rest/api", self.base_url)
    }

    /// URL of a single page, with optional field expansion.
    fn content_url(&self, page_id: &str, expand: &[&str]) -> String {
        let mut url = format!("{}/content/{}", self.api_url(), page_id);
        if !expand.is_empty() {
            url.push_str("?expand=");
            url.push_str(&expand.join(","));
        }
        url
    }

    /// URL of one window of a page's sub-collection (`child/page`, `version`).
    fn window_url(&self, page_id: &str, collection: &str, start: usize, limit: usize) -> String {
        format!(
            "{}/content/{}/{}?start={}&limit={}",
            self.api_url(),
            page_id,
            collection,
            start,
            limit
        )
    }

    /// Issue an authenticated GET and decode the JSON response.
    fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ConfluenceError> {
        let response = self
            .agent
            .get(url)
            .header("Authorization", self.auth.header())
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .call()?;

        read_json(response)
    }
}

/// Decode a JSON response, turning error statuses into [`ConfluenceError::HttpResponse`].
fn read_json<T: DeserializeOwned>(response: Response<ureq::Body>) -> Result<T, ConfluenceError> {
    let status = response.status().as_u16();
    let mut body_reader = response.into_body();

    if status >= 400 {
        let error_body = body_reader
            .read_to_string()
            .unwrap_or_else(|_| "(unable to read error body)".to_owned());
        return Err(ConfluenceError::HttpResponse {
            status,
            body: error_body,
        });
    }

    Ok(body_reader.read_json()?)
}
