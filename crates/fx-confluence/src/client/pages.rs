//! Page operations for Confluence API.

use serde_json::{Value, json};
use tracing::{debug, info};

use super::{ConfluenceClient, read_json};
use crate::api::ConfluenceApi;
use crate::error::ConfluenceError;
use crate::types::{ContentVersion, Page, PageSummary, ResultsPage};

impl ConfluenceApi for ConfluenceClient {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn get_page(&self, page_id: &str, expand: &[&str]) -> Result<Page, ConfluenceError> {
        let url = self.content_url(page_id, expand);
        info!("Getting page {}", page_id);
        self.get_json(&url)
    }

    fn get_child_pages(
        &self,
        page_id: &str,
        start: usize,
        limit: usize,
    ) -> Result<ResultsPage<PageSummary>, ConfluenceError> {
        let url = self.window_url(page_id, "child/page", start, limit);

        debug!(page_id, start, limit, "Getting child pages");
        let children: ResultsPage<PageSummary> = self.get_json(&url)?;
        debug!(page_id, count = children.results.len(), "Fetched child pages");
        Ok(children)
    }

    fn get_versions(
        &self,
        page_id: &str,
        start: usize,
        limit: usize,
    ) -> Result<ResultsPage<ContentVersion>, ConfluenceError> {
        self.fetch_versions_window(page_id, start, limit)
    }

    fn update_page(
        &self,
        page_id: &str,
        title: &str,
        body: &str,
        current_version: u32,
    ) -> Result<Page, ConfluenceError> {
        let url = self.content_url(page_id, &[]);
        let next_version = current_version + 1;
        let payload = update_payload(title, body, next_version);

        info!(
            "Updating page {} from version {} to {}",
            page_id, current_version, next_version
        );

        let payload_bytes = serde_json::to_vec(&payload)?;

        let response = self
            .agent
            .put(&url)
            .header("Authorization", self.auth.header())
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .send(&payload_bytes[..])?;

        let page: Page = read_json(response)?;
        info!(
            "Updated page {} to version {}",
            page_id, page.version.number
        );
        Ok(page)
    }
}

/// Body of `PUT /content/{id}` replacing a page's storage body.
fn update_payload(title: &str, body: &str, next_version: u32) -> Value {
    json!({
        "version": {"number": next_version},
        "title": title,
        "type": "page",
        "body": {
            "storage": {
                "value": body,
                "representation": "storage"
            }
        }
    })
}
