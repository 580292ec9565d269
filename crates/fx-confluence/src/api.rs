//! The Confluence operations the change log needs.
//!
//! [`ConfluenceApi`] is implemented by [`ConfluenceClient`](crate::ConfluenceClient)
//! for real servers and by `MockConfluence` (behind the `mock` feature) for tests.

use crate::error::ConfluenceError;
use crate::types::{ContentVersion, Page, PageSummary, ResultsPage};

/// Read and write access to Confluence content.
///
/// All calls are blocking. Status codes >= 400 surface as
/// [`ConfluenceError::HttpResponse`].
pub trait ConfluenceApi {
    /// Server base URL without trailing slash (e.g. `https://example.atlassian.net/wiki`).
    fn base_url(&self) -> &str;

    /// Get page by ID with optional field expansion.
    fn get_page(&self, page_id: &str, expand: &[&str]) -> Result<Page, ConfluenceError>;

    /// Get one window of the immediate children of a page.
    fn get_child_pages(
        &self,
        page_id: &str,
        start: usize,
        limit: usize,
    ) -> Result<ResultsPage<PageSummary>, ConfluenceError>;

    /// Get one window of a page's version history, oldest first.
    fn get_versions(
        &self,
        page_id: &str,
        start: usize,
        limit: usize,
    ) -> Result<ResultsPage<ContentVersion>, ConfluenceError>;

    /// Replace the page body, writing version `current_version + 1`.
    fn update_page(
        &self,
        page_id: &str,
        title: &str,
        body: &str,
        current_version: u32,
    ) -> Result<Page, ConfluenceError>;

    /// Absolute web URL for a page.
    ///
    /// Uses the `webui` link when the server returned one, otherwise the
    /// `viewpage.action` form that works on every deployment.
    fn page_url(&self, page: &Page) -> String {
        match page.webui() {
            Some(webui) => format!("{}{}", self.base_url(), webui),
            None => format!(
                "{}/pages/viewpage.action?pageId={}",
                self.base_url(),
                page.id
            ),
        }
    }
}

