//! Version history operations for Confluence API.

use tracing::debug;

use super::ConfluenceClient;
use crate::error::ConfluenceError;
use crate::types::{ContentVersion, ResultsPage};

impl ConfluenceClient {
    /// Get one window of a page's version history.
    pub(super) fn fetch_versions_window(
        &self,
        page_id: &str,
        start: usize,
        limit: usize,
    ) -> Result<ResultsPage<ContentVersion>, ConfluenceError> {
        let url = self.window_url(page_id, "version", start, limit);

        debug!(page_id, start, limit, "Getting version history");
        let versions: ResultsPage<ContentVersion> = self.get_json(&url)?;
        debug!(
            page_id,
            start,
            count = versions.results.len(),
            "Fetched version history"
        );
        Ok(versions)
    }
}
