//! Confluence API types.

mod page;
mod version;

pub use page::{Body, Links, Page, PageSummary, Storage, Version};
pub use version::{ContentVersion, User};

use serde::{Deserialize, Serialize};

/// One page of a paginated collection (`start`/`limit` cursor).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResultsPage<T> {
    /// Items on this page.
    pub results: Vec<T>,
    /// Offset of the first item.
    #[serde(default)]
    pub start: usize,
    /// Requested page size.
    #[serde(default)]
    pub limit: usize,
    /// Number of items on this page.
    #[serde(default)]
    pub size: usize,
}

impl<T> ResultsPage<T> {
    /// Build a page from a slice window, as the server would.
    #[must_use]
    pub fn new(results: Vec<T>, start: usize, limit: usize) -> Self {
        let size = results.len();
        Self {
            results,
            start,
            limit,
            size,
        }
    }

    /// Whether another request may return more items.
    ///
    /// Follows the offset rule: a full page means "maybe more", a short or
    /// empty page ends the collection. The total count is never consulted.
    /// A page is full against the smaller of the requested `limit` and the
    /// limit the server echoed back, since servers clamp large page sizes.
    #[must_use]
    pub fn is_full(&self, limit: usize) -> bool {
        let limit = if self.limit > 0 {
            limit.min(self.limit)
        } else {
            limit
        };
        !self.results.is_empty() && self.results.len() >= limit
    }
}
