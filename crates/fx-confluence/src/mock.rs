//! Mock Confluence implementation for testing.
//!
//! Provides [`MockConfluence`] for unit testing without a Confluence server.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use crate::api::ConfluenceApi;
use crate::error::ConfluenceError;
use crate::types::{
    Body, ContentVersion, Links, Page, PageSummary, ResultsPage, Storage, User, Version,
};

/// Request observed by [`MockConfluence`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockRequest {
    /// `GET /content/{id}`.
    GetPage {
        /// Requested page.
        page_id: String,
        /// Expanded fields.
        expand: Vec<String>,
    },
    /// `GET /content/{id}/child/page`.
    GetChildPages {
        /// Parent page.
        page_id: String,
        /// Offset.
        start: usize,
        /// Page size.
        limit: usize,
    },
    /// `GET /content/{id}/version`.
    GetVersions {
        /// Requested page.
        page_id: String,
        /// Offset.
        start: usize,
        /// Page size.
        limit: usize,
    },
    /// `PUT /content/{id}`.
    UpdatePage {
        /// Updated page.
        page_id: String,
        /// Version number sent in the payload.
        version: u32,
    },
}

/// In-memory Confluence for testing.
///
/// Pages, child links and version histories are configured with the
/// builder methods. Requests honour `start`/`limit` windows, `expand`
/// for bodies, and the server's version check on update.
///
/// # Example
///
/// ```ignore
/// use fx_confluence::{ConfluenceApi, MockConfluence};
///
/// let confluence = MockConfluence::new()
///     .with_page("1", "Root")
///     .with_child("1", "2", "Child")
///     .with_version("2", 1, "Alice", "2023-05-01T10:15:30.123Z");
///
/// let children = confluence.get_child_pages("1", 0, 50).unwrap();
/// assert_eq!(children.results[0].title, "Child");
/// ```
#[derive(Debug)]
pub struct MockConfluence {
    base_url: String,
    pages: RwLock<HashMap<String, Page>>,
    children: RwLock<HashMap<String, Vec<PageSummary>>>,
    versions: RwLock<HashMap<String, Vec<ContentVersion>>>,
    failing: RwLock<HashSet<String>>,
    requests: RwLock<Vec<MockRequest>>,
    limit_cap: Option<usize>,
}

impl Default for MockConfluence {
    fn default() -> Self {
        Self {
            base_url: "https://confluence.example.com/wiki".to_owned(),
            pages: RwLock::new(HashMap::new()),
            children: RwLock::new(HashMap::new()),
            versions: RwLock::new(HashMap::new()),
            failing: RwLock::new(HashSet::new()),
            requests: RwLock::new(Vec::new()),
            limit_cap: None,
        }
    }
}

impl MockConfluence {
    /// Create a new empty mock.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a page at version 1 with an empty body.
    ///
    /// The web UI link is `/spaces/TEST/pages/{id}`.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_page(self, page_id: impl Into<String>, title: impl Into<String>) -> Self {
        let page_id = page_id.into();
        let page = Page {
            id: page_id.clone(),
            content_type: "page".to_owned(),
            title: title.into(),
            version: Version {
                number: 1,
                message: None,
            },
            body: Some(storage_body(String::new())),
            links: Some(Links {
                webui: Some(format!("/spaces/TEST/pages/{page_id}")),
                self_link: None,
            }),
        };
        self.pages.write().unwrap().insert(page_id, page);
        self
    }

    /// Add a child page under `parent_id`, creating the child page if needed.
    ///
    /// Children are listed in insertion order.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_child(
        self,
        parent_id: impl Into<String>,
        page_id: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        let page_id = page_id.into();
        let title = title.into();
        let exists = self.pages.read().unwrap().contains_key(&page_id);
        let mock = if exists {
            self
        } else {
            self.with_page(page_id.clone(), title.clone())
        };
        mock.children
            .write()
            .unwrap()
            .entry(parent_id.into())
            .or_default()
            .push(PageSummary { id: page_id, title });
        mock
    }

    /// Append a version history entry to a page.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_version(
        self,
        page_id: impl Into<String>,
        number: u32,
        author: impl Into<String>,
        when: impl Into<String>,
    ) -> Self {
        self.versions
            .write()
            .unwrap()
            .entry(page_id.into())
            .or_default()
            .push(ContentVersion {
                number,
                by: User {
                    display_name: author.into(),
                    account_id: None,
                },
                when: when.into(),
                message: None,
            });
        self
    }

    /// Set the storage body of an existing page.
    ///
    /// # Panics
    ///
    /// Panics if the page was not added or the internal lock is poisoned.
    #[must_use]
    pub fn with_body(self, page_id: &str, body: impl Into<String>) -> Self {
        self.pages
            .write()
            .unwrap()
            .get_mut(page_id)
            .expect("page must be added before its body")
            .body = Some(storage_body(body.into()));
        self
    }

    /// Make every request touching `page_id` fail with HTTP 500.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_failure(self, page_id: impl Into<String>) -> Self {
        self.failing.write().unwrap().insert(page_id.into());
        self
    }

    /// Serve at most `cap` items per listing, whatever limit is requested.
    ///
    /// The echoed `limit` is the capped value, as Confluence Cloud does.
    #[must_use]
    pub fn with_limit_cap(mut self, cap: usize) -> Self {
        self.limit_cap = Some(cap);
        self
    }

    /// Current storage body of a page.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn body(&self, page_id: &str) -> Option<String> {
        self.pages
            .read()
            .unwrap()
            .get(page_id)
            .map(|page| page.storage_value().to_owned())
    }

    /// Current version number of a page.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn version(&self, page_id: &str) -> Option<u32> {
        self.pages
            .read()
            .unwrap()
            .get(page_id)
            .map(|page| page.version.number)
    }

    /// All requests received so far, in order.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn requests(&self) -> Vec<MockRequest> {
        self.requests.read().unwrap().clone()
    }

    /// Number of updates written to a page.
    #[must_use]
    pub fn update_count(&self, page_id: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| matches!(r, MockRequest::UpdatePage { page_id: id, .. } if id == page_id))
            .count()
    }

    fn record(&self, request: MockRequest) {
        self.requests.write().unwrap().push(request);
    }

    fn capped(&self, limit: usize) -> usize {
        self.limit_cap.map_or(limit, |cap| limit.min(cap))
    }

    fn check_available(&self, page_id: &str) -> Result<(), ConfluenceError> {
        if self.failing.read().unwrap().contains(page_id) {
            return Err(ConfluenceError::HttpResponse {
                status: 500,
                body: format!("simulated failure for page {page_id}"),
            });
        }
        if !self.pages.read().unwrap().contains_key(page_id) {
            return Err(not_found(page_id));
        }
        Ok(())
    }
}

impl ConfluenceApi for MockConfluence {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn get_page(&self, page_id: &str, expand: &[&str]) -> Result<Page, ConfluenceError> {
        self.record(MockRequest::GetPage {
            page_id: page_id.to_owned(),
            expand: expand.iter().map(|&e| e.to_owned()).collect(),
        });
        self.check_available(page_id)?;

        let mut page = self.pages.read().unwrap()[page_id].clone();
        if !expand.contains(&"body.storage") {
            page.body = None;
        }
        Ok(page)
    }

    fn get_child_pages(
        &self,
        page_id: &str,
        start: usize,
        limit: usize,
    ) -> Result<ResultsPage<PageSummary>, ConfluenceError> {
        self.record(MockRequest::GetChildPages {
            page_id: page_id.to_owned(),
            start,
            limit,
        });
        self.check_available(page_id)?;

        let children = self.children.read().unwrap();
        let all = children.get(page_id).map_or(&[][..], Vec::as_slice);
        Ok(window(all, start, self.capped(limit)))
    }

    fn get_versions(
        &self,
        page_id: &str,
        start: usize,
        limit: usize,
    ) -> Result<ResultsPage<ContentVersion>, ConfluenceError> {
        self.record(MockRequest::GetVersions {
            page_id: page_id.to_owned(),
            start,
            limit,
        });
        self.check_available(page_id)?;

        let versions = self.versions.read().unwrap();
        let all = versions.get(page_id).map_or(&[][..], Vec::as_slice);
        Ok(window(all, start, self.capped(limit)))
    }

    fn update_page(
        &self,
        page_id: &str,
        title: &str,
        body: &str,
        current_version: u32,
    ) -> Result<Page, ConfluenceError> {
        self.record(MockRequest::UpdatePage {
            page_id: page_id.to_owned(),
            version: current_version + 1,
        });
        self.check_available(page_id)?;

        let mut pages = self.pages.write().unwrap();
        let Some(page) = pages.get_mut(page_id) else {
            return Err(not_found(page_id));
        };
        if page.version.number != current_version {
            return Err(ConfluenceError::HttpResponse {
                status: 409,
                body: format!(
                    "Version must be incremented on update. Current version is: {}",
                    page.version.number
                ),
            });
        }

        page.title = title.to_owned();
        page.version.number = current_version + 1;
        page.body = Some(storage_body(body.to_owned()));
        Ok(page.clone())
    }
}

fn storage_body(value: String) -> Body {
    Body {
        storage: Some(Storage {
            value,
            representation: "storage".to_owned(),
        }),
    }
}

fn not_found(page_id: &str) -> ConfluenceError {
    ConfluenceError::HttpResponse {
        status: 404,
        body: format!("No content found with id: {page_id}"),
    }
}

fn window<T: Clone>(all: &[T], start: usize, limit: usize) -> ResultsPage<T> {
    let results = all.iter().skip(start).take(limit).cloned().collect();
    ResultsPage::new(results, start, limit)
}
