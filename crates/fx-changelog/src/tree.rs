//! Page tree traversal.
//!
//! [`Descendants`] walks a page tree depth-first in pre-order with an
//! explicit work stack, so deep trees do not grow the call stack. A visited
//! set skips pages seen before, which keeps the walk finite even if the
//! server ever reports a cycle.

use std::collections::HashSet;

use fx_confluence::{ConfluenceApi, ConfluenceError};
use tracing::{debug, warn};

/// Page identity as listed by the child page endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageRef {
    /// Page ID.
    pub id: String,
    /// Page title.
    pub title: String,
}

impl PageRef {
    /// Create a page reference.
    #[must_use]
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
        }
    }
}

/// Lazy pre-order iterator over all descendants of a root page.
///
/// The root itself is not yielded. Children of a page are requested when
/// the page is yielded. After the first error the iterator yields that
/// error once and then ends.
pub struct Descendants<'a, A: ConfluenceApi + ?Sized> {
    api: &'a A,
    root_id: String,
    page_size: usize,
    stack: Vec<PageRef>,
    visited: HashSet<String>,
    started: bool,
    done: bool,
}

impl<'a, A: ConfluenceApi + ?Sized> Descendants<'a, A> {
    /// Start a traversal below `root_id`, listing children `page_size` at a time.
    #[must_use]
    pub fn new(api: &'a A, root_id: &str, page_size: usize) -> Self {
        Self {
            api,
            root_id: root_id.to_owned(),
            page_size: page_size.max(1),
            stack: Vec::new(),
            visited: HashSet::from([root_id.to_owned()]),
            started: false,
            done: false,
        }
    }

    fn push_children(&mut self, parent_id: &str) -> Result<(), ConfluenceError> {
        let children = child_pages(self.api, parent_id, self.page_size)?;
        // Reversed so the first child is popped first
        self.stack.extend(children.into_iter().rev());
        Ok(())
    }

    fn fail(&mut self, err: ConfluenceError) -> Option<Result<PageRef, ConfluenceError>> {
        self.done = true;
        self.stack.clear();
        Some(Err(err))
    }
}

impl<A: ConfluenceApi + ?Sized> Iterator for Descendants<'_, A> {
    type Item = Result<PageRef, ConfluenceError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        if !self.started {
            self.started = true;
            let root_id = self.root_id.clone();
            if let Err(e) = self.push_children(&root_id) {
                return self.fail(e);
            }
        }

        while let Some(page) = self.stack.pop() {
            if !self.visited.insert(page.id.clone()) {
                warn!(page_id = %page.id, "Page reached twice, skipping");
                continue;
            }
            if let Err(e) = self.push_children(&page.id) {
                return self.fail(e);
            }
            return Some(Ok(page));
        }

        self.done = true;
        None
    }
}

/// List all immediate children of a page, following offset pagination.
fn child_pages<A: ConfluenceApi + ?Sized>(
    api: &A,
    parent_id: &str,
    page_size: usize,
) -> Result<Vec<PageRef>, ConfluenceError> {
    let mut children = Vec::new();
    let mut start = 0;

    loop {
        let window = api.get_child_pages(parent_id, start, page_size)?;
        let full = window.is_full(page_size);
        let received = window.results.len();
        children.extend(
            window
                .results
                .into_iter()
                .map(|child| PageRef::new(child.id, child.title)),
        );
        if !full {
            break;
        }
        start += received;
    }

    debug!(parent_id, count = children.len(), "Listed child pages");
    Ok(children)
}

/// Collect all descendants of `root_id` in pre-order.
///
/// # Errors
///
/// Returns the first request error; pages collected before it are discarded.
pub fn collect_descendants<A: ConfluenceApi + ?Sized>(
    api: &A,
    root_id: &str,
    page_size: usize,
) -> Result<Vec<PageRef>, ConfluenceError> {
    Descendants::new(api, root_id, page_size).collect()
}

/// Pages to monitor: `include` minus `exclude` minus the log page.
///
/// Keeps the order of `include`. Membership is exact ID match.
#[must_use]
pub fn monitored_pages(
    include: Vec<PageRef>,
    exclude: &[PageRef],
    log_page_id: &str,
) -> Vec<PageRef> {
    let excluded: HashSet<&str> = exclude.iter().map(|p| p.id.as_str()).collect();
    include
        .into_iter()
        .filter(|p| p.id != log_page_id && !excluded.contains(p.id.as_str()))
        .collect()
}
