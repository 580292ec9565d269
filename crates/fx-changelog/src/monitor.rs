//! Change log run over a page tree.

use std::time::{Duration, Instant};

use fx_config::MonitorConfig;
use fx_confluence::{ConfluenceApi, ConfluenceError};
use fx_confluence::types::Page;
use tracing::{info, warn};

use crate::changelog::{merge, render_rows};
use crate::error::{ChangelogError, MonitorError};
use crate::tree::{PageRef, collect_descendants, monitored_pages};
use crate::versions::fetch_versions;

/// Fields needed to rewrite the log page.
const LOG_PAGE_EXPAND: &[&str] = &["version", "body.storage"];

/// Page skipped because logging its changes failed.
#[derive(Debug)]
pub struct SkippedPage {
    /// The page.
    pub page: PageRef,
    /// Why it was skipped.
    pub error: ChangelogError,
}

/// Outcome of a monitoring run.
#[derive(Debug)]
pub struct RunReport {
    /// Number of pages in the monitored set.
    pub monitored: usize,
    /// Pages whose rows were written to the log page.
    pub logged: usize,
    /// Rows written across all pages.
    pub rows_written: usize,
    /// Pages that failed and are missing from the log.
    pub skipped: Vec<SkippedPage>,
    /// Wall-clock time of the per-page phase.
    pub elapsed: Duration,
}

/// Rebuilds the change log page for a page tree.
///
/// A run:
/// 1. Collects the descendants of the include root and, if configured, of the exclude root
/// 2. Removes the excluded pages and the log page itself
/// 3. Clears the log page
/// 4. Appends the version history of every remaining page to the log page table
///
/// Steps 1-3 abort the run on error. A failure in step 4 only skips the page.
pub struct ChangelogMonitor<'a, A: ConfluenceApi + ?Sized> {
    api: &'a A,
    config: &'a MonitorConfig,
}

impl<'a, A: ConfluenceApi + ?Sized> ChangelogMonitor<'a, A> {
    /// Create a monitor.
    #[must_use]
    pub fn new(api: &'a A, config: &'a MonitorConfig) -> Self {
        Self { api, config }
    }

    /// Run the full change log rebuild.
    ///
    /// # Errors
    ///
    /// Returns an error if a page tree cannot be traversed or the log page
    /// cannot be cleared. Errors for individual pages are reported in
    /// [`RunReport::skipped`] instead.
    pub fn run(&self) -> Result<RunReport, MonitorError> {
        let pages = self.monitored_set()?;
        self.clear_log_page()?;
        Ok(self.log_pages(pages))
    }

    /// Append the history of each page to the log page, in order.
    ///
    /// Pages that fail are skipped and listed in the report.
    #[must_use]
    pub fn log_pages(&self, pages: Vec<PageRef>) -> RunReport {
        let start = Instant::now();
        let mut report = RunReport {
            monitored: pages.len(),
            logged: 0,
            rows_written: 0,
            skipped: Vec::new(),
            elapsed: Duration::ZERO,
        };

        for page in pages {
            match self.log_page_changes(&page) {
                Ok(rows) => {
                    report.logged += 1;
                    report.rows_written += rows;
                }
                Err(error) => {
                    warn!(page_id = %page.id, title = %page.title, %error, "Skipping page");
                    report.skipped.push(SkippedPage { page, error });
                }
            }
        }

        report.elapsed = start.elapsed();
        info!(
            monitored = report.monitored,
            logged = report.logged,
            skipped = report.skipped.len(),
            rows = report.rows_written,
            elapsed_ms = report.elapsed.as_secs_f64() * 1000.0,
            "Change log rebuilt"
        );
        report
    }

    /// Pages whose history goes into the log, in traversal order.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::Traversal`] if either tree cannot be collected.
    pub fn monitored_set(&self) -> Result<Vec<PageRef>, MonitorError> {
        let include = self.descendants(&self.config.include)?;
        let exclude = match &self.config.exclude {
            Some(root) => self.descendants(root)?,
            None => Vec::new(),
        };

        let pages = monitored_pages(include, &exclude, &self.config.log_page);
        info!(
            include_root = %self.config.include,
            excluded = exclude.len(),
            monitored = pages.len(),
            "Computed monitored pages"
        );
        Ok(pages)
    }

    /// Replace the log page body with an empty body.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::ClearLogPage`] if the page cannot be read or written.
    pub fn clear_log_page(&self) -> Result<Page, MonitorError> {
        let page_id = &self.config.log_page;
        let clear = || -> Result<Page, ConfluenceError> {
            let page = self.api.get_page(page_id, &["version"])?;
            self.api
                .update_page(page_id, &page.title, "", page.version.number)
        };

        let page = clear().map_err(|source| MonitorError::ClearLogPage {
            page_id: page_id.clone(),
            source,
        })?;
        info!(page_id = %page_id, version = page.version.number, "Cleared log page");
        Ok(page)
    }

    /// Append the version history of one page to the log page.
    ///
    /// Returns the number of rows written.
    ///
    /// # Errors
    ///
    /// Returns an error if any request fails or a timestamp cannot be parsed.
    /// Nothing is written in that case.
    pub fn log_page_changes(&self, page: &PageRef) -> Result<usize, ChangelogError> {
        let versions = fetch_versions(self.api, &page.id, self.config.version_page_size)?;
        let current = self.api.get_page(&page.id, &["version"])?;
        let log_page = self.api.get_page(&self.config.log_page, LOG_PAGE_EXPAND)?;

        let rows = render_rows(&current.title, &self.api.page_url(&current), &versions);
        let body = merge(log_page.storage_value(), &rows);

        self.api.update_page(
            &self.config.log_page,
            &log_page.title,
            &body,
            log_page.version.number,
        )?;

        info!(page_id = %page.id, versions = versions.len(), "Logged page changes");
        Ok(versions.len())
    }

    fn descendants(&self, root: &str) -> Result<Vec<PageRef>, MonitorError> {
        collect_descendants(self.api, root, self.config.child_page_size).map_err(|source| {
            MonitorError::Traversal {
                root: root.to_owned(),
                source,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use fx_confluence::{MockConfluence, MockRequest};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::changelog::{HEADER_ROW, HEADING, TABLE_OPEN};

    const BASE: &str = "https://confluence.example.com/wiki";

    fn config(include: &str, exclude: Option<&str>, log_page: &str) -> MonitorConfig {
        MonitorConfig {
            include: include.to_owned(),
            exclude: exclude.map(str::to_owned),
            log_page: log_page.to_owned(),
            ..Default::default()
        }
    }

    /// root ── a, b, c (log page); excl ── b
    fn scenario() -> MockConfluence {
        MockConfluence::new()
            .with_page("root", "Root")
            .with_child("root", "a", "Page A")
            .with_child("root", "b", "Page B")
            .with_child("root", "c", "Change Log")
            .with_page("excl", "Archive")
            .with_child("excl", "b", "Page B")
            .with_version("a", 1, "Alice", "2023-05-01T10:15:30.123Z")
            .with_version("a", 2, "Bob", "2023-05-02T11:00:00.456Z")
            .with_version("b", 1, "Carol", "2023-05-03T09:00:00.000Z")
            .with_body("c", "<p>stale content</p>")
    }

    fn expected_log_body() -> String {
        format!(
            "{HEADING}{TABLE_OPEN}{HEADER_ROW}\
             <tr><td><a href=\"{BASE}/spaces/TEST/pages/a?pageVersion=1\">Page A</a></td><td>1</td><td>Alice</td><td>2023-05-01T10:15:30</td></tr>\
             <tr><td><a href=\"{BASE}/spaces/TEST/pages/a?pageVersion=2\">Page A</a></td><td>2</td><td>Bob</td><td>2023-05-02T11:00:00</td></tr>\
             </table>"
        )
    }

    #[test]
    fn test_monitored_set_excludes_subtree_and_log_page() {
        let api = scenario();
        let config = config("root", Some("excl"), "c");
        let monitor = ChangelogMonitor::new(&api, &config);

        let pages = monitor.monitored_set().unwrap();
        assert_eq!(pages, vec![PageRef::new("a", "Page A")]);
    }

    #[test]
    fn test_exclude_root_itself_stays_monitored() {
        let api = MockConfluence::new()
            .with_page("root", "Root")
            .with_child("root", "x", "Excluded Root")
            .with_child("x", "y", "Below Excluded Root");
        let config = config("root", Some("x"), "log");
        let monitor = ChangelogMonitor::new(&api, &config);

        let pages = monitor.monitored_set().unwrap();
        assert_eq!(pages, vec![PageRef::new("x", "Excluded Root")]);
    }

    #[test]
    fn test_run_end_to_end() {
        let api = scenario();
        let config = config("root", Some("excl"), "c");

        let report = ChangelogMonitor::new(&api, &config).run().unwrap();

        assert_eq!(report.monitored, 1);
        assert_eq!(report.logged, 1);
        assert_eq!(report.rows_written, 2);
        assert!(report.skipped.is_empty());
        assert_eq!(api.body("c").unwrap(), expected_log_body());
        // Clear + one update for page A
        assert_eq!(api.update_count("c"), 2);
        assert_eq!(api.version("c"), Some(3));
        assert!(
            !api.requests()
                .iter()
                .any(|r| matches!(r, MockRequest::GetVersions { page_id, .. } if page_id == "b"))
        );
    }

    #[test]
    fn test_run_clears_before_logging() {
        let api = scenario();
        let config = config("root", Some("excl"), "c");
        ChangelogMonitor::new(&api, &config).run().unwrap();

        let updates: Vec<_> = api
            .requests()
            .into_iter()
            .filter(|r| matches!(r, MockRequest::UpdatePage { .. }))
            .collect();
        assert_eq!(
            updates,
            vec![
                MockRequest::UpdatePage {
                    page_id: "c".to_owned(),
                    version: 2,
                },
                MockRequest::UpdatePage {
                    page_id: "c".to_owned(),
                    version: 3,
                },
            ]
        );
        assert!(!api.body("c").unwrap().contains("stale content"));
    }

    #[test]
    fn test_second_run_rebuilds_without_duplicates() {
        let api = scenario();
        let config = config("root", Some("excl"), "c");
        let monitor = ChangelogMonitor::new(&api, &config);

        monitor.run().unwrap();
        let first = api.body("c").unwrap();
        monitor.run().unwrap();

        assert_eq!(api.body("c").unwrap(), first);
        assert_eq!(api.version("c"), Some(5));
    }

    #[test]
    fn test_rows_accumulate_across_pages_in_traversal_order() {
        let api = scenario();
        let config = config("root", None, "c");

        let report = ChangelogMonitor::new(&api, &config).run().unwrap();
        assert_eq!(report.logged, 2);
        assert_eq!(report.rows_written, 3);

        let body = api.body("c").unwrap();
        assert_eq!(body.matches("<table").count(), 1);
        assert_eq!(body.matches(HEADER_ROW).count(), 1);
        let a = body.find("Page A").unwrap();
        let b = body.find("Page B").unwrap();
        assert!(a < b);
        assert!(body.contains("<td>Carol</td>"));
    }

    #[test]
    fn test_page_failure_is_skipped() {
        let api = MockConfluence::new()
            .with_page("root", "Root")
            .with_child("root", "a", "Page A")
            .with_child("root", "b", "Page B")
            .with_page("log", "Change Log")
            .with_version("a", 1, "Alice", "2023-05-01T10:15:30.123Z")
            .with_version("a", 2, "Alice", "not a timestamp")
            .with_version("b", 1, "Bob", "2023-05-01T10:15:30.123Z");
        let config = config("root", None, "log");

        let report = ChangelogMonitor::new(&api, &config).run().unwrap();

        assert_eq!(report.monitored, 2);
        assert_eq!(report.logged, 1);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].page.id, "a");
        assert!(matches!(
            report.skipped[0].error,
            ChangelogError::Timestamp { .. }
        ));

        let body = api.body("log").unwrap();
        assert!(!body.contains("Page A"));
        assert!(body.contains("Page B"));
    }

    #[test]
    fn test_page_with_no_versions_writes_header_only_table() {
        let api = MockConfluence::new()
            .with_page("root", "Root")
            .with_child("root", "a", "Page A")
            .with_page("log", "Change Log");
        let config = config("root", None, "log");

        let report = ChangelogMonitor::new(&api, &config).run().unwrap();

        assert_eq!(report.logged, 1);
        assert_eq!(report.rows_written, 0);
        assert_eq!(
            api.body("log").unwrap(),
            format!("{HEADING}{TABLE_OPEN}{HEADER_ROW}</table>")
        );
    }

    #[test]
    fn test_traversal_failure_is_fatal() {
        let api = scenario().with_failure("excl");
        let config = config("root", Some("excl"), "c");

        let err = ChangelogMonitor::new(&api, &config).run().unwrap_err();
        assert!(matches!(err, MonitorError::Traversal { ref root, .. } if root == "excl"));
        assert_eq!(
            err.to_string(),
            "failed to collect descendants of page excl: HTTP error: 500 - simulated failure for page excl"
        );
        // Nothing was written
        assert_eq!(api.update_count("c"), 0);
    }

    #[test]
    fn test_missing_log_page_is_fatal() {
        let api = MockConfluence::new()
            .with_page("root", "Root")
            .with_child("root", "a", "Page A");
        let config = config("root", None, "missing");

        let err = ChangelogMonitor::new(&api, &config).run().unwrap_err();
        assert!(matches!(err, MonitorError::ClearLogPage { .. }));
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn test_empty_tree_only_clears() {
        let api = MockConfluence::new()
            .with_page("root", "Root")
            .with_page("log", "Change Log")
            .with_body("log", "<p>old</p>");
        let config = config("root", None, "log");

        let report = ChangelogMonitor::new(&api, &config).run().unwrap();

        assert_eq!(report.monitored, 0);
        assert_eq!(api.body("log").unwrap(), "");
        assert_eq!(api.update_count("log"), 1);
    }
}
