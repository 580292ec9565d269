//! Error types for change log synthesis.

use fx_confluence::ConfluenceError;

/// Error while logging the changes of a single page.
///
/// The monitor skips the page and continues with the next one.
#[derive(Debug, thiserror::Error)]
pub enum ChangelogError {
    /// Confluence request failed.
    #[error(transparent)]
    Confluence(#[from] ConfluenceError),

    /// Version timestamp did not match `YYYY-MM-DDTHH:MM:SS.fffZ`.
    #[error("invalid version timestamp '{value}'")]
    Timestamp {
        /// Timestamp as returned by the server.
        value: String,
        /// Parser error.
        #[source]
        source: chrono::ParseError,
    },
}

/// Error that aborts a monitoring run.
#[derive(Debug, thiserror::Error)]
pub enum MonitorError {
    /// Collecting the descendants of a root page failed.
    #[error("failed to collect descendants of page {root}: {source}")]
    Traversal {
        /// Root page of the traversal.
        root: String,
        /// Underlying request error.
        #[source]
        source: ConfluenceError,
    },

    /// Reading or clearing the log page failed.
    #[error("failed to clear log page {page_id}: {source}")]
    ClearLogPage {
        /// Log page ID.
        page_id: String,
        /// Underlying request error.
        #[source]
        source: ConfluenceError,
    },
}
