//! Version history retrieval.

use chrono::NaiveDateTime;
use fx_confluence::ConfluenceApi;
use fx_confluence::types::ContentVersion;
use tracing::debug;

use crate::error::ChangelogError;

/// Timestamp format of version history entries (`2023-05-01T10:15:30.123Z`).
const SOURCE_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.fZ";

/// Timestamp format written to the change log (`2023-05-01T10:15:30`).
const LOG_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// One entry of a page's version history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionRecord {
    /// Version number.
    pub number: u32,
    /// Display name of the editor.
    pub author: String,
    /// Edit time (UTC).
    pub timestamp: NaiveDateTime,
}

impl VersionRecord {
    /// Timestamp at seconds precision, without zone marker.
    #[must_use]
    pub fn formatted_timestamp(&self) -> String {
        self.timestamp.format(LOG_TIMESTAMP_FORMAT).to_string()
    }
}

impl TryFrom<ContentVersion> for VersionRecord {
    type Error = ChangelogError;

    fn try_from(version: ContentVersion) -> Result<Self, Self::Error> {
        Ok(Self {
            number: version.number,
            timestamp: parse_timestamp(&version.when)?,
            author: version.by.display_name,
        })
    }
}

/// Parse a version history timestamp.
///
/// # Errors
///
/// Returns [`ChangelogError::Timestamp`] if `value` does not match
/// `YYYY-MM-DDTHH:MM:SS.fffZ`.
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime, ChangelogError> {
    NaiveDateTime::parse_from_str(value, SOURCE_TIMESTAMP_FORMAT).map_err(|source| {
        ChangelogError::Timestamp {
            value: value.to_owned(),
            source,
        }
    })
}

/// Reformat a version history timestamp for the change log.
///
/// Fractional seconds and the `Z` marker are dropped:
/// `2023-05-01T10:15:30.123456Z` becomes `2023-05-01T10:15:30`.
///
/// # Errors
///
/// Returns [`ChangelogError::Timestamp`] if `value` is not a version history timestamp.
pub fn format_timestamp(value: &str) -> Result<String, ChangelogError> {
    Ok(parse_timestamp(value)?.format(LOG_TIMESTAMP_FORMAT).to_string())
}

/// Fetch the full version history of a page, oldest first.
///
/// Requests `page_size` entries at a time, starting at offset 0, until a
/// request returns fewer entries than asked for. The offset advances by the
/// number of entries received, so a server that caps the page size is
/// still read to the end. Entries are kept in server order.
///
/// # Errors
///
/// Returns the first request or timestamp error; no partial history is returned.
pub fn fetch_versions<A: ConfluenceApi + ?Sized>(
    api: &A,
    page_id: &str,
    page_size: usize,
) -> Result<Vec<VersionRecord>, ChangelogError> {
    let page_size = page_size.max(1);
    let mut versions = Vec::new();
    let mut start = 0;

    loop {
        let window = api.get_versions(page_id, start, page_size)?;
        let full = window.is_full(page_size);
        let received = window.results.len();
        for version in window.results {
            versions.push(VersionRecord::try_from(version)?);
        }
        if !full {
            break;
        }
        start += received;
    }

    debug!(page_id, count = versions.len(), "Fetched version history");
    Ok(versions)
}
