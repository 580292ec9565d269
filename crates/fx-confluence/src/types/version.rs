//! Confluence version history types.

use serde::{Deserialize, Serialize};

/// Entry of a page's version history.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ContentVersion {
    /// Version number (starts at 1).
    pub number: u32,
    /// User who created this version.
    pub by: User,
    /// Creation time, e.g. `2023-05-01T10:15:30.123Z`.
    pub when: String,
    /// Version message/comment.
    #[serde(default)]
    pub message: Option<String>,
}

/// Confluence user as embedded in version entries.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct User {
    /// Name shown in the UI.
    #[serde(rename = "displayName")]
    pub display_name: String,
    /// Atlassian account ID (Cloud only).
    #[serde(rename = "accountId", default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
}
