//! Confluence page types.

use serde::{Deserialize, Serialize};

/// Confluence page.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Page {
    /// Page ID.
    pub id: String,
    /// Content type (always "page").
    #[serde(rename = "type")]
    pub content_type: String,
    /// Page title.
    pub title: String,
    /// Version information.
    pub version: Version,
    /// Page body content.
    #[serde(default)]
    pub body: Option<Body>,
    /// Hypermedia links.
    #[serde(rename = "_links", default)]
    pub links: Option<Links>,
}

impl Page {
    /// Storage-format body, or `""` when the body was not expanded.
    #[must_use]
    pub fn storage_value(&self) -> &str {
        self.body
            .as_ref()
            .and_then(|b| b.storage.as_ref())
            .map_or("", |s| s.value.as_str())
    }

    /// Relative web UI link (e.g. `/spaces/FX/pages/123/Title`).
    #[must_use]
    pub fn webui(&self) -> Option<&str> {
        self.links.as_ref().and_then(|l| l.webui.as_deref())
    }
}

/// Entry of a child page listing.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PageSummary {
    /// Page ID.
    pub id: String,
    /// Page title.
    pub title: String,
}

/// Page version.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Version {
    /// Version number.
    pub number: u32,
    /// Version message/comment.
    #[serde(default)]
    pub message: Option<String>,
}

/// Page body content.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Body {
    /// Storage format content.
    #[serde(default)]
    pub storage: Option<Storage>,
}

/// Storage format representation.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Storage {
    /// HTML content in Confluence storage format.
    pub value: String,
    /// Content representation (always "storage").
    pub representation: String,
}

/// Hypermedia links.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Links {
    /// Web UI link.
    #[serde(default)]
    pub webui: Option<String>,
    /// API self link.
    #[serde(rename = "self", default)]
    pub self_link: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_expanded_page() {
        let json = r#"{
            "id": "204046352",
            "type": "page",
            "status": "current",
            "title": "Change Log",
            "version": {"number": 7, "minorEdit": false},
            "body": {"storage": {"value": "<p>x</p>", "representation": "storage"}},
            "_links": {"webui": "/spaces/FX/pages/204046352/Change+Log", "self": "https://x/rest/api/content/204046352"}
        }"#;
        let page: Page = serde_json::from_str(json).unwrap();
        assert_eq!(page.id, "204046352");
        assert_eq!(page.version.number, 7);
        assert_eq!(page.storage_value(), "<p>x</p>");
        assert_eq!(page.webui(), Some("/spaces/FX/pages/204046352/Change+Log"));
    }

    #[test]
    fn test_storage_value_without_body() {
        let json = r#"{"id": "1", "type": "page", "title": "T", "version": {"number": 1}}"#;
        let page: Page = serde_json::from_str(json).unwrap();
        assert_eq!(page.storage_value(), "");
        assert_eq!(page.webui(), None);
    }
}
