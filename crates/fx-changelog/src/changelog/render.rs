//! Table row rendering.

use std::fmt::Write;

use crate::versions::VersionRecord;

/// Render one table row per version, in the given order.
///
/// Each row links to the historical version of the page, so `page_link`
/// must be the page's absolute web URL.
#[must_use]
pub fn render_rows(title: &str, page_link: &str, versions: &[VersionRecord]) -> String {
    let title = escape_xml(title, false);
    let mut rows = String::with_capacity(versions.len() * 160);

    for version in versions {
        let href = escape_xml(&version_link(page_link, version.number), true);
        let _ = write!(
            rows,
            r#"<tr><td><a href="{href}">{title}</a></td><td>{}</td><td>{}</td><td>{}</td></tr>"#,
            version.number,
            escape_xml(&version.author, false),
            version.formatted_timestamp()
        );
    }

    rows
}

/// Link to a specific version of a page.
#[must_use]
pub fn version_link(page_link: &str, number: u32) -> String {
    let separator = if page_link.contains('?') { '&' } else { '?' };
    format!("{page_link}{separator}pageVersion={number}")
}

/// Escape XML special characters.
///
/// Quotes are only escaped for attribute values.
#[must_use]
pub fn escape_xml(text: &str, escape_quotes: bool) -> String {
    let mut result = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' if escape_quotes => result.push_str("&quot;"),
            '\'' if escape_quotes => result.push_str("&apos;"),
            _ => result.push(ch),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::versions::parse_timestamp;

    fn record(number: u32, author: &str, when: &str) -> VersionRecord {
        VersionRecord {
            number,
            author: author.to_owned(),
            timestamp: parse_timestamp(when).unwrap(),
        }
    }

    #[test]
    fn test_render_single_row() {
        let rows = render_rows(
            "Architecture",
            "https://wiki.example.com/wiki/spaces/FX/pages/11/Architecture",
            &[record(3, "Alice", "2023-05-01T10:15:30.123456Z")],
        );
        assert_eq!(
            rows,
            concat!(
                r#"<tr><td><a href="https://wiki.example.com/wiki/spaces/FX/pages/11/Architecture?pageVersion=3">Architecture</a></td>"#,
                "<td>3</td><td>Alice</td><td>2023-05-01T10:15:30</td></tr>"
            )
        );
    }

    #[test]
    fn test_render_rows_keep_input_order() {
        let rows = render_rows(
            "A",
            "https://x/a",
            &[
                record(2, "Bob", "2023-05-02T00:00:00.000Z"),
                record(1, "Alice", "2023-05-01T00:00:00.000Z"),
            ],
        );
        let bob = rows.find("pageVersion=2").unwrap();
        let alice = rows.find("pageVersion=1").unwrap();
        assert!(bob < alice);
        assert_eq!(rows.matches("<tr>").count(), 2);
    }

    #[test]
    fn test_render_no_versions() {
        assert_eq!(render_rows("A", "https://x/a", &[]), "");
    }

    #[test]
    fn test_render_escapes_markup() {
        let rows = render_rows(
            "R&D <draft>",
            "https://x/pages/viewpage.action?pageId=7",
            &[record(1, "O'Brien & Co", "2023-05-01T00:00:00.000Z")],
        );
        assert!(rows.contains(r#"href="https://x/pages/viewpage.action?pageId=7&amp;pageVersion=1""#));
        assert!(rows.contains(">R&amp;D &lt;draft&gt;</a>"));
        assert!(rows.contains("<td>O'Brien &amp; Co</td>"));
    }

    #[test]
    fn test_version_link_separator() {
        assert_eq!(version_link("https://x/p/1", 4), "https://x/p/1?pageVersion=4");
        assert_eq!(
            version_link("https://x/viewpage.action?pageId=1", 4),
            "https://x/viewpage.action?pageId=1&pageVersion=4"
        );
    }
}
