//! Splicing rendered rows into the log page body.
//!
//! The table is located with an XML event scan, so `<table` appearing in
//! text, comments or CDATA is not mistaken for markup. Only the insertion
//! offset is taken from the scan; the body itself is never re-serialized,
//! so all other markup is kept byte-for-byte.

use quick_xml::events::Event;
use quick_xml::reader::Reader;
use tracing::{debug, warn};

use super::{HEADER_ROW, HEADING, TABLE_OPEN};

/// Where the first table of a body ends.
#[derive(Debug, PartialEq, Eq)]
enum TableScan {
    /// The body contains no table element.
    NoTable,
    /// Byte offset at which new rows belong.
    InsertAt(usize),
    /// The body could not be scanned as XML.
    Malformed(String),
}

/// Add rendered rows to an existing log page body.
///
/// Without a table, a new section (heading, table, header row, rows) is
/// appended to the body. With a table, the rows are inserted right before
/// the closing tag of the first table, or before its last `</tbody>` when
/// the server wrapped the rows in one. Rows are never de-duplicated.
#[must_use]
pub fn merge(existing_body: &str, rows: &str) -> String {
    match scan_first_table(existing_body) {
        TableScan::NoTable => append_table(existing_body, rows),
        TableScan::InsertAt(offset) => splice(existing_body, offset, rows),
        TableScan::Malformed(reason) => {
            warn!(%reason, "Log page body is not well-formed, falling back to text search");
            merge_text(existing_body, rows)
        }
    }
}

fn append_table(existing_body: &str, rows: &str) -> String {
    format!("{existing_body}{HEADING}{TABLE_OPEN}{HEADER_ROW}{rows}</table>")
}

fn splice(existing_body: &str, offset: usize, rows: &str) -> String {
    let mut merged = String::with_capacity(existing_body.len() + rows.len());
    merged.push_str(&existing_body[..offset]);
    merged.push_str(rows);
    merged.push_str(&existing_body[offset..]);
    merged
}

/// Substring fallback for bodies the XML reader rejects.
fn merge_text(existing_body: &str, rows: &str) -> String {
    if !existing_body.contains("<table") {
        return append_table(existing_body, rows);
    }
    match existing_body.find("</table>") {
        Some(offset) => splice(existing_body, offset, rows),
        None => append_table(existing_body, rows),
    }
}

fn scan_first_table(body: &str) -> TableScan {
    let mut reader = Reader::from_str(body);
    reader.config_mut().trim_text(false);

    let mut depth = 0usize;
    let mut tbody_end = None;

    loop {
        let Ok(event_start) = usize::try_from(reader.buffer_position()) else {
            return TableScan::Malformed("body too large".to_owned());
        };
        let event = match reader.read_event() {
            Ok(event) => event,
            Err(e) => return TableScan::Malformed(e.to_string()),
        };

        match event {
            Event::Start(e) if is_tag(e.local_name().as_ref(), b"table") => depth += 1,
            Event::End(e) if depth == 1 && is_tag(e.local_name().as_ref(), b"tbody") => {
                tbody_end = Some(event_start);
            }
            Event::End(e) if depth > 0 && is_tag(e.local_name().as_ref(), b"table") => {
                depth -= 1;
                if depth == 0 {
                    let offset = tbody_end.unwrap_or(event_start);
                    debug!(offset, "Found end of first table");
                    if !body.is_char_boundary(offset) {
                        return TableScan::Malformed(format!("offset {offset} inside character"));
                    }
                    return TableScan::InsertAt(offset);
                }
            }
            Event::Eof if depth > 0 => return TableScan::Malformed("unclosed table".to_owned()),
            Event::Eof => return TableScan::NoTable,
            _ => {}
        }
    }
}

fn is_tag(name: &[u8], tag: &[u8]) -> bool {
    name.eq_ignore_ascii_case(tag)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const ROW_A: &str = "<tr><td>a</td></tr>";
    const ROW_B: &str = "<tr><td>b</td></tr>";

    #[test]
    fn test_merge_into_empty_body_creates_table() {
        let merged = merge("", ROW_A);
        assert_eq!(
            merged,
            format!("{HEADING}{TABLE_OPEN}{HEADER_ROW}{ROW_A}</table>")
        );
    }

    #[test]
    fn test_merge_appends_section_after_existing_content() {
        let body = "<p>Intro with &amp; entity</p>";
        let merged = merge(body, ROW_A);
        assert!(merged.starts_with(body));
        assert_eq!(merged.matches("<table").count(), 1);
        assert_eq!(merged.matches("<th>").count(), 4);
        assert!(merged.ends_with(&format!("{ROW_A}</table>")));
    }

    #[test]
    fn test_merge_into_existing_table_keeps_rows_and_header() {
        let first = merge("", ROW_A);
        let merged = merge(&first, ROW_B);

        assert_eq!(
            merged,
            format!("{HEADING}{TABLE_OPEN}{HEADER_ROW}{ROW_A}{ROW_B}</table>")
        );
        assert_eq!(merged.matches(HEADER_ROW).count(), 1);
    }

    #[test]
    fn test_merge_preserves_surrounding_markup() {
        let body = concat!(
            r#"<p>Before</p><table data-layout="default"><tr><th>H</th></tr></table>"#,
            r#"<ac:structured-macro ac:name="info"><ac:plain-text-body><![CDATA[x]]></ac:plain-text-body></ac:structured-macro>"#
        );
        let merged = merge(body, ROW_A);
        assert_eq!(
            merged,
            concat!(
                r#"<p>Before</p><table data-layout="default"><tr><th>H</th></tr><tr><td>a</td></tr></table>"#,
                r#"<ac:structured-macro ac:name="info"><ac:plain-text-body><![CDATA[x]]></ac:plain-text-body></ac:structured-macro>"#
            )
        );
    }

    #[test]
    fn test_merge_inserts_inside_tbody() {
        let body = "<table><tbody><tr><th>H</th></tr><tr><td>old</td></tr></tbody></table>";
        let merged = merge(body, ROW_A);
        assert_eq!(
            merged,
            "<table><tbody><tr><th>H</th></tr><tr><td>old</td></tr><tr><td>a</td></tr></tbody></table>"
        );
    }

    #[test]
    fn test_merge_only_touches_first_table() {
        let body = "<table><tr><td>1</td></tr></table><table><tr><td>2</td></tr></table>";
        let merged = merge(body, ROW_A);
        assert_eq!(
            merged,
            "<table><tr><td>1</td></tr><tr><td>a</td></tr></table><table><tr><td>2</td></tr></table>"
        );
    }

    #[test]
    fn test_merge_skips_nested_table_end() {
        let body = "<table><tr><td><table><tr><td>in</td></tr></table></td></tr></table>";
        let merged = merge(body, ROW_A);
        assert_eq!(
            merged,
            "<table><tr><td><table><tr><td>in</td></tr></table></td></tr><tr><td>a</td></tr></table>"
        );
    }

    #[test]
    fn test_table_word_in_text_is_not_a_table() {
        let body = "<p>Use &lt;table&gt; for data</p><!-- <table> -->";
        let merged = merge(body, ROW_A);
        assert!(merged.starts_with(body));
        assert!(merged.ends_with(&format!("{HEADING}{TABLE_OPEN}{HEADER_ROW}{ROW_A}</table>")));
    }

    #[test]
    fn test_merge_duplicates_identical_rows() {
        let once = merge("", ROW_A);
        let twice = merge(&once, ROW_A);
        assert_eq!(twice.matches(ROW_A).count(), 2);
    }

    #[test]
    fn test_merge_with_non_ascii_content() {
        let body = "<p>Überblick – Änderungen</p><table><tr><td>ü</td></tr></table>";
        let merged = merge(body, ROW_A);
        assert_eq!(
            merged,
            "<p>Überblick – Änderungen</p><table><tr><td>ü</td></tr><tr><td>a</td></tr></table>"
        );
    }

    #[test]
    fn test_malformed_body_falls_back_to_text() {
        let body = "<table><tr><td>x<br></td></tr></table>";
        assert!(matches!(scan_first_table(body), TableScan::Malformed(_)));

        let merged = merge(body, ROW_A);
        assert_eq!(
            merged,
            "<table><tr><td>x<br></td></tr><tr><td>a</td></tr></table>"
        );
    }

    #[test]
    fn test_scan_reports_no_table() {
        assert_eq!(scan_first_table("<p>nothing</p>"), TableScan::NoTable);
        assert_eq!(scan_first_table(""), TableScan::NoTable);
    }
}
