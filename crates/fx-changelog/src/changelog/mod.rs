//! Change log table synthesis.
//!
//! A log page body holds one table:
//!
//! ```text
//! <h2>Change Log</h2>
//! <table border="1" style="width:100%;border-collapse:collapse;">
//!   <tr><th>Page Title</th><th>Version</th><th>Author</th><th>Date</th></tr>
//!   <tr><td><a href="{page url}?pageVersion=1">{title}</a></td><td>1</td><td>{author}</td><td>2023-05-01T10:15:30</td></tr>
//!   ...
//! </table>
//! ```
//!
//! [`render_rows`] renders the rows for one page and [`merge`] adds them to
//! the current body: a new section when the body has no table, otherwise
//! the rows are spliced in front of the table's closing tag.

mod merge;
mod render;

pub use merge::merge;
pub use render::{escape_xml, render_rows, version_link};

/// Heading placed above a newly created table.
pub const HEADING: &str = "<h2>Change Log</h2>";

/// Opening tag of a newly created table.
pub const TABLE_OPEN: &str = r#"<table border="1" style="width:100%;border-collapse:collapse;">"#;

/// Header row of a newly created table.
pub const HEADER_ROW: &str =
    "<tr><th>Page Title</th><th>Version</th><th>Author</th><th>Date</th></tr>";
