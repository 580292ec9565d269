//! Change log synthesis for Confluence page trees.
//!
//! This crate rebuilds a "change log" page listing the full version history
//! of every page below an include root, minus the pages below an optional
//! exclude root and minus the log page itself.
//!
//! # Architecture
//!
//! - [`Descendants`] walks a page tree in pre-order
//! - [`fetch_versions`] reads a page's version history
//! - [`changelog`] renders table rows and merges them into the log page body
//! - [`ChangelogMonitor`] drives a full run against any [`ConfluenceApi`]
//!
//! # Example
//!
//! ```ignore
//! use fx_changelog::ChangelogMonitor;
//! use fx_config::MonitorConfig;
//! use fx_confluence::ConfluenceClient;
//!
//! let client = ConfluenceClient::from_config(base_url, email, token, 30);
//! let config = MonitorConfig {
//!     include: "1000".to_owned(),
//!     exclude: Some("2000".to_owned()),
//!     log_page: "3000".to_owned(),
//!     ..Default::default()
//! };
//! let report = ChangelogMonitor::new(&client, &config).run()?;
//! println!("{} pages logged", report.logged);
//! ```
//!
//! [`ConfluenceApi`]: fx_confluence::ConfluenceApi

pub mod changelog;
mod error;
mod monitor;
mod tree;
mod versions;

pub use error::{ChangelogError, MonitorError};
pub use monitor::{ChangelogMonitor, RunReport, SkippedPage};
pub use tree::{Descendants, PageRef, collect_descendants, monitored_pages};
pub use versions::{VersionRecord, fetch_versions, format_timestamp, parse_timestamp};
