//! Confluence REST API access for fxchangelog.
//!
//! This crate provides:
//! - [`ConfluenceApi`]: the content, child page, version history and update
//!   operations the change log is built from
//! - [`ConfluenceClient`]: blocking implementation over `ureq` with HTTP Basic
//!   (email + API token) authentication
//! - [`MockConfluence`]: in-memory implementation for tests (behind the `mock` feature)
//!
//! # API Client
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use fx_confluence::{ConfluenceApi, ConfluenceClient};
//!
//! let client = ConfluenceClient::from_config(
//!     "https://example.atlassian.net/wiki",
//!     "jane@example.com",
//!     "api-token",
//!     30,
//! );
//!
//! let page = client.get_page("123", &["version", "body.storage"])?;
//! let history = client.get_versions("123", 0, 500)?;
//! println!("{} has {} versions", page.title, history.size);
//! # Ok(())
//! # }
//! ```

mod api;
pub use api::ConfluenceApi;

// API client
mod auth;
mod client;
pub use auth::BasicAuth;
pub use client::ConfluenceClient;

#[cfg(feature = "mock")]
mod mock;
#[cfg(feature = "mock")]
pub use mock::{MockConfluence, MockRequest};

// Types
pub mod types;

// Errors
pub mod error;
pub use error::ConfluenceError;
