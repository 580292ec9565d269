//! HTTP Basic authentication for Confluence Cloud.
//!
//! Confluence Cloud accepts an account email paired with an API token in
//! place of a password.

use std::fmt;

use base64::Engine;
use base64::prelude::BASE64_STANDARD;

/// Basic credentials (`email:api_token`), pre-encoded for the `Authorization` header.
#[derive(Clone)]
pub struct BasicAuth {
    header: String,
}

impl BasicAuth {
    /// Encode credentials once; the header is reused for every request.
    #[must_use]
    pub fn new(email: &str, api_token: &str) -> Self {
        let encoded = BASE64_STANDARD.encode(format!("{email}:{api_token}"));
        Self {
            header: format!("Basic {encoded}"),
        }
    }

    /// Value of the `Authorization` header.
    #[must_use]
    pub fn header(&self) -> &str {
        &self.header
    }
}

// The header is a reversible encoding of the token.
impl fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuth").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_encodes_email_and_token() {
        let auth = BasicAuth::new("jane@example.com", "abc123");
        assert_eq!(auth.header(), "Basic amFuZUBleGFtcGxlLmNvbTphYmMxMjM=");
    }

    #[test]
    fn test_debug_hides_credentials() {
        let auth = BasicAuth::new("jane@example.com", "abc123");
        let debug = format!("{auth:?}");
        assert!(!debug.contains("amFuZU"));
        assert!(debug.contains("BasicAuth"));
    }
}
