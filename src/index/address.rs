//! Site-key extraction and the indexing validity gate
//!
//! An address is indexable only if it parses as a URL, has a host, and is
//! not one of the browser-internal schemes. Entries failing this gate are
//! skipped entirely: they contribute to neither score nor presence.

use url::Url;

/// Schemes that never enter the index: in-process resources, the "about"
/// pseudo-scheme, and raw local files.
const EXCLUDED_SCHEMES: &[&str] = &["qrc", "about", "file"];

/// Scheme + host identity of a visited address.
///
/// Visits collapse into one ranked entry per host; the scheme is kept for
/// building the displayed site URL (e.g. `http://example.com`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteKey {
    scheme: String,
    host: String,
}

impl SiteKey {
    /// Parse an address into its site key, or `None` if the address is not
    /// indexable (empty, malformed, hostless, or an excluded scheme).
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }

        let url = Url::parse(trimmed).ok()?;
        if EXCLUDED_SCHEMES.contains(&url.scheme()) {
            return None;
        }

        let host = url.host_str()?;
        if host.is_empty() {
            return None;
        }

        Some(Self {
            scheme: url.scheme().to_string(),
            host: host.to_string(),
        })
    }

    /// The deduplication key: visits to the same host collapse together
    pub fn host(&self) -> &str {
        &self.host
    }

    /// The displayed site URL, `scheme://host`
    pub fn site(&self) -> String {
        format!("{}://{}", self.scheme, self.host)
    }

    pub fn into_host(self) -> String {
        self.host
    }
}

impl std::fmt::Display for SiteKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}://{}", self.scheme, self.host)
    }
}
