//! URL handling module for Sumi-Sitemap
//!
//! This module provides href resolution, seed parsing, and the matching
//! policies that decide whether a discovered URL stays inside the crawl.

mod domain;
mod resolve;

use serde::Deserialize;

// Re-export main functions
pub use domain::{extract_domain, parse_seed, raw_origin, RawOrigin};
pub use resolve::resolve;

/// Policy used to decide whether a URL belongs to the seed's host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HostMatch {
    /// The URL string contains the seed host, spelled as in the seed, anywhere.
    ///
    /// This is loose on purpose: `http://evil.com/example.com` matches the
    /// host `example.com`.
    #[default]
    Substring,

    /// The URL's parsed host equals the seed host (case-insensitive)
    Exact,
}

impl HostMatch {
    /// Returns true if `url` is on `seed_host` under this policy
    ///
    /// # Examples
    ///
    /// ```
    /// use sumi_sitemap::url::HostMatch;
    ///
    /// assert!(HostMatch::Substring.matches("http://evil.com/example.com", "example.com"));
    /// assert!(!HostMatch::Exact.matches("http://evil.com/example.com", "example.com"));
    /// ```
    pub fn matches(&self, url: &str, seed_host: &str) -> bool {
        match self {
            Self::Substring => url.contains(seed_host),
            Self::Exact => ::url::Url::parse(url)
                .ok()
                .and_then(|parsed| extract_domain(&parsed))
                .is_some_and(|host| host == seed_host.to_lowercase()),
        }
    }
}

/// Returns the first exclusion substring contained in `url`, if any
pub fn matching_exclusion<'a>(url: &str, exclusions: &'a [String]) -> Option<&'a str> {
    exclusions
        .iter()
        .map(String::as_str)
        .find(|excluded| url.contains(excluded))
}
