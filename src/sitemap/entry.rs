//! Sitemap entry types

use chrono::NaiveDate;

/// Priority written for every entry
pub const DEFAULT_PRIORITY: f32 = 0.5;

/// `<changefreq>` written for every entry
pub const CHANGE_FREQUENCY: &str = "weekly";

/// One `<url>` element of a sitemap
#[derive(Debug, Clone, PartialEq)]
pub struct SitemapEntry {
    /// Absolute URL of the page
    pub location: String,

    /// Date the page was visited
    pub last_modified: NaiveDate,

    pub priority: f32,
}

impl SitemapEntry {
    /// Creates an entry with the fixed weekly frequency and 0.5 priority
    pub fn new(location: impl Into<String>, last_modified: NaiveDate) -> Self {
        Self {
            location: location.into(),
            last_modified,
            priority: DEFAULT_PRIORITY,
        }
    }

    /// Creates an entry dated today (local time)
    pub fn visited_today(location: impl Into<String>) -> Self {
        Self::new(location, chrono::Local::now().date_naive())
    }

    /// `<lastmod>` text: ISO 8601 date without time
    pub fn last_modified_text(&self) -> String {
        self.last_modified.format("%Y-%m-%d").to_string()
    }

    /// `<priority>` text with one decimal place
    pub fn priority_text(&self) -> String {
        format!("{:.1}", self.priority)
    }
}
