//! Sitemap document model and serialization
//!
//! The crawl appends entries to a [`SitemapDocument`] as it visits pages; the
//! XML tree is only produced once, at the end, by [`SitemapDocument::to_xml`].

mod entry;
mod writer;

pub use entry::{SitemapEntry, CHANGE_FREQUENCY, DEFAULT_PRIORITY};
pub use writer::{to_xml, SITEMAP_NAMESPACE};

use crate::Result;
use std::collections::HashSet;
use std::path::Path;

/// Ordered, append-only list of sitemap entries with unique locations
#[derive(Debug, Clone, Default)]
pub struct SitemapDocument {
    entries: Vec<SitemapEntry>,
    locations: HashSet<String>,
}

impl SitemapDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry
    ///
    /// Returns false and leaves the document unchanged if an entry with the
    /// same location is already present.
    pub fn push(&mut self, entry: SitemapEntry) -> bool {
        if !self.locations.insert(entry.location.clone()) {
            return false;
        }
        self.entries.push(entry);
        true
    }

    /// Entries in insertion order
    pub fn entries(&self) -> &[SitemapEntry] {
        &self.entries
    }

    /// Locations in insertion order
    pub fn locations(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.location.as_str())
    }

    pub fn contains(&self, location: &str) -> bool {
        self.locations.contains(location)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serializes the document to pretty-printed XML
    pub fn to_xml(&self) -> Result<String> {
        to_xml(self)
    }

    /// Writes the serialized document to `path` and returns the byte count
    pub fn write_to(&self, path: &Path) -> Result<usize> {
        let xml = self.to_xml()?;
        std::fs::write(path, xml.as_bytes())?;
        tracing::debug!("Wrote {} entries to {}", self.len(), path.display());
        Ok(xml.len())
    }
}
