//! Progress notifications emitted while crawling

use std::time::Duration;

/// One visited URL, reported after its fetch completes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitEvent<'a> {
    pub url: &'a str,

    /// Link hops from the seed (0 for the seed itself)
    pub depth: u32,

    /// HTTP status, or 0 when no response arrived
    pub status_code: u16,

    pub elapsed: Duration,

    /// Whether the URL was written to the sitemap
    pub recorded: bool,
}

/// Receives a [`VisitEvent`] for every visited URL
///
/// Observers are informational; nothing they do affects the traversal.
pub trait CrawlObserver: Send + Sync {
    fn on_visit(&self, event: &VisitEvent<'_>);
}

/// Observer that ignores every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl CrawlObserver for NoopObserver {
    fn on_visit(&self, _event: &VisitEvent<'_>) {}
}

/// Observer that logs each visit at debug level
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl CrawlObserver for TracingObserver {
    fn on_visit(&self, event: &VisitEvent<'_>) {
        tracing::debug!(
            url = event.url,
            depth = event.depth,
            status = event.status_code,
            elapsed_ms = event.elapsed.as_millis() as u64,
            recorded = event.recorded,
            "Visited"
        );
    }
}
