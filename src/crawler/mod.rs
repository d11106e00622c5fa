//! Crawler module for web page fetching and traversal
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching that reports failures instead of raising them
//! - HTML parsing and href extraction
//! - Progress observers
//! - The depth-bounded, host-scoped traversal itself

mod coordinator;
mod fetcher;
mod observer;
mod parser;

pub use coordinator::{run_crawl, CrawlOutcome, Crawler};
pub use fetcher::{
    build_http_client, fetch_headers, fetch_page, user_agent_string, FetchResult, HeaderReport,
    ResponsePolicy, TRANSPORT_FAILURE,
};
pub use observer::{CrawlObserver, NoopObserver, TracingObserver, VisitEvent};
pub use parser::extract_hrefs;

use crate::config::Config;
use crate::Result;

/// Runs a crawl and writes the resulting sitemap to the configured path
///
/// # Returns
///
/// * `Ok((CrawlOutcome, usize))` - The crawl outcome and the number of bytes written
/// * `Err(SitemapError)` - Invalid configuration or the sitemap could not be written
pub async fn crawl(config: Config) -> Result<(CrawlOutcome, usize)> {
    let output_path = std::path::PathBuf::from(&config.output.sitemap_path);
    let outcome = run_crawl(config).await?;
    let written = outcome.sitemap.write_to(&output_path)?;
    tracing::info!("Saved {} bytes to {}", written, output_path.display());
    Ok((outcome, written))
}
