//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the traversal loop that ties together:
//! - The work-list of `(url, remaining depth)` tasks
//! - URL acceptance and claiming through [`CrawlState`]
//! - Fetching, href extraction and resolution
//! - Appending visited URLs to the sitemap document
//!
//! Tasks are kept on a LIFO stack. Children are pushed in reverse document
//! order and only checked when popped, so with one fetch in flight the visit
//! order is exactly that of a recursive depth-first walk. With more fetches
//! in flight, entries are appended in completion order.

use crate::config::{validate, Config};
use crate::crawler::observer::{CrawlObserver, TracingObserver, VisitEvent};
use crate::crawler::{
    build_http_client, extract_hrefs, fetch_headers, fetch_page, FetchResult, HeaderReport,
};
use crate::sitemap::{SitemapDocument, SitemapEntry};
use crate::state::{CrawlState, CrawlTask};
use crate::url::{parse_seed, resolve};
use crate::Result;
use futures::stream::{FuturesUnordered, StreamExt};
use reqwest::Client;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Result of a finished crawl run
#[derive(Debug, Clone)]
pub struct CrawlOutcome {
    /// Recorded URLs in visit (or completion) order
    pub sitemap: SitemapDocument,

    /// Every claimed URL in claim order
    pub visited: Vec<String>,

    /// Sum of the individual fetch times
    pub total_fetch_time: Duration,

    /// Wall-clock duration of the run
    pub wall_time: Duration,
}

/// Single-site crawler
///
/// A `Crawler` holds configuration and the HTTP client only; each call to
/// [`Crawler::run`] starts from a fresh [`CrawlState`], so independent runs
/// never share visited sets.
pub struct Crawler {
    config: Arc<Config>,
    seed_host: String,
    client: Client,
    observer: Arc<dyn CrawlObserver>,
}

impl Crawler {
    /// Creates a new crawler
    ///
    /// # Returns
    ///
    /// * `Ok(Crawler)` - Configuration is valid and the client was built
    /// * `Err(SitemapError)` - Invalid configuration or seed URL (no host,
    ///   unsupported scheme), or the HTTP client could not be built
    pub fn new(config: Config) -> Result<Self> {
        validate(&config)?;

        let (_, seed_host) = parse_seed(&config.crawler.seed_url)?;
        let timeout = config.crawler.request_timeout_secs.map(Duration::from_secs);
        let client = build_http_client(&config.user_agent, timeout)?;

        Ok(Self {
            config: Arc::new(config),
            seed_host,
            client,
            observer: Arc::new(TracingObserver),
        })
    }

    /// Replaces the progress observer
    pub fn with_observer(mut self, observer: impl CrawlObserver + 'static) -> Self {
        self.observer = Arc::new(observer);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Host every crawled URL is matched against
    pub fn seed_host(&self) -> &str {
        &self.seed_host
    }

    /// Fetches the seed URL's response headers
    ///
    /// This is a read-only side query; it does not touch any crawl state.
    pub async fn inspect_headers(&self) -> Result<HeaderReport> {
        fetch_headers(&self.client, &self.config.crawler.seed_url).await
    }

    /// Runs the crawl to completion
    ///
    /// Per-URL failures (network errors, bad statuses, unparsable HTML,
    /// unresolvable hrefs) are logged and never abort the run.
    pub async fn run(&self) -> CrawlOutcome {
        let settings = &self.config.crawler;
        let started = Instant::now();
        let limit = settings.max_concurrent_fetches.max(1) as usize;

        let mut state = CrawlState::new(
            self.seed_host.clone(),
            settings.max_depth,
            settings.exclude.clone(),
            settings.host_match,
        );
        let mut sitemap = SitemapDocument::new();
        let mut pending = vec![CrawlTask::seed(settings.seed_url.clone(), state.root_budget())];
        let mut in_flight = FuturesUnordered::new();

        tracing::info!(
            "Starting crawl of {} (host: {}, max depth: {}, concurrency: {})",
            settings.seed_url,
            self.seed_host,
            settings.max_depth,
            limit
        );

        loop {
            while in_flight.len() < limit {
                let Some(task) = pending.pop() else {
                    break;
                };

                if let Err(rejection) = state.claim(&task) {
                    tracing::trace!("Skipping {}: {}", task.url, rejection);
                    continue;
                }

                let client = &self.client;
                in_flight.push(async move {
                    let result = fetch_page(client, &task.url).await;
                    (task, result)
                });
            }

            let Some((task, result)) = in_flight.next().await else {
                break;
            };

            self.complete(task, result, &mut state, &mut sitemap, &mut pending);
        }

        let total_fetch_time = state.total_elapsed();
        let visited = state.into_visited();

        tracing::info!(
            "Crawl completed: {} URLs visited, {} recorded, {:.2}s fetching, {:?} elapsed",
            visited.len(),
            sitemap.len(),
            total_fetch_time.as_secs_f64(),
            started.elapsed()
        );

        CrawlOutcome {
            sitemap,
            visited,
            total_fetch_time,
            wall_time: started.elapsed(),
        }
    }

    /// Handles a finished fetch: records the URL, reports progress and
    /// queues its links
    fn complete(
        &self,
        task: CrawlTask,
        result: FetchResult,
        state: &mut CrawlState,
        sitemap: &mut SitemapDocument,
        pending: &mut Vec<CrawlTask>,
    ) {
        state.add_elapsed(result.elapsed);

        let recorded = self.config.crawler.response_policy.should_record(&result)
            && sitemap.push(SitemapEntry::visited_today(task.url.clone()));

        if !result.is_success() {
            tracing::debug!("{} answered with status {}", task.url, result.status_code);
        }

        self.observer.on_visit(&VisitEvent {
            url: &task.url,
            depth: state.hops_from_seed(task.depth),
            status_code: result.status_code,
            elapsed: result.elapsed,
            recorded,
        });

        let child_depth = task.depth - 1;
        if child_depth == 0 {
            // Every child would be rejected for depth
            return;
        }

        let hrefs = extract_hrefs(&result.body);
        tracing::trace!("{} links found on {}", hrefs.len(), task.url);

        // Reverse so the first link in the document is popped first
        for href in hrefs.iter().rev() {
            match resolve(href, &task.url) {
                Ok(url) => pending.push(CrawlTask::new(url, child_depth)),
                Err(e) => tracing::debug!("Skipping href {:?} on {}: {}", href, task.url, e),
            }
        }
    }
}

/// Runs a complete crawl with the default observer
///
/// # Example
///
/// ```no_run
/// use sumi_sitemap::config::Config;
/// use sumi_sitemap::crawler::run_crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let outcome = run_crawl(Config::for_seed("http://example.com/", 2)).await?;
/// println!("{}", outcome.sitemap.to_xml()?);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: Config) -> Result<CrawlOutcome> {
    let crawler = Crawler::new(config)?;
    Ok(crawler.run().await)
}
