/// Per-run traversal state
///
/// This module holds the visited set, exclusion filters, and depth budget of
/// a single crawl run, along with the acceptance check every URL has to pass
/// before it is fetched.
use crate::url::{matching_exclusion, HostMatch};
use std::collections::HashSet;
use std::fmt;
use std::time::Duration;

/// A URL waiting to be visited, with its remaining depth budget
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTask {
    pub url: String,

    /// Remaining budget; a task with depth 0 is never visited
    pub depth: u32,

    /// The seed defines the host and skips the host check
    pub is_seed: bool,
}

impl CrawlTask {
    pub fn new(url: impl Into<String>, depth: u32) -> Self {
        Self {
            url: url.into(),
            depth,
            is_seed: false,
        }
    }

    pub fn seed(url: impl Into<String>, depth: u32) -> Self {
        Self {
            url: url.into(),
            depth,
            is_seed: true,
        }
    }
}

/// Reason a URL was not visited
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// URL is not on the seed host under the active host policy
    OffHost,

    /// Depth budget exhausted
    DepthExhausted,

    /// URL was already claimed earlier in this run
    AlreadyVisited,

    /// URL contains the given exclusion substring
    Excluded(String),
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OffHost => write!(f, "off host"),
            Self::DepthExhausted => write!(f, "depth exhausted"),
            Self::AlreadyVisited => write!(f, "already visited"),
            Self::Excluded(path) => write!(f, "excluded by '{}'", path),
        }
    }
}

/// Mutable state owned by one crawl run
#[derive(Debug, Clone)]
pub struct CrawlState {
    seed_host: String,
    max_depth: u32,
    visited: HashSet<String>,
    visit_order: Vec<String>,
    exclusions: Vec<String>,
    host_match: HostMatch,
    total_elapsed: Duration,
}

impl CrawlState {
    pub fn new(
        seed_host: impl Into<String>,
        max_depth: u32,
        exclusions: Vec<String>,
        host_match: HostMatch,
    ) -> Self {
        Self {
            seed_host: seed_host.into(),
            max_depth,
            visited: HashSet::new(),
            visit_order: Vec::new(),
            exclusions,
            host_match,
            total_elapsed: Duration::ZERO,
        }
    }

    pub fn seed_host(&self) -> &str {
        &self.seed_host
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// Depth budget the seed starts with
    ///
    /// One more than `max_depth`, so that pages `max_depth` hops away are
    /// still visited and their children fall to zero.
    pub fn root_budget(&self) -> u32 {
        self.max_depth.saturating_add(1)
    }

    /// Number of link hops between the seed and a task with `depth` budget
    pub fn hops_from_seed(&self, depth: u32) -> u32 {
        self.root_budget().saturating_sub(depth)
    }

    /// Checks a URL against the host policy, depth budget, visited set and
    /// exclusion list, in that order
    pub fn check(&self, task: &CrawlTask) -> Result<(), Rejection> {
        if !task.is_seed && !self.host_match.matches(&task.url, &self.seed_host) {
            return Err(Rejection::OffHost);
        }

        if task.depth == 0 {
            return Err(Rejection::DepthExhausted);
        }

        if self.visited.contains(&task.url) {
            return Err(Rejection::AlreadyVisited);
        }

        if let Some(excluded) = matching_exclusion(&task.url, &self.exclusions) {
            return Err(Rejection::Excluded(excluded.to_string()));
        }

        Ok(())
    }

    pub fn is_acceptable(&self, url: &str, depth: u32) -> bool {
        self.check(&CrawlTask::new(url, depth)).is_ok()
    }

    /// Checks the task and, if it passes, marks its URL visited
    ///
    /// A URL can be claimed at most once per run.
    pub fn claim(&mut self, task: &CrawlTask) -> Result<(), Rejection> {
        self.check(task)?;
        self.visited.insert(task.url.clone());
        self.visit_order.push(task.url.clone());
        Ok(())
    }

    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub fn add_elapsed(&mut self, elapsed: Duration) {
        self.total_elapsed += elapsed;
    }

    /// Sum of all fetch times so far
    pub fn total_elapsed(&self) -> Duration {
        self.total_elapsed
    }

    /// Consumes the state, returning visited URLs in claim order
    pub fn into_visited(self) -> Vec<String> {
        self.visit_order
    }
}
