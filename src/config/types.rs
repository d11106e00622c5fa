use crate::crawler::ResponsePolicy;
use crate::url::HostMatch;
use serde::Deserialize;

/// Link hops followed from the seed when `max-depth` is not set
pub const DEFAULT_MAX_DEPTH: u32 = 5;

/// Main configuration structure for Sumi-Sitemap
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Builds a configuration for `seed_url` with every other value defaulted
    pub fn for_seed(seed_url: impl Into<String>, max_depth: u32) -> Self {
        Self {
            crawler: CrawlerConfig {
                seed_url: seed_url.into(),
                max_depth,
                exclude: Vec::new(),
                max_concurrent_fetches: default_concurrency(),
                request_timeout_secs: None,
                host_match: HostMatch::default(),
                response_policy: ResponsePolicy::default(),
            },
            user_agent: UserAgentConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// URL the crawl starts from; its host bounds the crawl
    #[serde(rename = "seed-url")]
    pub seed_url: String,

    /// Maximum number of link hops from the seed
    #[serde(rename = "max-depth", default = "default_max_depth")]
    pub max_depth: u32,

    /// URLs containing any of these substrings are never visited
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Maximum number of fetches in flight at once
    #[serde(rename = "max-concurrent-fetches", default = "default_concurrency")]
    pub max_concurrent_fetches: u32,

    /// Per-request timeout in seconds (none when unset)
    #[serde(rename = "request-timeout-secs", default)]
    pub request_timeout_secs: Option<u64>,

    #[serde(rename = "host-match", default)]
    pub host_match: HostMatch,

    #[serde(rename = "response-policy", default)]
    pub response_policy: ResponsePolicy,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url", default)]
    pub contact_url: Option<String>,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "SumiSitemap".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: None,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path of the generated sitemap file
    #[serde(rename = "sitemap-path", default = "default_sitemap_path")]
    pub sitemap_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            sitemap_path: default_sitemap_path(),
        }
    }
}

fn default_max_depth() -> u32 {
    DEFAULT_MAX_DEPTH
}

fn default_concurrency() -> u32 {
    1
}

fn default_sitemap_path() -> String {
    "sitemap.xml".to_string()
}
