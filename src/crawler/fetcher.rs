//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler:
//! - Building the HTTP client with an identifying user agent
//! - GET requests that never fail, reporting status and elapsed time instead
//! - A read-only header inspection of a single URL

use crate::config::UserAgentConfig;
use crate::Result;
use reqwest::Client;
use serde::Deserialize;
use std::time::{Duration, Instant};

/// Status code reported when no HTTP response was received at all
pub const TRANSPORT_FAILURE: u16 = 0;

/// Result of a fetch operation
#[derive(Debug, Clone)]
pub struct FetchResult {
    /// Page body (empty on failure)
    pub body: String,

    /// HTTP status code, or [`TRANSPORT_FAILURE`]
    pub status_code: u16,

    /// Wall-clock time spent on the attempt
    pub elapsed: Duration,
}

impl FetchResult {
    /// Builds the synthetic result for a request that got no response
    pub fn transport_failure(elapsed: Duration) -> Self {
        Self {
            body: String::new(),
            status_code: TRANSPORT_FAILURE,
            elapsed,
        }
    }

    /// Returns true for a 2xx status
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}

/// Decides whether a fetched URL is written to the sitemap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResponsePolicy {
    /// Every visited URL is recorded, whatever its status
    #[default]
    RecordAll,

    /// Only URLs that answered with a 2xx status are recorded
    SuccessOnly,
}

impl ResponsePolicy {
    pub fn should_record(&self, result: &FetchResult) -> bool {
        match self {
            Self::RecordAll => true,
            Self::SuccessOnly => result.is_success(),
        }
    }
}

/// Response headers of a single request
#[derive(Debug, Clone)]
pub struct HeaderReport {
    pub status_code: u16,

    /// Header names and values in the order the server sent them
    pub headers: Vec<(String, String)>,
}

/// Formats the user agent string: `Name/Version (+ContactURL)`
pub fn user_agent_string(config: &UserAgentConfig) -> String {
    match &config.contact_url {
        Some(contact_url) => format!(
            "{}/{} (+{})",
            config.crawler_name, config.crawler_version, contact_url
        ),
        None => format!("{}/{}", config.crawler_name, config.crawler_version),
    }
}

/// Builds an HTTP client with proper configuration
///
/// Redirects follow reqwest's default policy. No timeout is applied unless
/// `timeout` is set.
///
/// # Example
///
/// ```no_run
/// use sumi_sitemap::config::UserAgentConfig;
/// use sumi_sitemap::crawler::build_http_client;
/// use std::time::Duration;
///
/// let client = build_http_client(&UserAgentConfig::default(), Some(Duration::from_secs(30))).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout: Option<Duration>,
) -> reqwest::Result<Client> {
    let mut builder = Client::builder()
        .user_agent(user_agent_string(config))
        .gzip(true)
        .brotli(true);

    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }

    builder.build()
}

/// Fetches a URL, never failing
///
/// Network errors, timeouts and unreadable bodies are folded into the
/// returned [`FetchResult`]: status [`TRANSPORT_FAILURE`] when no response
/// arrived, or the real status with an empty body when only the body read
/// failed. Non-2xx responses keep their body.
pub async fn fetch_page(client: &Client, url: &str) -> FetchResult {
    let started = Instant::now();

    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => {
            if e.is_timeout() {
                tracing::warn!("Request timeout for {}", url);
            } else if e.is_connect() {
                tracing::warn!("Connection failed for {}: {}", url, e);
            } else {
                tracing::warn!("Request failed for {}: {}", url, e);
            }
            return FetchResult::transport_failure(started.elapsed());
        }
    };

    let status_code = response.status().as_u16();
    let body = match response.text().await {
        Ok(body) => body,
        Err(e) => {
            tracing::warn!("Failed to read body of {}: {}", url, e);
            String::new()
        }
    };

    FetchResult {
        body,
        status_code,
        elapsed: started.elapsed(),
    }
}

/// Requests `url` and reports its status and response headers
///
/// The body is discarded. Unlike [`fetch_page`] this returns an error when
/// no response arrives.
pub async fn fetch_headers(client: &Client, url: &str) -> Result<HeaderReport> {
    let response = client.get(url).send().await?;

    let headers = response
        .headers()
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect();

    Ok(HeaderReport {
        status_code: response.status().as_u16(),
        headers,
    })
}
