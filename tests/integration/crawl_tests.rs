//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use sumi_sitemap::config::Config;
use sumi_sitemap::crawler::{
    crawl, CrawlObserver, CrawlOutcome, Crawler, NoopObserver, ResponsePolicy, VisitEvent,
};
use sumi_sitemap::url::HostMatch;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration for the given seed
fn create_test_config(seed: &str, max_depth: u32) -> Config {
    let mut config = Config::for_seed(seed, max_depth);
    config.crawler.request_timeout_secs = Some(5);
    config
}

/// Builds a mock HTML page at `route` linking to `links`
fn html_page(route: &str, links: &[&str]) -> Mock {
    html_page_with_status(route, 200, links)
}

fn html_page_with_status(route: &str, status: u16, links: &[&str]) -> Mock {
    let anchors: String = links
        .iter()
        .map(|link| format!("<a href=\"{}\">link</a>\n", link))
        .collect();

    Mock::given(method("GET")).and(path(route)).respond_with(
        ResponseTemplate::new(status)
            .set_body_string(format!(
                "<html><head><title>{}</title></head><body>\n{}</body></html>",
                route, anchors
            ))
            .insert_header("content-type", "text/html"),
    )
}

async fn run(config: Config) -> CrawlOutcome {
    Crawler::new(config)
        .expect("Failed to create crawler")
        .with_observer(NoopObserver)
        .run()
        .await
}

fn locations(outcome: &CrawlOutcome) -> Vec<String> {
    outcome.sitemap.locations().map(str::to_string).collect()
}

fn assert_visited_matches_sitemap(outcome: &CrawlOutcome) {
    let visited: HashSet<&str> = outcome.visited.iter().map(String::as_str).collect();
    let recorded: HashSet<&str> = outcome.sitemap.locations().collect();

    assert_eq!(visited.len(), outcome.visited.len(), "URL visited twice");
    assert_eq!(visited.len(), outcome.sitemap.len());
    assert_eq!(visited, recorded);
}

/// Observer that keeps every event for later assertions
#[derive(Clone, Default)]
struct RecordingObserver {
    events: Arc<Mutex<Vec<(String, u32, u16, bool)>>>,
}

impl CrawlObserver for RecordingObserver {
    fn on_visit(&self, event: &VisitEvent<'_>) {
        self.events.lock().unwrap().push((
            event.url.to_string(),
            event.depth,
            event.status_code,
            event.recorded,
        ));
    }
}

#[tokio::test]
async fn test_single_hop_with_mixed_links() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let absolute_b = format!("{}/b", base_url);

    html_page("/", &["/a", absolute_b.as_str(), "http://other.com/c"])
        .expect(1)
        .mount(&mock_server)
        .await;
    html_page("/a", &["/a/deeper"]).expect(1).mount(&mock_server).await;
    html_page("/b", &[]).expect(1).mount(&mock_server).await;
    html_page("/a/deeper", &[]).expect(0).mount(&mock_server).await;

    let seed = format!("{}/", base_url);
    let outcome = run(create_test_config(&seed, 1)).await;

    assert_eq!(
        locations(&outcome),
        vec![seed.clone(), format!("{}/a", base_url), absolute_b]
    );
    assert_visited_matches_sitemap(&outcome);
}

#[tokio::test]
async fn test_cycle_back_to_seed_terminates() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let seed = format!("{}/", base_url);

    html_page("/", &["/a"]).expect(1).mount(&mock_server).await;
    html_page("/a", &[seed.as_str(), "/b"]).expect(1).mount(&mock_server).await;
    html_page("/b", &["/a", "/"]).expect(1).mount(&mock_server).await;

    let outcome = run(create_test_config(&seed, 10)).await;

    assert_eq!(
        locations(&outcome),
        vec![seed.clone(), format!("{}/a", base_url), format!("{}/b", base_url)]
    );
    assert_visited_matches_sitemap(&outcome);
}

#[tokio::test]
async fn test_exclusion_path_never_fetched() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    html_page("/", &["/private/area", "/public", "/public/private"])
        .expect(1)
        .mount(&mock_server)
        .await;
    html_page("/public", &["/private"]).expect(1).mount(&mock_server).await;
    html_page("/private/area", &[]).expect(0).mount(&mock_server).await;
    html_page("/private", &[]).expect(0).mount(&mock_server).await;
    html_page("/public/private", &[]).expect(0).mount(&mock_server).await;

    let mut config = create_test_config(&format!("{}/", base_url), 5);
    config.crawler.exclude = vec!["/private".to_string()];
    let outcome = run(config).await;

    assert_eq!(
        locations(&outcome),
        vec![format!("{}/", base_url), format!("{}/public", base_url)]
    );
    assert!(outcome.sitemap.locations().all(|loc| !loc.contains("/private")));
    assert_visited_matches_sitemap(&outcome);
}

#[tokio::test]
async fn test_crawl_with_depth_limit() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    html_page("/", &["/l1"]).expect(1).mount(&mock_server).await;
    html_page("/l1", &["/l2"]).expect(1).mount(&mock_server).await;
    html_page("/l2", &["/l3"]).expect(1).mount(&mock_server).await;
    html_page("/l3", &["/l4"]).expect(0).mount(&mock_server).await;

    let observer = RecordingObserver::default();
    let crawler = Crawler::new(create_test_config(&format!("{}/", base_url), 2))
        .expect("Failed to create crawler")
        .with_observer(observer.clone());
    let outcome = crawler.run().await;

    assert_eq!(
        locations(&outcome),
        vec![
            format!("{}/", base_url),
            format!("{}/l1", base_url),
            format!("{}/l2", base_url),
        ]
    );

    let depths: Vec<u32> = observer
        .events
        .lock()
        .unwrap()
        .iter()
        .map(|(_, depth, _, _)| *depth)
        .collect();
    assert_eq!(depths, vec![0, 1, 2]);
}

#[tokio::test]
async fn test_depth_first_order() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    html_page("/", &["/a", "/b"]).mount(&mock_server).await;
    html_page("/a", &["/a1", "/b"]).mount(&mock_server).await;
    html_page("/a1", &["/a2"]).mount(&mock_server).await;
    html_page("/a2", &[]).mount(&mock_server).await;
    html_page("/b", &["/b1"]).mount(&mock_server).await;
    html_page("/b1", &[]).mount(&mock_server).await;

    let outcome = run(create_test_config(&format!("{}/", base_url), 5)).await;

    let expected: Vec<String> = ["/", "/a", "/a1", "/a2", "/b", "/b1"]
        .iter()
        .map(|route| format!("{}{}", base_url, route))
        .collect();
    assert_eq!(locations(&outcome), expected);
    assert_eq!(outcome.visited, expected);

    // One fetch at a time, so the run lasts at least as long as its fetches
    assert!(outcome.wall_time >= outcome.total_fetch_time);
}

#[tokio::test]
async fn test_duplicate_links_recorded_once() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let absolute_a = format!("{}/a", base_url);

    html_page("/", &["/a", "a", "//a", absolute_a.as_str()])
        .expect(1)
        .mount(&mock_server)
        .await;
    html_page("/a", &[]).expect(1).mount(&mock_server).await;

    let outcome = run(create_test_config(&format!("{}/", base_url), 3)).await;

    assert_eq!(outcome.sitemap.len(), 2);
    assert_visited_matches_sitemap(&outcome);
}

#[tokio::test]
async fn test_error_responses_still_recorded() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    html_page("/", &["/missing", "/broken"]).mount(&mock_server).await;
    html_page_with_status("/missing", 404, &["/from-error-page"])
        .expect(1)
        .mount(&mock_server)
        .await;
    html_page_with_status("/broken", 500, &[])
        .expect(1)
        .mount(&mock_server)
        .await;
    html_page("/from-error-page", &[]).expect(1).mount(&mock_server).await;

    let observer = RecordingObserver::default();
    let crawler = Crawler::new(create_test_config(&format!("{}/", base_url), 3))
        .expect("Failed to create crawler")
        .with_observer(observer.clone());
    let outcome = crawler.run().await;

    assert_eq!(
        locations(&outcome),
        vec![
            format!("{}/", base_url),
            format!("{}/missing", base_url),
            format!("{}/from-error-page", base_url),
            format!("{}/broken", base_url),
        ]
    );
    assert_visited_matches_sitemap(&outcome);

    let statuses: Vec<u16> = observer
        .events
        .lock()
        .unwrap()
        .iter()
        .map(|(_, _, status, _)| *status)
        .collect();
    assert_eq!(statuses, vec![200, 404, 200, 500]);
}

#[tokio::test]
async fn test_success_only_policy_skips_error_responses() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    html_page("/", &["/missing", "/ok"]).mount(&mock_server).await;
    html_page_with_status("/missing", 404, &["/linked-from-404"])
        .expect(1)
        .mount(&mock_server)
        .await;
    html_page("/ok", &[]).mount(&mock_server).await;
    html_page("/linked-from-404", &[]).mount(&mock_server).await;

    let mut config = create_test_config(&format!("{}/", base_url), 3);
    config.crawler.response_policy = ResponsePolicy::SuccessOnly;
    let outcome = run(config).await;

    // The 404 page is visited and its links followed, but it is not recorded
    assert!(outcome.visited.contains(&format!("{}/missing", base_url)));
    assert_eq!(
        locations(&outcome),
        vec![
            format!("{}/", base_url),
            format!("{}/linked-from-404", base_url),
            format!("{}/ok", base_url),
        ]
    );
}

#[tokio::test]
async fn test_substring_host_match_false_positive() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let host = url::Url::parse(&base_url)
        .expect("Failed to parse base URL")
        .host_str()
        .expect("Failed to extract host")
        .to_string();

    // Contains the seed host as a path segment, so the loose policy accepts it
    let impostor = format!("http://impostor.invalid/{}", host);
    html_page("/", &[impostor.as_str(), "http://other.invalid/page"])
        .mount(&mock_server)
        .await;

    let outcome = run(create_test_config(&format!("{}/", base_url), 2)).await;

    assert_eq!(
        locations(&outcome),
        vec![format!("{}/", base_url), impostor.clone()]
    );
    assert_visited_matches_sitemap(&outcome);

    let mut config = create_test_config(&format!("{}/", base_url), 2);
    config.crawler.host_match = HostMatch::Exact;
    let strict = run(config).await;

    assert_eq!(locations(&strict), vec![format!("{}/", base_url)]);
}

#[tokio::test]
async fn test_unreachable_page_recorded_with_zero_status() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // Same host, but a port nothing listens on
    html_page("/", &["http://127.0.0.1:9/dead"]).mount(&mock_server).await;

    let observer = RecordingObserver::default();
    let crawler = Crawler::new(create_test_config(&format!("{}/", base_url), 2))
        .expect("Failed to create crawler")
        .with_observer(observer.clone());
    let outcome = crawler.run().await;

    assert_eq!(outcome.sitemap.len(), 2);
    assert!(outcome.sitemap.contains("http://127.0.0.1:9/dead"));

    let events = observer.events.lock().unwrap();
    let dead = events
        .iter()
        .find(|(url, _, _, _)| url == "http://127.0.0.1:9/dead")
        .expect("No event for unreachable page");
    assert_eq!(dead.2, 0);
    assert!(dead.3);
}

#[tokio::test]
async fn test_concurrent_fetches_claim_each_url_once() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    let pages: Vec<String> = (0..12).map(|i| format!("/p{}", i)).collect();
    let page_refs: Vec<&str> = pages.iter().map(String::as_str).collect();

    html_page("/", &page_refs).expect(1).mount(&mock_server).await;
    for page in &pages {
        // Every page links to every other page and back to the seed
        let mut links = page_refs.clone();
        links.push("/");
        html_page(page, &links).expect(1).mount(&mock_server).await;
    }

    let mut config = create_test_config(&format!("{}/", base_url), 4);
    config.crawler.max_concurrent_fetches = 4;
    let outcome = run(config).await;

    assert_eq!(outcome.sitemap.len(), 13);
    assert_visited_matches_sitemap(&outcome);
}

#[tokio::test]
async fn test_crawl_writes_sitemap_file() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    html_page("/", &["/about?lang=en&amp;theme=dark"])
        .mount(&mock_server)
        .await;
    html_page("/about", &[]).mount(&mock_server).await;

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let sitemap_path = dir.path().join("sitemap.xml");

    let mut config = create_test_config(&format!("{}/", base_url), 1);
    config.output.sitemap_path = sitemap_path.to_string_lossy().into_owned();

    let (outcome, written) = crawl(config).await.expect("Crawl failed");

    let xml = std::fs::read_to_string(&sitemap_path).expect("Sitemap not written");
    assert_eq!(written, xml.len());
    assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    assert_eq!(xml.matches("<url>").count(), 2);
    assert!(xml.contains(&format!("<loc>{}/</loc>", base_url)));
    assert!(xml.contains(&format!(
        "<loc>{}/about?lang=en&amp;theme=dark</loc>",
        base_url
    )));
    assert!(xml.contains("<changefreq>weekly</changefreq>"));
    assert!(xml.contains("<priority>0.5</priority>"));

    // Re-serializing the same document is byte-identical
    assert_eq!(outcome.sitemap.to_xml().unwrap(), xml);
    assert_eq!(outcome.sitemap.to_xml().unwrap(), xml);
}

#[tokio::test]
async fn test_independent_runs_do_not_share_state() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    html_page("/", &["/a"]).expect(2).mount(&mock_server).await;
    html_page("/a", &[]).expect(2).mount(&mock_server).await;

    let crawler = Crawler::new(create_test_config(&format!("{}/", base_url), 2))
        .expect("Failed to create crawler")
        .with_observer(NoopObserver);

    let first = crawler.run().await;
    let second = crawler.run().await;

    assert_eq!(locations(&first), locations(&second));
    assert_eq!(first.sitemap.len(), 2);
}

#[tokio::test]
async fn test_seed_headers_inspection() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).insert_header("server", "mock"))
        .mount(&mock_server)
        .await;

    let crawler = Crawler::new(create_test_config(&format!("{}/", mock_server.uri()), 2))
        .expect("Failed to create crawler");
    let report = crawler
        .inspect_headers()
        .await
        .expect("Header inspection failed");

    assert_eq!(report.status_code, 200);
    assert!(report
        .headers
        .iter()
        .any(|(name, value)| name == "server" && value == "mock"));
}

#[tokio::test]
async fn test_seed_host_spelling_kept_in_resolved_links() {
    let mock_server = MockServer::start().await;
    let origin = format!("http://LOCALHOST:{}", mock_server.address().port());
    let seed = format!("{}/", origin);
    let absolute_b = format!("{}/b", origin);

    html_page("/", &["/a", "/", absolute_b.as_str()])
        .expect(1)
        .mount(&mock_server)
        .await;
    html_page("/a", &[]).expect(1).mount(&mock_server).await;
    html_page("/b", &[]).expect(1).mount(&mock_server).await;

    let outcome = run(create_test_config(&seed, 1)).await;

    assert_eq!(
        locations(&outcome),
        vec![seed.clone(), format!("{}/a", origin), absolute_b]
    );
    assert_visited_matches_sitemap(&outcome);
}
