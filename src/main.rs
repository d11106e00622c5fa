//! Sumi-Sitemap main entry point
//!
//! This is the command-line interface for the Sumi-Sitemap crawler.

use anyhow::{bail, Context};
use clap::Parser;
use std::path::{Path, PathBuf};
use sumi_sitemap::config::{load_config_with_hash, validate, Config, DEFAULT_MAX_DEPTH};
use sumi_sitemap::crawler::{CrawlObserver, CrawlOutcome, Crawler, VisitEvent};
use tracing_subscriber::EnvFilter;

/// Sumi-Sitemap: a single-site sitemap crawler
///
/// Crawls a website from a seed URL, follows links on the seed's host up to
/// a maximum depth, and writes every URL it finds to a sitemap.xml file.
#[derive(Parser, Debug)]
#[command(name = "sumi-sitemap")]
#[command(version)]
#[command(about = "A single-site sitemap crawler", long_about = None)]
struct Cli {
    /// Seed URL to start crawling from (required unless --config is given)
    #[arg(value_name = "SEED_URL")]
    seed: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Maximum number of link hops from the seed
    #[arg(short, long)]
    depth: Option<u32>,

    /// Skip every URL containing this substring (repeatable)
    #[arg(short = 'x', long = "exclude", value_name = "SUBSTRING")]
    exclude: Vec<String>,

    /// Where to write the sitemap
    #[arg(short, long, value_name = "PATH")]
    output: Option<String>,

    /// Maximum number of fetches in flight at once
    #[arg(long)]
    concurrency: Option<u32>,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Print the seed URL's response headers before crawling
    #[arg(long)]
    headers: bool,

    /// Validate the configuration and show what would be crawled without crawling
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

/// Prints one line per visited URL
struct ProgressPrinter;

impl CrawlObserver for ProgressPrinter {
    fn on_visit(&self, event: &VisitEvent<'_>) {
        println!(
            "STATUS:[{}]\tTIME:[{:.3}]\tDEPTH:[{}]\t:::{}",
            event.status_code,
            event.elapsed.as_secs_f64(),
            event.depth,
            event.url
        );
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = build_config(&cli)?;

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_crawl(config, cli.headers, cli.quiet).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sumi_sitemap=info,warn"),
            1 => EnvFilter::new("sumi_sitemap=debug,info"),
            2 => EnvFilter::new("sumi_sitemap=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Builds the effective configuration from the config file and CLI flags
///
/// Flags override values from the file.
fn build_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match (&cli.config, &cli.seed) {
        (Some(path), _) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        (None, Some(seed)) => Config::for_seed(seed.clone(), DEFAULT_MAX_DEPTH),
        (None, None) => bail!("a seed URL or --config file is required"),
    };

    if let (Some(_), Some(seed)) = (&cli.config, &cli.seed) {
        config.crawler.seed_url = seed.clone();
    }
    if let Some(depth) = cli.depth {
        config.crawler.max_depth = depth;
    }
    config.crawler.exclude.extend(cli.exclude.iter().cloned());
    if let Some(output) = &cli.output {
        config.output.sitemap_path = output.clone();
    }
    if let Some(concurrency) = cli.concurrency {
        config.crawler.max_concurrent_fetches = concurrency;
    }
    if let Some(timeout) = cli.timeout {
        config.crawler.request_timeout_secs = Some(timeout);
    }

    validate(&config).context("Invalid configuration")?;
    Ok(config)
}

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config) {
    println!("=== Sumi-Sitemap Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Seed URL: {}", config.crawler.seed_url);
    println!("  Max depth: {}", config.crawler.max_depth);
    println!(
        "  Max concurrent fetches: {}",
        config.crawler.max_concurrent_fetches
    );
    match config.crawler.request_timeout_secs {
        Some(secs) => println!("  Request timeout: {}s", secs),
        None => println!("  Request timeout: none"),
    }
    println!("  Host match: {:?}", config.crawler.host_match);
    println!("  Response policy: {:?}", config.crawler.response_policy);

    println!("\nExclusions ({}):", config.crawler.exclude.len());
    for path in &config.crawler.exclude {
        println!("  - {}", path);
    }

    println!("\nUser Agent:");
    println!("  Name: {}", config.user_agent.crawler_name);
    println!("  Version: {}", config.user_agent.crawler_version);
    if let Some(contact_url) = &config.user_agent.contact_url {
        println!("  Contact URL: {}", contact_url);
    }

    println!("\nOutput:");
    println!("  Sitemap: {}", config.output.sitemap_path);

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config, show_headers: bool, quiet: bool) -> anyhow::Result<()> {
    let output_path = PathBuf::from(&config.output.sitemap_path);

    let crawler = Crawler::new(config).context("Failed to start crawler")?;
    let crawler = if quiet {
        crawler
    } else {
        crawler.with_observer(ProgressPrinter)
    };

    if show_headers {
        print_headers(&crawler).await;
    }

    let outcome = crawler.run().await;

    let written = outcome
        .sitemap
        .write_to(&output_path)
        .with_context(|| format!("Failed to write sitemap to {}", output_path.display()))?;

    if !quiet {
        print_summary(&outcome, written, &output_path);
    }

    Ok(())
}

/// Prints the seed URL's response headers; failures are only logged
async fn print_headers(crawler: &Crawler) {
    match crawler.inspect_headers().await {
        Ok(report) => {
            println!("Crawler started for {}", crawler.config().crawler.seed_url);
            println!("\nServer Headers (status {}):", report.status_code);
            for (name, value) in &report.headers {
                println!("  {}: {}", name, value);
            }
            println!();
        }
        Err(e) => tracing::warn!("Could not read seed headers: {}", e),
    }
}

fn print_summary(outcome: &CrawlOutcome, written: usize, path: &Path) {
    println!("\nCrawler done.");
    println!(
        "Crawled {} entities in {:.2} seconds ({:.2} seconds fetching).",
        outcome.visited.len(),
        outcome.wall_time.as_secs_f64(),
        outcome.total_fetch_time.as_secs_f64()
    );
    println!("Saved {} bytes to {}.", written, path.display());
}
