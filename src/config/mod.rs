//! Configuration module for Sumi-Sitemap
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! A configuration can also be assembled in code with [`Config::for_seed`] and
//! checked with [`validate`].
//!
//! # Example
//!
//! ```no_run
//! use sumi_sitemap::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("sitemap.toml")).unwrap();
//! println!("Crawler will use max depth: {}", config.crawler.max_depth);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, OutputConfig, UserAgentConfig, DEFAULT_MAX_DEPTH};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;
