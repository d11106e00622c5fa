//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlState`: visited set, exclusions, depth budget and accumulated fetch time of one run
//! - `CrawlTask`: a URL waiting in the work-list with its remaining depth
//! - `Rejection`: why a URL was not visited

mod crawl_state;

// Re-export main types
pub use crawl_state::{CrawlState, CrawlTask, Rejection};
