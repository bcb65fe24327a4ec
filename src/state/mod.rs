//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `PageState`: Lifecycle of an individual URL (queued, processing, done, skipped, failed)
//! - `CrawlState`: Frontier, visited set, email map and page budget of one crawl

mod crawl_state;
mod page_state;

// Re-export main types
pub use crawl_state::{CrawlState, EmailMap};
pub use page_state::PageState;
