//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with per-request timeouts
//! - Sitemap seeding
//! - Frontier scheduling and the politeness delay
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod scheduler;
mod sitemap;

pub use coordinator::{run_crawl, CrawlReport, Crawler};
pub use fetcher::{build_http_client, fetch_url, FetchResult};
pub use scheduler::{ScheduledPage, Scheduler};
pub use sitemap::{fetch_sitemap, parse_sitemap, sitemap_url};
