//! Scheduler for draining the crawl frontier
//!
//! This module handles:
//! - Picking the next URL in strict FIFO order
//! - Duplicate and ignored-extension suppression at dequeue time
//! - Charging the page budget
//! - The fixed politeness delay before each fetch

use crate::state::{CrawlState, PageState};
use crate::url::is_ignored;
use std::time::Duration;
use tracing::{debug, trace};

/// A URL that was dequeued and charged against the budget
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledPage {
    /// The URL to fetch
    pub url: String,

    /// 1-based position of this page within the budget
    pub position: usize,
}

/// Scheduler applies the dequeue policy and the politeness delay
///
/// Budget accounting charges on actual processing: URLs discarded as
/// duplicates or ignored extensions never consume a budget slot, while a
/// page whose fetch later fails does.
#[derive(Debug, Clone)]
pub struct Scheduler {
    /// Fixed delay observed before every fetch
    politeness_delay: Duration,
}

impl Scheduler {
    /// Creates a new scheduler
    ///
    /// # Arguments
    ///
    /// * `politeness_delay` - Delay between a dequeue and its fetch
    pub fn new(politeness_delay: Duration) -> Self {
        Self { politeness_delay }
    }

    /// Dequeues the next page to process
    ///
    /// Pops frontier entries until one survives the duplicate and ignored
    /// extension checks, then marks it visited and charges the budget.
    ///
    /// # Returns
    ///
    /// * `Some(ScheduledPage)` - A page that is now `Processing`
    /// * `None` - The budget is spent or the frontier is empty
    pub fn next_page(&self, state: &mut CrawlState) -> Option<ScheduledPage> {
        while state.has_budget() {
            let url = state.pop()?;

            if state.is_visited(&url) {
                trace!("Discarding already visited: {}", url);
                continue;
            }

            if is_ignored(&url) {
                debug!("Discarding ignored URL: {}", url);
                state.finish(&url, PageState::Skipped);
                continue;
            }

            let position = state.begin_page(&url);
            return Some(ScheduledPage { url, position });
        }

        None
    }

    /// Waits out the politeness delay
    pub async fn wait_politely(&self) {
        if !self.politeness_delay.is_zero() {
            tokio::time::sleep(self.politeness_delay).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    fn state_with(max_pages: usize, urls: &[&str]) -> CrawlState {
        let mut state = CrawlState::new(max_pages);
        for url in urls {
            state.enqueue(&Url::parse(url).unwrap());
        }
        state
    }

    #[test]
    fn test_pages_come_out_in_fifo_order() {
        let scheduler = Scheduler::new(Duration::ZERO);
        let mut state = state_with(
            10,
            &["https://example.com/1", "https://example.com/2", "https://example.com/3"],
        );

        let order: Vec<String> = std::iter::from_fn(|| scheduler.next_page(&mut state))
            .map(|page| page.url)
            .collect();

        assert_eq!(
            order,
            vec!["https://example.com/1", "https://example.com/2", "https://example.com/3"]
        );
    }

    #[test]
    fn test_budget_caps_processing() {
        let scheduler = Scheduler::new(Duration::ZERO);
        let mut state = state_with(
            2,
            &["https://example.com/1", "https://example.com/2", "https://example.com/3"],
        );

        assert_eq!(scheduler.next_page(&mut state).unwrap().position, 1);
        assert_eq!(scheduler.next_page(&mut state).unwrap().position, 2);
        assert!(scheduler.next_page(&mut state).is_none());

        // The third URL is never dequeued
        assert_eq!(state.frontier_len(), 1);
        assert_eq!(state.pages_processed(), 2);
    }

    #[test]
    fn test_ignored_extension_does_not_consume_budget() {
        let scheduler = Scheduler::new(Duration::ZERO);
        let mut state = state_with(
            1,
            &["https://example.com/logo.png", "https://example.com/contact"],
        );

        let page = scheduler.next_page(&mut state).unwrap();
        assert_eq!(page.url, "https://example.com/contact");
        assert_eq!(page.position, 1);
        assert_eq!(
            state.page_state("https://example.com/logo.png"),
            Some(PageState::Skipped)
        );
        assert!(!state.is_visited("https://example.com/logo.png"));
    }

    #[test]
    fn test_visited_url_is_discarded_for_free() {
        let scheduler = Scheduler::new(Duration::ZERO);
        let mut state = state_with(2, &["https://example.com/a.pdf", "https://example.com/b"]);

        // The PDF was fetched inline as a linked document before its turn came
        state.begin_document("https://example.com/a.pdf");
        state.finish("https://example.com/a.pdf", PageState::Done);

        let page = scheduler.next_page(&mut state).unwrap();
        assert_eq!(page.url, "https://example.com/b");
        assert_eq!(page.position, 1);
    }

    #[test]
    fn test_empty_frontier() {
        let scheduler = Scheduler::new(Duration::ZERO);
        let mut state = CrawlState::new(5);
        assert!(scheduler.next_page(&mut state).is_none());
        assert_eq!(state.pages_processed(), 0);
    }

    #[test]
    fn test_dequeued_page_is_processing() {
        let scheduler = Scheduler::new(Duration::ZERO);
        let mut state = state_with(5, &["https://example.com/"]);

        let page = scheduler.next_page(&mut state).unwrap();
        assert_eq!(state.page_state(&page.url), Some(PageState::Processing));
        assert!(state.is_visited(&page.url));
    }

    #[tokio::test]
    async fn test_politeness_delay_is_observed() {
        let scheduler = Scheduler::new(Duration::from_millis(50));
        let start = std::time::Instant::now();
        scheduler.wait_politely().await;
        assert!(start.elapsed() >= Duration::from_millis(50));
    }

    #[tokio::test]
    async fn test_zero_delay_returns_immediately() {
        let scheduler = Scheduler::new(Duration::ZERO);
        let start = std::time::Instant::now();
        scheduler.wait_politely().await;
        assert!(start.elapsed() < Duration::from_millis(50));
    }
}
