//! Mutable state of a single crawl
//!
//! The frontier, the visited set, the email map and the page budget live
//! together in one [`CrawlState`] owned by the crawler. Nothing here is
//! shared between crawls.

use super::PageState;
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use tracing::trace;
use url::Url;

/// Email address → URL where it was first observed, sorted by address
pub type EmailMap = BTreeMap<String, String>;

/// Frontier, visited set, email map and counters for one crawl
#[derive(Debug)]
pub struct CrawlState {
    /// Pending URLs in strict arrival order
    frontier: VecDeque<String>,

    /// Lifecycle of every URL the crawl has seen; doubles as the
    /// "already queued" index
    states: HashMap<String, PageState>,

    /// URLs that were dequeued for processing or fetched as documents
    visited: HashSet<String>,

    /// First-source-wins email map
    emails: EmailMap,

    /// Page budget
    max_pages: usize,

    /// Pages charged against the budget so far
    pages_processed: usize,

    /// Linked documents fetched outside the budget
    documents_fetched: usize,
}

impl CrawlState {
    /// Creates an empty state with the given page budget
    pub fn new(max_pages: usize) -> Self {
        Self {
            frontier: VecDeque::new(),
            states: HashMap::new(),
            visited: HashSet::new(),
            emails: EmailMap::new(),
            max_pages,
            pages_processed: 0,
            documents_fetched: 0,
        }
    }

    // ===== Frontier =====

    /// Appends a URL to the frontier tail unless it is already known
    ///
    /// A URL is known once it has been queued, visited or skipped; it is
    /// never queued a second time.
    ///
    /// # Returns
    ///
    /// `true` if the URL was added.
    pub fn enqueue(&mut self, url: &Url) -> bool {
        let key = url.as_str();

        if self.visited.contains(key) || self.states.contains_key(key) {
            trace!("Already known: {}", key);
            return false;
        }

        self.states.insert(key.to_string(), PageState::Queued);
        self.frontier.push_back(key.to_string());
        true
    }

    /// Removes and returns the head of the frontier
    pub fn pop(&mut self) -> Option<String> {
        self.frontier.pop_front()
    }

    /// Pending URLs in frontier order
    pub fn frontier(&self) -> impl Iterator<Item = &str> {
        self.frontier.iter().map(String::as_str)
    }

    /// Number of pending URLs
    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    // ===== Visited set and budget =====

    /// Returns true if the URL was already dequeued for processing or
    /// fetched as a linked document
    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    /// Returns true while pages may still be charged against the budget
    pub fn has_budget(&self) -> bool {
        self.pages_processed < self.max_pages
    }

    /// Marks a dequeued URL visited and charges it against the budget
    ///
    /// # Returns
    ///
    /// The new number of processed pages, used for progress lines.
    pub fn begin_page(&mut self, url: &str) -> usize {
        self.visited.insert(url.to_string());
        self.set_state(url, PageState::Processing);
        self.pages_processed += 1;
        self.pages_processed
    }

    /// Marks a linked document visited without touching the budget
    pub fn begin_document(&mut self, url: &str) {
        self.visited.insert(url.to_string());
        self.set_state(url, PageState::Processing);
        self.documents_fetched += 1;
    }

    /// Records the terminal state of a URL
    pub fn finish(&mut self, url: &str, state: PageState) {
        self.set_state(url, state);
    }

    /// State of a URL, `None` if the crawl has never seen it
    pub fn page_state(&self, url: &str) -> Option<PageState> {
        self.states.get(url).copied()
    }

    fn set_state(&mut self, url: &str, next: PageState) {
        match self.states.get_mut(url) {
            Some(current) => {
                debug_assert!(
                    current.can_transition_to(next),
                    "illegal transition {} -> {} for {}",
                    current,
                    next,
                    url
                );
                *current = next;
            }
            None => {
                self.states.insert(url.to_string(), next);
            }
        }
    }

    // ===== Emails =====

    /// Merges one page's distinct candidates into the email map
    ///
    /// An address already in the map keeps its original source.
    ///
    /// # Returns
    ///
    /// The number of addresses that were not known before.
    pub fn merge_emails(&mut self, candidates: BTreeSet<String>, source: &str) -> usize {
        let mut added = 0;

        for email in candidates {
            if let Entry::Vacant(entry) = self.emails.entry(email) {
                entry.insert(source.to_string());
                added += 1;
            }
        }

        added
    }

    /// The email map accumulated so far
    pub fn emails(&self) -> &EmailMap {
        &self.emails
    }

    /// Consumes the state and hands over the email map
    pub fn into_emails(self) -> EmailMap {
        self.emails
    }

    // ===== Counters =====

    /// Pages charged against the budget
    pub fn pages_processed(&self) -> usize {
        self.pages_processed
    }

    /// Linked documents fetched outside the budget
    pub fn documents_fetched(&self) -> usize {
        self.documents_fetched
    }

    /// The configured page budget
    pub fn max_pages(&self) -> usize {
        self.max_pages
    }
}
