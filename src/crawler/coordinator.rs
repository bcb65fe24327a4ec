//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the main crawl loop that coordinates all aspects of
//! the crawling process, including:
//! - Deriving the scope domain from the seed
//! - Seeding the frontier (seed URL, optionally the sitemap)
//! - Coordinating fetching, extraction and link discovery
//! - Fetching linked documents inline
//! - Handling interrupts while keeping partial results

use crate::config::Config;
use crate::crawler::scheduler::Scheduler;
use crate::crawler::sitemap::fetch_sitemap;
use crate::crawler::{build_http_client, fetch_url, FetchResult};
use crate::extract::{harvest_emails, is_document_link, DocumentKind, Extracted};
use crate::state::{CrawlState, EmailMap, PageState};
use crate::url::{has_ignored_extension, normalize_link, normalize_seed, Scope};
use reqwest::Client;
use std::collections::{BTreeSet, HashSet};
use std::future::Future;
use std::time::{Duration, Instant};
use tracing::{debug, info, trace, warn};
use url::Url;

/// Summary of a finished (or interrupted) crawl
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// Registered domain the crawl was confined to
    pub scope: String,

    /// Email → first source URL, sorted by email
    pub emails: EmailMap,

    /// Pages charged against the budget
    pub pages_processed: usize,

    /// Pages whose fetch or extraction failed
    pub pages_failed: usize,

    /// Pages fetched but of an unsupported content type
    pub pages_skipped: usize,

    /// Linked documents fetched outside the budget
    pub documents_fetched: usize,

    /// Whether the crawl was stopped by the shutdown signal
    pub interrupted: bool,

    /// Wall-clock duration of the crawl loop
    pub elapsed: Duration,
}

/// What a single fetched page contributes to the crawl
///
/// Built without touching the crawl state so that an interrupted page
/// contributes nothing at all.
#[derive(Debug)]
struct PageOutcome {
    state: PageState,
    emails: BTreeSet<String>,
    links: Vec<Url>,
    documents: Vec<DocumentOutcome>,
}

impl PageOutcome {
    fn empty(state: PageState) -> Self {
        Self {
            state,
            emails: BTreeSet::new(),
            links: Vec::new(),
            documents: Vec::new(),
        }
    }
}

/// What a linked document contributes to the crawl
#[derive(Debug)]
struct DocumentOutcome {
    url: String,
    state: PageState,
    emails: BTreeSet<String>,
}

/// Main crawler structure
///
/// Owns the HTTP client, the scope and the whole [`CrawlState`] of one
/// crawl. Pages are processed strictly one at a time.
pub struct Crawler {
    config: Config,
    client: Client,
    scheduler: Scheduler,
    seed: Url,
    scope: Scope,
    state: CrawlState,
    pages_failed: usize,
    pages_skipped: usize,
}

impl Crawler {
    /// Creates a new crawler and queues the seed URL
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration
    /// * `seed` - The seed URL; `https://` is assumed when no scheme is given
    ///
    /// # Returns
    ///
    /// * `Ok(Crawler)` - Ready to crawl
    /// * `Err(TrawlError)` - The seed is invalid, its registered domain cannot
    ///   be derived, or the HTTP client cannot be built
    pub fn new(config: Config, seed: &str) -> crate::Result<Self> {
        let seed = normalize_seed(seed)?;
        let scope = Scope::from_seed(&seed)?;
        let client = build_http_client(&config.user_agent)?;
        let scheduler = Scheduler::new(config.crawler.politeness_delay());

        let mut state = CrawlState::new(config.crawler.max_pages);
        state.enqueue(&seed);

        info!(
            "Will only scan links on the root domain '{}' (including subdomains)",
            scope.domain()
        );

        Ok(Self {
            config,
            client,
            scheduler,
            seed,
            scope,
            state,
            pages_failed: 0,
            pages_skipped: 0,
        })
    }

    /// The normalized seed URL
    pub fn seed(&self) -> &Url {
        &self.seed
    }

    /// The scope the crawl is confined to
    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// The current crawl state
    pub fn state(&self) -> &CrawlState {
        &self.state
    }

    /// Queues every URL listed in the site's `/sitemap.xml`
    ///
    /// Sitemap URLs go through the same checks as discovered links. Any
    /// failure leaves the frontier untouched.
    ///
    /// # Returns
    ///
    /// The number of URLs added to the frontier.
    pub async fn seed_from_sitemap(&mut self) -> usize {
        let locations =
            fetch_sitemap(&self.client, &self.seed, self.config.crawler.page_timeout()).await;

        let mut added = 0;
        for location in &locations {
            if let Some(url) = normalize_link(location, &self.seed) {
                if self.try_enqueue(&url) {
                    added += 1;
                }
            }
        }

        if added > 0 {
            info!("Sitemap seeding queued {} URLs", added);
        } else {
            debug!("Sitemap seeding queued nothing ({} listed)", locations.len());
        }

        added
    }

    /// Runs the crawl loop until the frontier or the budget is exhausted
    pub async fn run(self) -> CrawlReport {
        self.run_until(std::future::pending::<()>()).await
    }

    /// Runs the crawl loop, stopping early when `shutdown` resolves
    ///
    /// The page in flight when `shutdown` fires contributes nothing; every
    /// page finished before that is kept in the report.
    pub async fn run_until<F>(mut self, shutdown: F) -> CrawlReport
    where
        F: Future<Output = ()>,
    {
        let start_time = Instant::now();
        let max_pages = self.state.max_pages();
        let mut interrupted = false;

        tokio::pin!(shutdown);

        while let Some(page) = self.scheduler.next_page(&mut self.state) {
            info!("[{}/{}] Processing: {}", page.position, max_pages, page.url);

            let outcome = tokio::select! {
                biased;
                _ = &mut shutdown => None,
                outcome = self.process_page(&page.url) => Some(outcome),
            };

            match outcome {
                Some(outcome) => self.apply_outcome(&page.url, outcome),
                None => {
                    warn!("Process interrupted by user");
                    self.state.finish(&page.url, PageState::Skipped);
                    interrupted = true;
                    break;
                }
            }
        }

        if !interrupted {
            if self.state.has_budget() {
                info!("Frontier is empty, crawl complete");
            } else {
                info!("Reached user-defined limit of {} pages", max_pages);
            }
        }

        self.into_report(interrupted, start_time.elapsed())
    }

    fn into_report(self, interrupted: bool, elapsed: Duration) -> CrawlReport {
        CrawlReport {
            scope: self.scope.domain().to_string(),
            pages_processed: self.state.pages_processed(),
            pages_failed: self.pages_failed,
            pages_skipped: self.pages_skipped,
            documents_fetched: self.state.documents_fetched(),
            interrupted,
            elapsed,
            emails: self.state.into_emails(),
        }
    }

    /// Fetches one page and works out what it contributes
    async fn process_page(&self, url: &str) -> PageOutcome {
        self.scheduler.wait_politely().await;

        let (kind, final_url, extracted) =
            match self.fetch_and_extract(url, self.config.crawler.page_timeout()).await {
                Ok(fetched) => fetched,
                Err(state) => return PageOutcome::empty(state),
            };

        let emails = harvest_emails(kind, &extracted);

        let links: Vec<Url> = extracted
            .links
            .iter()
            .filter_map(|href| normalize_link(href, &final_url))
            .collect();

        let documents = if kind == DocumentKind::Html && self.config.crawler.fetch_linked_documents
        {
            self.fetch_linked_documents(&links).await
        } else {
            Vec::new()
        };

        PageOutcome {
            state: PageState::Done,
            emails,
            links,
            documents,
        }
    }

    /// Fetches in-scope document links of a page that were never visited
    async fn fetch_linked_documents(&self, links: &[Url]) -> Vec<DocumentOutcome> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut outcomes = Vec::new();

        for link in links {
            let key = link.as_str();

            if !is_document_link(key)
                || !self.scope.contains(link)
                || self.state.is_visited(key)
                || self.state.page_state(key).map_or(false, |s| s.is_terminal())
                || !seen.insert(key)
            {
                continue;
            }

            debug!("Scanning linked document: {}", key);

            let outcome = match self
                .fetch_and_extract(key, self.config.crawler.document_timeout())
                .await
            {
                Ok((kind, _, extracted)) => DocumentOutcome {
                    url: key.to_string(),
                    state: PageState::Done,
                    emails: harvest_emails(kind, &extracted),
                },
                Err(state) => DocumentOutcome {
                    url: key.to_string(),
                    state,
                    emails: BTreeSet::new(),
                },
            };

            outcomes.push(outcome);
        }

        outcomes
    }

    /// Fetches a URL, classifies the response and runs its extractor
    ///
    /// Every failure is logged here and mapped to the terminal state the URL
    /// should end up in.
    async fn fetch_and_extract(
        &self,
        url: &str,
        timeout: Duration,
    ) -> Result<(DocumentKind, Url, Extracted), PageState> {
        let (final_url, content_type, body) = match fetch_url(&self.client, url, timeout).await {
            FetchResult::Success {
                final_url,
                content_type,
                body,
                ..
            } => (final_url, content_type, body),
            FetchResult::HttpError { status_code } => {
                warn!("Failed to fetch URL: {} (HTTP {})", url, status_code);
                return Err(PageState::Failed);
            }
            FetchResult::NetworkError {
                timed_out: true, ..
            } => {
                warn!("Server was too slow to respond (timeout): {}", url);
                return Err(PageState::Failed);
            }
            FetchResult::NetworkError { error, .. } => {
                warn!("Failed to fetch URL: {} | Error: {}", url, error);
                return Err(PageState::Failed);
            }
        };

        let Some(kind) = DocumentKind::classify(&content_type, final_url.as_str()) else {
            debug!("Unsupported content type '{}' at {}", content_type, url);
            return Err(PageState::Skipped);
        };

        if kind != DocumentKind::Html {
            debug!("Scanning {} document: {}", kind.name(), url);
        }

        match kind.extract(&body) {
            Ok(extracted) => Ok((kind, final_url, extracted)),
            Err(e) => {
                warn!("Failed to extract {} content from {}: {}", kind.name(), url, e);
                Err(PageState::Failed)
            }
        }
    }

    /// Merges a page's contribution into the crawl state
    fn apply_outcome(&mut self, url: &str, outcome: PageOutcome) {
        let mut added = self.state.merge_emails(outcome.emails, url);

        for document in outcome.documents {
            self.state.begin_document(&document.url);
            self.state.finish(&document.url, document.state);
            added += self.state.merge_emails(document.emails, &document.url);
        }

        if added > 0 {
            info!("Found {} new emails on this page", added);
        }

        let mut queued = 0;
        for link in &outcome.links {
            if self.try_enqueue(link) {
                queued += 1;
            }
        }
        trace!("Queued {} of {} links from {}", queued, outcome.links.len(), url);

        match outcome.state {
            PageState::Failed => self.pages_failed += 1,
            PageState::Skipped => self.pages_skipped += 1,
            _ => {}
        }
        self.state.finish(url, outcome.state);
    }

    /// Queues a URL if it is in scope, not an ignored file type and not
    /// already known
    fn try_enqueue(&mut self, url: &Url) -> bool {
        if has_ignored_extension(url.as_str()) {
            trace!("Ignored extension: {}", url);
            return false;
        }

        if !self.scope.contains(url) {
            trace!("Out of scope: {}", url);
            return false;
        }

        self.state.enqueue(url)
    }
}

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Normalize the seed and derive the scope domain
/// 2. Seed the frontier from the sitemap (if enabled)
/// 3. Run the crawl loop until done or `shutdown` resolves
///
/// `shutdown` is polled from the start, so it also cuts sitemap seeding
/// short; nothing is fetched after that.
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `seed` - The seed URL as entered by the user
/// * `shutdown` - Future that resolves when the crawl should stop early
///
/// # Returns
///
/// * `Ok(CrawlReport)` - Crawl finished or was interrupted
/// * `Err(TrawlError)` - Setup failed before anything was fetched
pub async fn run_crawl<F>(config: Config, seed: &str, shutdown: F) -> crate::Result<CrawlReport>
where
    F: Future<Output = ()>,
{
    let use_sitemap = config.crawler.use_sitemap;
    let mut crawler = Crawler::new(config, seed)?;

    tokio::pin!(shutdown);

    if use_sitemap {
        let start_time = Instant::now();
        let stopped = tokio::select! {
            biased;
            _ = &mut shutdown => true,
            _ = crawler.seed_from_sitemap() => false,
        };

        if stopped {
            warn!("Process interrupted by user");
            return Ok(crawler.into_report(true, start_time.elapsed()));
        }
    }

    Ok(crawler.run_until(shutdown).await)
}
