use serde::Deserialize;
use std::time::Duration;

/// Default browser-like user agent sent with every request
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/118.0.0.0 Safari/537.36";

/// Default `Accept` header, preferring HTML and XML
pub const DEFAULT_ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// Main configuration structure for Trawler
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Page budget: maximum number of pages taken into processing
    #[serde(rename = "max-pages")]
    pub max_pages: usize,

    /// Delay between dequeuing a URL and fetching it (milliseconds)
    #[serde(rename = "politeness-delay")]
    pub politeness_delay: u64,

    /// Timeout for primary page fetches (seconds)
    #[serde(rename = "page-timeout")]
    pub page_timeout: u64,

    /// Timeout for linked-document fetches (seconds)
    #[serde(rename = "document-timeout")]
    pub document_timeout: u64,

    /// Pre-seed the frontier from `/sitemap.xml`
    #[serde(rename = "use-sitemap")]
    pub use_sitemap: bool,

    /// Fetch documents linked from HTML pages inline
    #[serde(rename = "fetch-linked-documents")]
    pub fetch_linked_documents: bool,
}

impl CrawlerConfig {
    pub fn politeness_delay(&self) -> Duration {
        Duration::from_millis(self.politeness_delay)
    }

    pub fn page_timeout(&self) -> Duration {
        Duration::from_secs(self.page_timeout)
    }

    pub fn document_timeout(&self) -> Duration {
        Duration::from_secs(self.document_timeout)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_pages: 50,
            politeness_delay: 100,
            page_timeout: 15,
            document_timeout: 10,
            use_sitemap: true,
            fetch_linked_documents: true,
        }
    }
}

/// Request header configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// `User-Agent` header value
    pub value: String,

    /// `Accept` header value
    pub accept: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            value: DEFAULT_USER_AGENT.to_string(),
            accept: DEFAULT_ACCEPT.to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path to the CSV results file
    #[serde(rename = "results-path")]
    pub results_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            results_path: "results.csv".to_string(),
        }
    }
}
