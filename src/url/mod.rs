//! URL handling module for Trawler
//!
//! This module provides seed and link normalization, the ignored
//! extension/protocol filter, and registered-domain scoping.

mod domain;
mod filter;
mod normalize;

// Re-export main functions
pub use domain::{registered_domain, registered_domain_of};
pub use filter::{has_ignored_extension, has_ignored_scheme, is_ignored};
pub use normalize::{has_http_scheme, normalize_link, normalize_seed};

use url::Url;

/// The registered domain a crawl is confined to
///
/// Derived once from the seed URL and never changed afterwards. Subdomains
/// of the same registered domain are in scope; everything else is not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    domain: String,
}

impl Scope {
    /// Derives the scope from the seed URL
    ///
    /// Fails if no registered domain can be computed, which makes the crawl
    /// impossible.
    pub fn from_seed(seed: &Url) -> crate::UrlResult<Self> {
        Ok(Self {
            domain: registered_domain_of(seed)?,
        })
    }

    /// The registered domain of the seed
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Returns true if the URL's registered domain equals the scope domain
    ///
    /// URLs whose domain cannot be computed are out of scope.
    pub fn contains(&self, url: &Url) -> bool {
        registered_domain_of(url)
            .map(|domain| domain == self.domain)
            .unwrap_or(false)
    }
}
