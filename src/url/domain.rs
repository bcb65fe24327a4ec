use crate::UrlError;
use once_cell::sync::Lazy;
use tldextract::{TldExtractor, TldOption};
use url::{Host, Url};

static EXTRACTOR: Lazy<TldExtractor> = Lazy::new(|| extractor_options().build());

/// Suffix list options: always the list bundled with tldextract
///
/// tldextract first tries a cache file, `.tld_cache` in the working
/// directory unless told otherwise. An empty path can never be opened, so
/// results do not depend on where the binary runs.
fn extractor_options() -> TldOption {
    TldOption::default().cache_path("").update_local(false)
}

/// Computes the registered domain (eTLD+1) of a URL string
///
/// The host is stripped down to the label directly below its public suffix,
/// so every subdomain of a site maps to the same value. IP literals have no
/// public suffix and map to themselves; single-label hosts such as
/// `localhost` map to the label.
///
/// # Arguments
///
/// * `url` - An absolute URL, scheme included
///
/// # Returns
///
/// * `Ok(String)` - The lowercase registered domain
/// * `Err(UrlError::DomainParse)` - The URL is malformed, schemeless or has no usable host
///
/// # Examples
///
/// ```
/// use trawler::url::registered_domain;
///
/// assert_eq!(registered_domain("https://mail.example.co.uk/a").unwrap(), "example.co.uk");
/// assert!(registered_domain("example.com").is_err());
/// ```
pub fn registered_domain(url: &str) -> Result<String, UrlError> {
    let parsed =
        Url::parse(url).map_err(|e| UrlError::DomainParse(format!("{} ({})", url, e)))?;
    registered_domain_of(&parsed)
}

/// Same as [`registered_domain`] for an already parsed URL
pub fn registered_domain_of(url: &Url) -> Result<String, UrlError> {
    match url.host() {
        None => Err(UrlError::DomainParse(url.to_string())),
        Some(Host::Ipv4(ip)) => Ok(ip.to_string()),
        Some(Host::Ipv6(ip)) => Ok(ip.to_string()),
        Some(Host::Domain(_)) => {
            let result = EXTRACTOR
                .extract(url.as_str())
                .map_err(|e| UrlError::DomainParse(format!("{} ({})", url, e)))?;

            match (result.domain, result.suffix) {
                (Some(domain), Some(suffix)) => Ok(format!("{}.{}", domain, suffix).to_lowercase()),
                (Some(domain), None) => Ok(domain.to_lowercase()),
                // The host is a bare public suffix
                _ => Err(UrlError::DomainParse(url.to_string())),
            }
        }
    }
}
