use crate::url::filter::has_ignored_scheme;
use crate::UrlError;
use url::Url;

/// Turns user input into a seed URL
///
/// # Normalization Steps
///
/// 1. Trim surrounding whitespace
/// 2. Prepend `https://` unless the input already starts with `http://` or `https://`
/// 3. Parse; reject anything without a host
/// 4. Remove the fragment
///
/// # Examples
///
/// ```
/// use trawler::url::normalize_seed;
///
/// let url = normalize_seed("example.com").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/");
/// ```
pub fn normalize_seed(input: &str) -> Result<Url, UrlError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(UrlError::Parse("empty URL".to_string()));
    }

    let with_scheme = if has_http_scheme(trimmed) {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    let mut url = Url::parse(&with_scheme).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingHost(with_scheme));
    }

    url.set_fragment(None);
    Ok(url)
}

/// Returns true if the input already carries an `http://` or `https://` prefix
pub fn has_http_scheme(input: &str) -> bool {
    let lower = input.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Resolves an href found on a page into an absolute crawlable URL
///
/// `base_url` must be the page's final URL after redirects. Relative
/// references (`/path`, `path`, `../path`) are resolved against it; absolute
/// `http(s)` hrefs pass through. The fragment is dropped so that in-page
/// anchors collapse onto the page itself.
///
/// Returns `None` when the link should be dropped:
/// - empty or fragment-only hrefs
/// - hrefs with a blocked scheme (`tel:`, `skype:`, `mailto:`, ...)
/// - hrefs that fail to resolve
/// - anything that is not HTTP(S) after resolution
///
/// # Examples
///
/// ```
/// use trawler::url::normalize_link;
/// use url::Url;
///
/// let base = Url::parse("https://example.com/team/").unwrap();
/// let link = normalize_link("../contact#form", &base).unwrap();
/// assert_eq!(link.as_str(), "https://example.com/contact");
/// ```
pub fn normalize_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if has_ignored_scheme(href) {
        return None;
    }

    let mut absolute = base_url.join(href).ok()?;

    if absolute.scheme() != "http" && absolute.scheme() != "https" {
        return None;
    }

    absolute.host_str()?;
    absolute.set_fragment(None);
    Some(absolute)
}
