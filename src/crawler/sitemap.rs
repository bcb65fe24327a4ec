//! Sitemap seeding
//!
//! Before the main loop starts, `/sitemap.xml` at the seed's origin is
//! fetched once and every `<loc>` it lists becomes a frontier candidate.
//! Seeding is best-effort: any failure yields no URLs.

use super::fetcher::{fetch_url, FetchResult};
use once_cell::sync::Lazy;
use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use url::Url;

static DEFAULT_NAMESPACE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\s+xmlns\s*=\s*"[^"]*""#).expect("namespace pattern is a valid regex")
});

/// Location of the sitemap for the origin of `seed`
///
/// Scheme, host and port are kept; path, query and fragment are replaced.
pub fn sitemap_url(seed: &Url) -> Option<Url> {
    let mut url = seed.clone();
    url.set_query(None);
    url.set_fragment(None);
    url.set_path("/sitemap.xml");
    url.host_str()?;
    Some(url)
}

/// Fetches and parses the sitemap of the seed's origin
///
/// # Returns
///
/// The raw `<loc>` values in document order, or an empty list if the
/// sitemap is missing, answers with anything but 200, or cannot be parsed.
pub async fn fetch_sitemap(client: &Client, seed: &Url, timeout: Duration) -> Vec<String> {
    let Some(url) = sitemap_url(seed) else {
        return Vec::new();
    };

    match fetch_url(client, url.as_str(), timeout).await {
        FetchResult::Success {
            status_code: 200,
            body,
            ..
        } => {
            let xml = String::from_utf8_lossy(&body);
            parse_sitemap(&xml).unwrap_or_else(|e| {
                debug!("Unparseable sitemap at {}: {}", url, e);
                Vec::new()
            })
        }
        FetchResult::Success { status_code, .. } | FetchResult::HttpError { status_code } => {
            debug!("No sitemap at {} (HTTP {})", url, status_code);
            Vec::new()
        }
        FetchResult::NetworkError { error, .. } => {
            debug!("Sitemap fetch failed for {}: {}", url, error);
            Vec::new()
        }
    }
}

/// Extracts every `<loc>` value from a sitemap document
///
/// The first default namespace declaration is stripped before parsing.
/// Both `<urlset>` and `<sitemapindex>` documents are accepted; nested
/// sitemaps are returned as plain locations and not followed.
///
/// # Example
///
/// ```
/// use trawler::crawler::parse_sitemap;
///
/// let xml = r#"<?xml version="1.0"?>
/// <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
///   <url><loc>https://example.com/about</loc></url>
///   <url><loc>https://example.com/team</loc></url>
/// </urlset>"#;
/// assert_eq!(
///     parse_sitemap(xml).unwrap(),
///     vec!["https://example.com/about", "https://example.com/team"]
/// );
/// ```
pub fn parse_sitemap(xml: &str) -> Result<Vec<String>, quick_xml::Error> {
    let stripped = DEFAULT_NAMESPACE.replace(xml, "");
    let mut reader = Reader::from_str(&stripped);
    reader.trim_text(true);

    let mut locations = Vec::new();
    let mut in_loc = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) if e.local_name().as_ref() == b"loc" => in_loc = true,
            Event::End(e) if e.local_name().as_ref() == b"loc" => in_loc = false,
            Event::Text(t) if in_loc => push_location(&mut locations, &t.unescape()?),
            Event::CData(t) if in_loc => {
                push_location(&mut locations, &String::from_utf8_lossy(&t.into_inner()))
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(locations)
}

fn push_location(locations: &mut Vec<String>, text: &str) {
    let text = text.trim();
    if !text.is_empty() {
        locations.push(text.to_string());
    }
}
