//! HTML parser for extracting text and anchors
//!
//! This module handles parsing HTML content to extract:
//! - Every text node, space-joined
//! - Comment bodies, which often hide addresses from casual readers
//! - Raw `href` values of all anchors (including `mailto:`)

use super::Extracted;
use once_cell::sync::Lazy;
use scraper::{Html, Node, Selector};

static ANCHOR_SELECTOR: Lazy<Option<Selector>> = Lazy::new(|| Selector::parse("a[href]").ok());

/// Parses HTML content and extracts its text and anchor targets
///
/// Parsing is lenient and cannot fail: malformed markup yields whatever
/// text and anchors html5ever recovers.
///
/// # Arguments
///
/// * `html` - The HTML content to parse
///
/// # Returns
///
/// The visible text (plus comment bodies) joined by single spaces, and the
/// trimmed `href` of every anchor in document order. Links are returned
/// unresolved; resolving them against the final page URL is the caller's job.
///
/// # Example
///
/// ```
/// use trawler::extract::parse_html;
///
/// let html = r#"<p>Write to <a href="mailto:info@example.com">us</a></p><!-- sales@example.com -->"#;
/// let parsed = parse_html(html);
/// assert!(parsed.text.contains("Write to"));
/// assert!(parsed.text.contains("sales@example.com"));
/// assert_eq!(parsed.links, vec!["mailto:info@example.com".to_string()]);
/// ```
pub fn parse_html(html: &str) -> Extracted {
    let document = Html::parse_document(html);

    Extracted {
        text: extract_text(&document),
        links: extract_links(&document),
    }
}

/// Collects text nodes and comment bodies in document order
fn extract_text(document: &Html) -> String {
    let mut fragments: Vec<&str> = Vec::new();

    for node in document.tree.root().descendants() {
        let fragment = match node.value() {
            Node::Text(text) => text.trim(),
            Node::Comment(comment) => comment.trim(),
            _ => continue,
        };

        if !fragment.is_empty() {
            fragments.push(fragment);
        }
    }

    fragments.join(" ")
}

/// Collects the raw `href` of every anchor
fn extract_links(document: &Html) -> Vec<String> {
    let Some(selector) = ANCHOR_SELECTOR.as_ref() else {
        return Vec::new();
    };

    document
        .select(selector)
        .filter_map(|element| element.value().attr("href"))
        .map(str::trim)
        .filter(|href| !href.is_empty())
        .map(str::to_string)
        .collect()
}
