//! Email candidate mining
//!
//! Text from any document kind is scanned with a single email-shaped
//! pattern. HTML text first goes through a de-obfuscation pass, and HTML
//! anchors contribute their `mailto:` targets directly.

use super::{DocumentKind, Extracted};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}")
        .expect("email pattern is a valid regex")
});

/// Obfuscation markers, longest first so the padded forms win
const AT_MARKERS: &[&str] = &[" [at] ", " (at) ", "[at]", "(at)"];
const DOT_MARKERS: &[&str] = &[" [dot] ", " (dot) ", "[dot]", "(dot)"];

const MAILTO_PREFIX: &str = "mailto:";

/// Reverses common human-readable obfuscation
///
/// HTML entities are decoded first, then the literal `[at]`/`(at)` and
/// `[dot]`/`(dot)` markers are replaced. Matching is case-sensitive and
/// literal; `[AT]` or `{at}` are left alone. A marker padded by single
/// spaces on both sides is replaced together with its padding.
///
/// # Example
///
/// ```
/// use trawler::extract::deobfuscate;
///
/// assert_eq!(deobfuscate("user[at]example[dot]com"), "user@example.com");
/// assert_eq!(deobfuscate("user (at) example (dot) org"), "user@example.org");
/// assert_eq!(deobfuscate("jane&#64;example.com"), "jane@example.com");
/// ```
pub fn deobfuscate(text: &str) -> String {
    let mut text = html_escape::decode_html_entities(text).into_owned();

    for marker in AT_MARKERS {
        text = text.replace(marker, "@");
    }
    for marker in DOT_MARKERS {
        text = text.replace(marker, ".");
    }

    text
}

/// Returns every non-overlapping email-shaped match in the text
pub fn find_emails(text: &str) -> Vec<String> {
    EMAIL_REGEX
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Extracts the address from a `mailto:` href
///
/// The prefix is matched case-insensitively; anything from the first `?`
/// on (subject, cc, body) is dropped. The remainder is returned as-is,
/// even if it would not match the text pattern.
///
/// # Example
///
/// ```
/// use trawler::extract::mailto_target;
///
/// assert_eq!(mailto_target("mailto:a@b.com?subject=Hi"), Some("a@b.com".to_string()));
/// assert_eq!(mailto_target("mailto:?subject=Hi"), None);
/// assert_eq!(mailto_target("/contact"), None);
/// ```
pub fn mailto_target(href: &str) -> Option<String> {
    let href = href.trim();
    let prefix = href.get(..MAILTO_PREFIX.len())?;
    if !prefix.eq_ignore_ascii_case(MAILTO_PREFIX) {
        return None;
    }

    let address = href[MAILTO_PREFIX.len()..]
        .split('?')
        .next()
        .unwrap_or("")
        .trim();

    if address.is_empty() {
        None
    } else {
        Some(address.to_string())
    }
}

/// Collects the distinct email candidates of one document
///
/// HTML text is de-obfuscated before matching and HTML anchors add their
/// de-obfuscated `mailto:` targets. Other kinds are matched as-is.
pub fn harvest_emails(kind: DocumentKind, extracted: &Extracted) -> BTreeSet<String> {
    let mut candidates = BTreeSet::new();

    if kind == DocumentKind::Html {
        candidates.extend(find_emails(&deobfuscate(&extracted.text)));
        candidates.extend(
            extracted
                .links
                .iter()
                .filter_map(|href| mailto_target(href))
                .map(|target| deobfuscate(&target)),
        );
    } else {
        candidates.extend(find_emails(&extracted.text));
    }

    candidates
}
