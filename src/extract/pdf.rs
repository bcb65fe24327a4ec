use crate::ExtractResult;
use lopdf::Document;
use std::fmt::Display;
use tracing::debug;

/// Extracts the text of every readable page of a PDF
///
/// Only a document that cannot be loaded at all is an error. Individual
/// pages that fail to decode, or that carry no text, are skipped.
pub fn extract_pdf(bytes: &[u8]) -> ExtractResult<String> {
    let document = Document::load_mem(bytes)?;

    let pages = document
        .get_pages()
        .into_keys()
        .map(|number| document.extract_text(&[number]));

    Ok(join_pages(pages))
}

/// Joins per-page extraction results with newlines
///
/// Failed and blank pages are dropped; the remaining pages keep their order.
///
/// # Example
///
/// ```
/// use trawler::extract::join_pages;
///
/// let pages: Vec<Result<String, String>> = vec![
///     Ok("first page".to_string()),
///     Err("bad stream".to_string()),
///     Ok("third page".to_string()),
/// ];
/// assert_eq!(join_pages(pages), "first page\nthird page");
/// ```
pub fn join_pages<I, E>(pages: I) -> String
where
    I: IntoIterator<Item = Result<String, E>>,
    E: Display,
{
    pages
        .into_iter()
        .enumerate()
        .filter_map(|(index, page)| match page {
            Ok(text) if !text.trim().is_empty() => Some(text),
            Ok(_) => None,
            Err(e) => {
                debug!("Skipping unreadable PDF page {}: {}", index + 1, e);
                None
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
