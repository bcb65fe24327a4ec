//! Content extraction for fetched documents
//!
//! A fetched body is classified by its declared content type (falling back
//! to the URL's file extension) into a [`DocumentKind`], which then turns
//! the raw bytes into plain text and, for HTML only, the page's anchor
//! targets.

mod email;
mod html;
mod office;
mod pdf;

pub use email::{deobfuscate, find_emails, harvest_emails, mailto_target};
pub use html::parse_html;
pub use office::{docx_paragraphs, extract_docx, extract_xlsx};
pub use pdf::{extract_pdf, join_pages};

use crate::ExtractResult;

/// Extensions of linked documents worth fetching inline from an HTML page
pub const DOCUMENT_EXTENSIONS: &[&str] = &[".txt", ".pdf", ".docx", ".xlsx"];

/// Supported document formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    PlainText,
    Html,
    Pdf,
    Word,
    Excel,
}

/// Text and links pulled out of a single document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extracted {
    /// Plain text to mine for emails
    pub text: String,

    /// Raw anchor targets, unresolved (HTML only)
    pub links: Vec<String>,
}

impl DocumentKind {
    /// Picks the extraction strategy for a response
    ///
    /// The content type is checked first, in this order: plain text, Word,
    /// Excel, PDF, HTML. Word and Excel also match on the URL suffix since
    /// servers often label them `application/octet-stream`. When nothing
    /// matches, `.pdf` and `.txt` suffixes are tried last.
    ///
    /// # Arguments
    ///
    /// * `content_type` - The `Content-Type` response header, possibly empty
    /// * `url` - The document URL, used only for its extension
    ///
    /// # Returns
    ///
    /// `None` if the document is of no supported kind and should be skipped.
    ///
    /// # Example
    ///
    /// ```
    /// use trawler::extract::DocumentKind;
    ///
    /// assert_eq!(
    ///     DocumentKind::classify("text/html; charset=utf-8", "https://example.com/"),
    ///     Some(DocumentKind::Html)
    /// );
    /// assert_eq!(
    ///     DocumentKind::classify("application/octet-stream", "https://example.com/staff.docx"),
    ///     Some(DocumentKind::Word)
    /// );
    /// assert_eq!(DocumentKind::classify("image/png", "https://example.com/a"), None);
    /// ```
    pub fn classify(content_type: &str, url: &str) -> Option<Self> {
        let content_type = content_type.to_ascii_lowercase();
        let extension = url_extension(url);
        let has_extension = |ext: &str| extension.as_deref() == Some(ext);

        if content_type.contains("text/plain") {
            Some(Self::PlainText)
        } else if content_type.contains("wordprocessingml")
            || content_type.contains("application/msword")
            || has_extension("docx")
        {
            Some(Self::Word)
        } else if content_type.contains("spreadsheetml")
            || content_type.contains("application/vnd.ms-excel")
            || has_extension("xlsx")
        {
            Some(Self::Excel)
        } else if content_type.contains("application/pdf") {
            Some(Self::Pdf)
        } else if content_type.contains("text/html") || content_type.contains("xhtml") {
            Some(Self::Html)
        } else if has_extension("pdf") {
            Some(Self::Pdf)
        } else if has_extension("txt") {
            Some(Self::PlainText)
        } else {
            None
        }
    }

    /// Runs this kind's extraction strategy over a document body
    ///
    /// HTML and plain text never fail; binary formats return an
    /// [`ExtractError`](crate::ExtractError) when the container cannot be
    /// read at all.
    pub fn extract(self, body: &[u8]) -> ExtractResult<Extracted> {
        match self {
            Self::PlainText => Ok(Extracted {
                text: String::from_utf8_lossy(body).into_owned(),
                links: Vec::new(),
            }),
            Self::Html => Ok(parse_html(&String::from_utf8_lossy(body))),
            Self::Pdf => extract_pdf(body).map(Extracted::text_only),
            Self::Word => extract_docx(body).map(Extracted::text_only),
            Self::Excel => extract_xlsx(body).map(Extracted::text_only),
        }
    }

    /// Human-readable name used in log lines
    pub fn name(self) -> &'static str {
        match self {
            Self::PlainText => "text",
            Self::Html => "html",
            Self::Pdf => "pdf",
            Self::Word => "word",
            Self::Excel => "excel",
        }
    }
}

impl Extracted {
    fn text_only(text: String) -> Self {
        Self {
            text,
            links: Vec::new(),
        }
    }
}

/// Returns true if the URL points at a document type fetched inline
/// from HTML pages
pub fn is_document_link(url: &str) -> bool {
    url_extension(url)
        .map(|ext| DOCUMENT_EXTENSIONS.iter().any(|d| d.trim_start_matches('.') == ext))
        .unwrap_or(false)
}

/// Lowercased extension of the last path segment, query and fragment ignored
fn url_extension(url: &str) -> Option<String> {
    let path = match url::Url::parse(url) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => url.split(['?', '#']).next().unwrap_or("").to_string(),
    };
    let segment = path.rsplit('/').next().unwrap_or("");
    let (stem, ext) = segment.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}
