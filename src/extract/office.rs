//! Office Open XML documents (Word and Excel)

use crate::ExtractResult;
use calamine::{Data, Reader, Xlsx};
use quick_xml::events::Event;
use quick_xml::Reader as XmlReader;
use std::io::{Cursor, Read};
use tracing::debug;

/// Main document part of a `.docx` package
const DOCX_BODY: &str = "word/document.xml";

/// Extracts the paragraph text of a Word document
///
/// Paragraphs are joined with newlines.
pub fn extract_docx(bytes: &[u8]) -> ExtractResult<String> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;

    let mut xml = String::new();
    archive.by_name(DOCX_BODY)?.read_to_string(&mut xml)?;

    docx_paragraphs(&xml)
}

/// Reads the paragraphs out of a WordprocessingML body
///
/// Text runs (`<w:t>`) are concatenated per paragraph (`<w:p>`); tabs and
/// line breaks inside a paragraph become spaces. Blank paragraphs are dropped.
///
/// # Example
///
/// ```
/// use trawler::extract::docx_paragraphs;
///
/// let xml = r#"<w:document><w:body>
///     <w:p><w:r><w:t>Press:</w:t></w:r><w:r><w:t xml:space="preserve"> press@example.com</w:t></w:r></w:p>
///     <w:p><w:r><w:t>Thanks</w:t></w:r></w:p>
/// </w:body></w:document>"#;
/// assert_eq!(docx_paragraphs(xml).unwrap(), "Press: press@example.com\nThanks");
/// ```
pub fn docx_paragraphs(xml: &str) -> ExtractResult<String> {
    let mut reader = XmlReader::from_str(xml);

    let mut paragraphs: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) if e.local_name().as_ref() == b"t" => in_text = true,
            Event::End(e) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"p" => {
                    let paragraph = current.trim();
                    if !paragraph.is_empty() {
                        paragraphs.push(paragraph.to_string());
                    }
                    current.clear();
                }
                _ => {}
            },
            Event::Empty(e) if matches!(e.local_name().as_ref(), b"tab" | b"br") => {
                current.push(' ')
            }
            Event::Text(t) if in_text => current.push_str(&t.unescape()?),
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs.join("\n"))
}

/// Extracts every non-empty cell of every sheet of an Excel workbook
///
/// Cell values are joined with single spaces, sheet by sheet in workbook
/// order and row-major within a sheet. Sheets that cannot be read are
/// skipped.
pub fn extract_xlsx(bytes: &[u8]) -> ExtractResult<String> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))?;

    let mut cells: Vec<String> = Vec::new();

    for name in workbook.sheet_names() {
        let range = match workbook.worksheet_range(&name) {
            Ok(range) => range,
            Err(e) => {
                debug!("Skipping unreadable sheet '{}': {}", name, e);
                continue;
            }
        };

        cells.extend(range.rows().flat_map(|row| row.iter().filter_map(cell_text)));
    }

    Ok(cells.join(" "))
}

/// Text of a single cell, `None` for empty or blank cells
fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty => None,
        Data::String(s) if s.trim().is_empty() => None,
        Data::String(s) => Some(s.trim().to_string()),
        other => Some(other.to_string()),
    }
}
