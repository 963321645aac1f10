//! Word (.docx) text extraction
//!
//! A docx file is a zip archive; the text lives in `word/document.xml`.
//! Body paragraphs are emitted first, in document order, followed by the text
//! of every top-level table cell (row by row). A cell contributes only its own
//! paragraphs; tables nested inside it are skipped.

use crate::error::IngestError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::io::{Read, Seek};
use std::ops::Range;
use std::path::Path;

const DOCUMENT_PART: &str = "word/document.xml";

static TABLE_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"</?w:tbl(?:\s[^>]*)?>").expect("valid regex"));

static ROW_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"</?w:tr(?:\s[^>]*)?>").expect("valid regex"));

static CELL_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"</?w:tc(?:\s[^>]*)?>").expect("valid regex"));

static PARAGRAPH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)<w:p(?:\s[^>]*)?/>|<w:p(?:\s[^>]*)?>.*?</w:p>").expect("valid regex")
});

static PARAGRAPH_PROPERTIES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<w:pPr>.*?</w:pPr>").expect("valid regex"));

static RUN_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<w:t(?:\s[^>]*)?>([^<]*)</w:t>|<w:tab(?:\s[^>]*)?/>|<w:(?:br|cr)(?:\s[^>]*)?/>")
        .expect("valid regex")
});

/// Extract the text of a .docx file on disk
pub fn read_docx(path: &Path) -> Result<String, IngestError> {
    let file = std::fs::File::open(path).map_err(|e| IngestError::extraction(path, e))?;
    docx_text(file).map_err(|cause| IngestError::extraction(path, cause))
}

/// Extract the text of a .docx archive from any seekable reader
pub fn docx_text<R: Read + Seek>(reader: R) -> Result<String, String> {
    let mut archive =
        zip::ZipArchive::new(reader).map_err(|e| format!("not a valid docx archive: {}", e))?;

    let mut xml = String::new();
    archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| format!("missing {}: {}", DOCUMENT_PART, e))?
        .read_to_string(&mut xml)
        .map_err(|e| format!("unreadable {}: {}", DOCUMENT_PART, e))?;

    Ok(document_text(&xml))
}

/// Paragraph text first, then table cells, one per line
fn document_text(xml: &str) -> String {
    let tables = outermost(xml, &TABLE_TAG);
    let body = without(xml, &tables);
    let mut lines: Vec<String> = PARAGRAPH
        .find_iter(&body)
        .map(|p| paragraph_text(p.as_str()))
        .collect();

    for table in tables.into_iter().map(|span| &xml[span]) {
        for row in outermost(table, &ROW_TAG).into_iter().map(|span| &table[span]) {
            for cell in outermost(row, &CELL_TAG).into_iter().map(|span| &row[span]) {
                lines.push(cell_text(cell));
            }
        }
    }

    lines.join("\n")
}

/// Spans of the outermost elements whose open/close tags match `tag`.
///
/// Nesting depth is tracked so an inner close tag never ends the outer
/// element. Unclosed elements are dropped.
fn outermost(xml: &str, tag: &Regex) -> Vec<Range<usize>> {
    let mut spans = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for found in tag.find_iter(xml) {
        if found.as_str().starts_with("</") {
            match depth {
                0 => {}
                1 => {
                    spans.push(start..found.end());
                    depth = 0;
                }
                _ => depth -= 1,
            }
        } else {
            if depth == 0 {
                start = found.start();
            }
            depth += 1;
        }
    }

    spans
}

/// `xml` with the given spans cut out
fn without(xml: &str, spans: &[Range<usize>]) -> String {
    let mut rest = String::with_capacity(xml.len());
    let mut from = 0;
    for span in spans {
        rest.push_str(&xml[from..span.start]);
        from = span.end;
    }
    rest.push_str(&xml[from..]);
    rest
}

/// Direct paragraphs of a cell; nested tables are skipped
fn cell_text(cell: &str) -> String {
    let own = without(cell, &outermost(cell, &TABLE_TAG));
    PARAGRAPH
        .find_iter(&own)
        .map(|p| paragraph_text(p.as_str()))
        .collect::<Vec<_>>()
        .join("\n")
}

fn paragraph_text(paragraph: &str) -> String {
    // Tab stops declared in the properties are not content
    let paragraph = PARAGRAPH_PROPERTIES.replace_all(paragraph, "");
    let mut text = String::new();
    for token in RUN_TOKEN.captures_iter(&paragraph) {
        match token.get(1) {
            Some(run) => text.push_str(&unescape(run.as_str())),
            None if token[0].starts_with("<w:tab") => text.push('\t'),
            None => text.push('\n'),
        }
    }
    text
}

fn unescape(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
