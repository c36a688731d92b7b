//! Page extraction: PDF → ordered, cleaned per-page text.
//!
//! `pdf-extract` returns the whole document as one string, so pages are
//! recovered from the form feeds it inserts between them (fallback: triple
//! newlines). Each page is cleaned of OCR artifact markers and non-ASCII
//! noise, and whitespace is collapsed. Pages whose text layer yields nothing
//! go through an optional OCR engine; pages that are still empty are skipped
//! with a warning.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

use crate::error::ExtractError;

static RE_OCR_WRAPPER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<CONTENT_FROM_OCR>.*?</CONTENT_FROM_OCR>").unwrap());

static RE_TRUNCATION_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.\.\.\(truncated \d+ characters\)\.\.\.").unwrap());

static RE_WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Extracts an ordered sequence of page texts from an input document.
///
/// The pipeline treats this as a black-box capability so tests can substitute
/// a stub that serves canned pages.
pub trait PageExtractor {
    fn extract(&self, path: &Path) -> Result<Vec<String>, ExtractError>;
}

/// Optical character recognition over a rendered page, for documents whose
/// text layer is empty or garbage. No engine ships with the crate; callers
/// inject one.
pub trait OcrEngine {
    /// Recognize the text of page `page_index` (zero-based) of the document.
    fn recognize_page(&self, path: &Path, page_index: usize) -> Result<String, ExtractError>;
}

/// PDF page extractor backed by `pdf-extract`, with an optional OCR fallback.
#[derive(Default)]
pub struct PdfPageExtractor {
    ocr: Option<Box<dyn OcrEngine>>,
}

impl PdfPageExtractor {
    /// Create an extractor with no OCR fallback.
    pub fn new() -> Self {
        Self { ocr: None }
    }

    /// Attach an OCR engine used for pages whose text layer yields nothing.
    pub fn with_ocr(ocr: Box<dyn OcrEngine>) -> Self {
        Self { ocr: Some(ocr) }
    }
}

impl PageExtractor for PdfPageExtractor {
    fn extract(&self, path: &Path) -> Result<Vec<String>, ExtractError> {
        let data = std::fs::read(path).map_err(|source| ExtractError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let text = pdf_extract::extract_text_from_mem(&data).map_err(|e| {
            ExtractError::Parse {
                message: e.to_string(),
            }
        })?;

        // pdf-extract inserts form feeds between pages. If there are none,
        // fall back to triple newlines (common in extracted text).
        let raw_pages: Vec<&str> = if text.contains('\x0C') {
            text.split('\x0C').collect()
        } else {
            text.split("\n\n\n").collect()
        };

        let pages = self.assemble_pages(path, &raw_pages);
        if pages.is_empty() {
            return Err(ExtractError::NoPages {
                path: path.display().to_string(),
            });
        }
        Ok(pages)
    }
}

impl PdfPageExtractor {
    /// Clean each raw page, routing pages with an empty text layer through
    /// the OCR engine when one is attached. OCR failure is per-page: the
    /// page is skipped with a warning and extraction continues, so a single
    /// bad page never kills a run with usable text elsewhere.
    fn assemble_pages(&self, path: &Path, raw_pages: &[&str]) -> Vec<String> {
        let mut pages = Vec::with_capacity(raw_pages.len());
        for (page_idx, raw) in raw_pages.iter().enumerate() {
            let mut cleaned = clean_page_text(raw);
            if cleaned.is_empty() {
                warn!(page = page_idx + 1, "no text in page's text layer");
                if let Some(ocr) = &self.ocr {
                    match ocr.recognize_page(path, page_idx) {
                        Ok(recognized) => cleaned = clean_page_text(&recognized),
                        Err(e) => {
                            warn!(page = page_idx + 1, error = %e, "OCR failed for page");
                        }
                    }
                }
            }
            if cleaned.is_empty() {
                warn!(page = page_idx + 1, "skipping empty page");
                continue;
            }
            pages.push(cleaned);
        }
        pages
    }
}

/// Clean one page of extracted text: strip OCR artifact markers, collapse
/// whitespace runs to single spaces, and drop non-ASCII noise characters
/// that PDF text layers tend to leak.
pub fn clean_page_text(text: &str) -> String {
    let text = RE_OCR_WRAPPER.replace_all(text, "");
    let text = RE_TRUNCATION_MARKER.replace_all(&text, "");
    let text: String = text.chars().filter(|c| c.is_ascii()).collect();
    RE_WHITESPACE.replace_all(&text, " ").trim().to_string()
}
