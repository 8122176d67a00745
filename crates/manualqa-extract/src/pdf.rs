//! PDF text extractor built on lopdf.

use async_trait::async_trait;
use lopdf::Document;
use manualqa_core::{DocumentExtractor, DocumentKind, ExtractError};
use std::path::Path;
use tracing::{debug, warn};

/// Extractor for PDF documents.
///
/// Walks pages in page order, concatenates each page's text with blank-line
/// separators, and appends a trailer naming the page count so the count is
/// retrievable like any other text.
pub struct PdfExtractor;

impl PdfExtractor {
    /// Create a new PDF extractor.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentExtractor for PdfExtractor {
    fn kind(&self) -> DocumentKind {
        DocumentKind::Pdf
    }

    async fn extract(&self, path: &Path) -> Result<String, ExtractError> {
        debug!("Extracting PDF: {:?}", path);

        let bytes = tokio::fs::read(path).await?;
        let file = path.to_string_lossy().into_owned();

        // lopdf parsing is blocking; keep it off the async runtime.
        let parse_file = file.clone();
        tokio::task::spawn_blocking(move || extract_pdf_text(&bytes, &parse_file))
            .await
            .map_err(|e| ExtractError::Parse {
                file,
                reason: format!("task join error: {e}"),
            })?
    }
}

/// Extract page-ordered text from PDF bytes.
fn extract_pdf_text(bytes: &[u8], file: &str) -> Result<String, ExtractError> {
    let doc = Document::load_mem(bytes).map_err(|e| ExtractError::Parse {
        file: file.to_string(),
        reason: e.to_string(),
    })?;

    let pages = doc.get_pages();
    let page_count = pages.len();

    let mut page_texts = Vec::with_capacity(page_count);
    for page_num in pages.keys() {
        // A page that fails to yield text is skipped rather than failing the
        // whole document; a document that fails to load has already errored.
        match doc.extract_text(&[*page_num]) {
            Ok(page_text) => page_texts.push(normalize_page_text(&page_text)),
            Err(e) => {
                warn!("Failed to extract text from page {} of {}: {}", page_num, file, e);
            }
        }
    }

    let mut text = page_texts.join("\n\n");

    if page_count > 0 {
        text.push_str(&format!(
            "\n\n[This document contains {page_count} pages.]"
        ));
    }

    debug!(
        "Extracted {} chars from {} ({} pages)",
        text.len(),
        file,
        page_count
    );

    Ok(text)
}

/// Collapse the line-per-content-item output of the parser into
/// whitespace-separated page text.
fn normalize_page_text(page_text: &str) -> String {
    page_text
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
