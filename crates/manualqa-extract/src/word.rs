//! Word document text extractor.
//!
//! A `.docx` file is an OOXML zip container; the document text lives in
//! `word/document.xml` as `<w:t>` runs. This extractor unzips the container
//! and collects those runs, discarding all formatting.

use async_trait::async_trait;
use manualqa_core::{DocumentExtractor, DocumentKind, ExtractError};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::Read;
use std::path::Path;
use tracing::debug;

const DOCUMENT_XML: &str = "word/document.xml";

/// Extractor for Word documents.
///
/// Legacy `.doc` files are accepted by extension but are not zip containers,
/// so they fail at parse time with a document-processing error.
pub struct WordExtractor;

impl WordExtractor {
    /// Create a new Word extractor.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for WordExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentExtractor for WordExtractor {
    fn kind(&self) -> DocumentKind {
        DocumentKind::Word
    }

    async fn extract(&self, path: &Path) -> Result<String, ExtractError> {
        debug!("Extracting Word document: {:?}", path);

        let file = path.to_string_lossy().into_owned();
        let path = path.to_path_buf();

        let parse_file = file.clone();
        tokio::task::spawn_blocking(move || extract_word_text(&path, &parse_file))
            .await
            .map_err(|e| ExtractError::Parse {
                file,
                reason: format!("task join error: {e}"),
            })?
    }
}

/// Open the OOXML container and pull the raw text out of `word/document.xml`.
fn extract_word_text(path: &Path, file: &str) -> Result<String, ExtractError> {
    let reader = std::fs::File::open(path)?;

    let parse = |reason: String| ExtractError::Parse {
        file: file.to_string(),
        reason,
    };

    let mut archive = zip::ZipArchive::new(reader).map_err(|e| parse(e.to_string()))?;
    let mut entry = archive
        .by_name(DOCUMENT_XML)
        .map_err(|e| parse(format!("{DOCUMENT_XML}: {e}")))?;

    let mut xml = String::new();
    entry
        .read_to_string(&mut xml)
        .map_err(|e| parse(format!("{DOCUMENT_XML}: {e}")))?;

    document_xml_text(&xml).map_err(|e| parse(e.to_string()))
}

/// Collect the text runs from `word/document.xml` markup.
///
/// `<w:t>` runs carry the text; paragraph ends and explicit breaks become
/// newlines, tabs become tabs.
fn document_xml_text(xml: &str) -> Result<String, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    let mut out = String::new();
    let mut in_text_run = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) if e.local_name().as_ref() == b"t" => in_text_run = true,
            Event::End(e) => match e.local_name().as_ref() {
                b"t" => in_text_run = false,
                b"p" => out.push('\n'),
                _ => {}
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"br" => out.push('\n'),
                b"tab" => out.push('\t'),
                _ => {}
            },
            Event::Text(t) if in_text_run => out.push_str(&t.unescape()?),
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(out)
}
