//! Extractor registry keyed by document kind.

use manualqa_core::{DocumentExtractor, DocumentKind, ExtractError};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::{PdfExtractor, WordExtractor};

/// Registry of document extractors.
///
/// The document kind is resolved from the filename before any I/O, so an
/// unsupported extension is rejected without touching the file.
pub struct ExtractorRegistry {
    extractors: HashMap<DocumentKind, Arc<dyn DocumentExtractor>>,
}

impl ExtractorRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            extractors: HashMap::new(),
        }
    }

    /// Create a registry with the PDF and Word extractors registered.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(PdfExtractor::new());
        registry.register(WordExtractor::new());
        registry
    }

    /// Register an extractor under its document kind.
    pub fn register<E: DocumentExtractor + 'static>(&mut self, extractor: E) {
        self.extractors.insert(extractor.kind(), Arc::new(extractor));
    }

    /// Get the extractor for a document kind.
    #[must_use]
    pub fn get(&self, kind: DocumentKind) -> Option<Arc<dyn DocumentExtractor>> {
        self.extractors.get(&kind).cloned()
    }

    /// Extract the text of the document at `path`.
    ///
    /// `filename` is the caller-facing name whose extension selects the
    /// extractor; `path` is where the bytes actually live (an upload
    /// directory, typically).
    pub async fn extract(&self, path: &Path, filename: &str) -> Result<String, ExtractError> {
        let kind = DocumentKind::from_filename(filename)
            .ok_or_else(|| ExtractError::UnsupportedFormat(filename.to_string()))?;

        let extractor = self
            .get(kind)
            .ok_or_else(|| ExtractError::UnsupportedFormat(filename.to_string()))?;

        extractor.extract(path).await
    }
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
