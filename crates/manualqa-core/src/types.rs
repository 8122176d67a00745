//! Core types for manualqa.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

// ============================================================================
// Documents
// ============================================================================

/// Supported source document formats, determined by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    /// A PDF document (`.pdf`)
    Pdf,
    /// A Word document (`.docx` or legacy `.doc`)
    Word,
}

impl DocumentKind {
    /// Determine the document kind from a filename extension.
    ///
    /// Returns `None` for anything other than `.pdf`, `.docx`, or `.doc`,
    /// so unsupported formats can be rejected before any I/O happens.
    #[must_use]
    pub fn from_filename(filename: &str) -> Option<Self> {
        let ext = Path::new(filename).extension()?.to_str()?;
        if ext.eq_ignore_ascii_case("pdf") {
            Some(Self::Pdf)
        } else if ext.eq_ignore_ascii_case("docx") || ext.eq_ignore_ascii_case("doc") {
            Some(Self::Word)
        } else {
            None
        }
    }
}

// ============================================================================
// Chunks
// ============================================================================

/// A slice of a source document's text together with its embedding and
/// provenance metadata. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    /// The chunk text
    pub text: String,
    /// Embedding vector; length is constant across an index instance
    pub embedding: Vec<f32>,
    /// Filename of the originating document (not unique across chunks)
    pub source_filename: String,
    /// Zero-based position within the document's chunk sequence
    pub chunk_index: u32,
    /// Number of chunks produced from the same document
    pub total_chunks: u32,
}

/// Configuration for the fixed-window chunker.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ChunkConfig {
    /// Window size in characters
    pub window: usize,
    /// Overlap between consecutive windows in characters
    pub overlap: usize,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            window: 1000,
            overlap: 200,
        }
    }
}

// ============================================================================
// Embedding policy
// ============================================================================

/// Retry, backoff, and pacing policy for embedding requests.
///
/// The defaults match the quota behavior of the Gemini free tier; they are
/// provider-specific and expected to be tuned through configuration.
#[derive(Debug, Clone, Copy)]
pub struct RetryConfig {
    /// Attempts per request before a rate-limited call is abandoned
    pub max_attempts: u32,
    /// Wait after a rate-limit response before retrying
    pub backoff: Duration,
    /// Minimum spacing between consecutive successful requests
    pub pacing: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: Duration::from_secs(45),
            pacing: Duration::from_secs(1),
        }
    }
}

// ============================================================================
// Search
// ============================================================================

/// A chunk matched by a similarity search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// The matched chunk's text
    pub text: String,
    /// Filename of the originating document
    pub source_filename: String,
    /// Position of the chunk within its document
    pub chunk_index: u32,
    /// Cosine similarity to the query vector
    pub score: f32,
}

// ============================================================================
// Registry & answers
// ============================================================================

/// A row of the derived document registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentEntry {
    /// Source document filename
    pub filename: String,
    /// Number of chunks the document contributed to the index
    pub chunk_count: u32,
}

/// Reference to the chunk an answer was grounded on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRef {
    /// Source document filename
    pub filename: String,
    /// Position of the chunk within its document
    pub chunk_index: u32,
}

/// A generated answer together with its grounding sources.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Answer {
    /// The answer text, verbatim from the generation capability
    pub answer: String,
    /// Chunks the answer was grounded on, in retrieval order
    pub sources: Vec<SourceRef>,
}
