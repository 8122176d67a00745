//! Error types for manualqa.

use thiserror::Error;

/// Main error type for manualqa operations.
#[derive(Error, Debug)]
pub enum Error {
    /// The service was used before `initialize` was called
    #[error("service not initialized: call initialize with an API key first")]
    NotInitialized,

    /// Document extraction failed
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractError),

    /// Chunking configuration was invalid
    #[error("chunking error: {0}")]
    Chunking(#[from] ChunkError),

    /// Embedding generation failed
    #[error("embedding error: {0}")]
    Embedding(#[from] EmbedError),

    /// Answer generation failed
    #[error("generation error: {0}")]
    Generation(#[from] GenerateError),

    /// Vector index operation failed
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Document extraction errors.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// Raised from the filename alone, before any file I/O is attempted.
    #[error("unsupported document format: {0}")]
    UnsupportedFormat(String),

    #[error("failed to process document {file}: {reason}")]
    Parse { file: String, reason: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Chunking errors.
#[derive(Error, Debug)]
pub enum ChunkError {
    #[error("invalid chunking configuration: {0}")]
    InvalidConfig(String),
}

/// Embedding errors.
#[derive(Error, Debug)]
pub enum EmbedError {
    /// The capability reported its quota exceeded. Consumed internally by
    /// the retry loop; callers only see it if they bypass the adapter.
    #[error("embedding request was rate limited")]
    RateLimited,

    /// The retry budget was exhausted on rate-limit responses.
    #[error("embedding abandoned after {attempts} rate-limited attempts")]
    RetriesExhausted { attempts: u32 },

    /// The capability returned a non-rate-limit API error. Not retried.
    #[error("embedding API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The request never reached the capability.
    #[error("embedding transport error: {0}")]
    Http(String),

    /// The capability responded without a usable vector.
    #[error("embedding response contained no vector")]
    Empty,
}

/// Answer generation errors.
#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("generation API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("generation transport error: {0}")]
    Http(String),

    #[error("generation response contained no text")]
    Empty,
}

/// Vector index errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A chunk's embedding length differed from the index's dimension.
    #[error("embedding dimension mismatch: index holds {expected}, chunk has {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

/// Result type alias for manualqa operations.
pub type Result<T> = std::result::Result<T, Error>;
