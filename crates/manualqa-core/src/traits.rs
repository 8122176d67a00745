//! Core traits for manualqa components.
//!
//! These traits sit at the seams to external capabilities:
//!
//! - [`DocumentExtractor`]: turn a source file into plain text
//! - [`Embedder`]: compute an embedding vector for a piece of text
//! - [`TextGenerator`]: generate answer text from a prompt
//!
//! The embedding and generation traits are implemented by remote API
//! clients in production and by deterministic mocks in tests.

use async_trait::async_trait;
use std::path::Path;

use crate::error::{EmbedError, ExtractError, GenerateError};
use crate::types::DocumentKind;

/// Trait for extracting plain text from a source document.
#[async_trait]
pub trait DocumentExtractor: Send + Sync {
    /// The document kind this extractor handles.
    fn kind(&self) -> DocumentKind;

    /// Extract the document's full text, discarding formatting.
    async fn extract(&self, path: &Path) -> Result<String, ExtractError>;
}

/// Trait for computing text embeddings.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Model name/identifier.
    fn model_name(&self) -> &str;

    /// Compute an embedding vector for the given text.
    ///
    /// The vector length is fixed by the capability and identical for every
    /// call against the same model.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError>;
}

/// Trait for generating answer text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Model name/identifier.
    fn model_name(&self) -> &str;

    /// Generate text from a prompt, returned verbatim.
    async fn generate(&self, prompt: &str) -> Result<String, GenerateError>;
}
