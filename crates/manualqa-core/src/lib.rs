//! # manualqa-core
//!
//! Core types and traits for the manualqa document Q&A engine.
//!
//! This crate provides the foundational abstractions shared by the pipeline
//! crates:
//!
//! - **Document extraction**: [`DocumentExtractor`] turns a PDF or Word file
//!   into plain text
//! - **Embedding**: [`Embedder`] converts text into a fixed-length vector via
//!   an external capability
//! - **Generation**: [`TextGenerator`] produces answer text from a prompt
//!
//! ## Architecture
//!
//! The crates are organized around a pipeline:
//!
//! ```text
//! File -> DocumentExtractor -> chunking -> Embedder -> vector index
//!                                                          |
//!                                   question -> Embedder -> search -> TextGenerator
//! ```
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Chunk`] | A slice of document text with its embedding and provenance |
//! | [`SearchResult`] | A matching chunk with its similarity score |
//! | [`DocumentEntry`] | A `(filename, chunk count)` registry row |
//! | [`Answer`] | Generated answer text with ordered source references |
//! | [`ChunkConfig`] | Window/overlap parameters for chunking |
//! | [`RetryConfig`] | Retry, backoff, and pacing policy for embedding calls |

pub mod error;
pub mod traits;
pub mod types;

pub use error::{ChunkError, EmbedError, Error, ExtractError, GenerateError, Result, StoreError};
pub use traits::*;
pub use types::*;
