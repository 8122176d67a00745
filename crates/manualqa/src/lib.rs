//! # manualqa
//!
//! Document indexing and retrieval-augmented Q&A for manual libraries.
//!
//! This crate wires the pipeline crates together behind [`QaService`], the
//! surface the hosting application (a web layer, the bundled CLI) talks to:
//!
//! - `initialize(api_key)` - set up the embedding and generation clients
//! - `index_document(path, filename)` - extract, chunk, embed, and store a manual
//! - `ask(question)` - retrieve the most relevant chunks and compose a cited answer
//! - `list_indexed_documents()` / `remove_document(filename)` / `clear()`
//!
//! The index is in-memory and volatile: it lives for the lifetime of the
//! service instance and starts empty on every boot.

pub mod config;
pub mod service;

pub use config::Config;
pub use service::{QaService, ServiceConfig, NO_DOCUMENTS_ANSWER};
