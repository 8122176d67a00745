//! # manualqa-extract
//!
//! Text extraction from manual documents for the manualqa indexing pipeline.
//!
//! The document kind is decided from the filename extension alone, so an
//! unsupported format is rejected before any file I/O happens.
//!
//! ## Supported Formats
//!
//! | Extractor | Formats | Notes |
//! |-----------|---------|-------|
//! | [`PdfExtractor`] | `.pdf` | Page-ordered text plus a page-count trailer |
//! | [`WordExtractor`] | `.docx`, `.doc` | OOXML text runs; legacy `.doc` fails at parse |
//!
//! ## Usage
//!
//! ```rust,ignore
//! use manualqa_extract::ExtractorRegistry;
//! use std::path::Path;
//!
//! let registry = ExtractorRegistry::with_defaults();
//! let text = registry
//!     .extract(Path::new("/uploads/a1b2c3"), "handbook.pdf")
//!     .await?;
//! ```

pub mod pdf;
pub mod registry;
pub mod word;

pub use pdf::PdfExtractor;
pub use registry::ExtractorRegistry;
pub use word::WordExtractor;
