//! # manualqa-gemini
//!
//! Google Gemini API clients for the manualqa pipeline, plus the
//! rate-limit-aware adapter the rest of the system talks to.
//!
//! ## Components
//!
//! | Type | Description |
//! |------|-------------|
//! | [`GeminiEmbedder`] | `models/{model}:embedContent` client implementing [`Embedder`](manualqa_core::Embedder) |
//! | [`GeminiGenerator`] | `models/{model}:generateContent` client implementing [`TextGenerator`](manualqa_core::TextGenerator) |
//! | [`EmbeddingClient`] | Retry/backoff/pacing adapter over any `Embedder` |
//! | [`Sleeper`] | Injectable wait abstraction so the retry policy tests without wall-clock delays |
//!
//! ## Usage
//!
//! ```rust,ignore
//! use manualqa_core::RetryConfig;
//! use manualqa_gemini::{EmbeddingClient, GeminiEmbedder};
//! use std::sync::Arc;
//!
//! let embedder = Arc::new(GeminiEmbedder::new(api_key));
//! let client = EmbeddingClient::new(embedder, RetryConfig::default());
//!
//! // Same call contract for bulk indexing and single queries.
//! let vector = client.embed("how do I reset my password?").await?;
//! ```

pub mod client;
pub mod gemini;
pub mod sleep;

pub use client::EmbeddingClient;
pub use gemini::{GeminiEmbedder, GeminiGenerator};
pub use sleep::{Sleeper, TokioSleeper};
