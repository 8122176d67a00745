//! Question retrieval.

use manualqa_core::{Embedder, Error, SearchResult};
use manualqa_store::MemoryIndex;
use std::sync::Arc;
use tracing::debug;

/// Retrieves the chunks most relevant to a question.
pub struct Retriever {
    index: Arc<MemoryIndex>,
    embedder: Arc<dyn Embedder>,
    top_k: usize,
}

impl Retriever {
    /// Create a retriever returning at most `top_k` chunks per question.
    pub fn new(index: Arc<MemoryIndex>, embedder: Arc<dyn Embedder>, top_k: usize) -> Self {
        Self {
            index,
            embedder,
            top_k,
        }
    }

    /// Embed `question` and return the most similar indexed chunks.
    ///
    /// An empty index short-circuits to an empty result without calling the
    /// embedding capability: "nothing indexed yet" is not worth a network
    /// round trip and is distinct from "no good matches".
    pub async fn retrieve(&self, question: &str) -> Result<Vec<SearchResult>, Error> {
        if self.index.is_empty().await {
            debug!("Index is empty, skipping question embedding");
            return Ok(Vec::new());
        }

        let query = self.embedder.embed(question).await?;
        let results = self.index.search(&query, self.top_k).await;

        debug!("Retrieved {} chunks for question", results.len());
        Ok(results)
    }
}
