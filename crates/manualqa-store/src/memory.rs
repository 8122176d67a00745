//! In-memory chunk index with brute-force cosine search.

use manualqa_core::{Chunk, DocumentEntry, SearchResult, StoreError};
use tokio::sync::RwLock;
use tracing::debug;

/// In-memory vector index.
///
/// Chunks are kept in insertion order in a `Vec` behind an async `RwLock`,
/// so concurrent appends and searches interleave safely. Search is exact
/// brute force, O(n * d) per query, which is the right trade at the corpus
/// sizes this serves (tens to low hundreds of chunks per document).
///
/// The embedding dimension is fixed by the first appended chunk; appending a
/// chunk with a different dimension is rejected.
///
/// # Example
///
/// ```rust,ignore
/// use manualqa_store::MemoryIndex;
///
/// let index = MemoryIndex::new();
/// index.append(chunk).await?;
/// let hits = index.search(&query_vector, 5).await;
/// ```
pub struct MemoryIndex {
    chunks: RwLock<Vec<Chunk>>,
}

impl MemoryIndex {
    /// Create a new empty index.
    #[must_use]
    pub fn new() -> Self {
        Self {
            chunks: RwLock::new(Vec::new()),
        }
    }

    /// Append a chunk unconditionally (no deduplication).
    ///
    /// Fails only if the chunk's embedding length differs from the
    /// dimension established by the first appended chunk.
    pub async fn append(&self, chunk: Chunk) -> Result<(), StoreError> {
        let mut chunks = self.chunks.write().await;

        if let Some(first) = chunks.first() {
            if first.embedding.len() != chunk.embedding.len() {
                return Err(StoreError::DimensionMismatch {
                    expected: first.embedding.len(),
                    actual: chunk.embedding.len(),
                });
            }
        }

        chunks.push(chunk);
        Ok(())
    }

    /// Return the `k` chunks most similar to `query`, best first.
    ///
    /// Results are sorted by descending cosine similarity; equal scores keep
    /// insertion order (the sort is stable). At most `min(k, len)` results
    /// are returned.
    pub async fn search(&self, query: &[f32], k: usize) -> Vec<SearchResult> {
        let chunks = self.chunks.read().await;

        let mut scored: Vec<(f32, &Chunk)> = chunks
            .iter()
            .map(|chunk| (cosine_similarity(query, &chunk.embedding), chunk))
            .collect();

        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

        scored
            .into_iter()
            .take(k)
            .map(|(score, chunk)| SearchResult {
                text: chunk.text.clone(),
                source_filename: chunk.source_filename.clone(),
                chunk_index: chunk.chunk_index,
                score,
            })
            .collect()
    }

    /// Delete every chunk whose source filename equals `filename`.
    ///
    /// Returns the number of chunks removed; removing an unknown filename is
    /// a no-op returning 0.
    pub async fn remove_by_source(&self, filename: &str) -> u64 {
        let mut chunks = self.chunks.write().await;
        let before = chunks.len();
        chunks.retain(|chunk| chunk.source_filename != filename);
        let removed = (before - chunks.len()) as u64;
        debug!("Removed {} chunks for {}", removed, filename);
        removed
    }

    /// Empty the index.
    pub async fn clear(&self) {
        let mut chunks = self.chunks.write().await;
        chunks.clear();
        debug!("Index cleared");
    }

    /// Number of chunks currently stored.
    pub async fn len(&self) -> usize {
        self.chunks.read().await.len()
    }

    /// Whether the index holds no chunks.
    pub async fn is_empty(&self) -> bool {
        self.chunks.read().await.is_empty()
    }

    /// Derived registry view: filenames with their chunk counts, in
    /// first-indexed order.
    pub async fn documents(&self) -> Vec<DocumentEntry> {
        let chunks = self.chunks.read().await;

        let mut entries: Vec<DocumentEntry> = Vec::new();
        for chunk in chunks.iter() {
            match entries
                .iter_mut()
                .find(|e| e.filename == chunk.source_filename)
            {
                Some(entry) => entry.chunk_count += 1,
                None => entries.push(DocumentEntry {
                    filename: chunk.source_filename.clone(),
                    chunk_count: 1,
                }),
            }
        }

        entries
    }
}

impl Default for MemoryIndex {
    fn default() -> Self {
        Self::new()
    }
}

/// Compute cosine similarity between two vectors.
///
/// Mismatched lengths or a zero-magnitude vector score 0 rather than NaN; a
/// degenerate vector must never outrank a genuine match.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}
