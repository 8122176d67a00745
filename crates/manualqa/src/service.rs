//! The Q&A service facade.

use manualqa_chunker::WindowChunker;
use manualqa_core::{
    Answer, Chunk, ChunkConfig, DocumentEntry, Embedder, Error, Result, RetryConfig,
    TextGenerator,
};
use manualqa_extract::ExtractorRegistry;
use manualqa_gemini::{EmbeddingClient, GeminiEmbedder, GeminiGenerator};
use manualqa_query::{AnswerComposer, Retriever};
use manualqa_store::MemoryIndex;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

/// Reply for questions asked before any manual has been indexed.
pub const NO_DOCUMENTS_ANSWER: &str =
    "No manuals have been indexed yet. Please upload a manual first.";

/// Tunables for a [`QaService`] instance.
#[derive(Debug, Clone, Copy)]
pub struct ServiceConfig {
    /// Chunk window/overlap parameters
    pub chunking: ChunkConfig,
    /// Embedding retry/backoff/pacing policy
    pub retry: RetryConfig,
    /// Number of chunks retrieved per question
    pub top_k: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            chunking: ChunkConfig::default(),
            retry: RetryConfig::default(),
            top_k: 5,
        }
    }
}

/// The embedding and generation handles installed by `initialize`.
struct Capabilities {
    embedder: Arc<dyn Embedder>,
    retriever: Retriever,
    composer: AnswerComposer,
}

/// Document indexing and question answering over an in-memory vector index.
///
/// The service owns one index for its lifetime. Indexing and asking may be
/// invoked concurrently; the index interleaves appends and searches safely.
/// There is no cancellation: an in-flight embedding retry loop runs to
/// completion even if the caller has given up, and may append chunks after a
/// caller-side timeout.
pub struct QaService {
    index: Arc<MemoryIndex>,
    extractors: ExtractorRegistry,
    chunker: WindowChunker,
    config: ServiceConfig,
    capabilities: RwLock<Option<Arc<Capabilities>>>,
}

impl std::fmt::Debug for QaService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QaService")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl QaService {
    /// Create an uninitialized service.
    ///
    /// Fails if the chunking configuration is invalid (`overlap >= window`),
    /// so a misconfiguration surfaces at startup rather than on the first
    /// indexing call.
    pub fn new(config: ServiceConfig) -> Result<Self> {
        let chunker = WindowChunker::new(config.chunking)?;

        Ok(Self {
            index: Arc::new(MemoryIndex::new()),
            extractors: ExtractorRegistry::with_defaults(),
            chunker,
            config,
            capabilities: RwLock::new(None),
        })
    }

    /// Set up the Gemini embedding and generation clients.
    ///
    /// Idempotent: calling again replaces the clients; operations already in
    /// flight keep the handles they captured.
    pub async fn initialize(&self, api_key: &str) {
        self.initialize_with(
            Arc::new(GeminiEmbedder::new(api_key)),
            Arc::new(GeminiGenerator::new(api_key)),
        )
        .await;
    }

    /// Install explicit capabilities (alternative providers, test doubles).
    ///
    /// The embedder is wrapped with the service's retry/backoff/pacing
    /// policy, so every embedding call goes through the same adapter
    /// regardless of provider.
    pub async fn initialize_with(
        &self,
        embedder: Arc<dyn Embedder>,
        generator: Arc<dyn TextGenerator>,
    ) {
        let embedder: Arc<dyn Embedder> =
            Arc::new(EmbeddingClient::new(embedder, self.config.retry));

        let capabilities = Capabilities {
            embedder: Arc::clone(&embedder),
            retriever: Retriever::new(Arc::clone(&self.index), embedder, self.config.top_k),
            composer: AnswerComposer::new(generator),
        };

        let mut slot = self.capabilities.write().await;
        *slot = Some(Arc::new(capabilities));
        info!("Q&A service initialized");
    }

    /// Whether `initialize` has been called.
    pub async fn is_initialized(&self) -> bool {
        self.capabilities.read().await.is_some()
    }

    async fn capabilities(&self) -> Result<Arc<Capabilities>> {
        self.capabilities
            .read()
            .await
            .clone()
            .ok_or(Error::NotInitialized)
    }

    /// Index one document: extract its text, chunk it, embed every chunk,
    /// and append the chunks to the index.
    ///
    /// Returns the number of chunks the document contributed. An embedding
    /// failure partway through leaves the already-appended chunks in place
    /// and aborts the rest of the document; the error is surfaced to the
    /// caller and there is no rollback.
    pub async fn index_document(&self, path: &Path, filename: &str) -> Result<u32> {
        let caps = self.capabilities().await?;

        let text = self.extractors.extract(path, filename).await?;
        let pieces = self.chunker.chunk(&text);
        let total = pieces.len() as u32;
        info!("{}: split into {} chunks", filename, total);

        for (i, piece) in pieces.into_iter().enumerate() {
            let embedding = match caps.embedder.embed(&piece).await {
                Ok(embedding) => embedding,
                Err(e) => {
                    warn!(
                        "{}: aborting at chunk {}/{}: {}",
                        filename, i, total, e
                    );
                    return Err(e.into());
                }
            };

            self.index
                .append(Chunk {
                    text: piece,
                    embedding,
                    source_filename: filename.to_string(),
                    chunk_index: i as u32,
                    total_chunks: total,
                })
                .await?;
        }

        info!(
            "{} indexed: {} chunks now in the index",
            filename,
            self.index.len().await
        );
        Ok(total)
    }

    /// Answer a question grounded on the indexed manuals.
    ///
    /// With an empty index this returns a fixed informational answer with no
    /// sources (an expected state, not an error) and invokes neither the
    /// embedding nor the generation capability.
    pub async fn ask(&self, question: &str) -> Result<Answer> {
        let caps = self.capabilities().await?;

        if self.index.is_empty().await {
            return Ok(Answer {
                answer: NO_DOCUMENTS_ANSWER.to_string(),
                sources: Vec::new(),
            });
        }

        let chunks = caps.retriever.retrieve(question).await?;
        caps.composer.compose(question, &chunks).await
    }

    /// The documents currently represented in the index, with chunk counts.
    pub async fn list_indexed_documents(&self) -> Vec<DocumentEntry> {
        self.index.documents().await
    }

    /// Remove every chunk of `filename` from the index.
    ///
    /// Always succeeds; a filename that was never indexed is a no-op.
    /// Returns the number of chunks removed.
    pub async fn remove_document(&self, filename: &str) -> u64 {
        self.index.remove_by_source(filename).await
    }

    /// Empty the index.
    pub async fn clear(&self) {
        self.index.clear().await;
    }
}
