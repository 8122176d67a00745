//! Grounded answer composition.

use manualqa_core::{Answer, Error, SearchResult, SourceRef, TextGenerator};
use std::sync::Arc;
use tracing::debug;

/// Delimiter between context chunks in the prompt, distinct enough for the
/// model to treat each chunk as a separate document extract.
const CHUNK_DELIMITER: &str = "\n\n---\n\n";

/// Composes a cited answer from retrieved chunks.
pub struct AnswerComposer {
    generator: Arc<dyn TextGenerator>,
}

impl AnswerComposer {
    /// Create a composer over a generation capability.
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Build the grounding prompt, invoke the generator once, and return its
    /// text verbatim with `(filename, chunk_index)` sources in retrieval
    /// order.
    ///
    /// A generation failure is surfaced as-is; no fallback answer is
    /// fabricated.
    pub async fn compose(
        &self,
        question: &str,
        chunks: &[SearchResult],
    ) -> Result<Answer, Error> {
        let prompt = build_prompt(question, chunks);
        debug!(
            "Composing answer from {} chunks ({} prompt chars)",
            chunks.len(),
            prompt.len()
        );

        let answer = self.generator.generate(&prompt).await?;

        let sources = chunks
            .iter()
            .map(|chunk| SourceRef {
                filename: chunk.source_filename.clone(),
                chunk_index: chunk.chunk_index,
            })
            .collect();

        Ok(Answer { answer, sources })
    }
}

/// Assemble the grounding prompt: instruction, labeled context chunks,
/// then the literal question.
fn build_prompt(question: &str, chunks: &[SearchResult]) -> String {
    let context = chunks
        .iter()
        .enumerate()
        .map(|(idx, chunk)| {
            format!(
                "[Document {}: {}]\n{}",
                idx + 1,
                chunk.source_filename,
                chunk.text
            )
        })
        .collect::<Vec<_>>()
        .join(CHUNK_DELIMITER);

    format!(
        "You are an assistant that answers questions based on manual documents.\n\
         \n\
         Here is the relevant document content:\n\
         \n\
         {context}\n\
         \n\
         ---\n\
         \n\
         Answer the following question based on the document content above. \
         Use only information found in the documents; do not guess at anything \
         they do not cover.\n\
         \n\
         Question: {question}\n\
         \n\
         Answer:"
    )
}
