//! Integration tests for the full manualqa pipeline.
//!
//! Tests the complete flow: extract -> chunk -> embed -> index -> ask, over
//! synthesized PDF and DOCX fixtures and deterministic mock capabilities.

use async_trait::async_trait;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Object, Stream};
use manualqa::{QaService, ServiceConfig, NO_DOCUMENTS_ANSWER};
use manualqa_core::{
    ChunkConfig, EmbedError, Embedder, Error, ExtractError, GenerateError, RetryConfig,
    TextGenerator,
};
use std::collections::VecDeque;
use std::io::Write;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::tempdir;

// ==================== Mock capabilities ====================

/// Deterministic embedder: each dimension counts occurrences of one
/// vocabulary word, so texts sharing words get similar vectors.
struct KeywordEmbedder {
    vocab: Vec<&'static str>,
    calls: Mutex<u32>,
}

impl KeywordEmbedder {
    fn new() -> Self {
        Self {
            vocab: vec!["glove", "oven", "fire", "page", "canteen", "ladder"],
            calls: Mutex::new(0),
        }
    }

    fn calls(&self) -> u32 {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl Embedder for KeywordEmbedder {
    fn model_name(&self) -> &str {
        "keyword-mock"
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError> {
        *self.calls.lock().unwrap() += 1;
        let lower = text.to_lowercase();
        Ok(self
            .vocab
            .iter()
            .map(|word| lower.matches(word).count() as f32)
            .collect())
    }
}

/// Embedder fed from a queue of canned responses.
struct ScriptedEmbedder {
    responses: Mutex<VecDeque<Result<Vec<f32>, EmbedError>>>,
    calls: Mutex<u32>,
}

impl ScriptedEmbedder {
    fn new(responses: Vec<Result<Vec<f32>, EmbedError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            calls: Mutex::new(0),
        }
    }

    fn calls(&self) -> u32 {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl Embedder for ScriptedEmbedder {
    fn model_name(&self) -> &str {
        "scripted-mock"
    }

    async fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbedError> {
        *self.calls.lock().unwrap() += 1;
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(EmbedError::Empty))
    }
}

/// Generator that records prompts and returns a fixed answer.
struct RecordingGenerator {
    answer: &'static str,
    prompts: Mutex<Vec<String>>,
}

impl RecordingGenerator {
    fn new(answer: &'static str) -> Self {
        Self {
            answer,
            prompts: Mutex::new(Vec::new()),
        }
    }

    fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for RecordingGenerator {
    fn model_name(&self) -> &str {
        "recording-mock"
    }

    async fn generate(&self, prompt: &str) -> Result<String, GenerateError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.answer.to_string())
    }
}

// ==================== Fixtures ====================

/// Build a minimal single-page PDF containing the given line of text.
fn build_pdf(path: &Path, text: &str) {
    let mut doc = lopdf::Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });
    let content = Content {
        operations: vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 12.into()]),
            Operation::new("Td", vec![50.into(), 700.into()]),
            Operation::new("Tj", vec![Object::string_literal(text)]),
            Operation::new("ET", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    });
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => vec![page_id.into()],
        "Count" => 1,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.save(path).unwrap();
}

/// Build a minimal `.docx` container with one paragraph per entry.
fn build_docx(path: &Path, paragraphs: &[&str]) {
    let file = std::fs::File::create(path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default();

    let body: String = paragraphs
        .iter()
        .map(|p| format!("<w:p><w:r><w:t>{p}</w:t></w:r></w:p>"))
        .collect();
    let xml = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
         <w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">\
         <w:body>{body}</w:body></w:document>"
    );

    zip.start_file("word/document.xml", options).unwrap();
    zip.write_all(xml.as_bytes()).unwrap();
    zip.finish().unwrap();
}

/// Service config with millisecond waits so retry/pacing tests run fast.
fn fast_config(window: usize, overlap: usize) -> ServiceConfig {
    ServiceConfig {
        chunking: ChunkConfig { window, overlap },
        retry: RetryConfig {
            max_attempts: 3,
            backoff: Duration::from_millis(1),
            pacing: Duration::from_millis(1),
        },
        top_k: 5,
    }
}

async fn service_with(
    config: ServiceConfig,
    embedder: Arc<dyn Embedder>,
    generator: Arc<dyn TextGenerator>,
) -> QaService {
    let service = QaService::new(config).unwrap();
    service.initialize_with(embedder, generator).await;
    service
}

// ==================== Tests ====================

#[tokio::test]
async fn test_full_pipeline_index_and_ask() {
    let dir = tempdir().unwrap();
    let gloves = dir.path().join("gloves.docx");
    let oven = dir.path().join("oven.pdf");
    build_docx(
        &gloves,
        &["Kitchen staff must wear cut-resistant gloves when using knives."],
    );
    build_pdf(&oven, "Preheat the oven to 180 degrees before baking.");

    let embedder = Arc::new(KeywordEmbedder::new());
    let generator = Arc::new(RecordingGenerator::new("Wear cut-resistant gloves."));
    let service = service_with(
        fast_config(1000, 200),
        Arc::clone(&embedder) as Arc<dyn Embedder>,
        Arc::clone(&generator) as Arc<dyn TextGenerator>,
    )
    .await;

    assert_eq!(
        service.index_document(&gloves, "gloves.docx").await.unwrap(),
        1
    );
    assert_eq!(service.index_document(&oven, "oven.pdf").await.unwrap(), 1);

    let documents = service.list_indexed_documents().await;
    assert_eq!(documents.len(), 2);

    let answer = service
        .ask("Which gloves should I wear in the kitchen?")
        .await
        .unwrap();

    assert_eq!(answer.answer, "Wear cut-resistant gloves.");
    assert!(!answer.sources.is_empty());
    assert_eq!(answer.sources[0].filename, "gloves.docx");

    // The prompt grounds the model on the indexed chunk and the question.
    let prompts = generator.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("[Document 1: gloves.docx]"));
    assert!(prompts[0].contains("cut-resistant gloves"));
    assert!(prompts[0].contains("Question: Which gloves should I wear in the kitchen?"));
}

#[tokio::test]
async fn test_registry_reports_per_document_chunk_counts() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("a.docx");
    let b = dir.path().join("b.docx");
    // One paragraph extracts to length + 1 chars (trailing newline);
    // window 100 with no overlap gives ceil(251/100) = 3 and ceil(151/100) = 2.
    build_docx(&a, &["x".repeat(250).as_str()]);
    build_docx(&b, &["y".repeat(150).as_str()]);

    let service = service_with(
        fast_config(100, 0),
        Arc::new(KeywordEmbedder::new()),
        Arc::new(RecordingGenerator::new("ok")),
    )
    .await;

    assert_eq!(service.index_document(&a, "a.docx").await.unwrap(), 3);
    assert_eq!(service.index_document(&b, "b.docx").await.unwrap(), 2);

    let documents = service.list_indexed_documents().await;
    assert_eq!(documents.len(), 2);

    let count_of = |name: &str| {
        documents
            .iter()
            .find(|d| d.filename == name)
            .map(|d| d.chunk_count)
    };
    assert_eq!(count_of("a.docx"), Some(3));
    assert_eq!(count_of("b.docx"), Some(2));

    let total: u32 = documents.iter().map(|d| d.chunk_count).sum();
    assert_eq!(total, 5);
}

#[tokio::test]
async fn test_partial_embedding_failure_keeps_earlier_chunks() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("a.docx");
    build_docx(&a, &["x".repeat(250).as_str()]); // 3 chunks at window 100

    let embedder = Arc::new(ScriptedEmbedder::new(vec![
        Ok(vec![1.0, 0.0]),
        Ok(vec![0.0, 1.0]),
        Err(EmbedError::Api {
            status: 400,
            message: "bad request".to_string(),
        }),
    ]));
    let service = service_with(
        fast_config(100, 0),
        Arc::clone(&embedder) as Arc<dyn Embedder>,
        Arc::new(RecordingGenerator::new("ok")),
    )
    .await;

    let err = service.index_document(&a, "a.docx").await.unwrap_err();
    assert!(matches!(err, Error::Embedding(EmbedError::Api { .. })));

    // Chunks embedded before the failure stay; the rest were abandoned.
    let documents = service.list_indexed_documents().await;
    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0].chunk_count, 2);
    assert_eq!(embedder.calls(), 3, "no further chunks attempted");
}

#[tokio::test]
async fn test_rate_limited_chunk_retries_then_indexes() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("short.docx");
    build_docx(&a, &["One short paragraph."]); // single chunk

    let embedder = Arc::new(ScriptedEmbedder::new(vec![
        Err(EmbedError::RateLimited),
        Err(EmbedError::RateLimited),
        Ok(vec![1.0, 0.0]),
    ]));
    let service = service_with(
        fast_config(1000, 200),
        Arc::clone(&embedder) as Arc<dyn Embedder>,
        Arc::new(RecordingGenerator::new("ok")),
    )
    .await;

    let chunks = service.index_document(&a, "short.docx").await.unwrap();

    assert_eq!(chunks, 1);
    assert_eq!(embedder.calls(), 3, "two rate-limited attempts, then success");
    let documents = service.list_indexed_documents().await;
    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0].chunk_count, 1);
}

#[tokio::test]
async fn test_exhausted_retry_budget_surfaces_embedding_error() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("short.docx");
    build_docx(&a, &["One short paragraph."]);

    let embedder = Arc::new(ScriptedEmbedder::new(vec![
        Err(EmbedError::RateLimited),
        Err(EmbedError::RateLimited),
        Err(EmbedError::RateLimited),
    ]));
    let service = service_with(
        fast_config(1000, 200),
        Arc::clone(&embedder) as Arc<dyn Embedder>,
        Arc::new(RecordingGenerator::new("ok")),
    )
    .await;

    let err = service.index_document(&a, "short.docx").await.unwrap_err();

    assert!(matches!(
        err,
        Error::Embedding(EmbedError::RetriesExhausted { attempts: 3 })
    ));
    assert!(service.list_indexed_documents().await.is_empty());
}

#[tokio::test]
async fn test_remove_document_is_idempotent() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("a.docx");
    build_docx(&a, &["Ladder safety: always keep three points of contact."]);

    let service = service_with(
        fast_config(1000, 200),
        Arc::new(KeywordEmbedder::new()),
        Arc::new(RecordingGenerator::new("ok")),
    )
    .await;

    service.index_document(&a, "a.docx").await.unwrap();
    assert_eq!(service.list_indexed_documents().await.len(), 1);

    assert_eq!(service.remove_document("a.docx").await, 1);
    assert!(service
        .list_indexed_documents()
        .await
        .iter()
        .all(|d| d.filename != "a.docx"));

    // Second removal is a no-op, not an error.
    assert_eq!(service.remove_document("a.docx").await, 0);
}

#[tokio::test]
async fn test_ask_on_empty_index_returns_fixed_answer() {
    let embedder = Arc::new(KeywordEmbedder::new());
    let generator = Arc::new(RecordingGenerator::new("should never be used"));
    let service = service_with(
        fast_config(1000, 200),
        Arc::clone(&embedder) as Arc<dyn Embedder>,
        Arc::clone(&generator) as Arc<dyn TextGenerator>,
    )
    .await;

    let answer = service.ask("Where do I park?").await.unwrap();

    assert_eq!(answer.answer, NO_DOCUMENTS_ANSWER);
    assert!(answer.sources.is_empty());
    assert_eq!(embedder.calls(), 0);
    assert!(generator.prompts().is_empty());
}

#[tokio::test]
async fn test_unsupported_extension_rejected_before_io() {
    let service = service_with(
        fast_config(1000, 200),
        Arc::new(KeywordEmbedder::new()),
        Arc::new(RecordingGenerator::new("ok")),
    )
    .await;

    // The path does not exist; the extension check must fire first.
    let err = service
        .index_document(Path::new("/nonexistent/notes.txt"), "notes.txt")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Extraction(ExtractError::UnsupportedFormat(_))
    ));
    assert!(service.list_indexed_documents().await.is_empty());
}

#[tokio::test]
async fn test_corrupt_pdf_rejected_whole() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.pdf");
    std::fs::write(&path, b"definitely not a pdf").unwrap();

    let embedder = Arc::new(KeywordEmbedder::new());
    let service = service_with(
        fast_config(1000, 200),
        Arc::clone(&embedder) as Arc<dyn Embedder>,
        Arc::new(RecordingGenerator::new("ok")),
    )
    .await;

    let err = service
        .index_document(&path, "broken.pdf")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Extraction(ExtractError::Parse { .. })
    ));
    assert!(service.list_indexed_documents().await.is_empty());
    assert_eq!(embedder.calls(), 0, "nothing was embedded");
}

#[tokio::test]
async fn test_empty_document_indexes_zero_chunks() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("empty.docx");
    build_docx(&path, &[]);

    let service = service_with(
        fast_config(1000, 200),
        Arc::new(KeywordEmbedder::new()),
        Arc::new(RecordingGenerator::new("ok")),
    )
    .await;

    let chunks = service.index_document(&path, "empty.docx").await.unwrap();

    assert_eq!(chunks, 0);
    assert!(service.list_indexed_documents().await.is_empty());
}

#[tokio::test]
async fn test_pdf_page_count_is_retrievable_text() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("handbook.pdf");
    build_pdf(&path, "Fire drill procedures are described on this page.");

    let generator = Arc::new(RecordingGenerator::new("One page."));
    let service = service_with(
        fast_config(1000, 200),
        Arc::new(KeywordEmbedder::new()),
        Arc::clone(&generator) as Arc<dyn TextGenerator>,
    )
    .await;

    service.index_document(&path, "handbook.pdf").await.unwrap();

    let answer = service
        .ask("How many pages does the fire handbook have?")
        .await
        .unwrap();

    assert_eq!(answer.answer, "One page.");
    // The page-count trailer was indexed as ordinary text and reaches the
    // grounding context.
    let prompts = generator.prompts();
    assert!(prompts[0].contains("[This document contains 1 pages.]"));
}
