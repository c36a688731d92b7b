//! End-to-end pipeline tests over stub collaborators.

use std::path::Path;

use epitome::config::RunConfig;
use epitome::embed::EmbeddingProvider;
use epitome::error::{CompletionError, EmbedError, EpitomeError, ExtractError};
use epitome::extract::PageExtractor;
use epitome::llm::CompletionProvider;
use epitome::pipeline;

/// Serves canned page texts instead of reading a PDF.
struct CannedPages(Vec<String>);

impl PageExtractor for CannedPages {
    fn extract(&self, _path: &Path) -> Result<Vec<String>, ExtractError> {
        if self.0.is_empty() {
            return Err(ExtractError::NoPages {
                path: "canned".into(),
            });
        }
        Ok(self.0.clone())
    }
}

/// Deterministic embedding: character count and word count.
struct StubEmbedder;

impl EmbeddingProvider for StubEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError> {
        Ok(vec![
            text.chars().count() as f32,
            text.split_whitespace().count() as f32,
        ])
    }
}

/// Echoes a recognizable summary derived from the prompt.
struct EchoCompletion;

impl CompletionProvider for EchoCompletion {
    fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        let title_line = prompt
            .lines()
            .find(|l| l.starts_with("Section Title: "))
            .unwrap_or("Section Title: ?");
        Ok(format!("Summary of {}", &title_line["Section Title: ".len()..]))
    }
}

/// Always fails, as if the completion server were down past all retries.
struct DownCompletion;

impl CompletionProvider for DownCompletion {
    fn complete(&self, _prompt: &str) -> Result<String, CompletionError> {
        Err(CompletionError::RetriesExhausted {
            attempts: 3,
            message: "connection refused".into(),
        })
    }
}

fn book_pages() -> Vec<String> {
    vec![
        "PROLOGUE In the beginning there were stories.".into(),
        "body text A about the early networks.".into(),
        "CHAPTER 1. The first information network.".into(),
        "body text B about documents and errors.".into(),
    ]
}

fn test_config(dir: &Path) -> RunConfig {
    RunConfig {
        target_total_words: 1000,
        top_k: 2,
        output_dir: dir.to_path_buf(),
        book_title: Some("Test Book".into()),
        ..Default::default()
    }
}

#[test]
fn full_run_writes_both_documents() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());

    let report = pipeline::run(
        &CannedPages(book_pages()),
        &StubEmbedder,
        &EchoCompletion,
        Path::new("book.pdf"),
        &config,
    )
    .unwrap();

    assert_eq!(report.section_count, 2);
    assert_eq!(report.failed_count, 0);
    assert!(report.total_words > 0);

    let txt = std::fs::read_to_string(&report.txt_path).unwrap();
    assert!(txt.contains("# Prologue\nSummary of Prologue"));
    assert!(txt.contains("# Chapter 1.\nSummary of Chapter 1."));

    let pdf = std::fs::read(&report.pdf_path).unwrap();
    assert!(pdf.starts_with(b"%PDF"));
}

#[test]
fn completion_outage_still_produces_complete_document() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());

    let report = pipeline::run(
        &CannedPages(book_pages()),
        &StubEmbedder,
        &DownCompletion,
        Path::new("book.pdf"),
        &config,
    )
    .unwrap();

    // One entry per section, every one a visible placeholder.
    assert_eq!(report.section_count, 2);
    assert_eq!(report.failed_count, 2);
    assert_eq!(report.total_words, 0);

    let txt = std::fs::read_to_string(&report.txt_path).unwrap();
    assert!(txt.contains("# Prologue"));
    assert!(txt.contains("# Chapter 1."));
    assert!(txt.contains("connection refused"));
}

#[test]
fn empty_extraction_aborts_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());

    let result = pipeline::run(
        &CannedPages(Vec::new()),
        &StubEmbedder,
        &EchoCompletion,
        Path::new("book.pdf"),
        &config,
    );
    assert!(matches!(result, Err(EpitomeError::Extract(_))));
}

#[test]
fn blank_only_pages_abort_at_index_build() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());

    // Pages survive extraction but segmentation drops them all, so the
    // index build fails before any summarization happens.
    let result = pipeline::run(
        &CannedPages(vec!["   ".into(), "\t".into()]),
        &StubEmbedder,
        &EchoCompletion,
        Path::new("book.pdf"),
        &config,
    );
    assert!(matches!(result, Err(EpitomeError::Index(_))));
}
