//! End-to-end orchestration: PDF → pages → sections → index → summaries →
//! written documents.
//!
//! Collaborators (page extractor, embedding provider, completion provider)
//! are injected so the whole pipeline runs against stubs in tests. Setup
//! stages (extraction, segmentation, index build) are fatal on error;
//! per-section summarization is contained and never aborts the run.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::budget::allocate;
use crate::config::RunConfig;
use crate::embed::EmbeddingProvider;
use crate::error::{EpitomeError, WriteError};
use crate::extract::PageExtractor;
use crate::index::SectionIndex;
use crate::llm::CompletionProvider;
use crate::segment::segment;
use crate::summarize::summarize_sections;
use crate::write::{write_pdf, write_text};

/// What one run produced.
#[derive(Debug)]
pub struct RunReport {
    /// Sections that survived segmentation (and were each summarized).
    pub section_count: usize,
    /// Sections whose summary is an error placeholder.
    pub failed_count: usize,
    /// Total words across all successful summaries.
    pub total_words: usize,
    /// Path of the plain-text summary.
    pub txt_path: PathBuf,
    /// Path of the paginated PDF summary.
    pub pdf_path: PathBuf,
}

/// Run the full pipeline over one input document.
pub fn run(
    extractor: &dyn PageExtractor,
    embedder: &dyn EmbeddingProvider,
    completion: &dyn CompletionProvider,
    input: &Path,
    config: &RunConfig,
) -> Result<RunReport, EpitomeError> {
    info!(input = %input.display(), "loading book");
    let pages = extractor.extract(input)?;
    info!(pages = pages.len(), "pages extracted");

    let sections = segment(&pages);

    info!("building similarity index");
    let index = SectionIndex::build(sections, embedder)?;

    let targets = allocate(config.target_total_words, index.len());
    info!(
        sections = index.len(),
        target_total = config.target_total_words,
        "summarizing sections"
    );

    let book_title = config
        .book_title
        .clone()
        .or_else(|| input.file_stem().map(|s| s.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "Untitled".into());

    let units = summarize_sections(
        &index,
        embedder,
        completion,
        &book_title,
        &targets,
        config.top_k,
    );

    std::fs::create_dir_all(&config.output_dir).map_err(|source| WriteError::Io {
        path: config.output_dir.display().to_string(),
        source,
    })?;
    let txt_path = config.output_dir.join("final_summary.txt");
    let pdf_path = config.output_dir.join("final_summary.pdf");
    write_text(&units, &txt_path)?;
    write_pdf(&units, &pdf_path, &book_title)?;

    Ok(RunReport {
        section_count: units.len(),
        failed_count: units.iter().filter(|u| u.is_error).count(),
        total_words: units.iter().map(|u| u.word_count).sum(),
        txt_path,
        pdf_path,
    })
}
