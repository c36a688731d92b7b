//! # epitome
//!
//! Condenses a long-form PDF book into a target-length narrative summary,
//! using retrieval-augmented context so each section's summary stays coherent
//! with the rest of the book.
//!
//! ## Pipeline
//!
//! - **Extraction** (`extract`): PDF → ordered, cleaned per-page text
//! - **Segmentation** (`segment`): pages → titled sections via a prioritized
//!   heading-pattern table
//! - **Indexing** (`index`): sections → embeddings → exact kNN index
//! - **Retrieval** (`retrieve`): best-effort top-k context from other sections
//! - **Budgeting** (`budget`): even word-count split across sections
//! - **Summarization** (`summarize`): serial per-section driver with failure
//!   containment at the section boundary
//! - **Writing** (`write`): plain-text and paginated-PDF output
//!
//! ## Library usage
//!
//! ```no_run
//! use epitome::config::RunConfig;
//! use epitome::embed::OllamaEmbedder;
//! use epitome::extract::PdfPageExtractor;
//! use epitome::llm::OllamaClient;
//! use epitome::pipeline;
//!
//! let config = RunConfig::default();
//! let extractor = PdfPageExtractor::new();
//! let embedder = OllamaEmbedder::new(config.embedding.clone());
//! let completion = OllamaClient::new(config.completion.clone());
//! let input = std::path::Path::new("book.pdf");
//! let report = pipeline::run(&extractor, &embedder, &completion, input, &config).unwrap();
//! println!("{} sections, {} words", report.section_count, report.total_words);
//! ```

pub mod budget;
pub mod config;
pub mod embed;
pub mod error;
pub mod extract;
pub mod index;
pub mod llm;
pub mod pipeline;
pub mod prompt;
pub mod retrieve;
pub mod segment;
pub mod summarize;
pub mod text;
pub mod write;
