//! Run configuration: defaults, optional TOML file, CLI overrides.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::embed::EmbeddingConfig;
use crate::error::ConfigError;
use crate::llm::CompletionConfig;

/// Configuration for one summarization run.
///
/// Every field has a usable default; a TOML file and CLI flags only override
/// what they name.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Target total word count for the whole summary.
    ///
    /// The default of 25 000 words corresponds to roughly 100 printed pages
    /// at 250 words per page.
    pub target_total_words: usize,
    /// Number of other sections retrieved as context per section.
    pub top_k: usize,
    /// Directory the summary files are written into.
    pub output_dir: PathBuf,
    /// Book title rendered on the summary's title page and in prompts.
    /// Defaults to the input file stem when absent.
    pub book_title: Option<String>,
    /// Embedding server settings.
    pub embedding: EmbeddingConfig,
    /// Completion server settings.
    pub completion: CompletionConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            target_total_words: 25_000,
            top_k: 2,
            output_dir: PathBuf::from("output"),
            book_title: None,
            embedding: EmbeddingConfig::default(),
            completion: CompletionConfig::default(),
        }
    }
}

impl RunConfig {
    /// Load a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }
}
