//! The summarization driver: one section at a time, in order, with failure
//! contained at the section boundary.
//!
//! Sections are processed strictly serially. The running word total and the
//! unit list are sequential accumulators, and both the retrieval and the
//! completion calls are rate- and cost-sensitive external calls best issued
//! one at a time. A section's failure never affects any other section: every
//! section yields exactly one [`SummaryUnit`], success or placeholder.

use tracing::{error, info};

use crate::embed::EmbeddingProvider;
use crate::index::SectionIndex;
use crate::llm::CompletionProvider;
use crate::prompt::build_summary_prompt;
use crate::retrieve::retrieve_context;
use crate::text::word_count;

/// Per-section result: a genuine summary or a visible error placeholder.
#[derive(Debug, Clone)]
pub struct SummaryUnit {
    /// Title of the summarized section.
    pub section_title: String,
    /// Summary text, or the placeholder message when `is_error` is set.
    pub text: String,
    /// Whitespace-split word count of `text` (0 for placeholders).
    pub word_count: usize,
    /// Whether this unit is an error placeholder.
    pub is_error: bool,
}

/// Summarize every indexed section, in order.
///
/// `targets` should be co-indexed with the sections (one word budget each,
/// as produced by [`crate::budget::allocate`]). A mis-sized slice never
/// costs a section its unit: missing entries fall back to a zero word
/// target. Returns exactly one unit per section regardless of how many
/// completions fail; failed sections carry a placeholder naming the section
/// and the error.
pub fn summarize_sections(
    index: &SectionIndex,
    embedder: &dyn EmbeddingProvider,
    completion: &dyn CompletionProvider,
    book_title: &str,
    targets: &[usize],
    top_k: usize,
) -> Vec<SummaryUnit> {
    let mut units = Vec::with_capacity(index.len());
    let mut total_words = 0usize;

    for (i, section) in index.sections().iter().enumerate() {
        let target_words = targets.get(i).copied().unwrap_or_default();
        let context = retrieve_context(index, embedder, section, top_k).join("\n\n");
        let prompt = build_summary_prompt(book_title, section, &context, target_words);

        match completion.complete(&prompt) {
            Ok(text) => {
                let words = word_count(&text);
                total_words += words;
                info!(
                    section = i + 1,
                    title = %section.title,
                    words,
                    "section summarized"
                );
                units.push(SummaryUnit {
                    section_title: section.title.clone(),
                    text,
                    word_count: words,
                    is_error: false,
                });
            }
            Err(e) => {
                error!(section = i + 1, title = %section.title, error = %e, "section failed");
                units.push(SummaryUnit {
                    section_title: section.title.clone(),
                    text: format!("[Error summarizing \"{}\": {e}]", section.title),
                    word_count: 0,
                    is_error: true,
                });
            }
        }
    }

    info!(total_words, sections = units.len(), "summarization complete");
    units
}
