//! Best-effort context retrieval: the top-k most similar *other* sections.
//!
//! Retrieval enriches a section's summary prompt; it is never fatal. Any
//! failure along the way (embedding error, dimension mismatch, empty index)
//! degrades to an empty context list for that section only.

use tracing::debug;

use crate::embed::EmbeddingProvider;
use crate::index::{EMBED_INPUT_CAP, SectionIndex};
use crate::segment::Section;
use crate::text::truncate_chars;

/// Character cap applied to each retrieved context snippet.
pub const CONTEXT_SNIPPET_CAP: usize = 2000;

/// Retrieve up to `top_k` context snippets for `query_section` from the
/// other sections in the index.
///
/// The index is queried for `top_k + 1` neighbors to tolerate the query
/// matching itself, then any neighbor whose truncated content equals the
/// query's truncated content is dropped. Note the self test is by *content*
/// equality, not section identity: two distinct sections with identical
/// truncated content exclude each other. That matches the behavior this
/// pipeline has always had and is deliberate.
pub fn retrieve_context(
    index: &SectionIndex,
    provider: &dyn EmbeddingProvider,
    query_section: &Section,
    top_k: usize,
) -> Vec<String> {
    let query_text = truncate_chars(&query_section.content, EMBED_INPUT_CAP);

    let query_vec = match provider.embed(query_text) {
        Ok(v) => v,
        Err(e) => {
            debug!(error = %e, "query embedding failed, returning empty context");
            return Vec::new();
        }
    };

    // Over-fetch by one so the query's own entry can be filtered out.
    let neighbors = index.knn(&query_vec, top_k + 1);

    neighbors
        .into_iter()
        .filter_map(|n| {
            let content = &index.sections()[n.index].content;
            if truncate_chars(content, EMBED_INPUT_CAP) == query_text {
                None
            } else {
                Some(truncate_chars(content, CONTEXT_SNIPPET_CAP).to_string())
            }
        })
        .take(top_k)
        .collect()
}
