//! Similarity index over section embeddings.
//!
//! One-shot bulk build per run, immutable thereafter. Search is exact
//! k-nearest-neighbor by squared Euclidean distance: the corpus is at most a
//! few hundred sections, so a flat scan beats maintaining an approximate
//! structure and keeps the ordering deterministic.

use tracing::{debug, info};

use crate::embed::EmbeddingProvider;
use crate::error::IndexError;
use crate::segment::Section;
use crate::text::truncate_chars;

/// Character cap applied to section content before embedding, bounding
/// embedding cost and respecting the model's effective input limit.
pub const EMBED_INPUT_CAP: usize = 5000;

/// One kNN search hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// Index into the section list (and the co-indexed embedding list).
    pub index: usize,
    /// Squared Euclidean distance to the query.
    pub distance: f32,
}

/// Immutable per-run index: the section list and its co-indexed embeddings.
///
/// Index `i` of the embeddings always corresponds to index `i` of the
/// sections; nothing mutates or filters either list after construction.
pub struct SectionIndex {
    sections: Vec<Section>,
    embeddings: Vec<Vec<f32>>,
    dim: usize,
}

impl SectionIndex {
    /// Embed every section (content capped at [`EMBED_INPUT_CAP`] chars) and
    /// build the index. Fails on an empty section list or on any embedding
    /// error: no section can be summarized without retrieval context, so a
    /// broken build aborts before summarization begins.
    pub fn build(
        sections: Vec<Section>,
        provider: &dyn EmbeddingProvider,
    ) -> Result<Self, IndexError> {
        if sections.is_empty() {
            return Err(IndexError::NoSections);
        }

        let mut embeddings = Vec::with_capacity(sections.len());
        let mut dim = 0usize;
        for (i, section) in sections.iter().enumerate() {
            let input = truncate_chars(&section.content, EMBED_INPUT_CAP);
            let vector = provider
                .embed(input)
                .map_err(|source| IndexError::Embed { section: i, source })?;
            if dim == 0 {
                dim = vector.len();
            } else if vector.len() != dim {
                return Err(IndexError::Embed {
                    section: i,
                    source: crate::error::EmbedError::DimensionMismatch {
                        expected: dim,
                        actual: vector.len(),
                    },
                });
            }
            embeddings.push(vector);
        }

        info!(sections = sections.len(), dim, "similarity index built");
        Ok(Self {
            sections,
            embeddings,
            dim,
        })
    }

    /// Number of indexed sections.
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Embedding dimension.
    pub fn dimension(&self) -> usize {
        self.dim
    }

    /// The indexed sections, in original order.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// The `k` nearest sections to `query` by squared Euclidean distance,
    /// sorted ascending; equal distances break toward the lower section
    /// index. A query of the wrong dimension finds no neighbors.
    pub fn knn(&self, query: &[f32], k: usize) -> Vec<Neighbor> {
        if query.len() != self.dim {
            debug!(
                expected = self.dim,
                actual = query.len(),
                "query dimension mismatch, returning no neighbors"
            );
            return Vec::new();
        }

        let mut hits: Vec<Neighbor> = self
            .embeddings
            .iter()
            .enumerate()
            .map(|(index, emb)| Neighbor {
                index,
                distance: squared_l2(query, emb),
            })
            .collect();
        hits.sort_by(|a, b| {
            a.distance
                .total_cmp(&b.distance)
                .then(a.index.cmp(&b.index))
        });
        hits.truncate(k);
        hits
    }
}

impl std::fmt::Debug for SectionIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SectionIndex")
            .field("sections", &self.sections.len())
            .field("dim", &self.dim)
            .finish()
    }
}

fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EmbedError;

    /// Deterministic stub: embeds a text as [len of first word, word count].
    struct StubEmbedder;

    impl EmbeddingProvider for StubEmbedder {
        fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError> {
            let first = text.split_whitespace().next().unwrap_or("").len() as f32;
            let words = text.split_whitespace().count() as f32;
            Ok(vec![first, words])
        }
    }

    struct FailingEmbedder;

    impl EmbeddingProvider for FailingEmbedder {
        fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbedError> {
            Err(EmbedError::EmptyVector)
        }
    }

    fn section(title: &str, content: &str) -> Section {
        Section {
            title: title.into(),
            content: content.into(),
        }
    }

    #[test]
    fn empty_section_list_fails_to_build() {
        let result = SectionIndex::build(Vec::new(), &StubEmbedder);
        assert!(matches!(result, Err(IndexError::NoSections)));
    }

    #[test]
    fn embed_failure_aborts_build_with_section_index() {
        let sections = vec![section("A", "a"), section("B", "b")];
        let result = SectionIndex::build(sections, &FailingEmbedder);
        match result {
            Err(IndexError::Embed { section, .. }) => assert_eq!(section, 0),
            other => panic!("expected Embed error, got {other:?}"),
        }
    }

    #[test]
    fn embeddings_stay_co_indexed_with_sections() {
        let sections = vec![
            section("A", "aa one"),
            section("B", "bbbb one two three"),
        ];
        let index = SectionIndex::build(sections, &StubEmbedder).unwrap();
        assert_eq!(index.len(), 2);
        assert_eq!(index.dimension(), 2);
        assert_eq!(index.sections()[0].title, "A");
        assert_eq!(index.sections()[1].title, "B");
    }

    #[test]
    fn knn_orders_by_squared_distance() {
        let sections = vec![
            section("far", "aaaaaaaaaa x"), // [10, 2]
            section("near", "aa x"),        // [2, 2]
            section("exact", "a x"),        // [1, 2]
        ];
        let index = SectionIndex::build(sections, &StubEmbedder).unwrap();
        let hits = index.knn(&[1.0, 2.0], 3);
        assert_eq!(hits.len(), 3);
        assert_eq!(hits[0].index, 2);
        assert_eq!(hits[0].distance, 0.0);
        assert_eq!(hits[1].index, 1);
        assert_eq!(hits[1].distance, 1.0);
        assert_eq!(hits[2].index, 0);
        assert_eq!(hits[2].distance, 81.0);
    }

    #[test]
    fn knn_ties_break_toward_lower_index() {
        let sections = vec![
            section("first", "aa x"),
            section("second", "bb y"), // same stub embedding as "first"
        ];
        let index = SectionIndex::build(sections, &StubEmbedder).unwrap();
        let hits = index.knn(&[2.0, 2.0], 2);
        assert_eq!(hits[0].index, 0);
        assert_eq!(hits[1].index, 1);
    }

    #[test]
    fn knn_truncates_to_k() {
        let sections = vec![section("A", "a x"), section("B", "bb x"), section("C", "ccc x")];
        let index = SectionIndex::build(sections, &StubEmbedder).unwrap();
        assert_eq!(index.knn(&[1.0, 2.0], 2).len(), 2);
    }

    #[test]
    fn wrong_dimension_query_finds_nothing() {
        let sections = vec![section("A", "a x")];
        let index = SectionIndex::build(sections, &StubEmbedder).unwrap();
        assert!(index.knn(&[1.0, 2.0, 3.0], 1).is_empty());
    }
}
