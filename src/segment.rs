//! Section segmentation: group ordered page texts into titled sections by
//! heading-pattern detection.
//!
//! The heading patterns live in one prioritized, ordered table so precedence
//! is auditable and testable in isolation. Matching is done against an
//! upper-cased copy of the page; the original casing is what lands in the
//! section content.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, info};

use crate::text::title_case;

/// A titled contiguous span of book text bounded by detected headings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Matched heading (title-cased), or `"Section {n}"` fallback.
    pub title: String,
    /// Space-joined page texts of the span. Never blank once emitted.
    pub content: String,
}

/// One entry of the heading table: a name for diagnostics and the pattern
/// tested against the upper-cased page text.
struct HeadingPattern {
    name: &'static str,
    regex: Regex,
}

/// Prioritized heading table. Patterns are tried in this order and the first
/// match wins, so earlier entries take precedence on pages matching several.
static HEADING_PATTERNS: LazyLock<Vec<HeadingPattern>> = LazyLock::new(|| {
    let table: &[(&str, &str)] = &[
        ("prologue", r"\bPROLOGUE\b"),
        ("part", r"\bPART\s+(I|II|III|IV|V)\b"),
        ("chapter", r"\bCHAPTER\s+\d+\.?\s*"),
        ("epilogue", r"\bEPILOGUE\b"),
        ("acknowledgments", r"\bACKNOWLEDGMENTS\b"),
        ("notes", r"\bNOTES\b"),
        ("index", r"\bINDEX\b"),
        ("about-the-author", r"\bABOUT THE AUTHOR\b"),
    ];
    table
        .iter()
        .map(|(name, pattern)| HeadingPattern {
            name,
            regex: Regex::new(pattern).unwrap(),
        })
        .collect()
});

/// Accumulator for the section currently being built.
#[derive(Default)]
struct Draft {
    title: Option<String>,
    content: String,
}

/// Split ordered page texts into titled sections.
///
/// Blank pages contribute nothing. A page matching a heading pattern closes
/// the current section (if it has content) and opens a new one titled with
/// the title-cased matched text and seeded with the full page text. Pages
/// matching no pattern are appended, space-joined, to the current section.
/// Sections without a matched heading get a `"Section {n}"` fallback title,
/// numbered by emission order.
pub fn segment(pages: &[String]) -> Vec<Section> {
    let mut sections: Vec<Section> = Vec::new();
    let mut emitted = 0usize;
    let mut current = Draft::default();

    for page in pages {
        if page.trim().is_empty() {
            continue;
        }
        let upper = page.to_uppercase();

        let heading = HEADING_PATTERNS.iter().find_map(|p| {
            p.regex.find(&upper).map(|m| {
                debug!(pattern = p.name, heading = m.as_str(), "heading matched");
                m.as_str()
            })
        });

        match heading {
            Some(matched) => {
                if !current.content.is_empty() {
                    finalize(&mut sections, &mut emitted, current);
                    current = Draft::default();
                }
                current.title = Some(title_case(matched.trim_end()));
                current.content = page.clone();
            }
            None => {
                if !current.content.is_empty() {
                    current.content.push(' ');
                }
                current.content.push_str(page);
            }
        }
    }

    if !current.content.is_empty() {
        finalize(&mut sections, &mut emitted, current);
    }

    sections.retain(|s| !s.content.trim().is_empty());
    info!(sections = sections.len(), "segmentation complete");
    sections
}

fn finalize(sections: &mut Vec<Section>, emitted: &mut usize, draft: Draft) {
    *emitted += 1;
    sections.push(Section {
        title: draft.title.unwrap_or_else(|| format!("Section {emitted}")),
        content: draft.content,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pages(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn heading_page_starts_a_new_section() {
        let input = pages(&[
            "PROLOGUE The story begins here.",
            "body text A",
            "CHAPTER 1. The first real chapter.",
            "body text B",
        ]);
        let sections = segment(&input);
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].title, "Prologue");
        assert_eq!(sections[1].title, "Chapter 1.");
        assert_eq!(
            sections[0].content,
            "PROLOGUE The story begins here. body text A"
        );
        assert_eq!(
            sections[1].content,
            "CHAPTER 1. The first real chapter. body text B"
        );
    }

    #[test]
    fn heading_page_seeds_content_with_full_page() {
        let input = pages(&["CHAPTER 2. It was a dark and stormy night."]);
        let sections = segment(&input);
        assert_eq!(sections.len(), 1);
        assert_eq!(
            sections[0].content,
            "CHAPTER 2. It was a dark and stormy night."
        );
    }

    #[test]
    fn blank_pages_contribute_nothing() {
        let input = pages(&["", "   ", "CHAPTER 1. text", "\t\n", "more text"]);
        let sections = segment(&input);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].content, "CHAPTER 1. text more text");
    }

    #[test]
    fn untitled_first_span_gets_fallback_title() {
        let input = pages(&["front matter", "CHAPTER 1. body"]);
        let sections = segment(&input);
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].title, "Section 1");
        assert_eq!(sections[0].content, "front matter");
        assert_eq!(sections[1].title, "Chapter 1.");
    }

    #[test]
    fn fallback_titles_are_dense_and_ordered() {
        // No page matches any pattern, so everything lands in one section.
        let input = pages(&["just prose", "more prose"]);
        let sections = segment(&input);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title, "Section 1");
        assert_eq!(sections[0].content, "just prose more prose");
    }

    #[test]
    fn first_match_wins_over_later_patterns() {
        // "chapter" precedes "notes" in the table, so a page containing both
        // is titled from the chapter match.
        let input = pages(&["NOTES ON CHAPTER 5 AND OTHER MATTERS"]);
        let sections = segment(&input);
        assert_eq!(sections.len(), 1);
        assert!(sections[0].title.starts_with("Chapter 5"));
    }

    #[test]
    fn part_numeral_headings_detected() {
        let input = pages(&["PART II The Inorganic Network", "body"]);
        let sections = segment(&input);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title, "Part Ii");
    }

    #[test]
    fn consecutive_heading_pages_each_become_sections() {
        let input = pages(&[
            "EPILOGUE Final thoughts.",
            "ACKNOWLEDGMENTS Thanks to everyone.",
        ]);
        let sections = segment(&input);
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].title, "Epilogue");
        assert_eq!(sections[1].title, "Acknowledgments");
    }

    #[test]
    fn segmentation_is_idempotent() {
        let input = pages(&[
            "PROLOGUE a",
            "b",
            "CHAPTER 1. c",
            "d",
            "EPILOGUE e",
        ]);
        let first = segment(&input);
        let second = segment(&input);
        assert_eq!(first, second);
    }

    #[test]
    fn empty_input_yields_no_sections() {
        assert!(segment(&[]).is_empty());
    }

    #[test]
    fn matching_is_case_insensitive_via_uppercasing() {
        let input = pages(&["Prologue: in the beginning", "body"]);
        let sections = segment(&input);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title, "Prologue");
        // Original casing is preserved in content.
        assert!(sections[0].content.starts_with("Prologue:"));
    }
}
