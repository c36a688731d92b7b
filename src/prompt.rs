//! Summary prompt construction.

use crate::segment::Section;
use crate::text::truncate_chars;

/// Character cap on the section text embedded in a prompt.
pub const SECTION_TEXT_CAP: usize = 10_000;

/// Character cap on the retrieved context embedded in a prompt.
pub const CONTEXT_TEXT_CAP: usize = 5000;

/// Build the completion prompt for one section.
///
/// Embeds the section title, the section text (capped), the retrieved
/// context (capped), and the numeric word target, with fixed instructions:
/// avoid cross-section repetition, hit the word target, and structure the
/// summary as introduction, key points, and conclusion.
pub fn build_summary_prompt(
    book_title: &str,
    section: &Section,
    context: &str,
    target_words: usize,
) -> String {
    let section_text = truncate_chars(&section.content, SECTION_TEXT_CAP);
    let context_text = truncate_chars(context, CONTEXT_TEXT_CAP);

    format!(
        "You are summarizing a section of '{book_title}'. Your summary must:\n\
         - Be clear, concise, and professional, preserving key arguments, facts, and tone.\n\
         - Avoid repetition of ideas from other sections.\n\
         - Target ~{target_words} words so the full summary reaches its overall length.\n\
         - Use the provided context to ensure coherence with the rest of the book.\n\
         - Structure the summary with an introduction, key points, and conclusion.\n\
         \n\
         Section Title: {title}\n\
         Section Text: {section_text}\n\
         Relevant Context: {context_text}\n\
         \n\
         Provide the summary in a narrative format, readable as part of a cohesive book summary.\n",
        title = section.title,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(title: &str, content: &str) -> Section {
        Section {
            title: title.into(),
            content: content.into(),
        }
    }

    #[test]
    fn prompt_contains_title_text_context_and_target() {
        let s = section("Chapter 1.", "The chapter body.");
        let prompt = build_summary_prompt("Nexus", &s, "context from elsewhere", 350);
        assert!(prompt.contains("'Nexus'"));
        assert!(prompt.contains("Section Title: Chapter 1."));
        assert!(prompt.contains("The chapter body."));
        assert!(prompt.contains("context from elsewhere"));
        assert!(prompt.contains("~350 words"));
    }

    #[test]
    fn section_text_is_capped() {
        let s = section("Long", &"a".repeat(SECTION_TEXT_CAP + 500));
        let prompt = build_summary_prompt("Book", &s, "", 100);
        assert!(!prompt.contains(&"a".repeat(SECTION_TEXT_CAP + 1)));
        assert!(prompt.contains(&"a".repeat(SECTION_TEXT_CAP)));
    }

    #[test]
    fn context_is_capped() {
        let s = section("S", "body");
        let context = "c".repeat(CONTEXT_TEXT_CAP + 500);
        let prompt = build_summary_prompt("Book", &s, &context, 100);
        assert!(!prompt.contains(&"c".repeat(CONTEXT_TEXT_CAP + 1)));
    }
}
