//! Small text helpers shared across the pipeline: char-safe truncation,
//! word counting, and title casing for matched headings.

/// Truncate a string to at most `max_chars` characters, respecting UTF-8
/// boundaries. Returns the original slice when it is short enough.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Count words by whitespace splitting.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Title-case a heading: each letter that starts a run of alphabetic
/// characters is uppercased, the rest lowercased. Non-alphabetic characters
/// (digits, dots, spaces) pass through and reset the run.
///
/// `"CHAPTER 1."` → `"Chapter 1."`, `"ABOUT THE AUTHOR"` → `"About The Author"`.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_alpha = false;
    for ch in text.chars() {
        if ch.is_alphabetic() {
            if prev_alpha {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(ch);
            prev_alpha = false;
        }
    }
    out
}
