//! Word-budget allocation: distribute a total target word count across
//! sections as evenly as possible.

/// Split `total_words` across `section_count` sections.
///
/// Each section gets `total_words / section_count` words; the remainder is
/// given out one word at a time to the first `total_words % section_count`
/// sections, so the result is deterministic and order-dependent and always
/// sums exactly to `total_words`. With no sections the whole total falls
/// into a single bucket.
pub fn allocate(total_words: usize, section_count: usize) -> Vec<usize> {
    if section_count == 0 {
        return vec![total_words];
    }
    let base = total_words / section_count;
    let remainder = total_words % section_count;
    (0..section_count)
        .map(|i| if i < remainder { base + 1 } else { base })
        .collect()
}
