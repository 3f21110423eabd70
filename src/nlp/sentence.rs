//! Sentence segmentation for co-occurrence counting
//!
//! Raw text is split on runs of sentence-final punctuation and line breaks.
//! Consecutive boundary characters act as a single boundary.

use std::sync::LazyLock;

use regex::Regex;

/// Japanese full stop, newline, full-width exclamation and question marks.
static SENTENCE_BOUNDARY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[。\n！？]+").unwrap());

/// Split `text` into trimmed, non-blank sentences in input order.
pub fn split_sentences(text: &str) -> Vec<&str> {
    SENTENCE_BOUNDARY
        .split(text)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}
