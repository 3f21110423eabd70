//! Word-cloud source lists
//!
//! The renderer itself is external; this module produces the weighted word
//! list it draws from. Weights are relative to the most frequent word, the
//! scale word-cloud layouts use for font sizing.

use serde::Serialize;

use super::{count_lemmas, most_common};
use crate::filter::FilterSpec;
use crate::types::{EmptyReason, Morpheme, Outcome};

/// Upper bound on words handed to the renderer.
pub const DEFAULT_MAX_WORDS: usize = 200;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightedWord {
    pub text: String,
    pub count: usize,
    /// `count / max_count`, in `(0, 1]`
    pub weight: f64,
}

/// Words for one word cloud, most frequent first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WordCloudSource {
    pub words: Vec<WeightedWord>,
    /// Every filtered lemma in input order (before truncation).
    #[serde(skip)]
    lemmas: Vec<String>,
}

impl WordCloudSource {
    /// The filtered lemmas joined by spaces, the text form renderers accept.
    pub fn to_text(&self) -> String {
        self.lemmas.join(" ")
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Build the word-cloud source for `morphemes`.
pub fn word_cloud_source(
    morphemes: &[Morpheme],
    spec: &FilterSpec,
    max_words: usize,
) -> Outcome<WordCloudSource> {
    if morphemes.is_empty() {
        return Outcome::Empty(EmptyReason::NoMorphemes);
    }

    let filtered: Vec<&Morpheme> = spec.select(morphemes).collect();
    if filtered.is_empty() {
        return Outcome::Empty(EmptyReason::NoFilteredTokens);
    }

    let ranked = most_common(count_lemmas(filtered.iter().copied()));
    let max_count = ranked.first().map_or(1, |(_, c)| *c) as f64;

    let words = ranked
        .into_iter()
        .take(max_words)
        .map(|(text, count)| WeightedWord {
            text: text.to_string(),
            count,
            weight: count as f64 / max_count,
        })
        .collect();

    Outcome::Ready(WordCloudSource {
        words,
        lemmas: filtered.iter().map(|m| m.lemma.clone()).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::morphemes;
    use crate::types::POS_NOUN;
    use std::collections::BTreeSet;

    fn nouns() -> FilterSpec {
        FilterSpec::word_cloud(&[POS_NOUN], BTreeSet::new())
    }

    #[test]
    fn test_weights_relative_to_top_word() {
        let input = morphemes("猫と犬。猫と鳥。猫と犬。確認。");
        let source = word_cloud_source(&input, &nouns(), DEFAULT_MAX_WORDS).ready().unwrap();

        let texts: Vec<_> = source.words.iter().map(|w| w.text.as_str()).collect();
        // サ変接続 nouns stay in the word cloud.
        assert_eq!(texts, vec!["猫", "犬", "鳥", "確認"]);
        assert_eq!(source.words[0].weight, 1.0);
        assert!((source.words[1].weight - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_truncates_to_max_words() {
        let input = morphemes("猫と犬と鳥と魚");
        let source = word_cloud_source(&input, &nouns(), 2).ready().unwrap();
        assert_eq!(source.len(), 2);
        // Text still carries every filtered lemma.
        assert_eq!(source.to_text(), "猫 犬 鳥 魚");
    }

    #[test]
    fn test_empty_cases_are_distinguished() {
        assert_eq!(
            word_cloud_source(&[], &nouns(), DEFAULT_MAX_WORDS),
            Outcome::Empty(EmptyReason::NoMorphemes)
        );
        let input = morphemes("が。");
        assert_eq!(
            word_cloud_source(&input, &nouns(), DEFAULT_MAX_WORDS),
            Outcome::Empty(EmptyReason::NoFilteredTokens)
        );
    }
}
