//! Morpheme filtering
//!
//! A [`FilterSpec`] decides which morphemes feed a view. The policy is four
//! checks applied in order, stopping at the first rejection:
//!
//! 1. the POS must be one of the target tags;
//! 2. the lowercased lemma must not be a stop word;
//! 3. nouns are rejected when their first subtype is excluded;
//! 4. other words are rejected when the lemma is shorter than the minimum
//!    length (in characters).
//!
//! Each view uses its own preset: the report, the word cloud, and the
//! co-occurrence network exclude slightly different noun subtypes.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::types::{
    Morpheme, DEFAULT_TARGET_POS, NOUN_ADVERB_CAPABLE, NOUN_NON_INDEPENDENT, NOUN_NUMERAL,
    NOUN_PRONOUN, NOUN_SAHEN_CONNECTING, NOUN_SUFFIX,
};

/// Noun subtypes excluded unless a view says otherwise.
pub const DEFAULT_NOUN_EXCLUSIONS: [&str; 6] = [
    NOUN_NON_INDEPENDENT,
    NOUN_NUMERAL,
    NOUN_PRONOUN,
    NOUN_SUFFIX,
    NOUN_SAHEN_CONNECTING,
    NOUN_ADVERB_CAPABLE,
];

/// Word-cloud exclusions keep sa-hen and adverb-capable nouns, which make
/// up much of the visible vocabulary in support logs.
pub const WORD_CLOUD_NOUN_EXCLUSIONS: [&str; 4] =
    [NOUN_NUMERAL, NOUN_NON_INDEPENDENT, NOUN_PRONOUN, NOUN_SUFFIX];

/// Minimum non-noun lemma length for co-occurrence node candidates.
pub const NETWORK_MIN_LEN_NON_NOUN: usize = 2;

/// Filtering policy for one analysis view.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterSpec {
    /// Accepted top-level POS tags
    pub target_pos: BTreeSet<String>,
    /// Stop words, lowercased
    #[serde(default)]
    pub stop_words: BTreeSet<String>,
    /// `pos_subtype1` values rejected for nouns
    pub noun_exclusions: BTreeSet<String>,
    /// Minimum lemma length (characters) for non-nouns
    #[serde(default)]
    pub min_len_non_noun: usize,
}

fn to_set<S: AsRef<str>>(items: &[S]) -> BTreeSet<String> {
    items.iter().map(|s| s.as_ref().to_string()).collect()
}

impl Default for FilterSpec {
    fn default() -> Self {
        Self::report(&DEFAULT_TARGET_POS, BTreeSet::new())
    }
}

impl FilterSpec {
    /// A spec with the default noun exclusions and no length limit.
    pub fn new<S: AsRef<str>>(target_pos: &[S], stop_words: BTreeSet<String>) -> Self {
        Self {
            target_pos: to_set(target_pos),
            stop_words,
            noun_exclusions: to_set(&DEFAULT_NOUN_EXCLUSIONS),
            min_len_non_noun: 0,
        }
    }

    /// Preset for the frequency report.
    pub fn report<S: AsRef<str>>(target_pos: &[S], stop_words: BTreeSet<String>) -> Self {
        Self::new(target_pos, stop_words)
    }

    /// Preset for the word-cloud source list.
    pub fn word_cloud<S: AsRef<str>>(target_pos: &[S], stop_words: BTreeSet<String>) -> Self {
        Self::new(target_pos, stop_words).with_noun_exclusions(&WORD_CLOUD_NOUN_EXCLUSIONS)
    }

    /// Preset for co-occurrence node candidates.
    pub fn network<S: AsRef<str>>(target_pos: &[S], stop_words: BTreeSet<String>) -> Self {
        Self::new(target_pos, stop_words).with_min_len_non_noun(NETWORK_MIN_LEN_NON_NOUN)
    }

    /// Replace the noun-subtype exclusions.
    pub fn with_noun_exclusions<S: AsRef<str>>(mut self, exclusions: &[S]) -> Self {
        self.noun_exclusions = to_set(exclusions);
        self
    }

    pub fn with_min_len_non_noun(mut self, min_len: usize) -> Self {
        self.min_len_non_noun = min_len;
        self
    }

    pub fn with_stop_words(mut self, stop_words: BTreeSet<String>) -> Self {
        self.stop_words = stop_words;
        self
    }

    /// Whether `m` passes all four checks.
    pub fn accepts(&self, m: &Morpheme) -> bool {
        if !self.target_pos.contains(m.pos.as_str()) {
            return false;
        }
        if self.stop_words.contains(&m.lemma.to_lowercase()) {
            return false;
        }
        if m.is_noun() {
            !self.noun_exclusions.contains(m.pos_subtype1.as_str())
        } else {
            m.lemma.chars().count() >= self.min_len_non_noun
        }
    }

    /// Borrowing filter: the accepted morphemes, in input order.
    pub fn select<'a>(&'a self, morphemes: &'a [Morpheme]) -> impl Iterator<Item = &'a Morpheme> + 'a {
        morphemes.iter().filter(move |m| self.accepts(m))
    }
}

/// Keep the morphemes accepted by `spec`, preserving order.
pub fn filter(morphemes: &[Morpheme], spec: &FilterSpec) -> Vec<Morpheme> {
    spec.select(morphemes).cloned().collect()
}
