//! Core types shared across the analysis pipeline
//!
//! The morpheme sequence produced by the tokenizer adapter is the single
//! source of truth for an analyzed text; every other structure in the crate
//! is a derived view recomputed from it.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use rustc_hash::FxHasher;
use serde::{Deserialize, Serialize};

/// Part-of-speech tag for nouns (`名詞`).
pub const POS_NOUN: &str = "名詞";
/// Part-of-speech tag for verbs (`動詞`).
pub const POS_VERB: &str = "動詞";
/// Part-of-speech tag for adjectives (`形容詞`).
pub const POS_ADJECTIVE: &str = "形容詞";
/// Part-of-speech tag for adverbs (`副詞`).
pub const POS_ADVERB: &str = "副詞";
/// Part-of-speech tag for interjections (`感動詞`).
pub const POS_INTERJECTION: &str = "感動詞";
/// Part-of-speech tag for adnominals (`連体詞`).
pub const POS_ADNOMINAL: &str = "連体詞";

/// Content-word tags a caller may select for any view.
pub const SELECTABLE_POS: [&str; 6] = [
    POS_NOUN,
    POS_VERB,
    POS_ADJECTIVE,
    POS_ADVERB,
    POS_INTERJECTION,
    POS_ADNOMINAL,
];

/// Target tags used when a view configuration does not name any.
pub const DEFAULT_TARGET_POS: [&str; 3] = [POS_NOUN, POS_VERB, POS_ADJECTIVE];

/// Noun subtype: non-independent (`非自立`).
pub const NOUN_NON_INDEPENDENT: &str = "非自立";
/// Noun subtype: numeral (`数`).
pub const NOUN_NUMERAL: &str = "数";
/// Noun subtype: pronoun (`代名詞`).
pub const NOUN_PRONOUN: &str = "代名詞";
/// Noun subtype: suffix (`接尾`).
pub const NOUN_SUFFIX: &str = "接尾";
/// Noun subtype: sa-hen connecting (`サ変接続`).
pub const NOUN_SAHEN_CONNECTING: &str = "サ変接続";
/// Noun subtype: adverb-capable (`副詞可能`).
pub const NOUN_ADVERB_CAPABLE: &str = "副詞可能";

/// One token produced by morphological analysis.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Morpheme {
    /// Exact substring as it appeared in the input
    pub surface: String,
    /// Dictionary base form (falls back to `surface` for unknown words)
    pub lemma: String,
    pub pos: String,
    pub pos_subtype1: String,
    pub pos_subtype2: String,
    pub pos_subtype3: String,
    pub inflection_type: String,
    pub inflection_form: String,
    /// Katakana reading, empty when unavailable
    pub reading: String,
    /// Pronunciation, empty when unavailable
    pub pronunciation: String,
}

impl Morpheme {
    /// Build a morpheme with only surface, lemma and top-level POS set.
    pub fn new(surface: impl Into<String>, lemma: impl Into<String>, pos: impl Into<String>) -> Self {
        Self {
            surface: surface.into(),
            lemma: lemma.into(),
            pos: pos.into(),
            pos_subtype1: String::new(),
            pos_subtype2: String::new(),
            pos_subtype3: String::new(),
            inflection_type: String::new(),
            inflection_form: String::new(),
            reading: String::new(),
            pronunciation: String::new(),
        }
    }

    /// Set the first POS subtype.
    pub fn with_subtype(mut self, subtype: impl Into<String>) -> Self {
        self.pos_subtype1 = subtype.into();
        self
    }

    /// Whether this morpheme is tagged as a noun.
    pub fn is_noun(&self) -> bool {
        self.pos == POS_NOUN
    }
}

/// An analyzed text: the raw input plus its morpheme sequence.
///
/// Produced once per analysis run and replaced wholesale on re-analysis.
/// Contents are shared, so cloning is cheap. Equality compares the full
/// text and morpheme sequence; the fingerprint only short-circuits it.
#[derive(Debug, Clone)]
pub struct Document {
    text: Arc<str>,
    morphemes: Arc<[Morpheme]>,
    fingerprint: u64,
}

impl Document {
    /// Wrap a text and the morphemes the tokenizer produced for it.
    pub fn new(text: impl Into<String>, morphemes: Vec<Morpheme>) -> Self {
        let text: String = text.into();
        let mut hasher = FxHasher::default();
        text.hash(&mut hasher);
        morphemes.hash(&mut hasher);
        Self {
            fingerprint: hasher.finish(),
            text: Arc::from(text),
            morphemes: Arc::from(morphemes),
        }
    }

    /// The raw text that was analyzed.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The full morpheme sequence, in input order.
    pub fn morphemes(&self) -> &[Morpheme] {
        &self.morphemes
    }

    /// Number of morphemes in the document.
    pub fn len(&self) -> usize {
        self.morphemes.len()
    }

    /// Whether the document has no morphemes.
    pub fn is_empty(&self) -> bool {
        self.morphemes.is_empty()
    }

    /// Hash of the text and morphemes.
    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        if Arc::ptr_eq(&self.morphemes, &other.morphemes) && Arc::ptr_eq(&self.text, &other.text) {
            return true;
        }
        self.fingerprint == other.fingerprint
            && self.text == other.text
            && self.morphemes == other.morphemes
    }
}

impl Eq for Document {}

impl Hash for Document {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.fingerprint);
    }
}

/// Why an analysis produced no result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum EmptyReason {
    /// The input text was blank or whitespace-only.
    BlankInput,
    /// The tokenizer could not be initialized.
    TokenizerUnavailable { message: String },
    /// The tokenizer ran but produced no morphemes.
    NoMorphemes,
    /// No morpheme survived filtering.
    NoFilteredTokens,
    /// Fewer than two lemmas met the node frequency threshold.
    TooFewNodes { found: usize, node_min_freq: usize },
    /// No two qualifying lemmas ever shared a sentence.
    NoCooccurrences,
    /// Pairs co-occurred, but none reached the edge threshold.
    NoEdgesAboveThreshold { edge_min_freq: usize },
    /// The KWIC keyword was blank.
    BlankKeyword,
    /// The KWIC keyword did not occur in the document.
    NoMatches { keyword: String },
    /// No font capable of rendering Japanese was found.
    FontUnavailable,
}

impl fmt::Display for EmptyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BlankInput => write!(f, "no text to analyze"),
            Self::TokenizerUnavailable { message } => {
                write!(f, "tokenizer is unavailable: {message}")
            }
            Self::NoMorphemes => write!(f, "analysis produced no morphemes"),
            Self::NoFilteredTokens => write!(f, "no words remain after filtering"),
            Self::TooFewNodes { found, node_min_freq } => write!(
                f,
                "fewer than 2 words occur at least {node_min_freq} times (found {found})"
            ),
            Self::NoCooccurrences => write!(f, "no co-occurring word pairs were found"),
            Self::NoEdgesAboveThreshold { edge_min_freq } => write!(
                f,
                "no word pair co-occurs at least {edge_min_freq} times"
            ),
            Self::BlankKeyword => write!(f, "keyword is blank"),
            Self::NoMatches { keyword } => write!(f, "\"{keyword}\" was not found"),
            Self::FontUnavailable => write!(f, "no Japanese font is available"),
        }
    }
}

/// Result of an analysis view: a value, or a reason it is empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome<T> {
    Ready(T),
    Empty(EmptyReason),
}

impl<T> Outcome<T> {
    /// Returns `true` for [`Outcome::Ready`].
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    /// Returns `true` for [`Outcome::Empty`].
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty(_))
    }

    /// The value, if ready.
    pub fn ready(self) -> Option<T> {
        match self {
            Self::Ready(value) => Some(value),
            Self::Empty(_) => None,
        }
    }

    /// Borrow the value, if ready.
    pub fn as_ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            Self::Empty(_) => None,
        }
    }

    /// The empty reason, if empty.
    pub fn reason(&self) -> Option<&EmptyReason> {
        match self {
            Self::Ready(_) => None,
            Self::Empty(reason) => Some(reason),
        }
    }

    /// Map the ready value.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Self::Ready(value) => Outcome::Ready(f(value)),
            Self::Empty(reason) => Outcome::Empty(reason),
        }
    }
}
