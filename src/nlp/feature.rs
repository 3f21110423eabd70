//! Typed decoding of analyzer feature strings
//!
//! IPADIC-style analyzers attach a comma-separated feature list to every
//! node:
//!
//! ```text
//! 名詞,一般,*,*,*,*,猫,ネコ,ネコ
//! ```
//!
//! The positions are fixed (POS, three subtypes, inflection type and form,
//! lemma, reading, pronunciation) and `*` marks an absent value. This module
//! is the only place that knows about those positions.

use crate::types::Morpheme;

/// Placeholder the analyzer uses for "value absent".
pub const WILDCARD: &str = "*";

/// Number of positional fields decoded from a feature string.
pub const FEATURE_FIELDS: usize = 9;

const IDX_POS: usize = 0;
const IDX_SUBTYPE1: usize = 1;
const IDX_SUBTYPE2: usize = 2;
const IDX_SUBTYPE3: usize = 3;
const IDX_INFLECTION_TYPE: usize = 4;
const IDX_INFLECTION_FORM: usize = 5;
const IDX_LEMMA: usize = 6;
const IDX_READING: usize = 7;
const IDX_PRONUNCIATION: usize = 8;

/// Fallback for reading and pronunciation when the analyzer has none.
const NO_READING: &str = "";

/// A decoded feature list.
///
/// Each field is `None` when the position is missing or holds [`WILDCARD`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureRecord<'a> {
    pub pos: Option<&'a str>,
    pub pos_subtype1: Option<&'a str>,
    pub pos_subtype2: Option<&'a str>,
    pub pos_subtype3: Option<&'a str>,
    pub inflection_type: Option<&'a str>,
    pub inflection_form: Option<&'a str>,
    pub lemma: Option<&'a str>,
    pub reading: Option<&'a str>,
    pub pronunciation: Option<&'a str>,
}

impl<'a> FeatureRecord<'a> {
    /// Decode a raw feature string. Never fails; short input leaves the
    /// trailing fields absent.
    pub fn parse(feature: &'a str) -> Self {
        let fields: Vec<&'a str> = feature.split(',').take(FEATURE_FIELDS).collect();
        let get = |idx: usize| -> Option<&'a str> {
            fields
                .get(idx)
                .copied()
                .filter(|value| *value != WILDCARD && !value.is_empty())
        };

        Self {
            pos: get(IDX_POS),
            pos_subtype1: get(IDX_SUBTYPE1),
            pos_subtype2: get(IDX_SUBTYPE2),
            pos_subtype3: get(IDX_SUBTYPE3),
            inflection_type: get(IDX_INFLECTION_TYPE),
            inflection_form: get(IDX_INFLECTION_FORM),
            lemma: get(IDX_LEMMA),
            reading: get(IDX_READING),
            pronunciation: get(IDX_PRONUNCIATION),
        }
    }

    /// Lemma, falling back to the surface form for unknown words.
    pub fn lemma_or<'s>(&self, surface: &'s str) -> &'s str
    where
        'a: 's,
    {
        self.lemma.unwrap_or(surface)
    }

    /// Build a [`Morpheme`] for the node with the given surface.
    ///
    /// Grammatical fields keep the analyzer's literal value (including `*`)
    /// when present, matching what MeCab prints; absent positions become
    /// empty strings.
    pub fn into_morpheme(self, surface: &str, raw: &str) -> Morpheme {
        let literal = |idx: usize| raw.split(',').nth(idx).unwrap_or_default().to_string();

        Morpheme {
            surface: surface.to_string(),
            lemma: self.lemma_or(surface).to_string(),
            pos: literal(IDX_POS),
            pos_subtype1: literal(IDX_SUBTYPE1),
            pos_subtype2: literal(IDX_SUBTYPE2),
            pos_subtype3: literal(IDX_SUBTYPE3),
            inflection_type: literal(IDX_INFLECTION_TYPE),
            inflection_form: literal(IDX_INFLECTION_FORM),
            reading: self.reading.unwrap_or(NO_READING).to_string(),
            pronunciation: self.pronunciation.unwrap_or(NO_READING).to_string(),
        }
    }
}

/// Decode one analyzer node into a morpheme.
///
/// Returns `None` for boundary nodes with an empty surface.
pub fn decode_node(surface: &str, feature: &str) -> Option<Morpheme> {
    if surface.is_empty() {
        return None;
    }
    Some(FeatureRecord::parse(feature).into_morpheme(surface, feature))
}
