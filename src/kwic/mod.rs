//! Keyword-in-context search
//!
//! A linear scan over the morpheme sequence. Each exact, case-insensitive
//! match on the chosen key field yields the match's surface form framed by
//! up to `window` surfaces on either side. Windows shorten at the edges of
//! the sequence instead of failing.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::types::Morpheme;

/// Context width used when a request does not set one.
pub const DEFAULT_WINDOW: usize = 5;

/// Which morpheme field the keyword is compared against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyField {
    /// Dictionary base form
    #[default]
    Lemma,
    /// Form as written
    Surface,
}

impl KeyField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lemma => "lemma",
            Self::Surface => "surface",
        }
    }

    fn value<'m>(&self, m: &'m Morpheme) -> &'m str {
        match self {
            Self::Lemma => &m.lemma,
            Self::Surface => &m.surface,
        }
    }
}

impl fmt::Display for KeyField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KeyField {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "lemma" | "base" | "原形" => Ok(Self::Lemma),
            "surface" | "表層形" => Ok(Self::Surface),
            other => Err(format!("unknown KWIC key field \"{other}\"")),
        }
    }
}

/// One concordance line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KwicHit {
    pub left_context: String,
    /// Surface form at the match, even when matching on lemma
    pub keyword_surface: String,
    pub right_context: String,
}

fn join_surfaces(morphemes: &[Morpheme]) -> String {
    morphemes.iter().map(|m| m.surface.as_str()).collect()
}

/// Find every occurrence of `keyword` in `morphemes`.
pub fn search(morphemes: &[Morpheme], keyword: &str, key_field: KeyField, window: usize) -> Vec<KwicHit> {
    let keyword = keyword.trim();
    if keyword.is_empty() || morphemes.is_empty() {
        return Vec::new();
    }
    let needle = keyword.to_lowercase();

    morphemes
        .iter()
        .enumerate()
        .filter(|(_, m)| key_field.value(m).to_lowercase() == needle)
        .map(|(i, m)| {
            let left_start = i.saturating_sub(window);
            let right_end = morphemes.len().min(i + 1 + window);
            KwicHit {
                left_context: join_surfaces(&morphemes[left_start..i]),
                keyword_surface: m.surface.clone(),
                right_context: join_surfaces(&morphemes[i + 1..right_end]),
            }
        })
        .collect()
}
