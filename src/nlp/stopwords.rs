//! Stop-word lists
//!
//! Japanese text mining needs a Japanese list first; mixed-language input
//! (product names, log excerpts) can add other languages from the
//! `stop-words` crate. Words are stored lowercased because filtering
//! compares against the lowercased lemma.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;
use stop_words::{get, LANGUAGE};

/// Separators accepted in user-supplied stop-word lists.
static LIST_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[,、\n]").unwrap());

/// Light verbs and demonstratives common in support logs that the ISO Japanese
/// list leaves out.
const JAPANESE_EXTRA_STOPWORDS: [&str; 12] = [
    "させる", "どれ", "おる", "いただく", "くださる", "みる", "しまう", "もらう", "やる", "くる",
    "いく", "思う",
];

/// A set of stop words, lowercased.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StopwordFilter {
    words: BTreeSet<String>,
}

impl StopwordFilter {
    /// Stop words for one language (`ja`, `en`, `de`, ...).
    ///
    /// Unknown language codes yield an empty list.
    pub fn new(language: &str) -> Self {
        Self {
            words: Self::load_stopwords(language),
        }
    }

    /// Union of the lists for several languages.
    pub fn for_languages<S: AsRef<str>>(languages: &[S]) -> Self {
        let mut filter = Self::empty();
        for lang in languages {
            filter.words.extend(Self::load_stopwords(lang.as_ref()));
        }
        filter
    }

    /// No stop words at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from an explicit list.
    pub fn from_list<S: AsRef<str>>(words: &[S]) -> Self {
        let mut filter = Self::empty();
        filter.add_stopwords(words);
        filter
    }

    /// Add words (trimmed, lowercased; blanks ignored).
    pub fn add_stopwords<S: AsRef<str>>(&mut self, words: &[S]) {
        for word in words {
            let word = word.as_ref().trim();
            if !word.is_empty() {
                self.words.insert(word.to_lowercase());
            }
        }
    }

    pub fn remove_stopwords<S: AsRef<str>>(&mut self, words: &[S]) {
        for word in words {
            self.words.remove(&word.as_ref().trim().to_lowercase());
        }
    }

    /// Case-insensitive membership test.
    pub fn is_stopword(&self, word: &str) -> bool {
        self.words.contains(&word.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// The lowercased words, sorted.
    pub fn words(&self) -> &BTreeSet<String> {
        &self.words
    }

    /// Consume the filter, returning the word set.
    pub fn into_words(self) -> BTreeSet<String> {
        self.words
    }

    /// Render as a `", "`-separated list, suitable for an editable text box.
    pub fn to_list_string(&self) -> String {
        self.words.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
    }

    fn load_stopwords(language: &str) -> BTreeSet<String> {
        let (lang, extra): (LANGUAGE, &[&str]) = match language.to_lowercase().as_str() {
            "ja" | "japanese" => (LANGUAGE::Japanese, &JAPANESE_EXTRA_STOPWORDS),
            "en" | "english" => (LANGUAGE::English, &[]),
            "de" | "german" => (LANGUAGE::German, &[]),
            "fr" | "french" => (LANGUAGE::French, &[]),
            "es" | "spanish" => (LANGUAGE::Spanish, &[]),
            "it" | "italian" => (LANGUAGE::Italian, &[]),
            "pt" | "portuguese" => (LANGUAGE::Portuguese, &[]),
            "nl" | "dutch" => (LANGUAGE::Dutch, &[]),
            "ru" | "russian" => (LANGUAGE::Russian, &[]),
            _ => return BTreeSet::new(),
        };

        get(lang)
            .iter()
            .map(|s| s.to_lowercase())
            .chain(extra.iter().map(|s| s.to_string()))
            .collect()
    }
}

/// Parse a user-edited stop-word list.
///
/// Entries are separated by commas (ASCII or `、`) or line breaks; each is
/// trimmed and lowercased, and blanks are dropped.
pub fn parse_stopword_list(input: &str) -> BTreeSet<String> {
    LIST_SEPARATOR
        .split(input)
        .map(str::trim)
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}
