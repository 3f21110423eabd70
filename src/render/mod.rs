//! Render-facing exports
//!
//! Drawing happens outside this crate. These types package a view together
//! with the font and layout settings a renderer needs, and gate both
//! graphical views on a Japanese font being available.

pub mod font;
pub mod network;

use serde::Serialize;

pub use font::{FontChoice, FontLocator};
pub use network::NetworkView;

use crate::graph::CooccurrenceGraph;
use crate::report::wordcloud::{WeightedWord, WordCloudSource};
use crate::types::{EmptyReason, Outcome};

/// Word-cloud canvas and styling.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WordCloudLayout {
    pub font: FontChoice,
    pub width: u32,
    pub height: u32,
    pub background: &'static str,
    pub colormap: &'static str,
    pub min_font_size: u32,
    /// Seed for reproducible placement
    pub random_state: u64,
    pub words: Vec<WeightedWord>,
    /// Space-joined filtered lemmas
    pub text: String,
}

impl WordCloudLayout {
    pub fn new(source: WordCloudSource, font: FontChoice) -> Self {
        Self {
            font,
            width: 800,
            height: 400,
            background: "white",
            colormap: "viridis",
            min_font_size: 10,
            random_state: 42,
            text: source.to_text(),
            words: source.words,
        }
    }
}

/// Attach a font to a word-cloud source.
///
/// Without a font the result is [`EmptyReason::FontUnavailable`], checked
/// before the source itself.
pub fn word_cloud_layout(
    source: Outcome<WordCloudSource>,
    font: Option<&FontChoice>,
) -> Outcome<WordCloudLayout> {
    let Some(font) = font else {
        return Outcome::Empty(EmptyReason::FontUnavailable);
    };
    source.map(|s| WordCloudLayout::new(s, font.clone()))
}

/// Convert a co-occurrence graph for display; font handling as in
/// [`word_cloud_layout`].
pub fn network_view(
    graph: Outcome<CooccurrenceGraph>,
    font: Option<&FontChoice>,
) -> Outcome<NetworkView> {
    let Some(font) = font else {
        return Outcome::Empty(EmptyReason::FontUnavailable);
    };
    graph.map(|g| NetworkView::from_graph(&g, font))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilterSpec;
    use crate::report::wordcloud::{word_cloud_source, DEFAULT_MAX_WORDS};
    use crate::test_utils::morphemes;
    use crate::types::POS_NOUN;
    use std::collections::BTreeSet;

    fn ipa() -> FontChoice {
        FontChoice::from_path("/fonts/ipagp.ttf").unwrap()
    }

    fn source(text: &str) -> Outcome<WordCloudSource> {
        let spec = FilterSpec::word_cloud(&[POS_NOUN], BTreeSet::new());
        word_cloud_source(&morphemes(text), &spec, DEFAULT_MAX_WORDS)
    }

    #[test]
    fn test_word_cloud_layout_carries_words_and_text() {
        let layout = word_cloud_layout(source("猫と犬と猫。"), Some(&ipa())).ready().unwrap();
        assert_eq!(layout.text, "猫 犬 猫");
        assert_eq!(layout.words[0].text, "猫");
        assert_eq!((layout.width, layout.height), (800, 400));
        assert_eq!(layout.font.family, "ipagp");
    }

    #[test]
    fn test_missing_font_degrades() {
        assert_eq!(
            word_cloud_layout(source("猫。"), None),
            Outcome::Empty(EmptyReason::FontUnavailable)
        );
        assert_eq!(
            network_view(Outcome::Empty(EmptyReason::NoCooccurrences), None),
            Outcome::Empty(EmptyReason::FontUnavailable)
        );
    }

    #[test]
    fn test_upstream_empty_reason_passes_through() {
        assert_eq!(
            word_cloud_layout(source("が。"), Some(&ipa())),
            Outcome::Empty(EmptyReason::NoFilteredTokens)
        );
        assert_eq!(
            network_view(Outcome::Empty(EmptyReason::NoCooccurrences), Some(&ipa())),
            Outcome::Empty(EmptyReason::NoCooccurrences)
        );
    }
}
