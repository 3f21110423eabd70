//! Analysis specification types.
//!
//! An [`AnalysisSpec`] configures one text-mining session: where the
//! tokenizer dictionary lives, which stop words apply, the settings of each
//! view, and runtime knobs. These types are the input to the
//! [`super::validation::ValidationEngine`].
//!
//! # JSON shape
//!
//! ```json
//! {
//!   "v": 1,
//!   "tokenizer": { "dictionary": "ipadic/system.dic.zst" },
//!   "stop_words": { "languages": ["ja"], "extra": ["例"], "remove": [] },
//!   "views": {
//!     "report":     { "target_pos": ["名詞", "動詞", "形容詞"] },
//!     "word_cloud": { "target_pos": ["名詞"], "max_words": 200 },
//!     "network":    { "target_pos": ["名詞"], "node_min_freq": 2, "edge_min_freq": 2 },
//!     "kwic":       { "window": 5, "key_field": "lemma" }
//!   },
//!   "runtime": { "parallel_sentence_threshold": 64, "cache_capacity": 32 },
//!   "strict": false
//! }
//! ```
//!
//! Every section may be omitted and falls back to the values above (the
//! dictionary has no default).

use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::validation::ValidationEngine;
use crate::errors::{MiningError, Result};
use crate::graph::cooccurrence::{
    DEFAULT_EDGE_MIN_FREQ, DEFAULT_NODE_MIN_FREQ, DEFAULT_PARALLEL_THRESHOLD,
};
use crate::kwic::{KeyField, DEFAULT_WINDOW};
use crate::nlp::stopwords::StopwordFilter;
use crate::report::wordcloud::DEFAULT_MAX_WORDS;
use crate::types::{DEFAULT_TARGET_POS, POS_NOUN};

/// The only spec version understood by this crate.
pub const SPEC_VERSION: u32 = 1;

/// Default capacity of each per-view memo cache.
pub const DEFAULT_CACHE_CAPACITY: usize = 32;

type UnknownFields = HashMap<String, serde_json::Value>;

fn spec_version() -> u32 {
    SPEC_VERSION
}

/// Top-level analysis specification (v1).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisSpec {
    /// Spec version (currently `1`).
    #[serde(default = "spec_version")]
    pub v: u32,

    #[serde(default)]
    pub tokenizer: TokenizerSpec,

    #[serde(default)]
    pub stop_words: StopWordsSpec,

    #[serde(default)]
    pub views: ViewsSpec,

    #[serde(default)]
    pub runtime: RuntimeSpec,

    /// If `true`, unrecognized fields are errors; if `false`, warnings.
    #[serde(default)]
    pub strict: bool,

    /// Captures any fields not recognized by the schema.
    #[serde(flatten)]
    pub unknown_fields: UnknownFields,
}

impl Default for AnalysisSpec {
    fn default() -> Self {
        Self {
            v: SPEC_VERSION,
            tokenizer: TokenizerSpec::default(),
            stop_words: StopWordsSpec::default(),
            views: ViewsSpec::default(),
            runtime: RuntimeSpec::default(),
            strict: false,
            unknown_fields: UnknownFields::new(),
        }
    }
}

impl AnalysisSpec {
    /// Parse a spec without validating it.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse a spec and run the default validation rules.
    ///
    /// Warnings are accepted; any error-severity diagnostic rejects the spec
    /// with [`MiningError::InvalidSpec`].
    pub fn from_json_validated(json: &str) -> Result<Self> {
        let spec = Self::from_json(json)?;
        spec.validate()?;
        Ok(spec)
    }

    /// Run the default validation rules.
    pub fn validate(&self) -> Result<()> {
        let report = ValidationEngine::with_defaults().validate(self);
        for warning in report.warnings() {
            tracing::warn!(%warning, "analysis spec warning");
        }
        if report.has_errors() {
            return Err(MiningError::InvalidSpec(report));
        }
        Ok(())
    }

    /// The effective stop-word set: language lists, plus `extra`, minus
    /// `remove`.
    pub fn stop_word_set(&self) -> BTreeSet<String> {
        let mut filter = StopwordFilter::for_languages(&self.stop_words.languages);
        filter.add_stopwords(&self.stop_words.extra);
        filter.remove_stopwords(&self.stop_words.remove);
        filter.into_words()
    }
}

/// Tokenizer backend settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenizerSpec {
    /// Path to a vibrato system dictionary (optionally zstd-compressed).
    #[serde(default)]
    pub dictionary: Option<PathBuf>,

    #[serde(flatten)]
    pub unknown_fields: UnknownFields,
}

fn default_languages() -> Vec<String> {
    vec!["ja".to_string()]
}

/// Stop-word configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StopWordsSpec {
    /// Built-in lists to start from
    #[serde(default = "default_languages")]
    pub languages: Vec<String>,
    /// Words added on top of the built-in lists
    #[serde(default)]
    pub extra: Vec<String>,
    /// Words removed from the built-in lists
    #[serde(default)]
    pub remove: Vec<String>,

    #[serde(flatten)]
    pub unknown_fields: UnknownFields,
}

impl Default for StopWordsSpec {
    fn default() -> Self {
        Self {
            languages: default_languages(),
            extra: Vec::new(),
            remove: Vec::new(),
            unknown_fields: UnknownFields::new(),
        }
    }
}

/// Per-view settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ViewsSpec {
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub word_cloud: WordCloudConfig,
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub kwic: KwicConfig,

    #[serde(flatten)]
    pub unknown_fields: UnknownFields,
}

fn default_report_pos() -> Vec<String> {
    DEFAULT_TARGET_POS.iter().map(|s| s.to_string()).collect()
}

fn default_noun_pos() -> Vec<String> {
    vec![POS_NOUN.to_string()]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "default_report_pos")]
    pub target_pos: Vec<String>,

    #[serde(flatten)]
    pub unknown_fields: UnknownFields,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            target_pos: default_report_pos(),
            unknown_fields: UnknownFields::new(),
        }
    }
}

fn default_max_words() -> usize {
    DEFAULT_MAX_WORDS
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordCloudConfig {
    #[serde(default = "default_noun_pos")]
    pub target_pos: Vec<String>,
    #[serde(default = "default_max_words")]
    pub max_words: usize,

    #[serde(flatten)]
    pub unknown_fields: UnknownFields,
}

impl Default for WordCloudConfig {
    fn default() -> Self {
        Self {
            target_pos: default_noun_pos(),
            max_words: DEFAULT_MAX_WORDS,
            unknown_fields: UnknownFields::new(),
        }
    }
}

fn default_node_min_freq() -> usize {
    DEFAULT_NODE_MIN_FREQ
}

fn default_edge_min_freq() -> usize {
    DEFAULT_EDGE_MIN_FREQ
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    #[serde(default = "default_noun_pos")]
    pub target_pos: Vec<String>,
    #[serde(default = "default_node_min_freq")]
    pub node_min_freq: usize,
    #[serde(default = "default_edge_min_freq")]
    pub edge_min_freq: usize,

    #[serde(flatten)]
    pub unknown_fields: UnknownFields,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            target_pos: default_noun_pos(),
            node_min_freq: DEFAULT_NODE_MIN_FREQ,
            edge_min_freq: DEFAULT_EDGE_MIN_FREQ,
            unknown_fields: UnknownFields::new(),
        }
    }
}

fn default_window() -> usize {
    DEFAULT_WINDOW
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KwicConfig {
    /// Keyword searched by a full run; omitted means no KWIC result.
    #[serde(default)]
    pub keyword: Option<String>,
    #[serde(default = "default_window")]
    pub window: usize,
    #[serde(default)]
    pub key_field: KeyField,

    #[serde(flatten)]
    pub unknown_fields: UnknownFields,
}

impl Default for KwicConfig {
    fn default() -> Self {
        Self {
            keyword: None,
            window: DEFAULT_WINDOW,
            key_field: KeyField::default(),
            unknown_fields: UnknownFields::new(),
        }
    }
}

fn default_parallel_threshold() -> usize {
    DEFAULT_PARALLEL_THRESHOLD
}

fn default_cache_capacity() -> usize {
    DEFAULT_CACHE_CAPACITY
}

/// Runtime execution settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeSpec {
    /// Sentence count from which co-occurrence re-tokenizes in parallel.
    #[serde(default = "default_parallel_threshold")]
    pub parallel_sentence_threshold: usize,

    /// Entries kept per view cache; `0` disables caching.
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,

    #[serde(flatten)]
    pub unknown_fields: UnknownFields,
}

impl Default for RuntimeSpec {
    fn default() -> Self {
        Self {
            parallel_sentence_threshold: DEFAULT_PARALLEL_THRESHOLD,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            unknown_fields: UnknownFields::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_minimal_spec() {
        let spec = AnalysisSpec::from_json("{}").unwrap();
        assert_eq!(spec.v, SPEC_VERSION);
        assert!(spec.tokenizer.dictionary.is_none());
        assert_eq!(spec.views.report.target_pos, vec!["名詞", "動詞", "形容詞"]);
        assert_eq!(spec.views.network.node_min_freq, 2);
        assert_eq!(spec.views.kwic.window, 5);
        assert_eq!(spec.runtime.cache_capacity, 32);
        assert!(!spec.strict);
    }

    #[test]
    fn test_deserialize_full_spec() {
        let json = r#"{
            "v": 1,
            "tokenizer": { "dictionary": "/dic/system.dic.zst" },
            "stop_words": { "languages": ["ja", "en"], "extra": ["端末"], "remove": ["する"] },
            "views": {
                "word_cloud": { "target_pos": ["名詞", "動詞"], "max_words": 50 },
                "network": { "node_min_freq": 3, "edge_min_freq": 1 },
                "kwic": { "keyword": "確認", "window": 3, "key_field": "surface" }
            },
            "runtime": { "parallel_sentence_threshold": 8 },
            "strict": true
        }"#;
        let spec = AnalysisSpec::from_json(json).unwrap();
        assert_eq!(
            spec.tokenizer.dictionary.as_deref(),
            Some(std::path::Path::new("/dic/system.dic.zst"))
        );
        assert_eq!(spec.views.word_cloud.max_words, 50);
        assert_eq!(spec.views.network.target_pos, vec!["名詞"]);
        assert_eq!(spec.views.network.node_min_freq, 3);
        assert_eq!(spec.views.kwic.key_field, KeyField::Surface);
        assert_eq!(spec.views.kwic.keyword.as_deref(), Some("確認"));
        assert_eq!(spec.runtime.parallel_sentence_threshold, 8);
        assert_eq!(spec.runtime.cache_capacity, 32);
        assert!(spec.strict);
    }

    #[test]
    fn test_unknown_fields_captured() {
        let json = r#"{
            "bogus_top_level": 42,
            "views": { "network": { "layout": "force" }, "heatmap": {} }
        }"#;
        let spec = AnalysisSpec::from_json(json).unwrap();
        assert!(spec.unknown_fields.contains_key("bogus_top_level"));
        assert!(spec.views.unknown_fields.contains_key("heatmap"));
        assert!(spec.views.network.unknown_fields.contains_key("layout"));
    }

    #[test]
    fn test_malformed_json_is_config_error() {
        let err = AnalysisSpec::from_json(r#"{ "v": "one" }"#).unwrap_err();
        assert!(matches!(err, MiningError::Config(_)));
    }

    #[test]
    fn test_stop_word_set_applies_extra_and_remove() {
        let spec = AnalysisSpec::from_json(
            r#"{ "stop_words": { "extra": [" 端末 ", "POS"], "remove": ["する"] } }"#,
        )
        .unwrap();
        let words = spec.stop_word_set();
        assert!(words.contains("端末"));
        assert!(words.contains("pos"));
        assert!(words.contains("これ"));
        assert!(!words.contains("する"));
    }

    #[test]
    fn test_from_json_validated_rejects_errors() {
        // No dictionary configured.
        let err = AnalysisSpec::from_json_validated("{}").unwrap_err();
        assert!(matches!(err, MiningError::InvalidSpec(_)));
        assert!(err.to_string().contains("/tokenizer/dictionary"));

        let ok = AnalysisSpec::from_json_validated(
            r#"{ "tokenizer": { "dictionary": "system.dic" }, "views": { "kwic": { "window": 0 } } }"#,
        );
        assert!(ok.is_ok(), "warnings alone must not reject the spec");
    }

    #[test]
    fn test_serde_roundtrip_keeps_views() {
        let spec = AnalysisSpec::from_json(r#"{ "views": { "kwic": { "key_field": "surface" } } }"#).unwrap();
        let back = serde_json::to_value(&spec).unwrap();
        assert_eq!(back["views"]["kwic"]["key_field"], "surface");
        assert_eq!(back["views"]["word_cloud"]["max_words"], 200);
    }
}
