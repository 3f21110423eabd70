//! Session runner: orchestrates analysis and the derived views.
//!
//! A [`TextMiner`] owns the shared tokenizer, the stop-word set and one memo
//! cache per expensive view. Text is tokenized once into a [`Document`];
//! every view is then a pure function of that document and an explicit
//! request value, so repeated identical requests can be served from cache.
//!
//! [`TextMiner::run`] executes all views for an [`AnalysisSpec`], notifying
//! a [`PipelineObserver`] at each stage boundary.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::{debug, info};

use crate::errors::{MiningError, Result};
use crate::filter::FilterSpec;
use crate::graph::cooccurrence::{
    DEFAULT_EDGE_MIN_FREQ, DEFAULT_NODE_MIN_FREQ, DEFAULT_PARALLEL_THRESHOLD,
};
use crate::graph::{CooccurrenceBuilder, CooccurrenceGraph};
use crate::kwic::{self, KeyField, KwicHit, DEFAULT_WINDOW};
use crate::nlp::stopwords::StopwordFilter;
use crate::nlp::tokenizer::{TokenizerAdapter, TokenizerStatus};
use crate::pipeline::cache::{cache_for, CachePolicy};
use crate::pipeline::observer::{
    PipelineObserver, StageClock, StageReportBuilder, STAGE_KWIC, STAGE_NETWORK, STAGE_REPORT,
    STAGE_TOKENIZE, STAGE_WORD_CLOUD,
};
use crate::pipeline::spec::{
    AnalysisSpec, KwicConfig, NetworkConfig, ReportConfig, WordCloudConfig, DEFAULT_CACHE_CAPACITY,
};
use crate::report::wordcloud::{word_cloud_source, WordCloudSource, DEFAULT_MAX_WORDS};
use crate::report::{self, FrequencyReport};
use crate::types::{Document, EmptyReason, Outcome};

/// Enter a tracing span for a pipeline stage.
macro_rules! trace_stage {
    ($name:expr) => {
        let _span = tracing::info_span!("pipeline_stage", stage = $name).entered();
    };
}

// ============================================================================
// Requests
// ============================================================================

/// Frequency report request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReportRequest {
    pub filter: FilterSpec,
}

impl ReportRequest {
    pub fn new<S: AsRef<str>>(target_pos: &[S], stop_words: BTreeSet<String>) -> Self {
        Self {
            filter: FilterSpec::report(target_pos, stop_words),
        }
    }

    pub fn from_config(config: &ReportConfig, stop_words: BTreeSet<String>) -> Self {
        Self::new(&config.target_pos, stop_words)
    }
}

/// Word-cloud source request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WordCloudRequest {
    pub filter: FilterSpec,
    pub max_words: usize,
}

impl WordCloudRequest {
    pub fn new<S: AsRef<str>>(target_pos: &[S], stop_words: BTreeSet<String>) -> Self {
        Self {
            filter: FilterSpec::word_cloud(target_pos, stop_words),
            max_words: DEFAULT_MAX_WORDS,
        }
    }

    pub fn with_max_words(mut self, max_words: usize) -> Self {
        self.max_words = max_words;
        self
    }

    pub fn from_config(config: &WordCloudConfig, stop_words: BTreeSet<String>) -> Self {
        Self::new(&config.target_pos, stop_words).with_max_words(config.max_words)
    }
}

/// Co-occurrence network request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NetworkRequest {
    pub filter: FilterSpec,
    pub node_min_freq: usize,
    pub edge_min_freq: usize,
}

impl NetworkRequest {
    pub fn new<S: AsRef<str>>(target_pos: &[S], stop_words: BTreeSet<String>) -> Self {
        Self {
            filter: FilterSpec::network(target_pos, stop_words),
            node_min_freq: DEFAULT_NODE_MIN_FREQ,
            edge_min_freq: DEFAULT_EDGE_MIN_FREQ,
        }
    }

    pub fn with_thresholds(mut self, node_min_freq: usize, edge_min_freq: usize) -> Self {
        self.node_min_freq = node_min_freq;
        self.edge_min_freq = edge_min_freq;
        self
    }

    pub fn from_config(config: &NetworkConfig, stop_words: BTreeSet<String>) -> Self {
        Self::new(&config.target_pos, stop_words)
            .with_thresholds(config.node_min_freq, config.edge_min_freq)
    }
}

/// KWIC request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KwicRequest {
    pub keyword: String,
    pub key_field: KeyField,
    pub window: usize,
}

impl KwicRequest {
    pub fn new(keyword: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            key_field: KeyField::default(),
            window: DEFAULT_WINDOW,
        }
    }

    pub fn with_key_field(mut self, key_field: KeyField) -> Self {
        self.key_field = key_field;
        self
    }

    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    /// `None` when the config names no keyword.
    pub fn from_config(config: &KwicConfig) -> Option<Self> {
        let keyword = config.keyword.as_ref()?;
        Some(
            Self::new(keyword.as_str())
                .with_key_field(config.key_field)
                .with_window(config.window),
        )
    }
}

/// Every view computed by [`TextMiner::run`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResults {
    pub morpheme_count: usize,
    pub report: FrequencyReport,
    pub word_cloud: Outcome<WordCloudSource>,
    pub network: Outcome<CooccurrenceGraph>,
    /// Absent when no keyword was requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kwic: Option<Outcome<Vec<KwicHit>>>,
}

// ============================================================================
// TextMiner
// ============================================================================

/// Views are memoized on the full document value plus the request.
type CacheKey<R> = (Document, R);

/// A text-mining session.
pub struct TextMiner {
    tokenizer: TokenizerAdapter,
    stop_words: BTreeSet<String>,
    parallel_threshold: usize,
    report_cache: Box<dyn CachePolicy<CacheKey<ReportRequest>, FrequencyReport>>,
    word_cloud_cache: Box<dyn CachePolicy<CacheKey<WordCloudRequest>, Outcome<WordCloudSource>>>,
    network_cache: Box<dyn CachePolicy<CacheKey<NetworkRequest>, Outcome<CooccurrenceGraph>>>,
}

impl std::fmt::Debug for TextMiner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextMiner")
            .field("tokenizer", &self.tokenizer)
            .field("stop_words", &self.stop_words.len())
            .field("parallel_threshold", &self.parallel_threshold)
            .finish()
    }
}

impl TextMiner {
    /// A session over `tokenizer` with the Japanese stop-word list and
    /// default runtime settings.
    pub fn new(tokenizer: TokenizerAdapter) -> Self {
        Self {
            tokenizer,
            stop_words: StopwordFilter::new("ja").into_words(),
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
            report_cache: cache_for(DEFAULT_CACHE_CAPACITY),
            word_cloud_cache: cache_for(DEFAULT_CACHE_CAPACITY),
            network_cache: cache_for(DEFAULT_CACHE_CAPACITY),
        }
    }

    /// Validate `spec` and build a session backed by its vibrato dictionary.
    ///
    /// The dictionary is loaded lazily on first analysis; a bad path
    /// surfaces then as [`EmptyReason::TokenizerUnavailable`].
    pub fn from_spec(spec: &AnalysisSpec) -> Result<Self> {
        spec.validate()?;
        let dictionary = spec
            .tokenizer
            .dictionary
            .clone()
            .ok_or(MiningError::MissingDictionary)?;
        Ok(Self::new(TokenizerAdapter::vibrato(dictionary))
            .with_stop_words(spec.stop_word_set())
            .with_parallel_threshold(spec.runtime.parallel_sentence_threshold)
            .with_cache_capacity(spec.runtime.cache_capacity))
    }

    pub fn with_stop_words(mut self, stop_words: BTreeSet<String>) -> Self {
        self.stop_words = stop_words;
        self
    }

    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Replace every view cache with one of `capacity` entries (`0` disables).
    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.report_cache = cache_for(capacity);
        self.word_cloud_cache = cache_for(capacity);
        self.network_cache = cache_for(capacity);
        self
    }

    pub fn tokenizer(&self) -> &TokenizerAdapter {
        &self.tokenizer
    }

    pub fn tokenizer_status(&self) -> TokenizerStatus {
        self.tokenizer.status()
    }

    pub fn stop_words(&self) -> &BTreeSet<String> {
        &self.stop_words
    }

    /// Drop every cached view.
    pub fn clear_caches(&self) {
        self.report_cache.clear();
        self.word_cloud_cache.clear();
        self.network_cache.clear();
    }

    // ------------------------------------------------------------------------
    // Analysis
    // ------------------------------------------------------------------------

    /// Tokenize `text` into a [`Document`].
    pub fn analyze(&self, text: &str) -> Outcome<Document> {
        trace_stage!(STAGE_TOKENIZE);
        self.tokenizer
            .analyze_outcome(text)
            .map(|morphemes| Document::new(text, morphemes))
    }

    // ------------------------------------------------------------------------
    // Views
    // ------------------------------------------------------------------------

    pub fn report(&self, doc: &Document, request: &ReportRequest) -> FrequencyReport {
        self.report_cached(doc, request).0
    }

    pub fn word_cloud(&self, doc: &Document, request: &WordCloudRequest) -> Outcome<WordCloudSource> {
        self.word_cloud_cached(doc, request).0
    }

    pub fn network(&self, doc: &Document, request: &NetworkRequest) -> Outcome<CooccurrenceGraph> {
        self.network_cached(doc, request).0
    }

    /// Keyword-in-context lines for `request.keyword`.
    pub fn kwic(&self, doc: &Document, request: &KwicRequest) -> Outcome<Vec<KwicHit>> {
        trace_stage!(STAGE_KWIC);
        if doc.is_empty() {
            return Outcome::Empty(EmptyReason::NoMorphemes);
        }
        let keyword = request.keyword.trim();
        if keyword.is_empty() {
            return Outcome::Empty(EmptyReason::BlankKeyword);
        }
        let hits = kwic::search(doc.morphemes(), keyword, request.key_field, request.window);
        debug!(keyword, hits = hits.len(), "kwic search");
        if hits.is_empty() {
            Outcome::Empty(EmptyReason::NoMatches {
                keyword: keyword.to_string(),
            })
        } else {
            Outcome::Ready(hits)
        }
    }

    fn report_cached(&self, doc: &Document, request: &ReportRequest) -> (FrequencyReport, bool) {
        trace_stage!(STAGE_REPORT);
        cached(self.report_cache.as_ref(), (doc.clone(), request.clone()), || {
            let result = report::report(doc.morphemes(), &request.filter);
            debug!(rows = result.rows.len(), filtered = result.total_filtered, "frequency report");
            result
        })
    }

    fn word_cloud_cached(
        &self,
        doc: &Document,
        request: &WordCloudRequest,
    ) -> (Outcome<WordCloudSource>, bool) {
        trace_stage!(STAGE_WORD_CLOUD);
        cached(self.word_cloud_cache.as_ref(), (doc.clone(), request.clone()), || {
            word_cloud_source(doc.morphemes(), &request.filter, request.max_words)
        })
    }

    fn network_cached(
        &self,
        doc: &Document,
        request: &NetworkRequest,
    ) -> (Outcome<CooccurrenceGraph>, bool) {
        trace_stage!(STAGE_NETWORK);
        if doc.is_empty() {
            return (Outcome::Empty(EmptyReason::NoMorphemes), false);
        }
        cached(self.network_cache.as_ref(), (doc.clone(), request.clone()), || {
            CooccurrenceBuilder::new(request.node_min_freq, request.edge_min_freq)
                .with_parallel_threshold(self.parallel_threshold)
                .build(doc.morphemes(), doc.text(), &self.tokenizer, &request.filter)
        })
    }

    // ------------------------------------------------------------------------
    // Full runs
    // ------------------------------------------------------------------------

    /// Compute every view of `doc` configured by `spec.views`, using this
    /// session's stop words.
    pub fn run(
        &self,
        doc: &Document,
        spec: &AnalysisSpec,
        observer: &mut impl PipelineObserver,
    ) -> AnalysisResults {
        let views = &spec.views;

        observer.on_stage_start(STAGE_REPORT);
        let clock = StageClock::start();
        let request = ReportRequest::from_config(&views.report, self.stop_words.clone());
        let (report, hit) = self.report_cached(doc, &request);
        let stage = StageReportBuilder::new(clock.elapsed())
            .items(report.rows.len())
            .cache_hit(hit)
            .build();
        observer.on_stage_end(STAGE_REPORT, &stage);

        observer.on_stage_start(STAGE_WORD_CLOUD);
        let clock = StageClock::start();
        let request = WordCloudRequest::from_config(&views.word_cloud, self.stop_words.clone());
        let (word_cloud, hit) = self.word_cloud_cached(doc, &request);
        let stage = StageReportBuilder::new(clock.elapsed())
            .items(word_cloud.as_ready().map_or(0, WordCloudSource::len))
            .cache_hit(hit)
            .build();
        observer.on_stage_end(STAGE_WORD_CLOUD, &stage);

        observer.on_stage_start(STAGE_NETWORK);
        let clock = StageClock::start();
        let request = NetworkRequest::from_config(&views.network, self.stop_words.clone());
        let (network, hit) = self.network_cached(doc, &request);
        let (nodes, edges) = network
            .as_ready()
            .map_or((0, 0), |g| (g.num_nodes(), g.num_edges()));
        let stage = StageReportBuilder::new(clock.elapsed())
            .nodes(nodes)
            .edges(edges)
            .cache_hit(hit)
            .build();
        observer.on_stage_end(STAGE_NETWORK, &stage);

        let kwic = KwicRequest::from_config(&views.kwic).map(|request| {
            observer.on_stage_start(STAGE_KWIC);
            let clock = StageClock::start();
            let hits = self.kwic(doc, &request);
            let stage = StageReportBuilder::new(clock.elapsed())
                .items(hits.as_ready().map_or(0, Vec::len))
                .build();
            observer.on_stage_end(STAGE_KWIC, &stage);
            hits
        });

        info!(
            morphemes = doc.len(),
            report_rows = report.rows.len(),
            network_nodes = nodes,
            network_edges = edges,
            "analysis complete"
        );

        AnalysisResults {
            morpheme_count: doc.len(),
            report,
            word_cloud,
            network,
            kwic,
        }
    }

    /// Tokenize `text` and [`run`](Self::run) every view over it.
    pub fn run_text(
        &self,
        text: &str,
        spec: &AnalysisSpec,
        observer: &mut impl PipelineObserver,
    ) -> Outcome<AnalysisResults> {
        observer.on_stage_start(STAGE_TOKENIZE);
        let clock = StageClock::start();
        let doc = self.analyze(text);
        let stage = StageReportBuilder::new(clock.elapsed())
            .items(doc.as_ready().map_or(0, Document::len))
            .build();
        observer.on_stage_end(STAGE_TOKENIZE, &stage);

        match doc {
            Outcome::Ready(doc) => Outcome::Ready(self.run(&doc, spec, observer)),
            Outcome::Empty(reason) => Outcome::Empty(reason),
        }
    }
}

/// Look `key` up in `cache`, computing and storing on a miss. The flag
/// reports a hit.
fn cached<K, V: Clone>(
    cache: &dyn CachePolicy<K, V>,
    key: K,
    compute: impl FnOnce() -> V,
) -> (V, bool) {
    if let Some(value) = cache.get(&key) {
        debug!("view served from cache");
        return (value, true);
    }
    let value = compute();
    cache.put(key, value.clone());
    (value, false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::observer::{NoopObserver, RecordingObserver};
    use crate::test_utils::sample_adapter;
    use crate::types::{Morpheme, POS_NOUN};

    fn miner() -> TextMiner {
        TextMiner::new(sample_adapter())
    }

    fn doc(text: &str) -> Document {
        miner().analyze(text).ready().unwrap()
    }

    fn spec(json: &str) -> AnalysisSpec {
        AnalysisSpec::from_json(json).unwrap()
    }

    #[test]
    fn test_analyze_blank_input() {
        assert_eq!(
            miner().analyze("  \n "),
            Outcome::Empty(EmptyReason::BlankInput)
        );
    }

    #[test]
    fn test_report_view() {
        let d = doc("猫と犬。猫と鳥。");
        let report = miner().report(&d, &ReportRequest::new(&[POS_NOUN], BTreeSet::new()));
        assert_eq!(report.total_morphemes, 8);
        assert_eq!(report.rows[0].lemma, "猫");
        assert_eq!(report.rows[0].percentage, 25.0);
    }

    #[test]
    fn test_cache_separates_documents_with_same_text_and_length() {
        let m = miner();
        let request = ReportRequest::new(&[POS_NOUN], BTreeSet::new());
        let cat = Document::new("x", vec![Morpheme::new("x", "猫", POS_NOUN)]);
        let dog = Document::new("x", vec![Morpheme::new("x", "犬", POS_NOUN)]);

        assert_eq!(m.report(&cat, &request).rows[0].lemma, "猫");
        let (report, hit) = m.report_cached(&dog, &request);
        assert!(!hit);
        assert_eq!(report.rows[0].lemma, "犬");

        let (_, hit) = m.report_cached(&cat, &request);
        assert!(hit);
    }

    #[test]
    fn test_network_view_golden() {
        let m = miner();
        let d = m.analyze("猫が好きです。犬も好きです。").ready().unwrap();
        let request = NetworkRequest::new(&[POS_NOUN], m.stop_words().clone()).with_thresholds(1, 1);
        let graph = m.network(&d, &request).ready().unwrap();
        assert_eq!(graph.num_nodes(), 3);
        assert_eq!(graph.num_edges(), 2);
        assert_eq!(graph.node("好き").unwrap().size, 24);
    }

    #[test]
    fn test_kwic_view_outcomes() {
        let m = miner();
        let d = m.analyze("猫を見た。犬を見る。").ready().unwrap();

        let hits = m.kwic(&d, &KwicRequest::new("見る").with_window(1)).ready().unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].left_context, "を");

        assert_eq!(
            m.kwic(&d, &KwicRequest::new(" ")),
            Outcome::Empty(EmptyReason::BlankKeyword)
        );
        assert_eq!(
            m.kwic(&d, &KwicRequest::new(" 鳥 ")),
            Outcome::Empty(EmptyReason::NoMatches {
                keyword: "鳥".to_string()
            })
        );
    }

    #[test]
    fn test_run_reports_every_stage() {
        let m = miner();
        let s = spec(r#"{
            "views": {
                "network": { "node_min_freq": 1, "edge_min_freq": 1 },
                "kwic": { "keyword": "猫" }
            }
        }"#);
        let mut obs = RecordingObserver::new();

        let results = m
            .run_text("猫が好きです。犬も好きです。", &s, &mut obs)
            .ready()
            .unwrap();

        let stages: Vec<&str> = obs.reports().iter().map(|(name, _)| *name).collect();
        assert_eq!(
            stages,
            vec![STAGE_TOKENIZE, STAGE_REPORT, STAGE_WORD_CLOUD, STAGE_NETWORK, STAGE_KWIC]
        );
        let network = obs.report(STAGE_NETWORK).unwrap();
        assert_eq!(network.nodes(), Some(3));
        assert_eq!(network.edges(), Some(2));

        assert!(results.network.is_ready());
        assert_eq!(results.kwic.unwrap().ready().unwrap().len(), 1);
        // 好き is a noun (形容動詞語幹); です is a stop word and not a target.
        assert_eq!(results.report.rows[0].lemma, "好き");
    }

    #[test]
    fn test_run_without_keyword_skips_kwic() {
        let m = miner();
        let d = m.analyze("猫と犬。").ready().unwrap();
        let mut obs = RecordingObserver::new();
        let results = m.run(&d, &AnalysisSpec::default(), &mut obs);
        assert!(results.kwic.is_none());
        assert!(obs.report(STAGE_KWIC).is_none());
        // Default thresholds of 2 leave nothing to connect.
        assert!(matches!(
            results.network,
            Outcome::Empty(EmptyReason::TooFewNodes { .. })
        ));
    }

    #[test]
    fn test_second_run_hits_cache() {
        let m = miner();
        let d = m.analyze("猫と犬。猫と犬。").ready().unwrap();
        let s = AnalysisSpec::default();

        let mut first = RecordingObserver::new();
        let a = m.run(&d, &s, &mut first);
        let mut second = RecordingObserver::new();
        let b = m.run(&d, &s, &mut second);

        assert_eq!(a, b);
        assert!(!first.report(STAGE_NETWORK).unwrap().cache_hit());
        assert!(second.report(STAGE_NETWORK).unwrap().cache_hit());
        assert!(second.report(STAGE_REPORT).unwrap().cache_hit());

        m.clear_caches();
        let mut third = RecordingObserver::new();
        m.run(&d, &s, &mut third);
        assert!(!third.report(STAGE_NETWORK).unwrap().cache_hit());
    }

    #[test]
    fn test_disabled_cache_never_hits() {
        let m = miner().with_cache_capacity(0);
        let d = m.analyze("猫と犬。").ready().unwrap();
        let s = AnalysisSpec::default();
        m.run(&d, &s, &mut NoopObserver);
        let mut obs = RecordingObserver::new();
        m.run(&d, &s, &mut obs);
        assert!(!obs.report(STAGE_REPORT).unwrap().cache_hit());
    }

    #[test]
    fn test_from_spec_requires_dictionary() {
        let err = TextMiner::from_spec(&AnalysisSpec::default()).unwrap_err();
        assert!(matches!(err, MiningError::InvalidSpec(_)));
    }

    #[test]
    fn test_from_spec_with_missing_dictionary_file_degrades() {
        let s = spec(r#"{
            "tokenizer": { "dictionary": "/nonexistent/system.dic.zst" },
            "stop_words": { "extra": ["猫"] },
            "runtime": { "cache_capacity": 0 }
        }"#);
        let m = TextMiner::from_spec(&s).unwrap();
        assert!(m.stop_words().contains("猫"));
        assert_eq!(m.tokenizer_status(), TokenizerStatus::Uninitialized);

        let outcome = m.analyze("猫が好きです。");
        assert!(matches!(
            outcome,
            Outcome::Empty(EmptyReason::TokenizerUnavailable { .. })
        ));
        assert!(matches!(m.tokenizer_status(), TokenizerStatus::Unavailable(_)));
    }

    #[test]
    fn test_results_serialize() {
        let m = miner();
        let s = spec(r#"{ "views": { "kwic": { "keyword": "猫" } } }"#);
        let results = m.run_text("猫と犬。", &s, &mut NoopObserver).ready().unwrap();
        let json = serde_json::to_value(&results).unwrap();
        assert_eq!(json["report"]["rows"][0]["lemma"], "猫");
        assert_eq!(json["network"]["empty"]["reason"], "too_few_nodes");
    }
}
