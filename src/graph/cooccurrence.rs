//! Sentence-scoped co-occurrence counting
//!
//! The qualifying vocabulary comes from the already analyzed morpheme
//! sequence. Co-occurrence, however, is counted on the raw text: it is split
//! into sentences and each sentence is tokenized again on its own, so that
//! pairs are scoped to real sentence membership without mapping sentence
//! boundaries back onto morpheme indices.
//!
//! Within one sentence every lemma counts once, so a pair gains at most one
//! co-occurrence per sentence no matter how often its members repeat.

use std::collections::BTreeSet;

use rayon::prelude::*;
use rustc_hash::FxHashSet;
use tracing::debug;

use super::builder::GraphBuilder;
use super::CooccurrenceGraph;
use crate::filter::FilterSpec;
use crate::nlp::sentence::split_sentences;
use crate::nlp::tokenizer::TokenizerAdapter;
use crate::report::count_lemmas;
use crate::types::{EmptyReason, Morpheme, Outcome};

/// Default minimum occurrences for a lemma to become a node.
pub const DEFAULT_NODE_MIN_FREQ: usize = 2;
/// Default minimum co-occurring sentences for a pair to become an edge.
pub const DEFAULT_EDGE_MIN_FREQ: usize = 2;
/// Sentence count from which sentences are re-tokenized in parallel.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 64;

/// Co-occurrence graph construction settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CooccurrenceBuilder {
    pub node_min_freq: usize,
    pub edge_min_freq: usize,
    /// Below this many sentences, tokenize sequentially
    pub parallel_threshold: usize,
}

impl Default for CooccurrenceBuilder {
    fn default() -> Self {
        Self {
            node_min_freq: DEFAULT_NODE_MIN_FREQ,
            edge_min_freq: DEFAULT_EDGE_MIN_FREQ,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

impl CooccurrenceBuilder {
    pub fn new(node_min_freq: usize, edge_min_freq: usize) -> Self {
        Self {
            node_min_freq,
            edge_min_freq,
            ..Self::default()
        }
    }

    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Build the graph.
    ///
    /// `spec` selects node candidates from `morphemes`; use
    /// [`FilterSpec::network`] for the standard policy.
    pub fn build(
        &self,
        morphemes: &[Morpheme],
        raw_text: &str,
        tokenizer: &TokenizerAdapter,
        spec: &FilterSpec,
    ) -> Outcome<CooccurrenceGraph> {
        let vocabulary: Vec<(&str, usize)> = count_lemmas(spec.select(morphemes))
            .into_iter()
            .filter(|&(_, count)| count >= self.node_min_freq)
            .collect();

        if vocabulary.len() < 2 {
            debug!(found = vocabulary.len(), "too few co-occurrence nodes");
            return Outcome::Empty(EmptyReason::TooFewNodes {
                found: vocabulary.len(),
                node_min_freq: self.node_min_freq,
            });
        }

        let mut builder = GraphBuilder::with_capacity(vocabulary.len());
        for &(lemma, count) in &vocabulary {
            builder.get_or_create_node(lemma, count);
        }
        let known: FxHashSet<&str> = vocabulary.iter().map(|&(lemma, _)| lemma).collect();

        let sentences = split_sentences(raw_text);
        for terms in self.sentence_terms(&sentences, tokenizer, &known) {
            builder.add_sentence(&terms);
        }

        debug!(
            sentences = sentences.len(),
            nodes = builder.node_count(),
            pairs = builder.edge_count(),
            "counted co-occurrences"
        );
        if builder.edge_count() == 0 {
            return Outcome::Empty(EmptyReason::NoCooccurrences);
        }

        let graph = builder.finish(self.edge_min_freq);
        if graph.num_edges() == 0 {
            return Outcome::Empty(EmptyReason::NoEdgesAboveThreshold {
                edge_min_freq: self.edge_min_freq,
            });
        }
        Outcome::Ready(graph)
    }

    /// Deduplicated, sorted vocabulary lemmas of each sentence, in sentence
    /// order. Large inputs are tokenized in parallel; `collect` keeps the
    /// order, so the result is the same either way.
    fn sentence_terms(
        &self,
        sentences: &[&str],
        tokenizer: &TokenizerAdapter,
        known: &FxHashSet<&str>,
    ) -> Vec<Vec<String>> {
        let terms_of = |sentence: &&str| -> Vec<String> {
            tokenizer
                .analyze(sentence)
                .into_iter()
                .filter(|m| known.contains(m.lemma.as_str()))
                .map(|m| m.lemma)
                .collect::<BTreeSet<String>>()
                .into_iter()
                .collect()
        };

        if sentences.len() >= self.parallel_threshold {
            sentences.par_iter().map(terms_of).collect()
        } else {
            sentences.iter().map(terms_of).collect()
        }
    }
}

/// Build a co-occurrence graph with the standard node-candidate policy
/// (default noun exclusions, non-noun lemmas of at least 2 characters).
pub fn build_cooccurrence_graph<S: AsRef<str>>(
    morphemes: &[Morpheme],
    raw_text: &str,
    tokenizer: &TokenizerAdapter,
    target_pos: &[S],
    stop_words: BTreeSet<String>,
    node_min_freq: usize,
    edge_min_freq: usize,
) -> Outcome<CooccurrenceGraph> {
    let spec = FilterSpec::network(target_pos, stop_words);
    CooccurrenceBuilder::new(node_min_freq, edge_min_freq).build(morphemes, raw_text, tokenizer, &spec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{edge_weight, node_size};
    use crate::test_utils::sample_adapter;
    use crate::types::{POS_NOUN, POS_VERB};

    fn graph_for(text: &str, node_min: usize, edge_min: usize) -> Outcome<CooccurrenceGraph> {
        let adapter = sample_adapter();
        let morphs = adapter.analyze(text);
        build_cooccurrence_graph(&morphs, text, &adapter, &[POS_NOUN], BTreeSet::new(), node_min, edge_min)
    }

    #[test]
    fn test_golden_cats_and_dogs() {
        let graph = graph_for("猫が好きです。犬も好きです。", 1, 1).ready().unwrap();

        let nodes: Vec<_> = graph.nodes().iter().map(|n| (n.lemma.as_str(), n.count, n.size)).collect();
        assert_eq!(nodes, vec![("猫", 1, 20), ("好き", 2, 24), ("犬", 1, 20)]);

        let edges: Vec<_> = graph
            .edges()
            .iter()
            .map(|e| (e.source.as_str(), e.target.as_str(), e.count))
            .collect();
        assert_eq!(edges, vec![("好き", "猫", 1), ("好き", "犬", 1)]);
        assert!((graph.edges()[0].weight - edge_weight(1)).abs() < 1e-12);
        assert!(graph.edge("猫", "犬").is_none());
    }

    #[test]
    fn test_repeats_within_sentence_count_once() {
        // Every sentence has {猫, 犬, 鳥}; the first repeats each word.
        let text = "猫と猫と犬と犬と鳥と鳥。猫と犬と鳥。";
        let graph = graph_for(text, 1, 1).ready().unwrap();

        assert_eq!(graph.num_edges(), 3);
        for (a, b) in [("猫", "犬"), ("猫", "鳥"), ("犬", "鳥")] {
            assert_eq!(graph.edge(a, b).unwrap().count, 2, "{a}-{b}");
        }
        assert_eq!(graph.node("猫").unwrap().count, 3);
        assert_eq!(graph.node("猫").unwrap().size, node_size(3));
    }

    #[test]
    fn test_no_cross_sentence_edges() {
        let graph = graph_for("猫と犬。\n鳥と魚！", 1, 1).ready().unwrap();
        assert!(graph.edge("猫", "犬").is_some());
        assert!(graph.edge("鳥", "魚").is_some());
        assert!(graph.edge("犬", "鳥").is_none());
    }

    #[test]
    fn test_too_few_nodes() {
        assert_eq!(
            graph_for("猫が好きです。", 2, 1),
            Outcome::Empty(EmptyReason::TooFewNodes {
                found: 0,
                node_min_freq: 2
            })
        );
        assert_eq!(
            graph_for("猫と猫。", 1, 1),
            Outcome::Empty(EmptyReason::TooFewNodes {
                found: 1,
                node_min_freq: 1
            })
        );
    }

    #[test]
    fn test_no_cooccurrences() {
        assert_eq!(
            graph_for("猫。犬。", 1, 1),
            Outcome::Empty(EmptyReason::NoCooccurrences)
        );
    }

    #[test]
    fn test_no_edges_above_threshold() {
        assert_eq!(
            graph_for("猫と犬。猫と鳥。", 1, 2),
            Outcome::Empty(EmptyReason::NoEdgesAboveThreshold { edge_min_freq: 2 })
        );
    }

    #[test]
    fn test_node_threshold_restricts_vocabulary() {
        let graph = graph_for("猫と犬。猫と犬。猫と鳥。", 2, 1).ready().unwrap();
        assert!(graph.node("鳥").is_none());
        assert_eq!(graph.num_edges(), 1);
        assert_eq!(graph.edge("猫", "犬").unwrap().count, 2);
    }

    #[test]
    fn test_short_verbs_are_not_nodes() {
        // "見" inflects to lemma "見る" (2 chars) and qualifies; nouns of
        // 1 char still qualify.
        let adapter = sample_adapter();
        let text = "猫を見る。犬を見た。";
        let morphs = adapter.analyze(text);
        let graph = build_cooccurrence_graph(
            &morphs,
            text,
            &adapter,
            &[POS_NOUN, POS_VERB],
            BTreeSet::new(),
            1,
            1,
        )
        .ready()
        .unwrap();
        assert_eq!(graph.edge("猫", "見る").unwrap().count, 1);
        assert_eq!(graph.edge("犬", "見る").unwrap().count, 1);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let adapter = sample_adapter();
        let text = "猫と犬と鳥。犬と魚。\n".repeat(40) + "魚と猫。";
        let morphs = adapter.analyze(&text);
        let spec = FilterSpec::network(&[POS_NOUN], BTreeSet::new());

        let sequential = CooccurrenceBuilder::new(1, 1)
            .with_parallel_threshold(usize::MAX)
            .build(&morphs, &text, &adapter, &spec);
        let parallel = CooccurrenceBuilder::new(1, 1)
            .with_parallel_threshold(1)
            .build(&morphs, &text, &adapter, &spec);

        assert!(sequential.is_ready());
        assert_eq!(sequential, parallel);
        let graph = parallel.ready().unwrap();
        assert_eq!(graph.edge("犬", "魚").unwrap().count, 40);
        assert_eq!(graph.edge("猫", "魚").unwrap().count, 1);
    }

    #[test]
    fn test_empty_input() {
        let adapter = sample_adapter();
        let spec = FilterSpec::network(&[POS_NOUN], BTreeSet::new());
        let outcome = CooccurrenceBuilder::new(1, 1).build(&[], "", &adapter, &spec);
        assert!(matches!(outcome, Outcome::Empty(EmptyReason::TooFewNodes { found: 0, .. })));
    }
}
