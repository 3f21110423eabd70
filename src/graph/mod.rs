//! Co-occurrence graph construction and representation
//!
//! Nodes are lemmas from the qualifying vocabulary; an undirected edge joins
//! two lemmas that appear together in at least `edge_min_freq` sentences.

pub mod builder;
pub mod cooccurrence;

use rustc_hash::FxHashMap;
use serde::Serialize;

pub use cooccurrence::{build_cooccurrence_graph, CooccurrenceBuilder};

/// Display size of a node with `count` occurrences: `round(sqrt(count) * 10 + 10)`.
pub fn node_size(count: usize) -> u32 {
    ((count as f64).sqrt() * 10.0 + 10.0).round() as u32
}

/// Display weight of an edge co-occurring `count` times: `ln(1 + count) * 1.5 + 0.5`.
pub fn edge_weight(count: usize) -> f64 {
    (count as f64).ln_1p() * 1.5 + 0.5
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphNode {
    pub lemma: String,
    /// Occurrences among node candidates
    pub count: usize,
    pub size: u32,
}

/// An undirected edge; `source` sorts before `target`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    /// Number of sentences containing both lemmas
    pub count: usize,
    pub weight: f64,
}

/// A weighted, undirected co-occurrence graph
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CooccurrenceGraph {
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
    #[serde(skip)]
    lemma_to_id: FxHashMap<String, usize>,
}

impl CooccurrenceGraph {
    pub(crate) fn new(nodes: Vec<GraphNode>, edges: Vec<GraphEdge>) -> Self {
        let lemma_to_id = nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.lemma.clone(), i))
            .collect();
        Self {
            nodes,
            edges,
            lemma_to_id,
        }
    }

    /// Nodes in first-occurrence order
    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    /// Edges in first co-occurrence order
    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn node(&self, lemma: &str) -> Option<&GraphNode> {
        self.lemma_to_id.get(lemma).map(|&i| &self.nodes[i])
    }

    /// The edge between `a` and `b`, in either order
    pub fn edge(&self, a: &str, b: &str) -> Option<&GraphEdge> {
        let (source, target) = if a <= b { (a, b) } else { (b, a) };
        self.edges
            .iter()
            .find(|e| e.source == source && e.target == target)
    }

    /// Lemmas joined to `lemma` by an edge, with the edge count
    pub fn neighbors<'g>(&'g self, lemma: &'g str) -> impl Iterator<Item = (&'g str, usize)> + 'g {
        self.edges.iter().filter_map(move |e| {
            if e.source == lemma {
                Some((e.target.as_str(), e.count))
            } else if e.target == lemma {
                Some((e.source.as_str(), e.count))
            } else {
                None
            }
        })
    }

    /// Number of edges incident to `lemma`
    pub fn degree(&self, lemma: &str) -> usize {
        self.neighbors(lemma).count()
    }
}
