//! Graph builder with efficient pair counting
//!
//! This module provides a mutable builder that uses FxHashMap for O(1) node
//! and edge lookups while co-occurrence counts are accumulated.

use rustc_hash::FxHashMap;

use super::{edge_weight, node_size, CooccurrenceGraph, GraphEdge, GraphNode};

/// A node in the graph builder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuilderNode {
    /// The lemma for this node
    pub lemma: String,
    /// Occurrences of the lemma among node candidates
    pub count: usize,
}

/// A mutable co-occurrence graph optimized for incremental construction
#[derive(Debug, Default)]
pub struct GraphBuilder {
    /// Maps lemma -> node ID
    lemma_to_id: FxHashMap<String, u32>,
    /// Node storage, in insertion order
    nodes: Vec<BuilderNode>,
    /// Maps (low ID, high ID) -> index into `edges`
    edge_index: FxHashMap<(u32, u32), usize>,
    /// Pair counts, in first co-occurrence order
    edges: Vec<((u32, u32), usize)>,
}

impl GraphBuilder {
    /// Create a new empty graph builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a graph builder with pre-allocated node capacity
    pub fn with_capacity(node_capacity: usize) -> Self {
        Self {
            lemma_to_id: FxHashMap::with_capacity_and_hasher(node_capacity, Default::default()),
            nodes: Vec::with_capacity(node_capacity),
            ..Self::default()
        }
    }

    /// Get or create a node for the given lemma, returning its ID
    ///
    /// The count is only recorded when the node is created.
    pub fn get_or_create_node(&mut self, lemma: &str, count: usize) -> u32 {
        if let Some(&id) = self.lemma_to_id.get(lemma) {
            return id;
        }

        let id = self.nodes.len() as u32;
        self.lemma_to_id.insert(lemma.to_string(), id);
        self.nodes.push(BuilderNode {
            lemma: lemma.to_string(),
            count,
        });
        id
    }

    /// Increment the co-occurrence count of an unordered pair
    pub fn increment_edge(&mut self, a: u32, b: u32) {
        if a == b {
            return; // No self-loops
        }
        let key = if a < b { (a, b) } else { (b, a) };
        match self.edge_index.get(&key) {
            Some(&i) => self.edges[i].1 += 1,
            None => {
                self.edge_index.insert(key, self.edges.len());
                self.edges.push((key, 1));
            }
        }
    }

    /// Count one sentence: every unordered pair of distinct terms once
    ///
    /// `terms` must already be deduplicated; unknown lemmas are ignored.
    pub fn add_sentence<S: AsRef<str>>(&mut self, terms: &[S]) {
        let ids: Vec<u32> = terms
            .iter()
            .filter_map(|t| self.get_node_id(t.as_ref()))
            .collect();
        for (i, &a) in ids.iter().enumerate() {
            for &b in &ids[i + 1..] {
                self.increment_edge(a, b);
            }
        }
    }

    /// Get the number of nodes in the graph
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of distinct co-occurring pairs, regardless of count
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Co-occurrence count of a pair, in either order
    pub fn pair_count(&self, a: &str, b: &str) -> usize {
        let (Some(a), Some(b)) = (self.get_node_id(a), self.get_node_id(b)) else {
            return 0;
        };
        let key = if a < b { (a, b) } else { (b, a) };
        self.edge_index.get(&key).map_or(0, |&i| self.edges[i].1)
    }

    /// Get a node by ID
    pub fn get_node(&self, id: u32) -> Option<&BuilderNode> {
        self.nodes.get(id as usize)
    }

    /// Get a node ID by lemma
    pub fn get_node_id(&self, lemma: &str) -> Option<u32> {
        self.lemma_to_id.get(lemma).copied()
    }

    /// Check if the graph is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Freeze into a [`CooccurrenceGraph`], keeping edges whose count is at
    /// least `edge_min_freq`
    pub fn finish(self, edge_min_freq: usize) -> CooccurrenceGraph {
        let nodes: Vec<GraphNode> = self
            .nodes
            .into_iter()
            .map(|n| GraphNode {
                size: node_size(n.count),
                lemma: n.lemma,
                count: n.count,
            })
            .collect();

        let edges = self
            .edges
            .into_iter()
            .filter(|&(_, count)| count >= edge_min_freq)
            .map(|((a, b), count)| {
                let (a, b) = (&nodes[a as usize].lemma, &nodes[b as usize].lemma);
                let (source, target) = if a <= b { (a, b) } else { (b, a) };
                GraphEdge {
                    source: source.clone(),
                    target: target.clone(),
                    count,
                    weight: edge_weight(count),
                }
            })
            .collect();

        CooccurrenceGraph::new(nodes, edges)
    }
}
