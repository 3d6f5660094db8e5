//! The yearly voting-similarity graph.

use super::palette::Color;
use serde::Serialize;
use std::collections::BTreeMap;

/// Attributes of a member node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeAttrs {
    pub party: String,
    pub color: Color,
}

/// Attributes of a similarity edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EdgeAttrs {
    /// Voting similarity in `[0, 1]`.
    pub weight: f64,
    /// `1 - weight`, for layouts that want a distance.
    pub difference: f64,
}

impl EdgeAttrs {
    pub fn from_similarity(similarity: f64) -> Self {
        Self {
            weight: similarity,
            difference: 1.0 - similarity,
        }
    }
}

/// Undirected weighted graph over member display labels for one year.
///
/// Nodes and edges live in ordered maps, so iteration order (and therefore
/// exported output) is deterministic.
#[derive(Debug, Clone, PartialEq)]
pub struct VotingGraph {
    year: i32,
    threshold: f64,
    nodes: BTreeMap<String, NodeAttrs>,
    edges: BTreeMap<(String, String), EdgeAttrs>,
}

fn edge_key(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

impl VotingGraph {
    /// Creates an empty graph.
    pub fn new(year: i32, threshold: f64) -> Self {
        Self {
            year,
            threshold,
            nodes: BTreeMap::new(),
            edges: BTreeMap::new(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Adds a node, keeping the first attributes seen for a label.
    pub(crate) fn add_node(&mut self, label: String, attrs: NodeAttrs) {
        self.nodes.entry(label).or_insert(attrs);
    }

    /// Adds an edge between two existing, distinct nodes.
    ///
    /// If the edge is already present the larger weight wins. Returns false
    /// for self-loops and for unknown endpoints.
    pub(crate) fn add_edge(&mut self, a: &str, b: &str, attrs: EdgeAttrs) -> bool {
        if a == b || !self.nodes.contains_key(a) || !self.nodes.contains_key(b) {
            return false;
        }

        self.edges
            .entry(edge_key(a, b))
            .and_modify(|existing| {
                if attrs.weight > existing.weight {
                    *existing = attrs;
                }
            })
            .or_insert(attrs);
        true
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[allow(dead_code)] // Query API
    pub fn node(&self, label: &str) -> Option<&NodeAttrs> {
        self.nodes.get(label)
    }

    /// Looks up an edge regardless of endpoint order.
    #[allow(dead_code)] // Query API
    pub fn edge(&self, a: &str, b: &str) -> Option<&EdgeAttrs> {
        self.edges.get(&edge_key(a, b))
    }

    /// Nodes in label order.
    pub fn nodes(&self) -> impl Iterator<Item = (&str, &NodeAttrs)> {
        self.nodes.iter().map(|(label, attrs)| (label.as_str(), attrs))
    }

    /// Edges in endpoint order; the first endpoint sorts before the second.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str, &EdgeAttrs)> {
        self.edges
            .iter()
            .map(|((a, b), attrs)| (a.as_str(), b.as_str(), attrs))
    }

    /// Edge count per node, in label order. Isolated nodes map to zero.
    pub fn degrees(&self) -> BTreeMap<&str, usize> {
        let mut degrees: BTreeMap<&str, usize> =
            self.nodes.keys().map(|label| (label.as_str(), 0)).collect();
        for (a, b) in self.edges.keys() {
            for end in [a, b] {
                if let Some(count) = degrees.get_mut(end.as_str()) {
                    *count += 1;
                }
            }
        }
        degrees
    }
}
