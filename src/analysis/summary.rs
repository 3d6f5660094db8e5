//! Per-year graph statistics.
//!
//! This module condenses each yearly graph into a few numbers for the
//! console summary printed after a dataset is processed.

use crate::graph::VotingGraph;
use serde::Serialize;
use std::collections::BTreeMap;

/// Summary statistics for one yearly graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphSummary {
    pub year: i32,
    pub members: usize,
    pub edges: usize,
    /// Members with no edge above the threshold.
    pub isolated: usize,
    /// Edges present over possible pairs, 0.0 for fewer than two members.
    pub density: f64,
    /// Mean similarity over drawn edges, if any.
    pub mean_weight: Option<f64>,
    /// Members per party.
    pub by_party: BTreeMap<String, usize>,
}

impl GraphSummary {
    /// Creates a summary from a graph.
    pub fn from_graph(graph: &VotingGraph) -> Self {
        let members = graph.node_count();
        let edges = graph.edge_count();

        let mut by_party: BTreeMap<String, usize> = BTreeMap::new();
        for (_, attrs) in graph.nodes() {
            *by_party.entry(attrs.party.clone()).or_insert(0) += 1;
        }
        let isolated = graph.degrees().values().filter(|&&d| d == 0).count();

        let possible = members * members.saturating_sub(1) / 2;
        let density = if possible == 0 {
            0.0
        } else {
            edges as f64 / possible as f64
        };

        let mean_weight = if edges == 0 {
            None
        } else {
            let total: f64 = graph.edges().map(|(_, _, attrs)| attrs.weight).sum();
            Some(total / edges as f64)
        };

        Self {
            year: graph.year(),
            members,
            edges,
            isolated,
            density,
            mean_weight,
            by_party,
        }
    }

    /// Returns true if no edge cleared the threshold.
    pub fn has_no_edges(&self) -> bool {
        self.edges == 0
    }
}

/// Summarise every graph, keeping year order.
pub fn summarize(graphs: &[VotingGraph]) -> Vec<GraphSummary> {
    graphs.iter().map(GraphSummary::from_graph).collect()
}

/// Generate a text summary of a dataset's graphs.
pub fn generate_summary_text(dataset: &str, summaries: &[GraphSummary]) -> String {
    let mut lines = Vec::new();

    lines.push(format!("Dataset {}: {} year(s)", dataset, summaries.len()));

    for summary in summaries {
        let mean = summary
            .mean_weight
            .map(|w| format!("{:.3}", w))
            .unwrap_or_else(|| "-".to_string());

        lines.push(format!(
            "- {}: {} MPs, {} edges, {} isolated, density {:.3}, mean similarity {}",
            summary.year, summary.members, summary.edges, summary.isolated, summary.density, mean
        ));

        if !summary.by_party.is_empty() {
            let mut parties: Vec<_> = summary.by_party.iter().collect();
            parties.sort_by_key(|(_, count)| std::cmp::Reverse(**count));

            let parties: Vec<String> = parties
                .into_iter()
                .map(|(party, count)| format!("{} {}", party, count))
                .collect();
            lines.push(format!("    parties: {}", parties.join(", ")));
        }
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::voting_graph::{EdgeAttrs, NodeAttrs};
    use crate::graph::Color;

    fn graph_with(nodes: &[(&str, &str)], edges: &[(&str, &str, f64)]) -> VotingGraph {
        let mut graph = VotingGraph::new(2015, 0.5);
        for (label, party) in nodes {
            graph.add_node(
                label.to_string(),
                NodeAttrs {
                    party: party.to_string(),
                    color: Color::rgb(0, 0, 0),
                },
            );
        }
        for (a, b, weight) in edges {
            graph.add_edge(a, b, EdgeAttrs::from_similarity(*weight));
        }
        graph
    }

    #[test]
    fn test_summary_counts() {
        let graph = graph_with(
            &[("A", "Lab"), ("B", "Lab"), ("C", "Con"), ("D", "SNP")],
            &[("A", "B", 0.75), ("A", "C", 0.5)],
        );
        let summary = GraphSummary::from_graph(&graph);

        assert_eq!(summary.year, 2015);
        assert_eq!(summary.members, 4);
        assert_eq!(summary.edges, 2);
        assert_eq!(summary.isolated, 1);
        assert!((summary.density - 2.0 / 6.0).abs() < 1e-12);
        assert_eq!(summary.mean_weight, Some(0.625));
        assert_eq!(summary.by_party.get("Lab"), Some(&2));
        assert!(!summary.has_no_edges());
    }

    #[test]
    fn test_empty_graph_summary() {
        let summary = GraphSummary::from_graph(&VotingGraph::new(2003, 0.5));
        assert_eq!(summary.members, 0);
        assert_eq!(summary.density, 0.0);
        assert_eq!(summary.mean_weight, None);
        assert!(summary.has_no_edges());
    }

    #[test]
    fn test_summary_text() {
        let graphs = vec![
            graph_with(&[("A", "Lab"), ("B", "Lab"), ("C", "Con")], &[("A", "B", 1.0)]),
            VotingGraph::new(2016, 0.5),
        ];
        let text = generate_summary_text("2015", &summarize(&graphs));

        assert!(text.starts_with("Dataset 2015: 2 year(s)"));
        assert!(text.contains("2015: 3 MPs, 1 edges, 1 isolated"));
        assert!(text.contains("mean similarity 1.000"));
        assert!(text.contains("parties: Lab 2, Con 1"));
        assert!(text.contains("2016: 0 MPs, 0 edges"));
        assert!(text.contains("mean similarity -"));
    }
}
