//! JSON graph export.

use crate::graph::{Color, VotingGraph};
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Metadata written alongside the graph.
#[derive(Debug, Clone, Serialize)]
pub struct GraphMetadata {
    pub dataset: String,
    pub year: i32,
    pub threshold: f64,
    pub generated_at: DateTime<Utc>,
    pub node_count: usize,
    pub edge_count: usize,
}

#[derive(Debug, Serialize)]
struct JsonNode<'a> {
    id: &'a str,
    party: &'a str,
    viz: JsonViz,
}

#[derive(Debug, Serialize)]
struct JsonViz {
    color: JsonColor,
}

/// Color channels as strings, matching the GEXF `viz:color` attributes.
#[derive(Debug, Serialize)]
struct JsonColor {
    r: String,
    g: String,
    b: String,
    a: String,
}

impl From<&Color> for JsonColor {
    fn from(color: &Color) -> Self {
        let [r, g, b, a] = color.channels();
        Self { r, g, b, a }
    }
}

#[derive(Debug, Serialize)]
struct JsonEdge<'a> {
    source: &'a str,
    target: &'a str,
    weight: f64,
    difference: f64,
}

#[derive(Debug, Serialize)]
struct JsonGraph<'a> {
    metadata: GraphMetadata,
    directed: bool,
    nodes: Vec<JsonNode<'a>>,
    edges: Vec<JsonEdge<'a>>,
}

/// Generate a JSON document for a graph.
pub fn generate_json(
    graph: &VotingGraph,
    dataset: &str,
    generated_at: DateTime<Utc>,
    pretty: bool,
) -> Result<String> {
    let document = JsonGraph {
        metadata: GraphMetadata {
            dataset: dataset.to_string(),
            year: graph.year(),
            threshold: graph.threshold(),
            generated_at,
            node_count: graph.node_count(),
            edge_count: graph.edge_count(),
        },
        directed: false,
        nodes: graph
            .nodes()
            .map(|(id, attrs)| JsonNode {
                id,
                party: &attrs.party,
                viz: JsonViz {
                    color: JsonColor::from(&attrs.color),
                },
            })
            .collect(),
        edges: graph
            .edges()
            .map(|(source, target, attrs)| JsonEdge {
                source,
                target,
                weight: attrs.weight,
                difference: attrs.difference,
            })
            .collect(),
    };

    let json = if pretty {
        serde_json::to_string_pretty(&document)?
    } else {
        serde_json::to_string(&document)?
    };
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::voting_graph::{EdgeAttrs, NodeAttrs};
    use serde_json::Value;

    fn sample_graph() -> VotingGraph {
        let mut graph = VotingGraph::new(2010, 0.5);
        for (label, party) in [("Hague,W. (Con)", "Con"), ("Clegg,N. (LDem)", "LDem")] {
            graph.add_node(
                label.to_string(),
                NodeAttrs {
                    party: party.to_string(),
                    color: Color::rgb(1, 2, 3),
                },
            );
        }
        graph.add_edge("Hague,W. (Con)", "Clegg,N. (LDem)", EdgeAttrs::from_similarity(0.875));
        graph
    }

    #[test]
    fn test_generate_json() {
        let json = generate_json(&sample_graph(), "2010", Utc::now(), false).unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["metadata"]["dataset"], "2010");
        assert_eq!(value["metadata"]["year"], 2010);
        assert_eq!(value["metadata"]["edge_count"], 1);
        assert_eq!(value["directed"], false);
        assert_eq!(value["nodes"].as_array().unwrap().len(), 2);
        assert_eq!(value["nodes"][0]["id"], "Clegg,N. (LDem)");
        let color = &value["nodes"][0]["viz"]["color"];
        assert!(["r", "g", "b", "a"].iter().all(|c| color[*c].is_string()));
        assert_eq!(color["r"], "1");
        assert_eq!(color["b"], "3");
        assert_eq!(color["a"], "0.7");
        assert_eq!(value["edges"][0]["source"], "Clegg,N. (LDem)");
        assert_eq!(value["edges"][0]["weight"], 0.875);
        assert_eq!(value["edges"][0]["difference"], 0.125);
    }

    #[test]
    fn test_pretty_output_is_multiline() {
        let json = generate_json(&sample_graph(), "2010", Utc::now(), true).unwrap();
        assert!(json.lines().count() > 1);
    }
}
