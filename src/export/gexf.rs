//! GEXF graph export.
//!
//! Writes GEXF 1.2 with the `viz` extension so that Gephi picks up the
//! party colors. Node attribute `party` and edge attribute `difference` are
//! declared as static attributes; edge similarity goes into the native
//! `weight` field.

use crate::graph::VotingGraph;
use chrono::NaiveDate;

const PARTY_ATTR: &str = "0";
const DIFFERENCE_ATTR: &str = "1";

/// Escape text for use inside an XML attribute value.
pub fn escape_xml(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Generate a complete GEXF document for a graph.
pub fn generate_gexf(graph: &VotingGraph, modified: NaiveDate) -> String {
    let mut output = String::new();

    output.push_str("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n");
    output.push_str(
        "<gexf xmlns=\"http://www.gexf.net/1.2draft\" \
         xmlns:viz=\"http://www.gexf.net/1.2draft/viz\" \
         xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\" \
         xsi:schemaLocation=\"http://www.gexf.net/1.2draft http://www.gexf.net/1.2draft/gexf.xsd\" \
         version=\"1.2\">\n",
    );

    output.push_str(&format!(
        "  <meta lastmodifieddate=\"{}\">\n",
        modified.format("%Y-%m-%d")
    ));
    output.push_str(&format!(
        "    <creator>whipgraph {}</creator>\n",
        env!("CARGO_PKG_VERSION")
    ));
    output.push_str(&format!(
        "    <description>UK voting similarity {} (threshold {})</description>\n",
        graph.year(),
        graph.threshold()
    ));
    output.push_str("  </meta>\n");

    output.push_str("  <graph defaultedgetype=\"undirected\" mode=\"static\">\n");
    output.push_str(&generate_attribute_declarations());
    output.push_str(&generate_nodes(graph));
    output.push_str(&generate_edges(graph));
    output.push_str("  </graph>\n");
    output.push_str("</gexf>\n");

    output
}

fn generate_attribute_declarations() -> String {
    let mut section = String::new();

    section.push_str("    <attributes class=\"node\" mode=\"static\">\n");
    section.push_str(&format!(
        "      <attribute id=\"{}\" title=\"party\" type=\"string\" />\n",
        PARTY_ATTR
    ));
    section.push_str("    </attributes>\n");

    section.push_str("    <attributes class=\"edge\" mode=\"static\">\n");
    section.push_str(&format!(
        "      <attribute id=\"{}\" title=\"difference\" type=\"double\" />\n",
        DIFFERENCE_ATTR
    ));
    section.push_str("    </attributes>\n");

    section
}

fn generate_nodes(graph: &VotingGraph) -> String {
    let mut section = String::new();

    section.push_str("    <nodes>\n");
    for (label, attrs) in graph.nodes() {
        let label = escape_xml(label);
        let [r, g, b, a] = attrs.color.channels();

        section.push_str(&format!(
            "      <node id=\"{}\" label=\"{}\">\n",
            label, label
        ));
        section.push_str("        <attvalues>\n");
        section.push_str(&format!(
            "          <attvalue for=\"{}\" value=\"{}\" />\n",
            PARTY_ATTR,
            escape_xml(&attrs.party)
        ));
        section.push_str("        </attvalues>\n");
        section.push_str(&format!(
            "        <viz:color r=\"{}\" g=\"{}\" b=\"{}\" a=\"{}\" />\n",
            r, g, b, a
        ));
        section.push_str("      </node>\n");
    }
    section.push_str("    </nodes>\n");

    section
}

fn generate_edges(graph: &VotingGraph) -> String {
    let mut section = String::new();

    section.push_str("    <edges>\n");
    for (id, (source, target, attrs)) in graph.edges().enumerate() {
        section.push_str(&format!(
            "      <edge id=\"{}\" source=\"{}\" target=\"{}\" weight=\"{}\">\n",
            id,
            escape_xml(source),
            escape_xml(target),
            attrs.weight
        ));
        section.push_str("        <attvalues>\n");
        section.push_str(&format!(
            "          <attvalue for=\"{}\" value=\"{}\" />\n",
            DIFFERENCE_ATTR, attrs.difference
        ));
        section.push_str("        </attvalues>\n");
        section.push_str("      </edge>\n");
    }
    section.push_str("    </edges>\n");

    section
}
