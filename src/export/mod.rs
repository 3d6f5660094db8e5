//! Graph file export.
//!
//! Each yearly graph is written once to
//! `<output_dir>/<dataset>/uk_voting_<year>_<threshold>sim.<ext>`.

pub mod gexf;
pub mod json;

use crate::graph::VotingGraph;
use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Graph file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// GEXF 1.2 with viz colors (default)
    #[default]
    Gexf,
    /// JSON node/edge lists
    Json,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Gexf => "gexf",
            OutputFormat::Json => "json",
        }
    }
}

/// File name for a graph, e.g. `uk_voting_2017_0.5sim.gexf`.
pub fn graph_file_name(year: i32, threshold: f64, format: OutputFormat) -> String {
    format!(
        "uk_voting_{}_{}sim.{}",
        year,
        threshold_label(threshold),
        format.extension()
    )
}

/// Threshold as written in file names; whole numbers keep one decimal (`0.0`).
fn threshold_label(threshold: f64) -> String {
    if threshold.fract() == 0.0 {
        format!("{:.1}", threshold)
    } else {
        threshold.to_string()
    }
}

/// Full output path for a dataset's graph.
pub fn graph_path(output_dir: &Path, dataset: &str, graph: &VotingGraph, format: OutputFormat) -> PathBuf {
    output_dir
        .join(dataset)
        .join(graph_file_name(graph.year(), graph.threshold(), format))
}

/// Render a graph in the requested format.
pub fn render_graph(
    graph: &VotingGraph,
    dataset: &str,
    format: OutputFormat,
    pretty_json: bool,
) -> Result<String> {
    let now = Utc::now();
    match format {
        OutputFormat::Gexf => Ok(gexf::generate_gexf(graph, now.date_naive())),
        OutputFormat::Json => json::generate_json(graph, dataset, now, pretty_json),
    }
}

/// Write every graph of a dataset. Returns the paths written, in year order.
pub fn write_graphs(
    graphs: &[VotingGraph],
    dataset: &str,
    output_dir: &Path,
    format: OutputFormat,
    pretty_json: bool,
) -> Result<Vec<PathBuf>> {
    let dataset_dir = output_dir.join(dataset);
    std::fs::create_dir_all(&dataset_dir)
        .with_context(|| format!("Failed to create output directory {}", dataset_dir.display()))?;

    let mut written = Vec::with_capacity(graphs.len());
    for graph in graphs {
        let path = graph_path(output_dir, dataset, graph, format);
        let content = render_graph(graph, dataset, format, pretty_json)?;

        std::fs::write(&path, &content)
            .with_context(|| format!("Failed to write graph to {}", path.display()))?;
        debug!("Wrote {} bytes to {}", content.len(), path.display());

        written.push(path);
    }

    info!(
        "Wrote {} graph file(s) for dataset {} to {}",
        written.len(),
        dataset,
        dataset_dir.display()
    );
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_graph_file_name() {
        assert_eq!(
            graph_file_name(2017, 0.5, OutputFormat::Gexf),
            "uk_voting_2017_0.5sim.gexf"
        );
        assert_eq!(
            graph_file_name(1997, 0.75, OutputFormat::Json),
            "uk_voting_1997_0.75sim.json"
        );
    }

    #[test]
    fn test_whole_threshold_keeps_decimal_in_file_name() {
        assert_eq!(
            graph_file_name(2017, 0.0, OutputFormat::Gexf),
            "uk_voting_2017_0.0sim.gexf"
        );
        assert_eq!(threshold_label(0.1), "0.1");
    }

    #[test]
    fn test_graph_path_groups_by_dataset() {
        let graph = VotingGraph::new(2005, 0.5);
        let path = graph_path(Path::new("out"), "2001", &graph, OutputFormat::Gexf);
        assert_eq!(path, PathBuf::from("out/2001/uk_voting_2005_0.5sim.gexf"));
    }

    #[test]
    fn test_write_graphs() {
        let dir = TempDir::new().unwrap();
        let graphs = vec![VotingGraph::new(2016, 0.5), VotingGraph::new(2017, 0.5)];

        let written =
            write_graphs(&graphs, "test", dir.path(), OutputFormat::Gexf, false).unwrap();

        assert_eq!(written.len(), 2);
        assert!(written[0].ends_with("test/uk_voting_2016_0.5sim.gexf"));
        for path in &written {
            let content = std::fs::read_to_string(path).unwrap();
            assert!(content.contains("<gexf"));
        }
    }

    #[test]
    fn test_write_json_graphs() {
        let dir = TempDir::new().unwrap();
        let graphs = vec![VotingGraph::new(2010, 0.25)];

        let written =
            write_graphs(&graphs, "2010", dir.path(), OutputFormat::Json, true).unwrap();

        assert!(written[0].ends_with("2010/uk_voting_2010_0.25sim.json"));
        let content = std::fs::read_to_string(&written[0]).unwrap();
        assert!(content.contains("\"threshold\": 0.25"));
    }
}
