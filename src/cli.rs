//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::export::OutputFormat;
use clap::Parser;
use std::path::PathBuf;

/// Whipgraph - yearly MP voting-similarity graphs
///
/// Downloads PublicWhip vote matrices, links MPs who voted the same way
/// often enough in each calendar year, and writes one graph file per year.
///
/// Examples:
///   whipgraph
///   whipgraph --dataset 2017 --threshold 0.75
///   whipgraph --local ./data --format json --output-dir ./graphs
///   whipgraph --dataset 2010 --dry-run
///   whipgraph --init-config
///   whipgraph --combine ./images --font DejaVuSans.ttf
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Dataset to process (repeatable), e.g. 1997, 2017
    ///
    /// Defaults to the config file's list, or every parliament since 1997.
    #[arg(short, long = "dataset", value_name = "DATASET")]
    pub datasets: Vec<String>,

    /// Minimum similarity for an edge, in [0, 1)
    ///
    /// Pairs are linked only when their similarity is strictly greater.
    #[arg(short, long, value_name = "SIMILARITY", env = "WHIPGRAPH_THRESHOLD")]
    pub threshold: Option<f64>,

    /// Directory for graph files (one subdirectory per dataset)
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Graph file format (gexf, json)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// PublicWhip data root URL
    #[arg(long, value_name = "URL", env = "WHIPGRAPH_BASE_URL")]
    pub base_url: Option<String>,

    /// Read votematrix files from a local directory instead of downloading
    #[arg(long, value_name = "DIR")]
    pub local: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .whipgraph.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Build graphs and print summaries without writing files
    #[arg(long)]
    pub dry_run: bool,

    /// Exit with code 2 if any year produced a graph without edges
    #[arg(long)]
    pub fail_on_empty: bool,

    /// Generate a default .whipgraph.toml configuration file
    #[arg(long)]
    pub init_config: bool,

    /// Tile the PNG renders in DIR into one labelled image, then exit
    #[arg(long, value_name = "DIR")]
    pub combine: Option<PathBuf>,

    /// Tiles per row when combining
    #[arg(long, value_name = "N", default_value_t = crate::montage::DEFAULT_COLUMNS)]
    pub columns: u32,

    /// Font file for the year labels when combining
    #[arg(long, value_name = "FILE", requires = "combine")]
    pub font: Option<PathBuf>,

    /// Output image when combining
    #[arg(long, value_name = "FILE", default_value = "combined_votes.png")]
    pub combined_output: PathBuf,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if let Some(threshold) = self.threshold {
            if !(threshold.is_finite() && (0.0..1.0).contains(&threshold)) {
                return Err("Threshold must be at least 0.0 and below 1.0".to_string());
            }
        }

        if let Some(ref base_url) = self.base_url {
            if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
                return Err("Base URL must start with 'http://' or 'https://'".to_string());
            }
        }

        if self.datasets.iter().any(|d| d.trim().is_empty()) {
            return Err("Dataset names cannot be empty".to_string());
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err("Timeout must be at least 1 second".to_string());
            }
        }

        if let Some(ref combine_dir) = self.combine {
            if !combine_dir.is_dir() {
                return Err(format!(
                    "Image directory does not exist: {}",
                    combine_dir.display()
                ));
            }
            if self.columns == 0 {
                return Err("Columns must be at least 1".to_string());
            }
        }

        if let Some(ref local_path) = self.local {
            if !local_path.exists() {
                return Err(format!(
                    "Local directory does not exist: {}",
                    local_path.display()
                ));
            }
            if !local_path.is_dir() {
                return Err(format!(
                    "Local path is not a directory: {}",
                    local_path.display()
                ));
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
