//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.whipgraph.toml` files.

use crate::export::OutputFormat;
use crate::graph::PartyPalette;
use crate::source::FetchOptions;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE: &str = ".whipgraph.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Data source settings.
    #[serde(default)]
    pub source: SourceConfig,

    /// Graph construction settings.
    #[serde(default)]
    pub graph: GraphConfig,

    /// Output settings.
    #[serde(default)]
    pub output: OutputConfig,

    /// Party colors.
    #[serde(default)]
    pub palette: PartyPalette,
}

/// Where datasets come from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// PublicWhip data root.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Dataset identifiers to process, in order.
    #[serde(default = "default_datasets")]
    pub datasets: Vec<String>,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// User agent for downloads.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            datasets: default_datasets(),
            timeout_seconds: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_base_url() -> String {
    "https://www.publicwhip.org.uk/data/".to_string()
}

fn default_datasets() -> Vec<String> {
    ["1997", "2001", "2005", "2010", "2015", "2017"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_timeout() -> u64 {
    120
}

fn default_user_agent() -> String {
    format!("whipgraph/{}", env!("CARGO_PKG_VERSION"))
}

/// Graph construction settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphConfig {
    /// Edges are drawn only above this similarity, in [0, 1).
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
        }
    }
}

fn default_threshold() -> f64 {
    0.5
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory that receives one subdirectory per dataset.
    #[serde(default = "default_output_dir")]
    pub dir: String,

    /// Graph file format.
    #[serde(default)]
    pub format: OutputFormat,

    /// Indent JSON output.
    #[serde(default = "default_true")]
    pub pretty_json: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            format: OutputFormat::default(),
            pretty_json: true,
        }
    }
}

fn default_output_dir() -> String {
    "graphs".to_string()
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load the explicit file if given, otherwise `default_path` if it exists.
    ///
    /// Falls back to defaults only when no file is present; a file that
    /// exists but can't be parsed is an error.
    pub fn load_or_default(explicit: Option<&Path>, default_path: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            info!("Loading config from: {}", path.display());
            return Self::load(path);
        }

        if default_path.exists() {
            info!("Loading default config from {}", default_path.display());
            Self::load(default_path)
        } else {
            debug!("No config file found, using defaults");
            Ok(Self::default())
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence, but only when explicitly provided.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if !args.datasets.is_empty() {
            self.source.datasets = args.datasets.clone();
        }
        if let Some(ref base_url) = args.base_url {
            self.source.base_url = base_url.clone();
        }
        if let Some(timeout) = args.timeout {
            self.source.timeout_seconds = timeout;
        }

        if let Some(threshold) = args.threshold {
            self.graph.threshold = threshold;
        }

        if let Some(ref dir) = args.output_dir {
            self.output.dir = dir.display().to_string();
        }
        if let Some(format) = args.format {
            self.output.format = format;
        }
    }

    /// Download options derived from the source settings.
    pub fn fetch_options(&self) -> FetchOptions {
        FetchOptions {
            base_url: self.source.base_url.clone(),
            timeout_seconds: self.source.timeout_seconds,
            user_agent: self.source.user_agent.clone(),
        }
    }

    /// Check values that the file format cannot constrain.
    pub fn validate(&self) -> Result<(), String> {
        let threshold = self.graph.threshold;
        if !(threshold.is_finite() && (0.0..1.0).contains(&threshold)) {
            return Err(format!(
                "Threshold must be at least 0.0 and below 1.0, got {}",
                threshold
            ));
        }

        if self.source.datasets.is_empty() {
            return Err("At least one dataset is required".to_string());
        }

        Ok(())
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.graph.threshold, 0.5);
        assert_eq!(config.source.datasets.len(), 6);
        assert_eq!(config.source.datasets[0], "1997");
        assert_eq!(config.output.format, OutputFormat::Gexf);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[source]
base_url = "http://localhost:8000/data"
datasets = ["2015", "2017"]

[graph]
threshold = 0.75

[output]
dir = "out"
format = "json"

[palette.default]
r = 10
g = 20
b = 30

[palette.parties.PC]
r = 0
g = 128
b = 0
a = 1.0
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.source.base_url, "http://localhost:8000/data");
        assert_eq!(config.source.datasets, vec!["2015", "2017"]);
        assert_eq!(config.source.timeout_seconds, 120);
        assert_eq!(config.graph.threshold, 0.75);
        assert_eq!(config.output.dir, "out");
        assert_eq!(config.output.format, OutputFormat::Json);

        let pc = config.palette.color_for("PC");
        assert_eq!((pc.r, pc.g, pc.b), (0, 128, 0));
        assert_eq!(pc.a, 1.0);
        // parties omitted from the table fall back to the configured default
        assert_eq!(config.palette.color_for("Con").r, 10);
        assert_eq!(config.palette.default.a, 0.7);
    }

    #[test]
    fn test_validate_threshold() {
        let mut config = Config::default();
        config.graph.threshold = 1.0;
        assert!(config.validate().is_err());

        config.graph.threshold = -0.5;
        assert!(config.validate().is_err());

        config.graph.threshold = 0.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_datasets() {
        let mut config = Config::default();
        config.source.datasets.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_default_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_or_default(None, &dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(config.graph.threshold, 0.5);
    }

    #[test]
    fn test_malformed_default_file_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "[graph]\nthreshold = \"0.9\"\n").unwrap();

        let err = Config::load_or_default(None, &path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_explicit_file_takes_precedence() {
        let dir = TempDir::new().unwrap();
        let explicit = dir.path().join("custom.toml");
        let default_path = dir.path().join(CONFIG_FILE);
        std::fs::write(&explicit, "[graph]\nthreshold = 0.8\n").unwrap();
        std::fs::write(&default_path, "not toml at all [").unwrap();

        let config = Config::load_or_default(Some(&explicit), &default_path).unwrap();
        assert_eq!(config.graph.threshold, 0.8);

        assert!(Config::load_or_default(Some(&dir.path().join("absent.toml")), &default_path).is_err());
    }

    #[test]
    fn test_default_toml_alpha_is_exact() {
        let toml_str = Config::default_toml();
        assert!(toml_str.contains("a = 0.7"));
        assert!(!toml_str.contains("0.699"));
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(!toml_str.is_empty());
        assert!(toml_str.contains("[source]"));
        assert!(toml_str.contains("[graph]"));
        assert!(toml_str.contains("[output]"));

        let reparsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(reparsed.graph.threshold, 0.5);
        assert_eq!(reparsed.palette, PartyPalette::default());
    }
}
