//! Loading datasets from a local directory.
//!
//! Mirrors the download layout: a dataset is available locally when both
//! `votematrix-<dataset>.dat` and `votematrix-<dataset>.txt` exist somewhere
//! under the directory.

use super::fetcher::{division_file, member_file};
use super::parser::{parse_divisions, parse_members};
use crate::models::VoteTable;
use anyhow::{Context, Result};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// A dataset's two files found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalDataset {
    pub dataset: String,
    pub division_path: PathBuf,
    pub member_path: PathBuf,
}

/// Split `votematrix-2017.dat` into (`"2017"`, `"dat"`).
fn dataset_of(path: &Path) -> Option<(String, String)> {
    let stem = path.file_stem()?.to_str()?;
    let ext = path.extension()?.to_str()?;
    let dataset = stem.strip_prefix("votematrix-")?;
    if dataset.is_empty() || !matches!(ext, "dat" | "txt") {
        return None;
    }
    Some((dataset.to_string(), ext.to_string()))
}

/// Discover complete datasets under a directory, in dataset order.
pub fn discover_datasets(root: &Path) -> Result<Vec<LocalDataset>> {
    let mut divisions: BTreeMap<String, PathBuf> = BTreeMap::new();
    let mut members: BTreeMap<String, PathBuf> = BTreeMap::new();

    for entry in WalkDir::new(root).follow_links(true) {
        let entry = entry.with_context(|| format!("Failed to walk {}", root.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }

        let Some((dataset, ext)) = dataset_of(entry.path()) else {
            continue;
        };
        debug!("Found {} file for dataset {}", ext, dataset);

        let slot = if ext == "dat" {
            &mut divisions
        } else {
            &mut members
        };
        slot.entry(dataset).or_insert_with(|| entry.into_path());
    }

    let names: BTreeSet<&String> = divisions.keys().chain(members.keys()).collect();
    let mut found = Vec::new();
    for name in names {
        match (divisions.get(name), members.get(name)) {
            (Some(division_path), Some(member_path)) => found.push(LocalDataset {
                dataset: name.clone(),
                division_path: division_path.clone(),
                member_path: member_path.clone(),
            }),
            _ => warn!("Dataset {} is incomplete in {}, skipping", name, root.display()),
        }
    }

    Ok(found)
}

/// Read and parse a dataset from a local directory.
pub async fn load_dataset(root: &Path, dataset: &str) -> Result<VoteTable> {
    let located = discover_datasets(root)?
        .into_iter()
        .find(|d| d.dataset == dataset)
        .with_context(|| {
            format!(
                "Dataset {} not found in {} (expected {} and {})",
                dataset,
                root.display(),
                division_file(dataset),
                member_file(dataset)
            )
        })?;

    info!(
        "Loading dataset {} from {}",
        dataset,
        located.division_path.display()
    );

    let (division_text, member_text) = futures::try_join!(
        tokio::fs::read_to_string(&located.division_path),
        tokio::fs::read_to_string(&located.member_path)
    )
    .with_context(|| format!("Failed to read files for dataset {}", dataset))?;

    let divisions = parse_divisions(&division_text).with_context(|| {
        format!(
            "Malformed division matrix: {}",
            located.division_path.display()
        )
    })?;
    let members = parse_members(&member_text)
        .with_context(|| format!("Malformed member table: {}", located.member_path.display()))?;

    Ok(VoteTable {
        dataset: dataset.to_string(),
        divisions,
        members,
    })
}
