//! Whipgraph - UK parliamentary voting-similarity graphs
//!
//! A CLI tool that downloads PublicWhip vote matrices, builds one
//! MP voting-similarity graph per calendar year and writes each graph
//! to a GEXF or JSON file.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (download, malformed data, config, write failure)
//!   2 - Some year produced a graph without edges and --fail-on-empty was set
//!
//! With --combine the tool instead tiles rendered PNGs into one image.

mod analysis;
mod cli;
mod config;
mod export;
mod graph;
mod models;
mod montage;
mod source;

use anyhow::{Context, Result};
use cli::Args;
use config::{Config, CONFIG_FILE};
use indicatif::{ProgressBar, ProgressStyle};
use models::VoteTable;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    init_logging(&args);

    info!("Whipgraph v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    if let Some(ref dir) = args.combine {
        if let Err(e) = handle_combine(dir, &args) {
            error!("Combine failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
        return Ok(());
    }

    match run(args).await {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Run failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .whipgraph.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE);

    if path.exists() {
        eprintln!("⚠️  {} already exists. Remove it first or edit it manually.", CONFIG_FILE);
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).with_context(|| format!("Failed to write {}", CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE);
    println!("   Edit it to customize datasets, threshold, output and party colors.");
    Ok(())
}

/// Handle --combine: tile the PNGs in a directory into one image.
fn handle_combine(dir: &Path, args: &Args) -> Result<()> {
    let options = montage::MontageOptions {
        columns: args.columns,
        font: args.font.clone(),
    };
    let (count, (width, height)) = montage::write_montage(dir, &args.combined_output, &options)?;

    println!(
        "🖼️  Combined {} images into {} ({}x{})",
        count,
        args.combined_output.display(),
        width,
        height
    );
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Warning: failed to set tracing subscriber: {}", e);
    }
}

/// Where datasets are read from.
enum DataSource {
    Remote(source::PublicWhipClient),
    Local(PathBuf),
}

impl DataSource {
    async fn load(&self, dataset: &str) -> Result<VoteTable> {
        match self {
            DataSource::Remote(client) => client.fetch_dataset(dataset).await,
            DataSource::Local(root) => source::local::load_dataset(root, dataset).await,
        }
    }
}

/// Run every configured dataset. Returns exit code (0 or 2).
async fn run(args: Args) -> Result<i32> {
    let start_time = Instant::now();

    let mut config = Config::load_or_default(args.config.as_deref(), Path::new(CONFIG_FILE))?;
    config.merge_with_args(&args);
    config.validate().map_err(anyhow::Error::msg)?;

    let data_source = match args.local {
        Some(ref dir) => {
            println!("📂 Reading datasets from: {}", dir.display());
            DataSource::Local(dir.clone())
        }
        None => {
            println!("📥 Downloading datasets from: {}", config.source.base_url);
            DataSource::Remote(source::PublicWhipClient::new(config.fetch_options())?)
        }
    };

    let threshold = config.graph.threshold;
    let output_dir = PathBuf::from(&config.output.dir);
    println!("   Datasets: {}", config.source.datasets.join(", "));
    println!("   Threshold: {}", threshold);
    if !args.dry_run {
        println!("   Output: {} ({:?})", output_dir.display(), config.output.format);
    }

    let progress = dataset_progress(config.source.datasets.len() as u64, args.quiet);
    let mut summaries = Vec::new();
    let mut files_written = 0;

    for dataset in &config.source.datasets {
        progress.set_message(format!("dataset {}", dataset));

        let table = data_source
            .load(dataset)
            .await
            .with_context(|| format!("Failed to load dataset {}", dataset))?;

        let graphs = graph::build_voting_graphs(
            &table.divisions,
            &table.members,
            threshold,
            &config.palette,
        )
        .with_context(|| format!("Failed to build graphs for dataset {}", dataset))?;

        if graphs.is_empty() {
            warn!("Dataset {} contains no divisions", dataset);
        }

        if !args.dry_run {
            let written = export::write_graphs(
                &graphs,
                dataset,
                &output_dir,
                config.output.format,
                config.output.pretty_json,
            )?;
            files_written += written.len();
        }

        let dataset_summaries = analysis::summarize(&graphs);
        progress.suspend(|| {
            println!(
                "\n{}",
                analysis::generate_summary_text(dataset, &dataset_summaries)
            )
        });
        summaries.extend(dataset_summaries);
        progress.inc(1);
    }

    progress.finish_with_message("done");

    let duration = start_time.elapsed().as_secs_f64();
    println!("\n📊 Summary:");
    println!("   Datasets: {}", config.source.datasets.len());
    println!("   Yearly graphs: {}", summaries.len());
    if args.dry_run {
        println!("   Dry run: no files written");
    } else {
        println!("   Files written: {}", files_written);
    }
    println!("   Duration: {:.1}s", duration);

    if args.fail_on_empty {
        let empty: Vec<String> = summaries
            .iter()
            .filter(|s| s.has_no_edges())
            .map(|s| s.year.to_string())
            .collect();

        if !empty.is_empty() {
            eprintln!(
                "\n⛔ No edges above threshold {} for year(s): {}. Failing (exit code 2).",
                threshold,
                empty.join(", ")
            );
            return Ok(2);
        }
    }

    println!("\n✅ Done!");
    Ok(0)
}

/// Progress bar over datasets, hidden in quiet mode.
fn dataset_progress(len: u64, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(len);
    let style = ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] [{bar:30.cyan/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-");
    pb.set_style(style);
    pb
}
