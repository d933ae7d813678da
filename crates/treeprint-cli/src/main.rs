//! Treeprint CLI
//!
//! Command-line interface for generating, updating and checking source tree
//! representations.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::warn;
use tracing_subscriber::EnvFilter;
use treeprint_indexer::config::GeneratorConfig;
use treeprint_indexer::storage::{self, DEFAULT_IR_PATH};
use treeprint_indexer::{Generator, Representation};

#[derive(Parser)]
#[command(name = "treeprint")]
#[command(about = "Treeprint - Deterministic fingerprints of JavaScript source trees")]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a fresh representation and save it
    Generate {
        /// Project root (default: current directory)
        #[arg(default_value = ".")]
        root: PathBuf,

        /// Output file
        #[arg(short, long, default_value = DEFAULT_IR_PATH)]
        output: PathBuf,

        /// Generator config file (YAML)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Refresh a saved representation, reusing unchanged entries
    Update {
        /// Project root (default: current directory)
        #[arg(default_value = ".")]
        root: PathBuf,

        /// Representation file to read and overwrite
        #[arg(long, default_value = DEFAULT_IR_PATH)]
        ir: PathBuf,

        /// Generator config file (YAML)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Check that generation is reproducible for this tree
    Verify {
        /// Project root (default: current directory)
        #[arg(default_value = ".")]
        root: PathBuf,

        /// Number of repeated generations to compare
        #[arg(long, default_value_t = 2)]
        runs: usize,

        /// Generator config file (YAML)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Summarize a saved representation
    Show {
        /// Representation file
        #[arg(long, default_value = DEFAULT_IR_PATH)]
        ir: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    match cli.command {
        Commands::Generate {
            root,
            output,
            config,
        } => cmd_generate(&root, &output, config.as_deref()),
        Commands::Update { root, ir, config } => cmd_update(&root, &ir, config.as_deref()),
        Commands::Verify { root, runs, config } => cmd_verify(&root, runs, config.as_deref()),
        Commands::Show { ir } => cmd_show(&ir),
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// An explicit config path must load; the default path may be absent.
fn load_config(path: Option<&Path>) -> Result<GeneratorConfig> {
    match path {
        Some(path) => GeneratorConfig::load_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Ok(GeneratorConfig::load_or_default(&GeneratorConfig::default_path())),
    }
}

fn cmd_generate(root: &Path, output: &Path, config: Option<&Path>) -> Result<()> {
    let generator = Generator::new(load_config(config)?);

    let (representation, stats) = generator
        .generate_with_stats(root)
        .with_context(|| format!("Failed to index {}", root.display()))?;

    storage::save(&representation, output)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!(
        "✓ Indexed {} files in {} ms",
        representation.file_count(),
        stats.duration_ms
    );
    if stats.files_skipped > 0 {
        println!("  {} entries skipped (see log)", stats.files_skipped);
    }
    println!("  Root hash: {}", representation.root_hash);
    println!("  Saved to:  {}", output.display());

    Ok(())
}

fn cmd_update(root: &Path, ir: &Path, config: Option<&Path>) -> Result<()> {
    let generator = Generator::new(load_config(config)?);

    let result = match storage::load(ir) {
        Ok(prior) => generator.update_with_stats(prior, root),
        Err(e) => {
            warn!(path = ?ir, error = %e, "No usable previous representation, generating from scratch");
            generator.generate_with_stats(root)
        }
    };
    let (representation, stats) =
        result.with_context(|| format!("Failed to index {}", root.display()))?;

    storage::save(&representation, ir)
        .with_context(|| format!("Failed to write {}", ir.display()))?;

    println!(
        "✓ Updated {} files in {} ms ({} reused, {} parsed)",
        representation.file_count(),
        stats.duration_ms,
        stats.files_reused,
        stats.files_indexed
    );
    println!("  Root hash: {}", representation.root_hash);

    Ok(())
}

fn cmd_verify(root: &Path, runs: usize, config: Option<&Path>) -> Result<()> {
    let generator = Generator::new(load_config(config)?);

    let baseline = generator
        .generate(root)
        .with_context(|| format!("Failed to index {}", root.display()))?;
    let baseline_bytes = baseline.to_json()?;

    let mut mismatches = Vec::new();

    for run in 2..=runs.max(1) {
        let bytes = generator.generate(root)?.to_json()?;
        if bytes != baseline_bytes {
            mismatches.push(format!("run {run}"));
        }
    }

    for (label, variant) in path_variants(root)? {
        let bytes = generator
            .generate(&variant)
            .with_context(|| format!("Failed to index {}", variant.display()))?
            .to_json()?;
        if bytes != baseline_bytes {
            mismatches.push(format!("{label} ({})", variant.display()));
        }
    }

    let temp_dir = tempfile::tempdir().context("Failed to create scratch directory")?;
    let scratch = temp_dir.path().join("ir.json");
    storage::save(&baseline, &scratch)?;
    let reloaded = storage::load(&scratch)?;
    if reloaded.to_json()? != baseline_bytes {
        mismatches.push("save/load cycle".to_string());
    }

    if !mismatches.is_empty() {
        for mismatch in &mismatches {
            println!("✗ {mismatch}");
        }
        anyhow::bail!(
            "Output is not deterministic: {} mismatching checks",
            mismatches.len()
        );
    }

    println!("✓ Deterministic across {} runs and all path spellings", runs.max(1));
    println!("  Files:     {}", baseline.file_count());
    println!("  Root hash: {}", baseline.root_hash);

    Ok(())
}

fn cmd_show(ir: &Path) -> Result<()> {
    let representation =
        storage::load(ir).with_context(|| format!("Failed to read {}", ir.display()))?;
    print!("{}", summarize(&representation));
    Ok(())
}

/// Alternate spellings of `root` that must produce identical output.
fn path_variants(root: &Path) -> Result<Vec<(&'static str, PathBuf)>> {
    let absolute = std::path::absolute(root)
        .with_context(|| format!("Failed to resolve {}", root.display()))?;

    let mut variants = vec![
        ("as given", root.to_path_buf()),
        ("trailing slash", PathBuf::from(format!("{}/", root.display()))),
        ("absolute", absolute.clone()),
    ];

    if let Some(name) = absolute.file_name() {
        variants.push(("through parent", absolute.join("..").join(name)));
    }

    Ok(variants)
}

fn summarize(representation: &Representation) -> String {
    let mut out = String::new();
    out.push_str(&format!("Version:   {}\n", representation.version));
    out.push_str(&format!("Root hash: {}\n", representation.root_hash));
    out.push_str(&format!("Files:     {}\n", representation.file_count()));

    for path in representation.sorted_paths() {
        let entry = &representation.files[path];
        out.push_str(&format!(
            "  {path}  imports={} functions={} classes={} exports={}\n",
            entry.imports.len(),
            entry.functions.len(),
            entry.classes.len(),
            entry.exports.len()
        ));
    }

    out
}
