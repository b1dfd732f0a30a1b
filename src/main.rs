//! dmdoc — generate cross-referenced HTML documentation from `dmd -X` JSON.
//!
//! ```text
//! dmd -o- -X -Xf=out.json source/**/*.d
//! dmdoc -o doc --layout simple out.json
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use dmdoc::frontend::{self, SUPPORTED_EXTENSIONS};
use dmdoc::macros::MacroTable;
use dmdoc::symbols::gather::gather_all;
use dmdoc::symbols::Layout;
use dmdoc::writer;

#[derive(Parser)]
#[command(
    name = "dmdoc",
    version,
    about = "Generate cross-referenced HTML documentation from D compiler JSON output"
)]
struct Cli {
    /// Front-end JSON files, directories or glob patterns
    #[arg(required = true)]
    inputs: Vec<String>,

    /// Output directory
    #[arg(short = 'o', long, default_value = "doc")]
    output: PathBuf,

    /// Page layout: simple (one file per symbol) or aggregated (one file per aggregate)
    #[arg(short = 'l', long, default_value = "aggregated")]
    layout: String,

    /// Module or package to leave out. Can be specified multiple times.
    #[arg(short = 'e', long)]
    exclude: Vec<String>,

    /// DDoc macro definition file. Later files override earlier ones.
    #[arg(short = 'm', long)]
    macros: Vec<PathBuf>,

    /// Skip input files larger than this many KiB
    #[arg(long, default_value_t = 16384)]
    max_file_size: u64,

    /// Title of the index page
    #[arg(long, default_value = "API documentation")]
    project_name: String,

    /// Log progress at debug level (DMDOC_LOG overrides)
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let layout: Layout = cli.layout.parse().map_err(anyhow::Error::msg)?;

    let input_files = expand_globs(&cli.inputs)?;
    if input_files.is_empty() {
        anyhow::bail!("no input files found");
    }

    let limit = cli.max_file_size.saturating_mul(1024);
    let mut sources = Vec::with_capacity(input_files.len());
    for path in &input_files {
        match frontend::load(path, limit) {
            Ok(source) => sources.push(source),
            Err(e) => warn!("skipping: {e}"),
        }
    }

    let mut macros = MacroTable::default();
    for path in &cli.macros {
        macros
            .load_file(path)
            .with_context(|| format!("failed to load macros: {}", path.display()))?;
    }

    let (db, modules) = gather_all(&sources, layout, &cli.exclude);
    if modules.is_empty() {
        warn!("no modules to document");
    }

    fs::create_dir_all(&cli.output).with_context(|| {
        format!("failed to create output directory: {}", cli.output.display())
    })?;
    let written = writer::write_all(&db, &macros, &modules, &cli.project_name, &cli.output)
        .with_context(|| format!("failed to write documentation to {}", cli.output.display()))?;

    info!(
        modules = modules.len(),
        files = written,
        layout = %layout,
        "done"
    );
    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("DMDOC_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Expand glob patterns into a list of real file paths.
/// Also handles bare directory paths by scanning for supported file types.
fn expand_globs(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for pattern in patterns {
        let path = Path::new(pattern);
        if path.is_file() {
            files.push(path.to_path_buf());
            continue;
        }
        // Directories are scanned non-recursively
        if path.is_dir() {
            let entries = fs::read_dir(path)
                .with_context(|| format!("failed to read directory: {}", path.display()))?;
            for entry in entries.flatten() {
                let p = entry.path();
                if p.is_file() && has_supported_extension(&p) {
                    files.push(p);
                }
            }
            continue;
        }
        let matches: Vec<_> = glob::glob(pattern)
            .with_context(|| format!("invalid glob pattern: {}", pattern))?
            .filter_map(|r| r.ok())
            .filter(|p| p.is_file())
            .collect();
        if matches.is_empty() {
            warn!("no files matched: {}", pattern);
        }
        files.extend(matches);
    }
    // Sort for deterministic output
    files.sort();
    files.dedup();
    Ok(files)
}

fn has_supported_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext))
}
