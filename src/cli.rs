//! Command-line definitions and dispatch.

use std::io::Write;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::AppConfig;
use crate::error::CatalogResult;
use crate::search::IndexUsage;
use crate::{db, indexer, search};

/// Catalogs a directory tree into SQLite and searches it by file name.
#[derive(Debug, Parser)]
#[command(name = "fscatalog", version, about, long_about = None)]
pub struct Cli {
    /// Catalog database URL (overrides database.url)
    #[arg(short, long, global = true, env = "FSCATALOG_DATABASE_URL")]
    pub database: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Index every folder and file under a root
    Index(IndexArgs),
    /// Search indexed file names
    Search(SearchArgs),
}

#[derive(Debug, Args)]
pub struct IndexArgs {
    /// Root directory or volume to index
    pub root: PathBuf,

    /// Skip discovery and reuse the folders a previous run stored under ROOT
    #[arg(long)]
    pub reuse_folders: bool,

    /// Print the summary as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Name prefix, or a pattern using `*` (any run) and `?` (one character)
    pub term: String,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    pub async fn execute(self, mut cfg: AppConfig) -> CatalogResult<()> {
        if let Some(url) = self.database {
            cfg.database.url = url;
        }
        match self.command {
            Commands::Index(args) => run_index(&cfg, args).await,
            Commands::Search(args) => run_search(&cfg, args).await,
        }
    }
}

async fn run_index(cfg: &AppConfig, args: IndexArgs) -> CatalogResult<()> {
    let root = std::path::absolute(&args.root)?;
    let pool = db::connect_for_index(&cfg.database).await?;
    let result = indexer::run_index(&pool, &root, &cfg.indexer, args.reuse_folders).await;
    pool.close().await;
    let summary = result?;

    let mut out = std::io::stdout().lock();
    if args.json {
        writeln!(out, "{}", serde_json::to_string_pretty(&summary)?)?;
    } else {
        writeln!(out, "--- Indexing complete ---")?;
        writeln!(out, "Root: {}", summary.root)?;
        writeln!(out, "Time taken: {:.2} seconds", summary.elapsed.as_secs_f64())?;
        writeln!(out, "Folders indexed: {}", summary.folders)?;
        writeln!(out, "Files indexed: {}", summary.files)?;
        if summary.skipped_traversal + summary.skipped_scans > 0 {
            writeln!(
                out,
                "Skipped (inaccessible): {} during traversal, {} during file scan",
                summary.skipped_traversal, summary.skipped_scans
            )?;
        }
        writeln!(out, "Database: {}", cfg.database.url)?;
    }
    Ok(())
}

async fn run_search(cfg: &AppConfig, args: SearchArgs) -> CatalogResult<()> {
    let pool = db::connect_for_search(&cfg.database).await?;
    let result = search::search(&pool, &args.term, cfg.search.limit).await;
    pool.close().await;
    let outcome = result?;

    let mut out = std::io::stdout().lock();
    if args.json {
        writeln!(out, "{}", serde_json::to_string_pretty(&outcome)?)?;
        return Ok(());
    }

    writeln!(out, "Searching for files matching: '{}'", outcome.term)?;
    if outcome.pattern.usage == IndexUsage::FullScan {
        writeln!(out, "Note: pattern starts with a wildcard, so the name index cannot be used")?;
    }
    writeln!(out, "Query time: {:.4} seconds", outcome.elapsed.as_secs_f64())?;
    writeln!(out, "Found {} results (limited to {}).", outcome.hits.len(), cfg.search.limit)?;
    if outcome.hits.is_empty() {
        writeln!(out, "No files matched your search query.")?;
    }
    for hit in &outcome.hits {
        writeln!(out, "-> {}", hit.full_path().display())?;
    }
    Ok(())
}
