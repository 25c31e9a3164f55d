//! The indexing pipeline.
//!
//! Four phases, each one finished (and, for the store phases, committed) before the
//! next begins:
//!
//! 1. [`collector`] walks the tree and returns every readable directory.
//! 2. [`folders`] writes those directories parent-before-child in one transaction.
//! 3. [`scanner`] lists the files of every folder on a bounded worker pool.
//! 4. [`loader`] writes all files in one batched transaction.
//!
//! With `reuse_folders`, phases 1 and 2 are replaced by reloading the folder map of a
//! previous run.

pub mod collector;
pub mod folders;
pub mod loader;
pub mod scanner;

use std::path::Path;
use std::time::Instant;

use sqlx::SqlitePool;
use tokio::task;
use tracing::{error, info};

use crate::config::IndexerConfig;
use crate::error::{CatalogError, CatalogResult};
use crate::types::IndexSummary;

pub use collector::{collect_dirs, CollectedPaths};
pub use folders::{index_folders, load_folder_map, FolderMap};
pub use loader::load_files;
pub use scanner::{scan_all, scan_directory, DirScan, ScanOutput};

/// Indexes `root` into the catalog behind `pool`.
pub async fn run_index(
    pool: &SqlitePool,
    root: &Path,
    cfg: &IndexerConfig,
    reuse_folders: bool,
) -> CatalogResult<IndexSummary> {
    let started = Instant::now();
    let root = &folders::normalize_root(root);
    let mut summary = IndexSummary {
        root: root.to_string_lossy().into_owned(),
        reused_folders: reuse_folders,
        ..Default::default()
    };

    let folder_map = if reuse_folders {
        load_folder_map(pool, root).await?
    } else {
        info!(root = %summary.root, "Phase 1: collecting directories");
        let root_buf = root.to_path_buf();
        let excludes = cfg.excludes.clone();
        let collected = task::spawn_blocking(move || collect_dirs(&root_buf, &excludes)).await??;
        summary.skipped_traversal = collected.skipped;
        if collected.is_empty() {
            return Err(CatalogError::RootUnavailable { root: summary.root });
        }
        info!(dirs = collected.paths.len(), skipped = collected.skipped, "Directories collected");

        info!("Phase 2: indexing folders");
        index_folders(pool, collected.paths).await.inspect_err(|e| error!("Folder phase aborted: {}", e))?
    };
    summary.folders = folder_map.len() as u64;

    let workers = cfg.worker_count();
    info!(workers, "Phase 3: scanning files");
    let scanned = scan_all(folder_map.into_tasks(), workers, cfg.channel_capacity).await?;
    summary.skipped_scans = scanned.skipped_dirs;

    info!("Phase 4: bulk loading files");
    summary.files = load_files(pool, &scanned.records, cfg.batch_size)
        .await
        .inspect_err(|e| error!("File load aborted: {}", e))?;

    summary.elapsed = started.elapsed();
    info!(
        folders = summary.folders,
        files = summary.files,
        elapsed_ms = summary.elapsed.as_millis() as u64,
        "Indexing complete"
    );
    Ok(summary)
}
