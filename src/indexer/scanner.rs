//! Phase 3: list the direct files of every indexed directory in parallel.
//!
//! Workers are plain blocking closures over an owned [`ScanTask`]. They never see the
//! database and share nothing; everything they learn travels back as a [`DirScan`]
//! value over a bounded channel to a single collector.

use std::fs;
use std::sync::Arc;

use tokio::sync::{mpsc, Semaphore};
use tokio::task;
use tracing::{debug, info};

use crate::error::CatalogResult;
use crate::types::{FileRecord, ScanTask};

/// Result of listing one directory.
#[derive(Debug, PartialEq, Eq)]
pub enum DirScan {
    Listed(Vec<FileRecord>),
    /// The directory could not be listed; it contributes no files.
    Skipped,
}

#[derive(Debug, Default)]
pub struct ScanOutput {
    pub records: Vec<FileRecord>,
    pub scanned_dirs: u64,
    pub skipped_dirs: u64,
}

/// Lists the regular files directly inside `task.dir`.
///
/// Subdirectories are ignored. A symlink counts when its target is a regular file; a
/// dangling link is silently dropped. Any error opening the directory or reading one of
/// its entries turns the whole directory into [`DirScan::Skipped`].
pub fn scan_directory(task: &ScanTask) -> DirScan {
    let rd = match fs::read_dir(&task.dir) {
        Ok(rd) => rd,
        Err(e) => {
            debug!("Skipping directory {}: {}", task.dir.display(), e);
            return DirScan::Skipped;
        }
    };

    let mut files = Vec::new();
    for entry in rd {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                debug!("Skipping directory {}: {}", task.dir.display(), e);
                return DirScan::Skipped;
            }
        };
        let file_type = match entry.file_type() {
            Ok(ft) => ft,
            Err(e) => {
                debug!("Skipping directory {}: {}", task.dir.display(), e);
                return DirScan::Skipped;
            }
        };
        let is_file = if file_type.is_symlink() {
            fs::metadata(entry.path()).map(|m| m.is_file()).unwrap_or(false)
        } else {
            file_type.is_file()
        };
        if is_file {
            files.push(FileRecord {
                folder_id: task.folder_id,
                name: entry.file_name().to_string_lossy().into_owned(),
            });
        }
    }
    DirScan::Listed(files)
}

/// Runs [`scan_directory`] over all tasks on at most `workers` blocking threads.
///
/// A dispatcher hands out tasks only while it holds a semaphore permit, and finished
/// listings queue on a channel of `channel_capacity` slots, so neither the number of
/// in-flight tasks nor the number of undelivered results grows with the task count.
pub async fn scan_all(
    tasks: Vec<ScanTask>,
    workers: usize,
    channel_capacity: usize,
) -> CatalogResult<ScanOutput> {
    let total = tasks.len();
    let sem = Arc::new(Semaphore::new(workers.max(1)));
    let (tx_res, mut rx_res) = mpsc::channel::<DirScan>(channel_capacity.max(1));

    let dispatcher = tokio::spawn(async move {
        for scan_task in tasks {
            // The semaphore is never closed, so acquire only fails if that changes
            let Ok(permit) = sem.clone().acquire_owned().await else {
                break;
            };
            let tx = tx_res.clone();
            task::spawn_blocking(move || {
                let listing = scan_directory(&scan_task);
                let _ = tx.blocking_send(listing);
                drop(permit);
            });
        }
    });

    let mut out = ScanOutput::default();
    let mut received = 0usize;
    while let Some(listing) = rx_res.recv().await {
        received += 1;
        match listing {
            DirScan::Listed(mut files) => {
                out.scanned_dirs += 1;
                out.records.append(&mut files);
            }
            DirScan::Skipped => out.skipped_dirs += 1,
        }
        if received % 10_000 == 0 {
            debug!(received, total, files = out.records.len(), "Scan progress");
        }
    }

    dispatcher.await?;
    info!(
        dirs = out.scanned_dirs,
        skipped = out.skipped_dirs,
        files = out.records.len(),
        "File scan finished"
    );
    Ok(out)
}
