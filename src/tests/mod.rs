//! Unit and integration tests for the catalog.
//!
//! ## Test Modules
//!
//! - **collector_tests**: directory discovery and skip handling
//! - **folder_tests**: parent-before-child folder writes and folder map reload
//! - **scanner_tests**: per-directory listing and the bounded worker pool
//! - **loader_tests**: batched, all-or-nothing file inserts
//! - **search_tests**: pattern compilation and case-insensitive lookup
//! - **pipeline_tests**: whole-run properties of `run_index`
//! - **config_tests**: configuration loading and validation
//! - **db_tests**: schema and connection handling
//! - **error_tests**: error classification and messages

pub mod config_tests;
pub mod search_tests;

use std::fs;
use std::path::Path;

use sqlx::SqlitePool;
use tempfile::TempDir;

use crate::db;

/// Single-connection in-memory catalog with the schema applied.
pub(crate) async fn memory_pool() -> SqlitePool {
    let pool = db::pool_options(1).connect("sqlite::memory:").await.unwrap();
    db::init_db(&pool).await.unwrap();
    pool
}

/// Creates a tree from `(relative dir, files)` pairs; `""` is the root itself.
pub(crate) fn make_tree(layout: &[(&str, &[&str])]) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    for (dir, files) in layout {
        let d = temp_dir.path().join(dir);
        fs::create_dir_all(&d).unwrap();
        for f in *files {
            fs::write(d.join(f), b"x").unwrap();
        }
    }
    temp_dir
}

pub(crate) fn path_string(p: &Path) -> String {
    p.to_string_lossy().into_owned()
}
