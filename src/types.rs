use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Store-assigned folder identifier.
pub type FolderId = i64;

/// A row of the `folders` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct FolderRow {
    pub id: FolderId,
    pub parent_id: Option<FolderId>,
    pub name: String,
    pub path: String,
}

/// A row of the `files` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct FileRow {
    pub id: i64,
    pub folder_id: FolderId,
    pub name: String,
}

/// A scanned file waiting for the bulk load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub folder_id: FolderId,
    pub name: String,
}

/// Work item for one scan worker: a directory and the id it was indexed under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanTask {
    pub dir: PathBuf,
    pub folder_id: FolderId,
}

/// One search result: the owning folder's path and the file name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct SearchHit {
    pub folder_path: String,
    pub file_name: String,
}

impl SearchHit {
    pub fn full_path(&self) -> PathBuf {
        PathBuf::from(&self.folder_path).join(&self.file_name)
    }
}

/// Totals reported at the end of an indexing run.
#[derive(Debug, Default, Clone, Serialize)]
pub struct IndexSummary {
    pub root: String,
    pub reused_folders: bool,
    pub folders: u64,
    pub files: u64,
    /// Directories the traversal could not open.
    pub skipped_traversal: u64,
    /// Directories the file scan could not list.
    pub skipped_scans: u64,
    #[serde(with = "duration_secs")]
    pub elapsed: Duration,
}

mod duration_secs {
    use std::time::Duration;

    use serde::Serializer;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_f64(d.as_secs_f64())
    }
}
