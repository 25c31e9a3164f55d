//! Phase 2: persist folders parent-before-child and build the path -> id map.

use std::collections::HashMap;
use std::path::{Path, PathBuf, MAIN_SEPARATOR};

use sqlx::SqlitePool;
use tracing::{error, info};

use crate::error::{CatalogError, CatalogResult};
use crate::types::{FolderId, ScanTask};

/// Transient path -> id index over the folders of one run.
///
/// Filled in depth order so that a folder's parent is always present before the folder
/// itself is looked up. Also remembers the original `PathBuf` of every folder so the
/// scan phase can open directories whose names are not valid UTF-8.
#[derive(Debug, Default)]
pub struct FolderMap {
    ids: HashMap<String, FolderId>,
    dirs: Vec<ScanTask>,
}

impl FolderMap {
    pub fn with_capacity(n: usize) -> Self {
        Self { ids: HashMap::with_capacity(n), dirs: Vec::with_capacity(n) }
    }

    pub fn get(&self, path: &str) -> Option<FolderId> {
        self.ids.get(path).copied()
    }

    pub fn len(&self) -> usize {
        self.dirs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty()
    }

    fn insert(&mut self, dir: PathBuf, key: String, id: FolderId) {
        self.ids.insert(key, id);
        self.dirs.push(ScanTask { dir, folder_id: id });
    }

    /// One independent scan task per folder, in insertion order.
    pub fn into_tasks(self) -> Vec<ScanTask> {
        self.dirs
    }
}

/// Number of path components; parents always have strictly fewer than children.
pub fn path_depth(path: &Path) -> usize {
    path.components().count()
}

/// Stored folder name: the last component, or the whole path for roots like `/` or `C:\`.
pub fn folder_name(path: &Path) -> String {
    match path.file_name() {
        Some(n) if !n.is_empty() => n.to_string_lossy().into_owned(),
        _ => path.to_string_lossy().into_owned(),
    }
}

/// Drops trailing separators and `.` segments, so the root's key is exactly what
/// `parent()` returns for its children.
pub fn normalize_root(root: &Path) -> PathBuf {
    root.components().collect()
}

pub(crate) fn path_key(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Writes all `paths` as folders in one transaction and returns the resulting map.
///
/// Paths are stably sorted by depth, so ties keep discovery order. A parent id is taken
/// from the map when the parent path was written earlier in this run, otherwise the
/// folder is stored without a parent. Any failure rolls back every folder written so far.
pub async fn index_folders(pool: &SqlitePool, mut paths: Vec<PathBuf>) -> CatalogResult<FolderMap> {
    paths.sort_by_key(|p| path_depth(p));

    let mut map = FolderMap::with_capacity(paths.len());
    let mut tx = pool.begin().await.map_err(CatalogError::FolderPhase)?;

    for path in paths {
        let key = path_key(&path);
        let parent_id = path.parent().and_then(|p| map.get(&path_key(p)));
        let name = folder_name(&path);

        let inserted = sqlx::query("INSERT INTO folders (parent_id, name, path) VALUES (?1, ?2, ?3)")
            .bind(parent_id)
            .bind(&name)
            .bind(&key)
            .execute(&mut *tx)
            .await;

        match inserted {
            Ok(res) => map.insert(path, key, res.last_insert_rowid()),
            Err(e) => {
                if let Err(rb) = tx.rollback().await {
                    error!("Rollback of folder phase failed: {}", rb);
                }
                return Err(insert_error(e, key));
            }
        }
    }

    tx.commit().await.map_err(CatalogError::FolderPhase)?;
    info!(folders = map.len(), "Folder phase committed");
    Ok(map)
}

fn insert_error(e: sqlx::Error, path: String) -> CatalogError {
    match &e {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            CatalogError::DuplicateFolder { path }
        }
        _ => CatalogError::FolderPhase(e),
    }
}

/// Rebuilds the map from folders stored by an earlier run: `root` itself and everything below it.
pub async fn load_folder_map(pool: &SqlitePool, root: &Path) -> CatalogResult<FolderMap> {
    let root_key = path_key(&normalize_root(root));
    let mut prefix = root_key.clone();
    if !prefix.ends_with(MAIN_SEPARATOR) {
        prefix.push(MAIN_SEPARATOR);
    }

    // substr keeps the prefix test exact; LIKE would fold case here
    let rows: Vec<(FolderId, String)> = sqlx::query_as(
        "SELECT id, path FROM folders WHERE path = ?1 OR substr(path, 1, ?2) = ?3 ORDER BY id",
    )
    .bind(&root_key)
    .bind(prefix.chars().count() as i64)
    .bind(&prefix)
    .fetch_all(pool)
    .await?;

    if rows.is_empty() {
        return Err(CatalogError::NoIndexedFolders { root: root_key });
    }

    let mut map = FolderMap::with_capacity(rows.len());
    for (id, path) in rows {
        map.insert(PathBuf::from(&path), path, id);
    }
    info!(folders = map.len(), root = %root_key, "Reloaded folder map");
    Ok(map)
}
