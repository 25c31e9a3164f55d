//! Phase 4: write every scanned file in one transaction.

use sqlx::{QueryBuilder, SqlitePool};
use tracing::{error, info};

use crate::error::{CatalogError, CatalogResult};
use crate::types::FileRecord;

// Respect SQLite variable limit (commonly 999). Each row consumes a fixed
// number of bound parameters; cap chunk sizes so a single INSERT never exceeds it.
const SQLITE_MAX_VARS: usize = 999;
const FILE_BINDS_PER_ROW: usize = 2; // folder_id, name

/// Inserts all `records` atomically and returns the number of rows written.
///
/// Rows go out as multi-row INSERTs of at most `batch_size` rows, all inside a single
/// transaction. On failure the transaction is rolled back and nothing is kept; folders
/// committed by the folder phase are not touched.
pub async fn load_files(pool: &SqlitePool, records: &[FileRecord], batch_size: usize) -> CatalogResult<u64> {
    if records.is_empty() {
        return Ok(0);
    }

    let chunk = batch_size.max(1).min(SQLITE_MAX_VARS / FILE_BINDS_PER_ROW);
    let mut txdb = pool.begin().await.map_err(CatalogError::FileLoad)?;

    for rows in records.chunks(chunk) {
        let mut qb = QueryBuilder::new("INSERT INTO files (folder_id, name) ");
        qb.push_values(rows, |mut b, f| {
            b.push_bind(f.folder_id).push_bind(&f.name);
        });
        if let Err(e) = qb.build().execute(&mut *txdb).await {
            error!("Bulk load failed, rolling back: {}", e);
            if let Err(rb) = txdb.rollback().await {
                error!("Rollback of bulk load failed: {}", rb);
            }
            return Err(CatalogError::FileLoad(e));
        }
    }

    txdb.commit().await.map_err(CatalogError::FileLoad)?;
    info!(files = records.len(), "Bulk load committed");
    Ok(records.len() as u64)
}
