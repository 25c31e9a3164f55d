use sqlx::migrate::MigrateDatabase;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Sqlite, SqlitePool};
use tracing::{debug, info, warn};

use crate::config::{ensure_sqlite_parent_dir, DatabaseConfig};
use crate::error::{CatalogError, CatalogResult};

/// Opens (and creates, if needed) the catalog for indexing, then ensures the schema.
pub async fn connect_for_index(cfg: &DatabaseConfig) -> CatalogResult<SqlitePool> {
    let url = &cfg.url;
    ensure_sqlite_parent_dir(url)?;
    if !Sqlite::database_exists(url).await.unwrap_or(false) {
        info!("Creating SQLite database at {}", url);
        Sqlite::create_database(url).await?;
    }
    let pool = pool_options(cfg.max_connections).connect(url).await?;
    init_db(&pool).await?;
    Ok(pool)
}

/// Opens an existing catalog for searching. Never creates anything.
pub async fn connect_for_search(cfg: &DatabaseConfig) -> CatalogResult<SqlitePool> {
    let url = &cfg.url;
    let missing = || CatalogError::MissingStore { url: url.clone() };
    if !Sqlite::database_exists(url).await.unwrap_or(false) {
        return Err(missing());
    }
    let pool = pool_options(cfg.max_connections).connect(url).await.map_err(|e| {
        warn!("Failed to open catalog {}: {}", url, e);
        missing()
    })?;
    if !schema_present(&pool).await? {
        pool.close().await;
        return Err(missing());
    }
    Ok(pool)
}

/// Pool options with the per-connection pragmas every catalog connection needs.
pub fn pool_options(max_connections: u32) -> SqlitePoolOptions {
    SqlitePoolOptions::new().max_connections(max_connections.max(1)).after_connect(|conn, _meta| {
        Box::pin(async move {
            sqlx::query("PRAGMA foreign_keys=ON;").execute(&mut *conn).await?;
            // LIKE must fold case regardless of how the connection was opened
            sqlx::query("PRAGMA case_sensitive_like=OFF;").execute(&mut *conn).await?;
            if let Err(e) = sqlx::query("PRAGMA busy_timeout=10000;").execute(&mut *conn).await {
                warn!("Failed to set busy_timeout: {}", e);
            }
            Ok(())
        })
    })
}

pub async fn init_db(pool: &SqlitePool) -> CatalogResult<()> {
    if let Err(e) = sqlx::query("PRAGMA journal_mode=WAL;").execute(pool).await {
        warn!("Failed to set WAL journal mode: {}", e);
    }
    if let Err(e) = sqlx::query("PRAGMA synchronous=NORMAL;").execute(pool).await {
        warn!("Failed to set synchronous mode: {}", e);
    }
    // Foreign keys back the parent/folder references - fail if this doesn't work
    sqlx::query("PRAGMA foreign_keys=ON;").execute(pool).await?;
    if let Err(e) = sqlx::query("PRAGMA cache_size=-65536;").execute(pool).await {
        warn!("Failed to set cache_size: {}", e);
    }
    if let Err(e) = sqlx::query("PRAGMA temp_store=MEMORY;").execute(pool).await {
        warn!("Failed to set temp_store: {}", e);
    }

    // NOCASE on the name columns lets case-insensitive LIKE use the name indexes
    sqlx::query(
        r#"CREATE TABLE IF NOT EXISTS folders (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            parent_id INTEGER NULL REFERENCES folders(id),
            name TEXT NOT NULL COLLATE NOCASE,
            path TEXT NOT NULL UNIQUE
        )"#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"CREATE TABLE IF NOT EXISTS files (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            folder_id INTEGER NOT NULL REFERENCES folders(id),
            name TEXT NOT NULL COLLATE NOCASE
        )"#,
    )
    .execute(pool)
    .await?;

    let indexes = [
        ("idx_folder_name", "CREATE INDEX IF NOT EXISTS idx_folder_name ON folders(name)"),
        ("idx_file_name", "CREATE INDEX IF NOT EXISTS idx_file_name ON files(name)"),
        ("idx_files_folder", "CREATE INDEX IF NOT EXISTS idx_files_folder ON files(folder_id)"),
    ];
    for (name, query) in indexes {
        match sqlx::query(query).execute(pool).await {
            Ok(_) => debug!("Index {} ready", name),
            Err(e) => {
                tracing::error!("Failed to create index {}: {}", name, e);
                return Err(e.into());
            }
        }
    }

    Ok(())
}

/// True when both catalog tables exist.
pub async fn schema_present(pool: &SqlitePool) -> CatalogResult<bool> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN ('folders', 'files')",
    )
    .fetch_one(pool)
    .await?;
    Ok(count == 2)
}
