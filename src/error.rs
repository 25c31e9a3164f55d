use thiserror::Error;

/// The primary error type for the catalog.
///
/// Filesystem access problems during traversal and scanning never show up here; they are
/// absorbed as skip outcomes at the directory where they happen. Everything in this enum
/// terminates the phase that raised it.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The root could not be opened, so there is nothing to index.
    #[error("root path does not exist or cannot be opened: {root}")]
    RootUnavailable { root: String },

    /// A folder path is already present in the store.
    #[error(
        "folder already indexed: {path}. The catalog was not empty before this run; \
         delete the database file or point --database at an empty one"
    )]
    DuplicateFolder { path: String },

    /// Store failure while writing folders; the whole folder phase was rolled back.
    #[error("folder indexing failed: {0}")]
    FolderPhase(#[source] sqlx::Error),

    /// Store failure while bulk loading files; folders stay committed.
    #[error("file bulk load failed: {0}")]
    FileLoad(#[source] sqlx::Error),

    /// Reload requested but no folders from a prior run match the root.
    #[error("no indexed folders found under {root}; run `fscatalog index` without --reuse-folders first")]
    NoIndexedFolders { root: String },

    /// The catalog database or its schema is missing at search time.
    #[error("catalog not found at {url}; run `fscatalog index <ROOT>` first")]
    MissingStore { url: String },

    #[error("invalid search term: {0}")]
    InvalidQuery(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("configuration error: {0}")]
    Config(#[from] ::config::ConfigError),

    #[error("invalid exclude pattern: {0}")]
    Pattern(#[from] globset::Error),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("failed to render JSON output: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl CatalogError {
    /// Structural failures need operator action before a retry can succeed.
    pub fn is_structural(&self) -> bool {
        matches!(self, CatalogError::DuplicateFolder { .. })
    }
}

pub type CatalogResult<T> = Result<T, CatalogError>;
