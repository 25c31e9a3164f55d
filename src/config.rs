use std::path::Path;

use serde::Deserialize;

use crate::error::{CatalogError, CatalogResult};

const DEFAULTS: &str = include_str!("../config/default.toml");

/// Hard cap on rows returned by a single search.
pub const MAX_SEARCH_LIMIT: u32 = 1000;

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IndexerConfig {
    pub batch_size: usize,
    pub channel_capacity: usize,
    pub workers: Option<usize>,
    #[serde(default)]
    pub excludes: Vec<String>,
}

impl IndexerConfig {
    /// Scan pool size: the configured value, else one worker per logical CPU.
    pub fn worker_count(&self) -> usize {
        self.workers.unwrap_or_else(num_cpus::get).max(1)
    }
}

impl Default for IndexerConfig {
    fn default() -> Self {
        // Mirror defaults from config/default.toml
        Self { batch_size: 4000, channel_capacity: 1024, workers: None, excludes: Vec::new() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    pub limit: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { limit: MAX_SEARCH_LIMIT }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub directory: String,
    pub file_name: String,
    pub filter: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub indexer: IndexerConfig,
    pub search: SearchConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Parses the embedded defaults only, ignoring files and environment.
    pub fn embedded() -> CatalogResult<Self> {
        let cfg = ::config::Config::builder()
            .add_source(::config::File::from_str(DEFAULTS, ::config::FileFormat::Toml))
            .build()?;
        Ok(cfg.try_deserialize()?)
    }
}

/// Loads configuration: embedded defaults -> fscatalog.toml -> $FSCATALOG_CONFIG -> env/.env.
pub fn load() -> CatalogResult<AppConfig> {
    let _ = dotenvy::dotenv();

    let mut builder = ::config::Config::builder()
        .add_source(::config::File::from_str(DEFAULTS, ::config::FileFormat::Toml))
        .add_source(::config::File::with_name("fscatalog").required(false));

    if let Ok(custom_path) = std::env::var("FSCATALOG_CONFIG") {
        builder = builder.add_source(::config::File::with_name(&custom_path).required(false));
    }
    // Environment variables last to have highest precedence
    builder = builder.add_source(::config::Environment::with_prefix("FSCATALOG").separator("__"));

    let cfg = builder.build()?;
    let app_cfg: AppConfig = cfg.try_deserialize()?;
    validate(&app_cfg)?;
    Ok(app_cfg)
}

pub fn validate(cfg: &AppConfig) -> CatalogResult<()> {
    if cfg.database.url.trim().is_empty() {
        return Err(CatalogError::InvalidConfig("database.url must not be empty".into()));
    }
    if cfg.database.max_connections == 0 {
        return Err(CatalogError::InvalidConfig("database.max_connections must be > 0".into()));
    }

    if cfg.indexer.batch_size == 0 {
        return Err(CatalogError::InvalidConfig("indexer.batch_size must be > 0".into()));
    }
    if cfg.indexer.channel_capacity == 0 {
        return Err(CatalogError::InvalidConfig("indexer.channel_capacity must be > 0".into()));
    }
    if let Some(w) = cfg.indexer.workers {
        if w == 0 || w > 256 {
            return Err(CatalogError::InvalidConfig("indexer.workers must be in 1..=256".into()));
        }
    }

    if cfg.search.limit == 0 || cfg.search.limit > MAX_SEARCH_LIMIT {
        return Err(CatalogError::InvalidConfig(format!(
            "search.limit must be in 1..={}",
            MAX_SEARCH_LIMIT
        )));
    }

    Ok(())
}

/// Creates the parent directory of a file-backed `sqlite://` URL.
pub fn ensure_sqlite_parent_dir(url: &str) -> CatalogResult<()> {
    let Some(path) = sqlite_file_path(url) else {
        return Ok(());
    };
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// File path of a `sqlite:` URL, or `None` for in-memory databases.
pub fn sqlite_file_path(url: &str) -> Option<&str> {
    let rest = url.strip_prefix("sqlite://").or_else(|| url.strip_prefix("sqlite:"))?;
    let path = rest.split('?').next().unwrap_or(rest);
    if path.is_empty() || path == ":memory:" {
        return None;
    }
    // On Windows, handle URLs like sqlite:///C:/... by stripping the leading '/'
    #[cfg(windows)]
    let path = {
        let bytes = path.as_bytes();
        if bytes.len() >= 3 && bytes[0] == b'/' && bytes[2] == b':' && bytes[1].is_ascii_alphabetic() {
            &path[1..]
        } else {
            path
        }
    };
    Some(path)
}
