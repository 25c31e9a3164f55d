#[cfg(test)]
mod tests {
    use crate::config::{
        ensure_sqlite_parent_dir, sqlite_file_path, validate, AppConfig, IndexerConfig, MAX_SEARCH_LIMIT,
    };
    use crate::error::CatalogError;
    use tempfile::TempDir;

    fn defaults() -> AppConfig {
        AppConfig::embedded().expect("embedded defaults parse")
    }

    fn assert_invalid(cfg: &AppConfig, needle: &str) {
        match validate(cfg) {
            Err(CatalogError::InvalidConfig(msg)) => assert!(msg.contains(needle), "{msg}"),
            other => panic!("expected InvalidConfig mentioning {needle}, got {other:?}"),
        }
    }

    #[test]
    fn embedded_defaults_are_valid() {
        let cfg = defaults();
        validate(&cfg).unwrap();
        assert_eq!(cfg.database.url, "sqlite://data/fscatalog.db");
        assert_eq!(cfg.indexer.batch_size, 4000);
        assert_eq!(cfg.indexer.channel_capacity, 1024);
        assert!(cfg.indexer.workers.is_none());
        assert!(cfg.indexer.excludes.is_empty());
        assert_eq!(cfg.search.limit, MAX_SEARCH_LIMIT);
        assert_eq!(cfg.logging.directory, "logs");
    }

    #[test]
    fn indexer_defaults_mirror_the_toml() {
        let from_toml = defaults().indexer;
        let from_code = IndexerConfig::default();
        assert_eq!(from_toml.batch_size, from_code.batch_size);
        assert_eq!(from_toml.channel_capacity, from_code.channel_capacity);
        assert_eq!(from_toml.workers, from_code.workers);
    }

    #[test]
    fn worker_count_falls_back_to_cpus() {
        let mut cfg = IndexerConfig::default();
        assert!(cfg.worker_count() >= 1);
        cfg.workers = Some(3);
        assert_eq!(cfg.worker_count(), 3);
    }

    #[test]
    fn rejects_out_of_range_values() {
        let mut cfg = defaults();
        cfg.indexer.batch_size = 0;
        assert_invalid(&cfg, "batch_size");

        let mut cfg = defaults();
        cfg.indexer.channel_capacity = 0;
        assert_invalid(&cfg, "channel_capacity");

        let mut cfg = defaults();
        cfg.indexer.workers = Some(0);
        assert_invalid(&cfg, "workers");
        cfg.indexer.workers = Some(257);
        assert_invalid(&cfg, "workers");

        let mut cfg = defaults();
        cfg.search.limit = 0;
        assert_invalid(&cfg, "search.limit");
        cfg.search.limit = MAX_SEARCH_LIMIT + 1;
        assert_invalid(&cfg, "search.limit");

        let mut cfg = defaults();
        cfg.database.url = "  ".into();
        assert_invalid(&cfg, "database.url");
    }

    #[test]
    fn sqlite_url_paths() {
        assert_eq!(sqlite_file_path("sqlite://data/x.db"), Some("data/x.db"));
        assert_eq!(sqlite_file_path("sqlite:catalog.db?mode=rwc"), Some("catalog.db"));
        assert_eq!(sqlite_file_path("sqlite::memory:"), None);
        assert_eq!(sqlite_file_path("postgres://localhost/db"), None);
    }

    #[cfg(unix)]
    #[test]
    fn creates_parent_directory_of_database_file() {
        let tmp = TempDir::new().unwrap();
        let url = format!("sqlite://{}/nested/dir/catalog.db", tmp.path().display());

        ensure_sqlite_parent_dir(&url).unwrap();

        assert!(tmp.path().join("nested/dir").is_dir());
        assert!(!tmp.path().join("nested/dir/catalog.db").exists());
    }

    #[test]
    fn memory_url_needs_no_directory() {
        ensure_sqlite_parent_dir("sqlite::memory:").unwrap();
    }
}
