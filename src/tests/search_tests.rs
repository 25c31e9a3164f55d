#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::path::PathBuf;

    use crate::error::CatalogError;
    use crate::indexer::loader::load_files;
    use crate::search::{compile_pattern, search, IndexUsage};
    use crate::tests::memory_pool;
    use crate::types::{FileRecord, SearchHit};

    async fn catalog_with(names: &[&str]) -> sqlx::SqlitePool {
        let pool = memory_pool().await;
        let folder: i64 = sqlx::query("INSERT INTO folders (parent_id, name, path) VALUES (NULL, 'docs', '/docs')")
            .execute(&pool)
            .await
            .unwrap()
            .last_insert_rowid();
        let records: Vec<FileRecord> =
            names.iter().map(|n| FileRecord { folder_id: folder, name: n.to_string() }).collect();
        load_files(&pool, &records, 100).await.unwrap();
        pool
    }

    async fn found(pool: &sqlx::SqlitePool, term: &str) -> HashSet<String> {
        search(pool, term, 1000).await.unwrap().hits.into_iter().map(|h| h.file_name).collect()
    }

    fn set(names: &[&str]) -> HashSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn plain_term_becomes_prefix() {
        let p = compile_pattern("rep").unwrap();
        assert_eq!(p.like, "rep%");
        assert_eq!(p.usage, IndexUsage::Prefix);
    }

    #[test]
    fn wildcards_are_translated_verbatim() {
        let p = compile_pattern("*rep*").unwrap();
        assert_eq!(p.like, "%rep%");
        assert_eq!(p.usage, IndexUsage::FullScan);

        let p = compile_pattern("rep?.txt").unwrap();
        assert_eq!(p.like, "rep_.txt", "no trailing wildcard is added");
        assert_eq!(p.usage, IndexUsage::Prefix);

        let p = compile_pattern("?eport").unwrap();
        assert_eq!(p.usage, IndexUsage::FullScan);
    }

    #[test]
    fn like_metacharacters_are_escaped() {
        assert_eq!(compile_pattern("100%_done").unwrap().like, "100!%!_done%");
        assert_eq!(compile_pattern("a!b").unwrap().like, "a!!b%");
        assert_eq!(compile_pattern("%*").unwrap().like, "!%%");
        assert_eq!(compile_pattern("%*").unwrap().usage, IndexUsage::Prefix);
    }

    #[test]
    fn empty_terms_are_rejected() {
        assert!(matches!(compile_pattern(""), Err(CatalogError::InvalidQuery(_))));
        assert!(matches!(compile_pattern("   "), Err(CatalogError::InvalidQuery(_))));
    }

    #[tokio::test]
    async fn prefix_search_does_not_match_inside_names() {
        let pool = catalog_with(&["report.txt", "preReport"]).await;
        assert_eq!(found(&pool, "rep").await, set(&["report.txt"]));
    }

    #[tokio::test]
    async fn wildcard_search_matches_anywhere() {
        let pool = catalog_with(&["report.txt", "preReport"]).await;
        assert_eq!(found(&pool, "*rep*").await, set(&["report.txt", "preReport"]));
    }

    #[tokio::test]
    async fn matching_ignores_case() {
        let pool = catalog_with(&["report.txt", "preReport", "README.md"]).await;
        assert_eq!(found(&pool, "REP").await, set(&["report.txt"]));
        assert_eq!(found(&pool, "readme").await, set(&["README.md"]));
        assert_eq!(found(&pool, "*.TXT").await, set(&["report.txt"]));
    }

    #[tokio::test]
    async fn case_folding_covers_ascii_only() {
        let pool = catalog_with(&["été.txt", "Résumé.pdf"]).await;
        assert_eq!(found(&pool, "été").await, set(&["été.txt"]));
        assert_eq!(found(&pool, "rés").await, set(&["Résumé.pdf"]));
        assert!(found(&pool, "ÉTÉ").await.is_empty(), "non-ASCII letters keep their case");
        assert!(found(&pool, "*SUMÉ*").await.is_empty());
    }

    #[tokio::test]
    async fn single_character_wildcard() {
        let pool = catalog_with(&["a1.log", "a22.log", "b1.log"]).await;
        assert_eq!(found(&pool, "a?.log").await, set(&["a1.log"]));
    }

    #[tokio::test]
    async fn percent_and_underscore_are_literal() {
        let pool = catalog_with(&["50%off.txt", "50abc.txt", "a_b.txt", "axb.txt"]).await;
        assert_eq!(found(&pool, "50%").await, set(&["50%off.txt"]));
        assert_eq!(found(&pool, "a_").await, set(&["a_b.txt"]));
    }

    #[tokio::test]
    async fn results_are_capped() {
        let names: Vec<String> = (0..20).map(|i| format!("log{i}.txt")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let pool = catalog_with(&refs).await;

        let outcome = search(&pool, "log", 5).await.unwrap();

        assert_eq!(outcome.hits.len(), 5);
        assert_eq!(outcome.pattern.usage, IndexUsage::Prefix);
    }

    #[tokio::test]
    async fn hits_carry_folder_path() {
        let pool = catalog_with(&["notes.md"]).await;

        let outcome = search(&pool, "notes", 10).await.unwrap();

        assert_eq!(
            outcome.hits,
            vec![SearchHit { folder_path: "/docs".into(), file_name: "notes.md".into() }]
        );
        assert_eq!(outcome.hits[0].full_path(), PathBuf::from("/docs").join("notes.md"));
    }

    #[tokio::test]
    async fn no_match_is_not_an_error() {
        let pool = catalog_with(&["a.txt"]).await;
        assert!(search(&pool, "zzz", 10).await.unwrap().hits.is_empty());
    }
}
