//! Compiles user search terms into `LIKE` patterns and runs them against the catalog.
//!
//! Two rules, never combined:
//!
//! * a term containing `*` or `?` is a wildcard pattern and is used as written;
//! * any other term is a literal prefix, so `rep` becomes `rep%`.
//!
//! The prefix form can be answered from `idx_file_name`; a pattern that starts with a
//! wildcard has to look at every row. That difference is reported as an [`IndexUsage`]
//! advisory and has no effect on the rows returned.

use std::time::{Duration, Instant};

use serde::Serialize;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{CatalogError, CatalogResult};
use crate::types::SearchHit;

const LIKE_ESCAPE: char = '!';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexUsage {
    /// Fixed leading characters; the name index narrows the lookup.
    Prefix,
    /// Leading wildcard; every file row is examined.
    FullScan,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompiledPattern {
    /// `LIKE` pattern using `!` as escape character.
    pub like: String,
    pub usage: IndexUsage,
}

#[derive(Debug, Serialize)]
pub struct SearchOutcome {
    pub term: String,
    pub pattern: CompiledPattern,
    pub hits: Vec<SearchHit>,
    #[serde(skip)]
    pub elapsed: Duration,
}

fn push_escaped(out: &mut String, ch: char) {
    if matches!(ch, '%' | '_' | LIKE_ESCAPE) {
        out.push(LIKE_ESCAPE);
    }
    out.push(ch);
}

/// True when the term uses `*` or `?` and is therefore not treated as a prefix.
pub fn has_wildcards(term: &str) -> bool {
    term.contains(['*', '?'])
}

pub fn compile_pattern(term: &str) -> CatalogResult<CompiledPattern> {
    if term.trim().is_empty() {
        return Err(CatalogError::InvalidQuery("search term cannot be empty".into()));
    }
    if term.contains('\0') {
        return Err(CatalogError::InvalidQuery("search term contains a NUL character".into()));
    }

    let mut like = String::with_capacity(term.len() + 2);
    if has_wildcards(term) {
        for ch in term.chars() {
            match ch {
                '*' => like.push('%'),
                '?' => like.push('_'),
                other => push_escaped(&mut like, other),
            }
        }
    } else {
        for ch in term.chars() {
            push_escaped(&mut like, ch);
        }
        like.push('%');
    }

    let usage = if like.starts_with(['%', '_']) { IndexUsage::FullScan } else { IndexUsage::Prefix };
    Ok(CompiledPattern { like, usage })
}

/// Case-insensitive file-name search, joined to folder paths, capped at `limit` rows.
pub async fn search(pool: &SqlitePool, term: &str, limit: u32) -> CatalogResult<SearchOutcome> {
    let pattern = compile_pattern(term)?;
    match pattern.usage {
        IndexUsage::Prefix => debug!(pattern = %pattern.like, "Pattern can use the name index"),
        IndexUsage::FullScan => info!(pattern = %pattern.like, "Leading wildcard; this search scans every file"),
    }

    let started = Instant::now();
    let hits: Vec<SearchHit> = sqlx::query_as(
        r#"SELECT d.path AS folder_path, f.name AS file_name
           FROM files f
           JOIN folders d ON d.id = f.folder_id
           WHERE f.name LIKE ?1 ESCAPE '!'
           LIMIT ?2"#,
    )
    .bind(&pattern.like)
    .bind(i64::from(limit))
    .fetch_all(pool)
    .await?;
    let elapsed = started.elapsed();

    debug!(hits = hits.len(), elapsed_ms = elapsed.as_millis() as u64, "Search finished");
    Ok(SearchOutcome { term: term.to_string(), pattern, hits, elapsed })
}
