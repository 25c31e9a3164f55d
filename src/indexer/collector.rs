//! Phase 1: discover every directory under a root.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use tracing::debug;
use walkdir::WalkDir;

use crate::error::CatalogResult;

/// Outcome of visiting one traversal entry.
#[derive(Debug)]
pub enum Visit {
    Dir(PathBuf),
    /// The entry could not be read; its subtree is not descended into.
    Skipped,
    /// Directory path is not valid UTF-8 and would collide with its lossy spelling.
    NotUtf8,
}

#[derive(Debug, Default)]
pub struct CollectedPaths {
    /// Absolute directory paths in discovery order, root first.
    pub paths: Vec<PathBuf>,
    pub skipped: u64,
}

impl CollectedPaths {
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Walks `root` single-threaded and returns every directory that could be opened.
///
/// Symlinked directories are not followed. A directory that cannot be listed, or whose
/// path is not valid UTF-8, is dropped along with its subtree; the walk goes on with its
/// siblings. A missing or unreadable root yields an empty result.
pub fn collect_dirs(root: &Path, excludes: &[String]) -> CatalogResult<CollectedPaths> {
    let gs = build_globset(excludes)?;
    let mut out = CollectedPaths::default();
    let mut unreadable: HashSet<PathBuf> = HashSet::new();

    let mut walker = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !matches_excludes(e.path(), &gs));

    while let Some(entry) = walker.next() {
        match visit(entry, &mut unreadable) {
            Some(Visit::Dir(p)) => out.paths.push(p),
            Some(Visit::Skipped) => out.skipped += 1,
            Some(Visit::NotUtf8) => {
                out.skipped += 1;
                walker.skip_current_dir();
            }
            None => {}
        }
    }

    // walkdir yields a directory before it tries to list it
    if !unreadable.is_empty() {
        out.paths.retain(|p| !unreadable.contains(p));
    }
    Ok(out)
}

/// Classifies one walk entry; non-directories yield `None`.
fn visit(entry: walkdir::Result<walkdir::DirEntry>, unreadable: &mut HashSet<PathBuf>) -> Option<Visit> {
    match entry {
        Ok(e) if e.file_type().is_dir() => {
            if e.path().to_str().is_none() {
                debug!("Skipping directory with non UTF-8 path {:?}", e.path());
                return Some(Visit::NotUtf8);
            }
            Some(Visit::Dir(e.into_path()))
        }
        Ok(_) => None,
        Err(err) => {
            debug!("Skipping unreadable directory {:?}: {}", err.path(), err);
            if let Some(p) = err.path() {
                unreadable.insert(p.to_path_buf());
            }
            Some(Visit::Skipped)
        }
    }
}

pub(crate) fn build_globset(patterns: &[String]) -> CatalogResult<GlobSet> {
    let mut b = GlobSetBuilder::new();
    for p in patterns {
        if p.trim().is_empty() {
            continue;
        }
        // Patterns use forward slashes on every platform, matching `matches_excludes`
        let norm = p.trim().replace('\\', "/");
        b.add(Glob::new(&norm)?);
    }
    Ok(b.build()?)
}

pub(crate) fn matches_excludes(path: &Path, set: &GlobSet) -> bool {
    if set.is_empty() {
        return false;
    }
    let s = path.to_string_lossy().replace('\\', "/");
    set.is_match(&s)
}
