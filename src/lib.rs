//! # fscatalog
//!
//! Builds a searchable catalog of a filesystem tree. Every folder and file under a root
//! is stored in SQLite with its parent/child structure, so name lookups never touch the
//! disk again.
//!
//! ## Core Components
//!
//! - [`indexer`]: the four-phase pipeline (collect, index folders, scan files, bulk load)
//! - [`search`]: search-term compilation and the indexed name lookup
//! - [`db`]: connection setup and schema
//! - [`config`]: layered configuration
//! - [`error`]: the catalog error type
//! - [`types`]: rows, records and summaries shared between phases
//! - [`cli`]: the `index` and `search` commands

pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod indexer;
pub mod search;
pub mod types;

#[cfg(test)]
mod tests;
