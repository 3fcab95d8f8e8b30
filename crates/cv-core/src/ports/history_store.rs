use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::NaiveDateTime;
use thiserror::Error;

use crate::catalog::HistoryLayout;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("history entry {0} is empty")]
    EmptyEntry(PathBuf),

    #[error("no free history file name under {0}")]
    NameExhausted(PathBuf),

    #[error("history I/O failed at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Durable storage for persisted representations.
///
/// Entries live under `{root}/{layout.folder}/` with timestamp-derived names.
#[async_trait]
pub trait HistoryStorePort: Send + Sync {
    /// Write a new entry and return its path.
    async fn write_entry(&self, layout: &HistoryLayout, bytes: &[u8]) -> Result<PathBuf, StorageError>;

    /// Read a stored entry back. Missing or empty entries are errors.
    async fn read_entry(&self, path: &Path) -> Result<Vec<u8>, StorageError>;

    /// Delete entries whose timestamp is older than `cutoff`; returns the count removed.
    async fn remove_entries_older_than(&self, cutoff: NaiveDateTime) -> Result<usize, StorageError>;

    /// Delete every history folder; returns the number of files removed.
    async fn purge(&self) -> Result<usize, StorageError>;
}
