//! The store abstraction the ledger is written against

use crate::dataset::{ChangeSet, Dataset};
use chrono::{DateTime, Utc};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

// ── Errors ──────────────────────────────────────────────────────────

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Malformed document {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Commit failed: {0}")]
    CommitFailed(String),
}

impl StoreError {
    /// Attach a path to an `io::Error`, for use with `map_err`
    pub fn io(path: &Path) -> impl FnOnce(io::Error) -> StoreError + '_ {
        move |source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

// ── Backups ─────────────────────────────────────────────────────────

/// Where a pre-reset copy of the mutable documents went
#[derive(Debug, Clone, PartialEq)]
pub struct BackupInfo {
    /// `backup-<unix millis>`
    pub label: String,
    /// Directory holding the copies, for file-backed stores
    pub location: Option<PathBuf>,
    pub created: DateTime<Utc>,
}

// ── Store ───────────────────────────────────────────────────────────

/// Persistence boundary for users, businesses, transactions and market.
///
/// `commit` must be all-or-nothing across the documents in the change set:
/// either every document is replaced or, after recovery, none is.
pub trait Store: Send {
    /// Read every document
    fn load(&self) -> Result<Dataset, StoreError>;

    /// Replace the documents named in `changes` as one unit
    fn commit(&mut self, changes: &ChangeSet<'_>) -> Result<(), StoreError>;

    /// Copy the mutable documents somewhere safe
    fn backup(&mut self) -> Result<BackupInfo, StoreError>;
}

impl<S: Store + ?Sized> Store for Box<S> {
    fn load(&self) -> Result<Dataset, StoreError> {
        (**self).load()
    }

    fn commit(&mut self, changes: &ChangeSet<'_>) -> Result<(), StoreError> {
        (**self).commit(changes)
    }

    fn backup(&mut self) -> Result<BackupInfo, StoreError> {
        (**self).backup()
    }
}
