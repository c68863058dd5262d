//! Commit Journal: write-ahead record of a multi-document commit
//!
//! Before any document is replaced, the full rendered contents of every
//! document in the commit are written to `commit.journal.json`, each entry
//! carrying a CRC32C checksum of its contents. The journal itself is
//! written to a temp file, fsynced and renamed, so it is either absent or
//! whole. It is removed once every document has been swapped in.
//!
//! On open, a journal that is still present means the previous process died
//! mid-commit; replaying it finishes the commit.

use crate::dataset::Document;
use crate::store::StoreError;
use crc32c::crc32c;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

pub const JOURNAL_FILE: &str = "commit.journal.json";

/// Current journal format version.
pub const JOURNAL_VERSION: u32 = 1;

// ── Journal Entry ───────────────────────────────────────────────────

/// New contents of one document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub document: Document,
    pub contents: String,
    /// CRC32C over `contents`
    pub checksum: u32,
}

impl JournalEntry {
    pub fn new(document: Document, contents: String) -> Self {
        let checksum = crc32c(contents.as_bytes());
        Self {
            document,
            contents,
            checksum,
        }
    }

    pub fn verify_checksum(&self) -> bool {
        crc32c(self.contents.as_bytes()) == self.checksum
    }
}

// ── Commit Journal ──────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitJournal {
    pub version: u32,
    pub entries: Vec<JournalEntry>,
}

/// What was found on disk at open
#[derive(Debug)]
pub enum JournalState {
    Absent,
    /// Parsed and every checksum matched
    Complete(CommitJournal),
    /// Unreadable or failed verification
    Invalid(String),
}

impl CommitJournal {
    pub fn new(rendered: Vec<(Document, String)>) -> Self {
        Self {
            version: JOURNAL_VERSION,
            entries: rendered
                .into_iter()
                .map(|(document, contents)| JournalEntry::new(document, contents))
                .collect(),
        }
    }

    pub fn path(dir: &Path) -> PathBuf {
        dir.join(JOURNAL_FILE)
    }

    /// Check the version and every entry checksum
    pub fn verify(&self) -> Result<(), String> {
        if self.version > JOURNAL_VERSION {
            return Err(format!("unsupported journal version {}", self.version));
        }
        match self.entries.iter().find(|e| !e.verify_checksum()) {
            Some(bad) => Err(format!("checksum mismatch for {:?}", bad.document)),
            None => Ok(()),
        }
    }

    /// Durably write the journal: tmp → fsync → rename
    pub fn write(&self, dir: &Path) -> Result<PathBuf, StoreError> {
        let path = Self::path(dir);
        let contents = serde_json::to_vec(self)?;
        write_atomic(&path, &contents)?;
        Ok(path)
    }

    /// Inspect the journal left in `dir`, if any
    pub fn read(dir: &Path) -> Result<JournalState, StoreError> {
        let path = Self::path(dir);
        if !path.exists() {
            return Ok(JournalState::Absent);
        }
        let raw = fs::read(&path).map_err(StoreError::io(&path))?;
        let journal: CommitJournal = match serde_json::from_slice(&raw) {
            Ok(journal) => journal,
            Err(e) => return Ok(JournalState::Invalid(e.to_string())),
        };
        match journal.verify() {
            Ok(()) => Ok(JournalState::Complete(journal)),
            Err(reason) => Ok(JournalState::Invalid(reason)),
        }
    }

    /// Remove the journal once its commit is fully applied
    pub fn clear(dir: &Path) -> Result<(), StoreError> {
        let path = Self::path(dir);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::io(&path)(e)),
        }
    }
}

/// Replace `path` with `contents`: write a sibling `.tmp`, fsync, rename.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), StoreError> {
    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = PathBuf::from(tmp_name);

    {
        let mut file = File::create(&tmp_path).map_err(StoreError::io(&tmp_path))?;
        file.write_all(contents).map_err(StoreError::io(&tmp_path))?;
        file.sync_all().map_err(StoreError::io(&tmp_path))?;
    }
    fs::rename(&tmp_path, path).map_err(StoreError::io(path))?;
    Ok(())
}

// ── Tests ───────────────────────────────────────────────────────────
