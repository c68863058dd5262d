//! File-backed store: one pretty-printed JSON file per document
//!
//! Layout of the data directory:
//! ```text
//! data/
//!   users.json  businesses.json  transactions.json  market.json
//!   commit.journal.json      (only while a commit is in flight)
//!   backup-<millis>/         (one per reset)
//! ```

use crate::backup;
use crate::dataset::{ChangeSet, Dataset, Document};
use crate::journal::{write_atomic, CommitJournal, JournalState};
use crate::seed;
use crate::store::{BackupInfo, Store, StoreError};
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::PathBuf;
use tracing::{error, info, warn};
use types::account::User;

/// What `open` had to do before the store was usable
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OpenReport {
    /// Documents re-applied from a leftover commit journal
    pub replayed: Vec<Document>,
    /// A leftover journal failed verification and was dropped
    pub discarded_journal: bool,
    /// Documents created from defaults
    pub seeded: Vec<Document>,
    /// Default accounts merged into an existing users document
    pub merged_users: usize,
}

/// A document a commit already swapped in, with the bytes it replaced
#[derive(Debug, Clone)]
struct Replaced {
    document: Document,
    previous: Option<Vec<u8>>,
}

pub struct JsonFileStore {
    dir: PathBuf,
    report: OpenReport,
    /// Documents a failed commit could not put back. While set, the journal
    /// on disk still belongs to that commit and no new commit may start.
    pending_rollback: Option<Vec<Replaced>>,
    #[cfg(test)]
    fail_restores: bool,
}

impl JsonFileStore {
    /// Open (creating if needed) the data directory, finish or discard any
    /// interrupted commit, and seed missing documents.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(StoreError::io(&dir))?;

        let mut store = Self {
            dir,
            report: OpenReport::default(),
            pending_rollback: None,
            #[cfg(test)]
            fail_restores: false,
        };
        store.recover()?;
        store.seed()?;
        info!(dir = %store.dir.display(), report = ?store.report, "data directory ready");
        Ok(store)
    }

    pub fn open_report(&self) -> &OpenReport {
        &self.report
    }

    pub fn document_path(&self, doc: Document) -> PathBuf {
        self.dir.join(doc.file_name())
    }

    /// Read and parse one document
    pub fn read_document<T: DeserializeOwned>(&self, doc: Document) -> Result<T, StoreError> {
        let path = self.document_path(doc);
        let raw = fs::read(&path).map_err(StoreError::io(&path))?;
        serde_json::from_slice(&raw).map_err(|source| StoreError::Malformed { path, source })
    }

    /// Replace one document on its own, outside any commit
    pub fn write_document<T: Serialize + ?Sized>(&self, doc: Document, value: &T) -> Result<(), StoreError> {
        let contents = serde_json::to_string_pretty(value)?;
        write_atomic(&self.document_path(doc), contents.as_bytes())
    }

    // ── Open-time repair ────────────────────────────────────────────

    fn recover(&mut self) -> Result<(), StoreError> {
        match CommitJournal::read(&self.dir)? {
            JournalState::Absent => {}
            JournalState::Complete(journal) => {
                warn!(entries = journal.entries.len(), "re-applying interrupted commit");
                for entry in &journal.entries {
                    write_atomic(&self.document_path(entry.document), entry.contents.as_bytes())?;
                    self.report.replayed.push(entry.document);
                }
                CommitJournal::clear(&self.dir)?;
            }
            JournalState::Invalid(reason) => {
                // Documents are only touched after the journal is durable
                warn!(%reason, "discarding unusable commit journal");
                CommitJournal::clear(&self.dir)?;
                self.report.discarded_journal = true;
            }
        }
        self.remove_stray_temp_files()
    }

    fn remove_stray_temp_files(&self) -> Result<(), StoreError> {
        for doc in Document::ALL {
            let mut tmp = self.document_path(doc).into_os_string();
            tmp.push(".tmp");
            let tmp = PathBuf::from(tmp);
            if tmp.exists() {
                fs::remove_file(&tmp).map_err(StoreError::io(&tmp))?;
            }
        }
        Ok(())
    }

    fn seed(&mut self) -> Result<(), StoreError> {
        for doc in Document::ALL {
            if self.document_path(doc).exists() {
                continue;
            }
            match doc {
                Document::Users => self.write_document(doc, &seed::default_users())?,
                Document::Businesses | Document::Transactions => {
                    self.write_document(doc, &Vec::<()>::new())?
                }
                Document::Market => self.write_document(doc, &seed::default_market())?,
            }
            self.report.seeded.push(doc);
        }

        let mut users: Vec<User> = self.read_document(Document::Users)?;
        let added = seed::merge_default_users(&mut users);
        if added > 0 {
            self.write_document(Document::Users, &users)?;
            self.report.merged_users = added;
        }
        Ok(())
    }

    // ── Commit ──────────────────────────────────────────────────────

    fn restore(&self, replaced: &Replaced) -> Result<(), StoreError> {
        #[cfg(test)]
        if self.fail_restores {
            return Err(StoreError::CommitFailed("restore disabled".to_string()));
        }
        let path = self.document_path(replaced.document);
        match &replaced.previous {
            Some(bytes) => write_atomic(&path, bytes),
            None if path.exists() => fs::remove_file(&path).map_err(StoreError::io(&path)),
            None => Ok(()),
        }
    }

    /// Put back every document a failed commit replaced. The journal is only
    /// cleared once all of them are restored; anything left over is retried
    /// before the next commit.
    fn roll_back(&mut self, replaced: Vec<Replaced>) -> Result<(), StoreError> {
        let mut unrestored = Vec::new();
        let mut first_error = None;
        for entry in replaced {
            if let Err(e) = self.restore(&entry) {
                error!(document = ?entry.document, error = %e, "restore failed");
                first_error.get_or_insert(e);
                unrestored.push(entry);
            }
        }

        let result = match first_error {
            None => CommitJournal::clear(&self.dir),
            Some(e) => Err(e),
        };
        self.pending_rollback = match result {
            Ok(()) => None,
            Err(_) => Some(unrestored),
        };
        result
    }

    /// Current bytes of `doc`, `None` if it does not exist yet
    fn current_bytes(&self, doc: Document) -> Result<Option<Vec<u8>>, StoreError> {
        let path = self.document_path(doc);
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::io(&path)(e)),
        }
    }
}

impl Store for JsonFileStore {
    fn load(&self) -> Result<Dataset, StoreError> {
        Ok(Dataset {
            users: self.read_document(Document::Users)?,
            businesses: self.read_document(Document::Businesses)?,
            transactions: self.read_document(Document::Transactions)?,
            market: self.read_document(Document::Market)?,
        })
    }

    fn commit(&mut self, changes: &ChangeSet<'_>) -> Result<(), StoreError> {
        if changes.is_empty() {
            return Ok(());
        }
        if let Some(unrestored) = self.pending_rollback.take() {
            warn!(documents = unrestored.len(), "retrying rollback of an earlier failed commit");
            self.roll_back(unrestored).map_err(|e| {
                StoreError::CommitFailed(format!("earlier failed commit is still unresolved: {e}"))
            })?;
        }

        let journal = CommitJournal::new(changes.render()?);
        let mut previous = Vec::with_capacity(journal.entries.len());
        for entry in &journal.entries {
            previous.push(self.current_bytes(entry.document)?);
        }
        journal.write(&self.dir)?;

        let mut replaced = Vec::with_capacity(journal.entries.len());
        for (entry, previous) in journal.entries.iter().zip(previous) {
            let path = self.document_path(entry.document);
            if let Err(e) = write_atomic(&path, entry.contents.as_bytes()) {
                error!(document = ?entry.document, error = %e, "document write failed, rolling back");
                if let Err(rollback) = self.roll_back(replaced) {
                    // Journal stays; the next open finishes the commit instead
                    error!(error = %rollback, "rollback failed");
                }
                return Err(StoreError::CommitFailed(e.to_string()));
            }
            replaced.push(Replaced {
                document: entry.document,
                previous,
            });
        }

        CommitJournal::clear(&self.dir)
    }

    fn backup(&mut self) -> Result<BackupInfo, StoreError> {
        backup::copy_documents(&self.dir, &Document::MUTABLE, Utc::now())
    }
}
