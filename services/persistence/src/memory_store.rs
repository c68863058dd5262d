//! In-memory store for tests and throwaway runs

use crate::dataset::{ChangeSet, Dataset};
use crate::seed;
use crate::store::{BackupInfo, Store, StoreError};
use chrono::Utc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Debug, Default)]
struct Shared {
    dataset: Mutex<Dataset>,
    backups: Mutex<Vec<(BackupInfo, Dataset)>>,
    fail_commits: AtomicBool,
}

/// Cloning yields a handle onto the same data, so a test can keep one
/// handle while the ledger owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    shared: Arc<Shared>,
}

impl MemoryStore {
    pub fn new(dataset: Dataset) -> Self {
        Self {
            shared: Arc::new(Shared {
                dataset: Mutex::new(dataset),
                ..Default::default()
            }),
        }
    }

    /// Default users and market, no businesses or transactions
    pub fn seeded() -> Self {
        Self::new(Dataset {
            users: seed::default_users(),
            market: seed::default_market(),
            ..Default::default()
        })
    }

    /// Make every following commit fail until switched off
    pub fn fail_commits(&self, fail: bool) {
        self.shared.fail_commits.store(fail, Ordering::SeqCst);
    }

    /// Current persisted contents
    pub fn snapshot(&self) -> Dataset {
        self.shared
            .dataset
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Every backup taken so far, with the data it captured
    pub fn backups(&self) -> Vec<(BackupInfo, Dataset)> {
        self.shared
            .backups
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Store for MemoryStore {
    fn load(&self) -> Result<Dataset, StoreError> {
        Ok(self.snapshot())
    }

    fn commit(&mut self, changes: &ChangeSet<'_>) -> Result<(), StoreError> {
        if self.shared.fail_commits.load(Ordering::SeqCst) {
            return Err(StoreError::CommitFailed("injected failure".into()));
        }
        let mut dataset = self
            .shared
            .dataset
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        changes.apply_to(&mut dataset);
        Ok(())
    }

    fn backup(&mut self) -> Result<BackupInfo, StoreError> {
        let created = Utc::now();
        let captured = self.snapshot();
        let mut backups = self
            .shared
            .backups
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let base = crate::backup::backup_dir_name(created);
        let mut label = base.clone();
        let mut n = 0;
        while backups.iter().any(|(taken, _)| taken.label == label) {
            n += 1;
            label = format!("{base}-{n}");
        }
        let info = BackupInfo {
            label,
            location: None,
            created,
        };
        backups.push((info.clone(), captured));
        Ok(info)
    }
}
