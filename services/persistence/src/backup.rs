//! Timestamped copies of the data directory, taken before a reset

use crate::dataset::Document;
use crate::store::{BackupInfo, StoreError};
use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const BACKUP_PREFIX: &str = "backup-";

/// `backup-<unix millis>`
pub fn backup_dir_name(at: DateTime<Utc>) -> String {
    format!("{}{}", BACKUP_PREFIX, at.timestamp_millis())
}

/// Pick a directory under `data_dir` that does not exist yet.
/// Two backups in the same millisecond get `-1`, `-2`, ... suffixes.
fn fresh_backup_dir(data_dir: &Path, at: DateTime<Utc>) -> (String, PathBuf) {
    let base = backup_dir_name(at);
    let mut label = base.clone();
    let mut suffix = 0u32;
    loop {
        let candidate = data_dir.join(&label);
        if !candidate.exists() {
            return (label, candidate);
        }
        suffix += 1;
        label = format!("{}-{}", base, suffix);
    }
}

/// Copy each document in `documents` that exists in `data_dir` into a new
/// backup directory next to them.
pub fn copy_documents(
    data_dir: &Path,
    documents: &[Document],
    at: DateTime<Utc>,
) -> Result<BackupInfo, StoreError> {
    let (label, target) = fresh_backup_dir(data_dir, at);
    fs::create_dir_all(&target).map_err(StoreError::io(&target))?;

    let mut copied = 0usize;
    for doc in documents {
        let source = data_dir.join(doc.file_name());
        if !source.exists() {
            debug!(document = ?doc, "nothing to back up");
            continue;
        }
        let dest = target.join(doc.file_name());
        fs::copy(&source, &dest).map_err(StoreError::io(&source))?;
        copied += 1;
    }

    info!(backup = %label, copied, "backup written");
    Ok(BackupInfo {
        label,
        location: Some(target),
        created: at,
    })
}

/// Backup directories under `data_dir`, oldest first
pub fn list_backups(data_dir: &Path) -> Result<Vec<PathBuf>, StoreError> {
    let mut found = Vec::new();
    for entry in fs::read_dir(data_dir).map_err(StoreError::io(data_dir))? {
        let entry = entry.map_err(StoreError::io(data_dir))?;
        let path = entry.path();
        let is_backup = entry
            .file_name()
            .to_str()
            .map(|name| name.starts_with(BACKUP_PREFIX))
            .unwrap_or(false);
        if is_backup && path.is_dir() {
            found.push(path);
        }
    }
    found.sort();
    Ok(found)
}
