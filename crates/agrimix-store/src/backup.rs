// SPDX-License-Identifier: Apache-2.0

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::error::Result;

/// Filename-safe timestamp spelling for backup artifacts.
const BACKUP_TS_FORMAT: &str = "%Y-%m-%dT%H-%M-%S";
const BACKUP_PREFIX: &str = "database_";
const PRE_RESTORE_PREFIX: &str = "pre_restore_";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupInfo {
    pub path: PathBuf,
    pub size_bytes: u64,
}

/// Copy the live database file into `target_dir` under a timestamped name.
/// SQLite keeps the file consistent between transactions and the server
/// serializes writes, so a plain file copy is a valid backup here.
pub fn backup_database(
    db_path: &Path,
    target_dir: &Path,
    now: DateTime<Utc>,
) -> Result<BackupInfo> {
    fs::create_dir_all(target_dir)?;
    let file_name = format!("{BACKUP_PREFIX}{}.sqlite", now.format(BACKUP_TS_FORMAT));
    let backup_path = target_dir.join(file_name);
    fs::copy(db_path, &backup_path)?;
    let size_bytes = fs::metadata(&backup_path)?.len();
    Ok(BackupInfo {
        path: backup_path,
        size_bytes,
    })
}

/// Restore the newest `database_*.sqlite` found in `backup_dir`, saving the
/// current database alongside it first so a bad restore can itself be
/// undone.
pub fn restore_latest(
    db_path: &Path,
    backup_dir: &Path,
    now: DateTime<Utc>,
) -> Result<BackupInfo> {
    let mut candidates: Vec<PathBuf> = fs::read_dir(backup_dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| {
                    name.starts_with(BACKUP_PREFIX) && name.ends_with(".sqlite")
                })
        })
        .collect();
    candidates.sort();
    let latest = candidates.pop().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("no {BACKUP_PREFIX}*.sqlite backup in {}", backup_dir.display()),
        )
    })?;

    let pre_restore = backup_dir.join(format!(
        "{PRE_RESTORE_PREFIX}{}.sqlite",
        now.format(BACKUP_TS_FORMAT)
    ));
    fs::copy(db_path, &pre_restore)?;

    fs::copy(&latest, db_path)?;
    let size_bytes = fs::metadata(&latest)?.len();
    Ok(BackupInfo {
        path: latest,
        size_bytes,
    })
}
