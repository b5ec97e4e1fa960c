//! File-backed history log.
//!
//! The whole log lives in one JSON array. Every append is a full
//! read-modify-write, so access is serialized twice: an async lock for
//! callers sharing one store, and an advisory lock on `<name>.lock` for
//! every store (in any process) pointing at the same file.

use std::ffi::OsString;
use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use fs4::fs_std::FileExt;
use tempfile::NamedTempFile;
use thiserror::Error;
use tokio::fs;
use tokio::sync::Mutex;
use tokio::task::spawn_blocking;
use tracing::{debug, error, warn};

use super::record::{HistorySummary, SendAttemptRecord};

/// Errors raised by the history log.
///
/// These never reach email senders: the dispatcher logs and discards them.
#[derive(Debug, Error)]
pub enum HistoryError {
    /// Filesystem failure
    #[error("history I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Log could not be encoded
    #[error("history serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Existing log content is not a record array
    #[error("history log is corrupt: {0}")]
    Corrupt(String),
}

/// Append-only send history backed by a single JSON file.
///
/// Share one instance per process where possible (behind an `Arc`). Separate
/// instances on the same file, including ones in other processes, still
/// exclude each other through the lock file.
#[derive(Debug)]
pub struct HistoryStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl HistoryStore {
    /// Create a store for the given file. Nothing touches disk until first use.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Location of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record to the end of the log.
    ///
    /// A missing log is created; a corrupt one is moved aside and replaced
    /// by a fresh log containing only this record.
    ///
    /// # Errors
    ///
    /// Returns `HistoryError` if the log cannot be locked, read or written.
    pub async fn append(&self, record: SendAttemptRecord) -> Result<(), HistoryError> {
        let _guard = self.lock.lock().await;
        let _file_lock = self.lock_file().await?;

        let mut records = match self.read_log().await {
            Ok(records) => records,
            Err(HistoryError::Corrupt(reason)) => {
                warn!(path = %self.path.display(), %reason, "Corrupt history log, starting a fresh one");
                self.quarantine().await;
                Vec::new()
            }
            Err(e) => return Err(e),
        };

        records.push(record);
        self.write_log(&records).await?;

        debug!(path = %self.path.display(), total = records.len(), "History record appended");
        Ok(())
    }

    /// All records, newest first, with totals.
    ///
    /// Never fails: storage problems are logged and yield an empty summary.
    pub async fn list(&self) -> HistorySummary {
        let _guard = self.lock.lock().await;
        let _file_lock = match self.lock_file().await {
            Ok(file) => file,
            Err(e) => {
                error!(path = %self.path.display(), error = %e, "Failed to lock history log");
                return HistorySummary::default();
            }
        };

        match self.read_log().await {
            Ok(records) => HistorySummary::from_records(records),
            Err(HistoryError::Corrupt(reason)) => {
                warn!(path = %self.path.display(), %reason, "Corrupt history log, reporting empty history");
                HistorySummary::default()
            }
            Err(e) => {
                error!(path = %self.path.display(), error = %e, "Failed to read history log");
                HistorySummary::default()
            }
        }
    }

    /// Exclusive advisory lock, released when the returned file is dropped.
    async fn lock_file(&self) -> Result<File, HistoryError> {
        let directory = self.directory();
        fs::create_dir_all(&directory).await?;

        let path = self.sibling(".lock");
        let file = spawn_blocking(move || -> std::io::Result<File> {
            let file = OpenOptions::new()
                .create(true)
                .truncate(false)
                .write(true)
                .open(&path)?;
            file.lock_exclusive()?;
            Ok(file)
        })
        .await
        .map_err(std::io::Error::other)??;

        Ok(file)
    }

    async fn read_log(&self) -> Result<Vec<SendAttemptRecord>, HistoryError> {
        match fs::read_to_string(&self.path).await {
            Ok(content) if content.trim().is_empty() => Ok(Vec::new()),
            Ok(content) => {
                serde_json::from_str(&content).map_err(|e| HistoryError::Corrupt(e.to_string()))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "History log not found, creating it");
                self.write_log(&[]).await?;
                Ok(Vec::new())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Stage into a uniquely named sibling, then rename over the log.
    async fn write_log(&self, records: &[SendAttemptRecord]) -> Result<(), HistoryError> {
        let json = serde_json::to_string_pretty(records)?;
        let directory = self.directory();
        let path = self.path.clone();

        spawn_blocking(move || -> std::io::Result<()> {
            let mut staging = NamedTempFile::new_in(&directory)?;
            staging.write_all(json.as_bytes())?;
            staging.persist(&path).map_err(|e| e.error)?;
            Ok(())
        })
        .await
        .map_err(std::io::Error::other)??;

        Ok(())
    }

    async fn quarantine(&self) {
        let target = self.sibling(&format!(".corrupt-{}", Utc::now().timestamp()));
        if let Err(e) = fs::rename(&self.path, &target).await {
            warn!(path = %self.path.display(), error = %e, "Could not move corrupt history log aside");
        } else {
            warn!(backup = %target.display(), "Corrupt history log preserved");
        }
    }

    fn directory(&self) -> PathBuf {
        self.path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
    }

    fn sibling(&self, suffix: &str) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map_or_else(|| OsString::from("history"), ToOwned::to_owned);
        name.push(suffix);
        self.path.with_file_name(name)
    }
}
