//! Session logs: best-effort CSV capture of tap samples.
//!
//! A session is one recording run. It owns a CSV file named after its start
//! time (`tap_20240511_143200.csv`) with one row per sample:
//! `timestamp,rpm,temp_c,rpm_status,temp_status`. Appends are flushed per
//! record so a yanked USB cable or a dead battery loses at most one row.

use std::fs::File;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::link::Sample;

/// An open session log.
pub struct SessionLog {
    path: PathBuf,
    writer: csv::Writer<File>,
    records: u64,
}

impl std::fmt::Debug for SessionLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionLog")
            .field("path", &self.path)
            .field("records", &self.records)
            .finish_non_exhaustive()
    }
}

impl SessionLog {
    /// Create a new session log in the given directory.
    ///
    /// The directory is created if missing. The file name is derived from
    /// the start time.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be created.
    pub fn create(dir: impl AsRef<Path>, started: DateTime<Utc>) -> Result<Self> {
        let dir = dir.as_ref();
        if !dir.exists() {
            std::fs::create_dir_all(dir).map_err(|source| Error::DirectoryCreate {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        let path = dir.join(format!("tap_{}.csv", started.format("%Y%m%d_%H%M%S")));
        debug!("creating session log at {}", path.display());

        let file = File::create(&path).map_err(|source| Error::SessionCreate {
            path: path.clone(),
            source,
        })?;

        Ok(Self {
            path,
            writer: csv::Writer::from_writer(file),
            records: 0,
        })
    }

    /// Path of the session file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of records written so far.
    #[must_use]
    pub fn records(&self) -> u64 {
        self.records
    }

    /// Append one sample and flush it.
    ///
    /// The header row is written automatically before the first record.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the flush fails. Callers in
    /// the recording loop treat this as non-fatal.
    pub fn append(&mut self, sample: &Sample) -> Result<()> {
        self.writer.serialize(sample)?;
        self.writer.flush()?;
        self.records += 1;
        Ok(())
    }

    /// Close the log and return a summary of the run.
    ///
    /// # Errors
    ///
    /// Returns an error if the final flush fails.
    pub fn finish(mut self) -> Result<SessionSummary> {
        self.writer.flush()?;
        info!(records = self.records, "session log closed: {}", self.path.display());
        Ok(SessionSummary {
            path: self.path,
            records: self.records,
        })
    }
}

/// Summary of a finished session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    /// Path of the written CSV file.
    pub path: PathBuf,

    /// Number of records in the file (excluding the header).
    pub records: u64,
}
