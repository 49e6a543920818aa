//! Failure ledger.
//!
//! An ordered, append-only record of failing execution units, persisted to
//! `failing-tests.txt` in the output directory as failures occur. The
//! ledger length is the process exit code magnitude; it counts failing
//! units, not failing assertions.

use crate::error::Result;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// File name of the ledger inside the output directory.
pub const LEDGER_FILE_NAME: &str = "failing-tests.txt";

/// Append-only record of failing unit descriptors.
#[derive(Debug)]
pub struct FailureLedger {
    path: PathBuf,
    entries: Vec<String>,
}

impl FailureLedger {
    /// Creates an empty ledger backed by `path`. The file is only created
    /// on the first append, so an all-green run leaves no ledger behind.
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            entries: Vec::new(),
        }
    }

    /// Appends one failing-unit descriptor, persisting it immediately so a
    /// crashed or interrupted run still leaves the failures recorded.
    pub fn append(&mut self, descriptor: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{descriptor}")?;
        self.entries.push(descriptor.to_string());
        Ok(())
    }

    /// Recorded descriptors, in failure order.
    #[must_use]
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Number of failing units.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when no unit has failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}
