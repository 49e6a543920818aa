//! Error types for the harness.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for harness operations.
pub type Result<T> = std::result::Result<T, HarnessError>;

/// Errors that can occur while orchestrating a test run.
///
/// `Config`, `Discovery`, and `Setup` are all fatal before the first unit
/// executes. Per-unit failures are not errors at this level; they are
/// recorded in the failure ledger and reflected in the exit code.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// Invalid run configuration (bad filter, missing variant list, ...).
    #[error("configuration error: {0}")]
    Config(String),

    /// The test directory could not be enumerated.
    #[error("cannot read test directory {}: {source}", path.display())]
    Discovery {
        /// Directory that failed to enumerate.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Pre-flight environment check failed (tools dir, executable bits, ...).
    #[error("setup error: {0}")]
    Setup(String),

    /// I/O error while writing reports or the ledger.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
