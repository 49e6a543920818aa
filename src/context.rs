//! Run context: output directory lifecycle and pre-flight checks.

use crate::config::HarnessConfig;
use crate::error::{HarnessError, Result};
use crate::ledger::{FailureLedger, LEDGER_FILE_NAME};
use crate::variant::ExecutionUnit;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Mutable state shared across the run phases: the clean-slate output
/// directory and the failure ledger. Passing it explicitly keeps the file
/// side effects at phase boundaries instead of scattered globals.
#[derive(Debug)]
pub struct RunContext {
    /// Failure ledger for this run.
    pub ledger: FailureLedger,
}

impl RunContext {
    /// Prepares the output directory (deleted then recreated, so only the
    /// current run's artifacts survive) and an empty ledger inside it.
    pub fn new(config: &HarnessConfig) -> Result<Self> {
        if config.output_dir.exists() {
            fs::remove_dir_all(&config.output_dir)?;
        }
        fs::create_dir_all(&config.output_dir)?;

        Ok(Self {
            ledger: FailureLedger::new(config.output_dir.join(LEDGER_FILE_NAME)),
        })
    }
}

/// Validates the toolchain environment and the expanded units before the
/// first subprocess starts. All findings are fatal; nothing executes under
/// a broken setup.
pub fn preflight(config: &HarnessConfig, units: &[ExecutionUnit]) -> Result<()> {
    if let Some(tools_dir) = &config.tools_dir {
        if !tools_dir.is_dir() {
            return Err(HarnessError::Setup(format!(
                "tools directory not found at {}",
                tools_dir.display()
            )));
        }
    }

    let mut seen = HashSet::new();
    for unit in units {
        if !seen.insert(unit.file.path.as_path()) {
            continue;
        }
        if !is_executable(&unit.file.path)? {
            return Err(HarnessError::Setup(format!(
                "test file {} is not executable",
                unit.file.path.display()
            )));
        }
    }
    Ok(())
}

#[cfg(unix)]
fn is_executable(path: &Path) -> Result<bool> {
    use std::os::unix::fs::PermissionsExt;
    let mode = fs::metadata(path)?.permissions().mode();
    Ok(mode & 0o111 != 0)
}

#[cfg(not(unix))]
fn is_executable(_path: &Path) -> Result<bool> {
    Ok(true)
}
