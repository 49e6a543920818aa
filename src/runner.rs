//! Execution runner.
//!
//! Runs one execution unit as a subprocess: working directory is the
//! harness root, the unit's variant variable (if any) is merged over the
//! inherited environment, `PATH` is prefixed with the bundled tools
//! directory, and stdout is tee'd line-by-line to both the console and the
//! unit's report file. Units run strictly sequentially; the only
//! mid-subprocess cancellation point is the optional per-unit timeout.

use crate::config::HarnessConfig;
use crate::error::{HarnessError, Result};
use crate::variant::ExecutionUnit;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::Command;

/// Outcome of one execution unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitOutcome {
    /// Subprocess exited 0.
    Passed,
    /// Subprocess exited non-zero.
    Failed {
        /// Exit code, -1 when killed by a signal.
        code: i32,
    },
    /// Subprocess exceeded the configured per-unit timeout and was killed.
    TimedOut,
}

impl UnitOutcome {
    /// True for any outcome other than `Passed`.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        !matches!(self, UnitOutcome::Passed)
    }
}

/// Per-unit result consumed by the ledger and the aggregator.
#[derive(Debug)]
pub struct RunResult {
    /// How the unit ended.
    pub outcome: UnitOutcome,
    /// Report file written for this unit.
    pub report_path: PathBuf,
}

/// Runs a single unit to completion and writes its report.
///
/// # Errors
///
/// Returns an error when the subprocess cannot be spawned or the report
/// cannot be written. A non-zero exit is a `Failed` outcome, not an error.
pub async fn run_unit(config: &HarnessConfig, unit: &ExecutionUnit) -> Result<RunResult> {
    let report_path = unit.report_path(&config.output_dir);

    let mut cmd = Command::new(&unit.file.path);
    cmd.current_dir(&config.root_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit());

    if let Some(tools_dir) = &config.tools_dir {
        cmd.env("PATH", prefixed_path(tools_dir)?);
    }
    if let Some(variant) = &unit.variant {
        cmd.env(variant.env_var, &variant.value);
    }

    let mut child = cmd.spawn().map_err(|err| {
        HarnessError::Setup(format!(
            "failed to spawn {}: {err}",
            unit.file.path.display()
        ))
    })?;

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| HarnessError::Setup("child stdout was not captured".to_string()))?;
    let mut report = tokio::fs::File::create(&report_path).await?;

    let wait = async {
        let mut lines = BufReader::new(stdout).lines();
        while let Some(line) = lines.next_line().await? {
            println!("{line}");
            report.write_all(line.as_bytes()).await?;
            report.write_all(b"\n").await?;
        }
        report.flush().await?;
        child.wait().await
    };

    let outcome = match config.unit_timeout {
        Some(limit) => {
            let waited = tokio::time::timeout(limit, wait).await;
            match waited {
                Ok(status) => outcome_from(status?),
                Err(_) => {
                    child.kill().await.ok();
                    let _ = child.wait().await;
                    UnitOutcome::TimedOut
                }
            }
        }
        None => outcome_from(wait.await?),
    };

    Ok(RunResult {
        outcome,
        report_path,
    })
}

fn outcome_from(status: ExitStatus) -> UnitOutcome {
    if status.success() {
        UnitOutcome::Passed
    } else {
        UnitOutcome::Failed {
            code: status.code().unwrap_or(-1),
        }
    }
}

/// Builds a `PATH` value with the tools directory in front of the
/// inherited search path.
fn prefixed_path(tools_dir: &Path) -> Result<OsString> {
    let mut paths = vec![tools_dir.to_path_buf()];
    if let Some(path) = std::env::var_os("PATH") {
        paths.extend(std::env::split_paths(&path));
    }
    std::env::join_paths(paths)
        .map_err(|err| HarnessError::Setup(format!("cannot build PATH: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tools_dir_leads_the_search_path() {
        let path = prefixed_path(Path::new("/opt/harness/tools/bin")).unwrap();
        let first = std::env::split_paths(&path).next().unwrap();
        assert_eq!(first, PathBuf::from("/opt/harness/tools/bin"));
    }

    #[test]
    fn failure_outcomes_are_failures() {
        assert!(!UnitOutcome::Passed.is_failure());
        assert!(UnitOutcome::Failed { code: 1 }.is_failure());
        assert!(UnitOutcome::TimedOut.is_failure());
    }
}
