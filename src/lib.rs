//! Integration-test matrix harness.
//!
//! Orchestrates a suite of executable integration-test files (typically
//! black-box tests against a Docker-compatible remote API) through a fixed
//! pipeline:
//!
//! 1. **Discovery** - enumerate test files, optionally filtered by name
//! 2. **Variant expansion** - run `cli-`/`compose-` prefixed files once per
//!    supported tool version
//! 3. **Execution** - run each unit sequentially as a subprocess, teeing
//!    its TAP output to the console and a per-unit report file
//! 4. **Aggregation** - sum the declared counters across all reports and
//!    print a colorized summary
//!
//! The process exit code is the number of failing *units* (recorded in the
//! failure ledger), not the number of failing assertions, so the harness
//! composes directly into CI pipelines.

pub mod config;
pub mod context;
pub mod discovery;
pub mod error;
pub mod ledger;
pub mod report;
pub mod runner;
pub mod variant;

pub use config::HarnessConfig;
pub use error::{HarnessError, Result};
pub use report::AggregateCounts;
pub use runner::UnitOutcome;

use crate::context::RunContext;
use std::time::{Duration, Instant};

/// Outcome of a whole harness run.
#[derive(Debug)]
pub struct RunSummary {
    /// Summed declared counters from all reports.
    pub counts: AggregateCounts,
    /// Number of failing units; the process exit code magnitude.
    pub failing_units: usize,
    /// Wall-clock duration of the run.
    pub elapsed: Duration,
}

/// Runs the whole harness: discovery, expansion, sequential execution,
/// aggregation, and the printed summary.
///
/// # Errors
///
/// Returns an error for configuration, discovery, and setup problems, all
/// of which abort before any unit executes. Failing units are not errors;
/// they are reported through [`RunSummary::failing_units`].
pub async fn run(config: HarnessConfig) -> Result<RunSummary> {
    let started = Instant::now();

    let files = discovery::discover(&config.test_dir, config.filter.as_deref())?;
    let units = variant::expand(files, &config.variants)?;
    tracing::debug!("expanded {} execution units", units.len());

    let mut ctx = RunContext::new(&config)?;
    context::preflight(&config, &units)?;

    for unit in &units {
        tracing::info!("running {}", unit.descriptor());
        let result = runner::run_unit(&config, unit).await?;
        match result.outcome {
            UnitOutcome::Passed => {}
            UnitOutcome::Failed { code } => {
                tracing::warn!("{} failed with exit code {code}", unit.descriptor());
                ctx.ledger.append(&unit.descriptor())?;
                if config.stop_on_failure {
                    break;
                }
            }
            UnitOutcome::TimedOut => {
                let secs = config.unit_timeout.map_or(0, |d| d.as_secs());
                tracing::warn!("{} timed out after {secs}s", unit.descriptor());
                ctx.ledger
                    .append(&format!("{} [timed out after {secs}s]", unit.descriptor()))?;
                if config.stop_on_failure {
                    break;
                }
            }
        }
    }

    let counts = report::aggregate(&config.output_dir)?;
    let elapsed = started.elapsed();
    report::print_summary(&counts, elapsed, ctx.ledger.entries());

    Ok(RunSummary {
        counts,
        failing_units: ctx.ledger.len(),
        elapsed,
    })
}
