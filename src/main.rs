//! e2e-harness CLI - runs an integration-test suite and exits with the
//! number of failing test units.

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::Parser;
use e2e_harness::HarnessConfig;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Integration-test matrix harness
#[derive(Parser)]
#[command(name = "e2e-harness")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Only run test files whose base name contains this substring
    #[arg(short = 'f', long, value_name = "SUBSTRING")]
    filter: Option<String>,

    /// Stop after the first failing test unit
    #[arg(short = 's', long)]
    stop_on_failure: bool,

    /// Kill a test unit that runs longer than this many seconds
    #[arg(short = 't', long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Directory containing the test files
    #[arg(long, value_name = "DIR")]
    test_dir: Option<PathBuf>,

    /// Directory receiving per-unit reports and the failure ledger
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Directory of bundled tool binaries, prepended to PATH
    #[arg(long, value_name = "DIR")]
    tools_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    // Usage requests exit 0; any argument error exits 1 so CI can tell a
    // bad invocation apart from a clean zero-failure run.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => 1,
            };
            let _ = err.print();
            std::process::exit(code);
        }
    };

    // TRACE enables verbose execution tracing, mirroring the suite's shell
    // tooling; RUST_LOG still takes precedence when set.
    let filter = if std::env::var_os("TRACE").is_some() {
        "e2e_harness=debug"
    } else {
        "e2e_harness=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    match run(cli).await {
        Ok(failing_units) => {
            if failing_units > 255 {
                tracing::warn!(
                    "{failing_units} failing units exceed the exit-code range, clamping to 255"
                );
            }
            #[allow(clippy::cast_possible_truncation)]
            std::process::exit(failing_units.min(255) as i32);
        }
        Err(err) => {
            eprintln!("e2e-harness: {err:#}");
            std::process::exit(1);
        }
    }
}

/// Builds the run configuration from CLI flags and executes the harness,
/// returning the failing-unit count for the exit code.
async fn run(cli: Cli) -> Result<usize> {
    let root_dir = std::env::current_dir().context("cannot determine working directory")?;

    let mut config = HarnessConfig::new(root_dir);
    config.filter = cli.filter;
    config.stop_on_failure = cli.stop_on_failure;
    config.unit_timeout = cli.timeout.map(Duration::from_secs);
    if let Some(dir) = cli.test_dir {
        config.test_dir = dir;
    }
    if let Some(dir) = cli.output_dir {
        config.output_dir = dir;
    }
    if let Some(dir) = cli.tools_dir {
        config.tools_dir = Some(dir);
    }

    let summary = e2e_harness::run(config).await.context("harness run failed")?;
    Ok(summary.failing_units)
}
