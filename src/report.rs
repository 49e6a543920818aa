//! Report aggregation and the run summary.
//!
//! Each unit's subprocess writes TAP-style counter lines (`# tests N`,
//! `# pass N`) into its own report; the aggregator sums those declared
//! counters across every report in the output directory. Counters are never
//! recomputed from individual assertion lines, and a report missing a
//! counter simply contributes zero for it.

use crate::error::Result;
use colored::Colorize;
use std::path::Path;
use std::time::Duration;

/// Suffix of per-unit report files in the output directory.
pub const REPORT_SUFFIX: &str = ".report";

const TESTS_MARKER: &str = "tests";
const PASS_MARKER: &str = "pass";

/// Summed declared counters across all reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregateCounts {
    /// Total tests declared.
    pub tests: u64,
    /// Total tests declared passed.
    pub passed: u64,
}

impl AggregateCounts {
    /// Failing assertion count. Distinct from the failing-unit count kept
    /// by the ledger; only the latter drives the exit code.
    #[must_use]
    pub fn failed(&self) -> u64 {
        self.tests.saturating_sub(self.passed)
    }
}

/// Extracts `N` from a `# <marker> N` line.
fn counter(line: &str, marker: &str) -> Option<u64> {
    let rest = line.strip_prefix("# ")?.trim_start().strip_prefix(marker)?;
    // Reject near-miss markers like "# passing".
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    rest.trim().parse().ok()
}

/// Parses one report's declared (tests, passed) counters. The last
/// occurrence of each marker wins, matching the TAP epilog convention.
#[must_use]
pub fn parse_report(content: &str) -> (u64, u64) {
    let mut tests = 0;
    let mut passed = 0;
    for line in content.lines() {
        if let Some(n) = counter(line, TESTS_MARKER) {
            tests = n;
        } else if let Some(n) = counter(line, PASS_MARKER) {
            passed = n;
        }
    }
    (tests, passed)
}

/// Sums declared counters across every report file in `output_dir`.
///
/// # Errors
///
/// Returns an error if the output directory cannot be read. Unparseable
/// report content is never an error.
pub fn aggregate(output_dir: &Path) -> Result<AggregateCounts> {
    let mut counts = AggregateCounts::default();
    for entry in std::fs::read_dir(output_dir)? {
        let entry = entry?;
        let name = entry.file_name();
        if !name.to_string_lossy().ends_with(REPORT_SUFFIX) {
            continue;
        }
        // Test output is not guaranteed to be UTF-8.
        let raw = std::fs::read(entry.path())?;
        let (tests, passed) = parse_report(&String::from_utf8_lossy(&raw));
        counts.tests += tests;
        counts.passed += passed;
    }
    Ok(counts)
}

/// Prints the colorized end-of-run summary: elapsed time, pass line, fail
/// line only when something failed, and the ledger contents verbatim when
/// non-empty.
pub fn print_summary(counts: &AggregateCounts, elapsed: Duration, failures: &[String]) {
    println!();
    println!("# elapsed: {}s", elapsed.as_secs());
    println!(
        "{}",
        format!("# {}/{} tests passed", counts.passed, counts.tests).green()
    );
    let failed = counts.failed();
    if failed > 0 {
        println!("{}", format!("# {failed} tests failed").red());
    }
    if !failures.is_empty() {
        println!("{}", "# failing test units:".red());
        for entry in failures {
            println!("{entry}");
        }
    }
}
