//! Test file discovery.
//!
//! Enumerates executable test files from the configured test directory.
//! A file is a candidate when its name ends in [`TEST_SUFFIX`]; the optional
//! filter restricts the set to base names containing the substring
//! (case-sensitive). Results are ordered by file name so runs are
//! deterministic regardless of directory iteration order.

use crate::error::{HarnessError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Recognized suffix for test files.
pub const TEST_SUFFIX: &str = ".test.sh";

/// A discovered test file. Immutable once discovered.
#[derive(Debug, Clone)]
pub struct TestFile {
    /// Full path to the executable test file.
    pub path: PathBuf,
    /// File name including the test suffix.
    pub file_name: String,
    /// File name with the test suffix stripped.
    pub base_name: String,
}

/// Enumerates test files under `test_dir`, optionally narrowed by `filter`.
///
/// An empty result set is not an error; it means zero tests run and the
/// harness exits 0.
///
/// # Errors
///
/// Returns [`HarnessError::Discovery`] if the directory cannot be read.
pub fn discover(test_dir: &Path, filter: Option<&str>) -> Result<Vec<TestFile>> {
    let entries = fs::read_dir(test_dir).map_err(|source| HarnessError::Discovery {
        path: test_dir.to_path_buf(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| HarnessError::Discovery {
            path: test_dir.to_path_buf(),
            source,
        })?;
        if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
            continue;
        }
        let file_name = entry.file_name().to_string_lossy().into_owned();
        let Some(base_name) = file_name.strip_suffix(TEST_SUFFIX) else {
            continue;
        };
        if let Some(filter) = filter {
            if !base_name.contains(filter) {
                continue;
            }
        }
        files.push(TestFile {
            path: entry.path(),
            base_name: base_name.to_string(),
            file_name,
        });
    }

    files.sort_by(|a, b| a.file_name.cmp(&b.file_name));
    Ok(files)
}
