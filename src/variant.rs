//! Variant expansion.
//!
//! Some test files exercise an external client tool and must run once per
//! supported tool version. A declarative table maps recognized base-name
//! prefixes to a variant group; each group sources its ordered version list
//! from an environment variable and names the per-unit environment variable
//! injected at run time. Files matching no prefix run exactly once.

use crate::discovery::TestFile;
use crate::error::{HarnessError, Result};
use crate::report::REPORT_SUFFIX;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// A recognized variant group.
#[derive(Debug)]
pub struct VariantGroup {
    /// Base-name prefix selecting this group.
    pub prefix: &'static str,
    /// Environment variable holding the space-separated version list.
    pub list_var: &'static str,
    /// Environment variable injected into each unit of this group.
    pub unit_var: &'static str,
}

/// Prefix table, checked in order; first match wins, no match means no
/// variant.
pub const VARIANT_GROUPS: &[VariantGroup] = &[
    VariantGroup {
        prefix: "cli-",
        list_var: "CLI_VERSIONS",
        unit_var: "CLI_VERSION",
    },
    VariantGroup {
        prefix: "compose-",
        list_var: "COMPOSE_VERSIONS",
        unit_var: "COMPOSE_VERSION",
    },
];

/// Returns the variant group for a base name, if any prefix matches.
#[must_use]
pub fn match_group(base_name: &str) -> Option<&'static VariantGroup> {
    VARIANT_GROUPS.iter().find(|g| base_name.starts_with(g.prefix))
}

/// Version lists for the variant groups, keyed by their source variable.
///
/// Built from the process environment in production; tests construct one
/// directly so they never mutate global env state.
#[derive(Debug, Clone, Default)]
pub struct VariantLists {
    lists: HashMap<&'static str, Vec<String>>,
}

impl VariantLists {
    /// Reads each group's version list from the environment.
    #[must_use]
    pub fn from_env() -> Self {
        let mut lists = Self::default();
        for group in VARIANT_GROUPS {
            if let Ok(raw) = std::env::var(group.list_var) {
                let versions: Vec<String> =
                    raw.split_whitespace().map(str::to_string).collect();
                if !versions.is_empty() {
                    lists.insert(group.list_var, versions);
                }
            }
        }
        lists
    }

    /// Sets the version list for a group's source variable.
    pub fn insert(&mut self, list_var: &'static str, versions: Vec<String>) {
        self.lists.insert(list_var, versions);
    }

    /// Returns the version list configured for `group`, if any.
    #[must_use]
    pub fn versions(&self, group: &VariantGroup) -> Option<&[String]> {
        self.lists.get(group.list_var).map(Vec::as_slice)
    }
}

/// A concrete variant: the env var to inject and its value.
#[derive(Debug, Clone)]
pub struct Variant {
    /// Environment variable name injected into the unit.
    pub env_var: &'static str,
    /// Version identifier.
    pub value: String,
}

/// One concrete invocation of a test file under one variant configuration.
/// Immutable after expansion.
#[derive(Debug, Clone)]
pub struct ExecutionUnit {
    /// The test file to invoke.
    pub file: TestFile,
    /// Variant configuration, absent for non-prefixed files.
    pub variant: Option<Variant>,
}

impl ExecutionUnit {
    /// Report file name: `<base>[-<variant>].report`.
    #[must_use]
    pub fn report_name(&self) -> String {
        match &self.variant {
            Some(v) => format!("{}-{}{REPORT_SUFFIX}", self.file.base_name, v.value),
            None => format!("{}{REPORT_SUFFIX}", self.file.base_name),
        }
    }

    /// Report path under the output directory.
    #[must_use]
    pub fn report_path(&self, output_dir: &Path) -> PathBuf {
        output_dir.join(self.report_name())
    }

    /// Human-readable descriptor used in logs and the failure ledger:
    /// `<file> (<VAR>=<value>)` when a variant is present, else the bare
    /// file name.
    #[must_use]
    pub fn descriptor(&self) -> String {
        match &self.variant {
            Some(v) => format!("{} ({}={})", self.file.file_name, v.env_var, v.value),
            None => self.file.file_name.clone(),
        }
    }
}

/// Expands discovered test files into execution units.
///
/// A prefixed file expands to one unit per configured version, in list
/// order. Validation is fail-fast: a matched prefix with a missing or empty
/// version list aborts expansion before any unit is built, so nothing
/// executes under a half-configured matrix.
///
/// # Errors
///
/// Returns [`HarnessError::Config`] when a matched group has no versions.
pub fn expand(files: Vec<TestFile>, lists: &VariantLists) -> Result<Vec<ExecutionUnit>> {
    for file in &files {
        if let Some(group) = match_group(&file.base_name) {
            if lists.versions(group).map_or(true, <[String]>::is_empty) {
                return Err(HarnessError::Config(format!(
                    "{} matches prefix '{}' but {} is unset or empty",
                    file.file_name, group.prefix, group.list_var
                )));
            }
        }
    }

    let mut units = Vec::new();
    for file in files {
        match match_group(&file.base_name) {
            Some(group) => {
                // Checked non-empty above.
                for value in lists.versions(group).unwrap_or_default() {
                    units.push(ExecutionUnit {
                        file: file.clone(),
                        variant: Some(Variant {
                            env_var: group.unit_var,
                            value: value.clone(),
                        }),
                    });
                }
            }
            None => units.push(ExecutionUnit {
                file,
                variant: None,
            }),
        }
    }
    Ok(units)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_file(name: &str) -> TestFile {
        TestFile {
            path: PathBuf::from(format!("/suite/{name}")),
            file_name: name.to_string(),
            base_name: name.strip_suffix(".test.sh").unwrap().to_string(),
        }
    }

    fn cli_lists(versions: &[&str]) -> VariantLists {
        let mut lists = VariantLists::default();
        lists.insert(
            "CLI_VERSIONS",
            versions.iter().map(|v| v.to_string()).collect(),
        );
        lists
    }

    #[test]
    fn prefix_table_matches_in_order() {
        assert_eq!(match_group("cli-run").unwrap().unit_var, "CLI_VERSION");
        assert_eq!(
            match_group("compose-up").unwrap().unit_var,
            "COMPOSE_VERSION"
        );
        assert!(match_group("info").is_none());
    }

    #[test]
    fn prefixed_file_expands_once_per_version_in_order() {
        let units = expand(
            vec![test_file("cli-run.test.sh")],
            &cli_lists(&["1.9.1", "1.10.3"]),
        )
        .unwrap();

        assert_eq!(units.len(), 2);
        let values: Vec<_> = units
            .iter()
            .map(|u| u.variant.as_ref().unwrap().value.as_str())
            .collect();
        assert_eq!(values, ["1.9.1", "1.10.3"]);
    }

    #[test]
    fn unmatched_file_yields_exactly_one_unit() {
        let units = expand(vec![test_file("info.test.sh")], &VariantLists::default()).unwrap();
        assert_eq!(units.len(), 1);
        assert!(units[0].variant.is_none());
    }

    #[test]
    fn missing_version_list_fails_before_expansion() {
        let err = expand(vec![test_file("cli-run.test.sh")], &VariantLists::default())
            .unwrap_err();
        assert!(matches!(err, HarnessError::Config(_)));
        assert!(err.to_string().contains("CLI_VERSIONS"));
    }

    #[test]
    fn empty_version_list_fails_before_expansion() {
        let err = expand(vec![test_file("cli-run.test.sh")], &cli_lists(&[])).unwrap_err();
        assert!(matches!(err, HarnessError::Config(_)));
    }

    #[test]
    fn report_names_are_derived_from_base_name_and_variant() {
        let units = expand(
            vec![test_file("cli-run.test.sh"), test_file("info.test.sh")],
            &cli_lists(&["1.10.3"]),
        )
        .unwrap();

        assert_eq!(units[0].report_name(), "cli-run-1.10.3.report");
        assert_eq!(units[1].report_name(), "info.report");
    }

    #[test]
    fn descriptor_includes_variant_assignment() {
        let units = expand(vec![test_file("cli-run.test.sh")], &cli_lists(&["1.10.3"])).unwrap();
        assert_eq!(
            units[0].descriptor(),
            "cli-run.test.sh (CLI_VERSION=1.10.3)"
        );
    }
}
