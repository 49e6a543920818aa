//! Run configuration.

use crate::variant::VariantLists;
use std::path::PathBuf;
use std::time::Duration;

/// Default test file directory, relative to the harness root.
pub const DEFAULT_TEST_DIR: &str = "test/integration";

/// Default output directory for reports and the ledger, relative to the
/// harness root.
pub const DEFAULT_OUTPUT_DIR: &str = "test/output";

/// Default bundled-tools directory, prepended to `PATH` when present.
pub const DEFAULT_TOOLS_DIR: &str = "tools/bin";

/// Harness configuration for one run.
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Harness root; working directory for every test subprocess.
    pub root_dir: PathBuf,
    /// Directory containing the test files.
    pub test_dir: PathBuf,
    /// Directory receiving per-unit reports and the failure ledger.
    /// Deleted and recreated at the start of each run.
    pub output_dir: PathBuf,
    /// Bundled tool binaries, prepended to `PATH` so toolchain resolution
    /// does not depend on system-wide installs. `None` disables the prefix.
    pub tools_dir: Option<PathBuf>,
    /// Case-sensitive substring filter on test base names.
    pub filter: Option<String>,
    /// Halt after the first failing unit.
    pub stop_on_failure: bool,
    /// Kill a unit that runs longer than this. `None` means no limit.
    pub unit_timeout: Option<Duration>,
    /// Version lists for the variant groups.
    pub variants: VariantLists,
}

impl HarnessConfig {
    /// Creates a configuration rooted at `root_dir` with the default layout.
    ///
    /// The default tools directory is only used when it exists; an
    /// explicitly configured one is validated during pre-flight instead.
    /// Variant lists are read from the environment.
    #[must_use]
    pub fn new(root_dir: PathBuf) -> Self {
        let tools_dir = root_dir.join(DEFAULT_TOOLS_DIR);
        Self {
            test_dir: root_dir.join(DEFAULT_TEST_DIR),
            output_dir: root_dir.join(DEFAULT_OUTPUT_DIR),
            tools_dir: tools_dir.is_dir().then_some(tools_dir),
            filter: None,
            stop_on_failure: false,
            unit_timeout: None,
            variants: VariantLists::from_env(),
            root_dir,
        }
    }
}
