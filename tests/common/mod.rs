//! Shared test utilities for the CLI end-to-end tests.
//!
//! Add `mod common;` to a test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new().with_repository("connector");
//!     fixture.fetch_command().arg("--no-write").assert().success();
//! }
//! ```

use assert_fs::prelude::*;
use std::env;
use std::path::{Path, PathBuf};

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::should_skip_network_tests;
    pub use super::TestFixture;
}

/// Environment variables that would leak host settings into a test run.
const ISOLATED_ENV: &[&str] = &[
    "AUTO_ADDONS_SETTINGS",
    "AUTO_ADDONS_BASE_PATH",
    "AUTO_ADDONS_DEFAULT_SCHEME",
    "AUTO_ADDONS_DEFAULT_HOST",
    "AUTO_ADDONS_DEFAULT_ORGANIZATION",
    "AUTO_ADDONS_DEPENDENCIES_FILE",
    "AUTO_ADDONS_BUILTIN_PATH",
    "AUTO_ADDONS_CONFIG_FILE",
    "FETCH_OCA_DEPENDENCIES",
    "ADDONS_REPO",
    "RUST_LOG",
];

/// Returns `true` if the `SKIP_NETWORK_TESTS` environment variable is set.
#[allow(dead_code)]
pub fn should_skip_network_tests() -> bool {
    env::var("SKIP_NETWORK_TESTS").is_ok()
}

/// A temporary Odoo layout: an addons base directory and a server config.
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

impl TestFixture {
    /// Create a fixture with an empty base directory and a minimal config.
    pub fn new() -> Self {
        let temp_dir = assert_fs::TempDir::new().expect("Failed to create temp directory");
        temp_dir
            .child("addons")
            .create_dir_all()
            .expect("Failed to create base directory");
        temp_dir
            .child("odoo.conf")
            .write_str("[options]\naddons_path = /old/path\ndb_host = db\n")
            .expect("Failed to write config file");
        Self { temp_dir }
    }

    /// Write the root `oca_dependencies.txt` of the base directory.
    pub fn with_root_dependencies(self, content: &str) -> Self {
        self.temp_dir
            .child("addons/oca_dependencies.txt")
            .write_str(content)
            .expect("Failed to write dependency file");
        self
    }

    /// Create an already-present repository directory under the base.
    pub fn with_repository(self, folder: &str) -> Self {
        self.temp_dir
            .child("addons")
            .child(folder)
            .create_dir_all()
            .expect("Failed to create repository directory");
        self
    }

    /// Write the dependency file of an already-present repository.
    #[allow(dead_code)]
    pub fn with_repository_dependencies(self, folder: &str, content: &str) -> Self {
        self.temp_dir
            .child("addons")
            .child(folder)
            .child("oca_dependencies.txt")
            .write_str(content)
            .expect("Failed to write dependency file");
        self
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn base_path(&self) -> PathBuf {
        self.path().join("addons")
    }

    pub fn config_path(&self) -> PathBuf {
        self.path().join("odoo.conf")
    }

    /// A command for the binary with host settings removed from the environment.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("auto-addons");
        cmd.current_dir(self.path());
        for var in ISOLATED_ENV {
            cmd.env_remove(var);
        }
        cmd
    }

    /// `fetch` pointed at this fixture, without pulling existing repositories.
    pub fn fetch_command(&self) -> assert_cmd::Command {
        let mut cmd = self.command();
        cmd.arg("--color")
            .arg("never")
            .arg("fetch")
            .arg("--no-pull")
            .arg("--base-path")
            .arg(self.base_path())
            .arg("--config-file")
            .arg(self.config_path())
            .arg("--builtin-addons-path")
            .arg("/opt/odoo/sources/odoo/addons");
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}
