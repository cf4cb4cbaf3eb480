//! # Settings
//!
//! Where repositories are cloned, which defaults apply to short references,
//! and which Odoo configuration file receives the resulting `addons_path`.
//!
//! Settings are layered, lowest precedence first:
//!
//! 1. the built-in values from [`crate::defaults`],
//! 2. an optional YAML settings file,
//! 3. individual command-line flags or environment variables, applied by the
//!    binary on top of the loaded value.
//!
//! ```yaml
//! base_path: /srv/addons/
//! default_organization: Elico-Corp
//! config_file: /etc/odoo/odoo.conf
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::defaults::{
    default_base_path, DEFAULT_GIT_HOSTING_SERVICE, DEFAULT_ORGANIZATION, DEPENDENCIES_FILE,
    ODOO_ADDONS_PATH, ODOO_CONF,
};
use crate::error::{Error, Result};
use crate::reference::Scheme;

/// Resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Directory repositories are cloned into.
    pub base_path: PathBuf,
    /// Scheme used for references that are not URLs.
    pub default_scheme: Scheme,
    /// Hosting service used for references that are not URLs.
    pub default_host: String,
    /// Organization used for bare repository names.
    pub default_organization: String,
    /// Name of the dependency declaration file at a repository root.
    pub dependencies_file: String,
    /// Built-in addons directory, appended after every resolved path.
    pub builtin_addons_path: PathBuf,
    /// Odoo configuration file whose `addons_path` is rewritten.
    pub config_file: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_path: default_base_path(),
            default_scheme: Scheme::default(),
            default_host: DEFAULT_GIT_HOSTING_SERVICE.to_string(),
            default_organization: DEFAULT_ORGANIZATION.to_string(),
            dependencies_file: DEPENDENCIES_FILE.to_string(),
            builtin_addons_path: PathBuf::from(ODOO_ADDONS_PATH),
            config_file: PathBuf::from(ODOO_CONF),
        }
    }
}

impl Settings {
    /// Parses settings from YAML. Missing keys keep their defaults.
    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| Error::Settings {
            message: format!("cannot read {}: {}", path.display(), e),
        })?;
        Self::from_yaml(&content)
    }

    /// Rejects values that would make every reference unresolvable.
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("default_host", &self.default_host),
            ("default_organization", &self.default_organization),
            ("dependencies_file", &self.dependencies_file),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(Error::Settings {
                    message: format!("{} must not be empty", name),
                });
            }
        }
        if self.dependencies_file.contains(['/', '\\']) {
            return Err(Error::Settings {
                message: format!(
                    "dependencies_file must be a file name, got '{}'",
                    self.dependencies_file
                ),
            });
        }
        Ok(())
    }

    /// Dependency declaration file inside `dir`.
    pub fn dependencies_file_in(&self, dir: &Path) -> PathBuf {
        dir.join(&self.dependencies_file)
    }

    /// Dependency file listing the root references of a run.
    pub fn root_dependencies_file(&self) -> PathBuf {
        self.dependencies_file_in(&self.base_path)
    }
}
