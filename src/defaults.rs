//! Default values for auto-addons settings.
//!
//! This module provides centralized default values used across commands,
//! matching the directory layout of the Odoo container images the tool was
//! written for.

use std::path::PathBuf;

/// Directory the additional addon repositories are cloned into.
pub const EXTRA_ADDONS_PATH: &str = "/opt/odoo/additional_addons/";

/// Odoo's own addons directory, always placed last in `addons_path`.
pub const ODOO_ADDONS_PATH: &str = "/opt/odoo/sources/odoo/addons";

/// Odoo server configuration file.
pub const ODOO_CONF: &str = "/opt/odoo/etc/odoo.conf";

pub const DEFAULT_GIT_HOSTING_SERVICE: &str = "github.com";
pub const DEFAULT_ORGANIZATION: &str = "OCA";

/// Name of the dependency declaration file looked up at a repository root.
pub const DEPENDENCIES_FILE: &str = "oca_dependencies.txt";

/// Returns the default base path for cloned repositories.
pub fn default_base_path() -> PathBuf {
    PathBuf::from(EXTRA_ADDONS_PATH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_base_path_is_absolute() {
        let base = default_base_path();
        assert!(base.is_absolute());
        assert!(base.ends_with("additional_addons"));
    }
}
