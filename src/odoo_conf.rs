//! Rewriting the `addons_path` of an Odoo server configuration file.
//!
//! Every existing `addons_path = …` line is dropped and a single new one is
//! appended with the resolved paths, comma separated. All other lines are
//! copied unchanged. The new content is written next to the original and then
//! renamed over it, so a crash never leaves a half-written configuration.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use log::info;
use regex::Regex;

use crate::error::{Error, Result};

static ADDONS_PATH_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^addons_path\s*=\s*").expect("valid addons_path pattern"));

/// Value of the `addons_path` option for `paths`.
pub fn addons_path_value(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|path| path.display().to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Returns `content` with its `addons_path` replaced by `paths`.
pub fn rewrite_addons_path(content: &str, paths: &[PathBuf]) -> String {
    let mut rewritten = String::with_capacity(content.len());
    for line in content.lines() {
        if !ADDONS_PATH_LINE.is_match(line) {
            rewritten.push_str(line);
            rewritten.push('\n');
        }
    }
    rewritten.push_str("addons_path = ");
    rewritten.push_str(&addons_path_value(paths));
    rewritten.push('\n');
    rewritten
}

/// Rewrites `config_file` in place with the given `addons_path`.
pub fn write_addons_path(config_file: &Path, paths: &[PathBuf]) -> Result<()> {
    let write_error = |message: String| Error::ConfigWrite {
        path: config_file.to_path_buf(),
        message,
    };

    let content = fs::read_to_string(config_file).map_err(|e| write_error(e.to_string()))?;

    let mut staged = config_file.as_os_str().to_owned();
    staged.push(".new");
    let staged = PathBuf::from(staged);

    fs::write(&staged, rewrite_addons_path(&content, paths))
        .map_err(|e| write_error(format!("cannot write {}: {}", staged.display(), e)))?;
    fs::rename(&staged, config_file).map_err(|e| write_error(e.to_string()))?;

    info!(
        "Wrote addons_path with {} entries to {}",
        paths.len(),
        config_file.display()
    );
    Ok(())
}
