//! # Error Handling
//!
//! This module defines the centralized error type for the `auto-addons`
//! library. It uses the `thiserror` library to create an `Error` enum that
//! covers every anticipated failure mode with enough context to tell the
//! operator which reference or path was involved.
//!
//! ## Key Components
//!
//! - **`Error`**: The main enum that represents all possible errors that can
//!   occur within the library.
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`.
//!
//! Three kinds of errors are *local* to a single repository reference:
//! [`Error::ReferenceParse`], the fetch errors ([`Error::GitClone`],
//! [`Error::GitPull`]) and [`Error::BranchDiscovery`]. The traversal engine
//! reports them and moves on to the next sibling; they are never propagated
//! out of a run. The remaining variants (settings, configuration rewrite,
//! I/O on the root dependency file) abort the command that hit them.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for auto-addons operations
#[derive(Error, Debug)]
pub enum Error {
    /// A repository reference line could not be parsed.
    ///
    /// `expected` lists the accepted shapes for the part of the line that
    /// failed, `actual` is the offending fragment.
    #[error("Unexpected repository pattern in '{input}': expected {expected}, got '{actual}'")]
    ReferenceParse {
        input: String,
        expected: String,
        actual: String,
    },

    /// `git clone` returned a non-zero exit status or could not be spawned.
    #[error(
        "Git clone error for {url}{}: {message}",
        branch.as_ref().map(|b| format!("@{}", b)).unwrap_or_default()
    )]
    GitClone {
        url: String,
        branch: Option<String>,
        message: String,
    },

    /// `git pull` returned a non-zero exit status or could not be spawned.
    #[error("Git pull error in {}: {message}", path.display())]
    GitPull { path: PathBuf, message: String },

    /// Any other git invocation failed.
    #[error("Git command failed in {}: {command} - {stderr}", path.display())]
    GitCommand {
        command: String,
        path: PathBuf,
        stderr: String,
    },

    /// The checked-out branch of a working tree could not be determined.
    #[error("Cannot fetch branch name in {}: {message}", path.display())]
    BranchDiscovery { path: PathBuf, message: String },

    /// The settings are unusable (missing file, invalid value).
    #[error("Settings error: {message}")]
    Settings { message: String },

    /// The server configuration file could not be rewritten.
    #[error("Cannot write addons_path to {}: {message}", path.display())]
    ConfigWrite { path: PathBuf, message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl Error {
    /// Shorthand for building a [`Error::ReferenceParse`].
    pub(crate) fn reference(input: &str, expected: &str, actual: &str) -> Self {
        Error::ReferenceParse {
            input: input.to_string(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
