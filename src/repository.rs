//! # Version Control Boundary
//!
//! The traversal engine never runs `git` itself. It talks to an implementation
//! of [`GitOperations`], which covers the three things the engine needs from
//! the version-control tool:
//!
//! - cloning a repository, optionally at a named branch,
//! - pulling an existing working tree,
//! - reporting which branch is checked out.
//!
//! [`DefaultGitOperations`] wraps the system `git` command (see
//! [`crate::git`]). Tests substitute mock implementations to simulate clone
//! failures, retries and dependency graphs without touching the network.

use std::path::Path;

use crate::error::Result;

/// Trait for git operations - allows mocking in tests
pub trait GitOperations: Send + Sync {
    /// Clones `url` into `target_dir`, checking out `branch` when given.
    ///
    /// Any failure, including a non-zero exit status, is an
    /// [`Error::GitClone`](crate::error::Error::GitClone).
    fn clone_repo(&self, url: &str, branch: Option<&str>, target_dir: &Path) -> Result<()>;

    /// Pulls `branch` from `origin` into an existing working tree.
    fn pull(&self, target_dir: &Path, branch: Option<&str>) -> Result<()>;

    /// Returns the branch checked out in `target_dir`.
    ///
    /// Fails with [`Error::BranchDiscovery`](crate::error::Error::BranchDiscovery)
    /// when the tool output has no current branch.
    fn current_branch(&self, target_dir: &Path) -> Result<String>;
}

/// The default implementation of `GitOperations`, which uses the system's
/// `git` command.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultGitOperations;

impl GitOperations for DefaultGitOperations {
    fn clone_repo(&self, url: &str, branch: Option<&str>, target_dir: &Path) -> Result<()> {
        crate::git::clone(url, branch, target_dir)
    }

    fn pull(&self, target_dir: &Path, branch: Option<&str>) -> Result<()> {
        crate::git::pull(target_dir, branch)
    }

    fn current_branch(&self, target_dir: &Path) -> Result<String> {
        crate::git::current_branch(target_dir)
    }
}
