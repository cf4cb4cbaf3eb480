//! # Dependency Traversal
//!
//! Fetches a set of root repository references and, recursively, every
//! repository declared in their `oca_dependencies.txt` files. The result is the
//! ordered list of local paths that becomes Odoo's `addons_path`.
//!
//! ## Process
//!
//! For every reference, depth-first and in declaration order:
//!
//! 1.  **Skip** it when its destination was already recorded during this run.
//!     This is what terminates cyclic declarations.
//! 2.  **Update** an existing working tree: read its checked-out branch, then
//!     pull. A failed pull is reported and the tree is used as it is.
//! 3.  **Clone** a missing repository, walking the [`CloneAttempt`] ladder on
//!     failure. A reference whose every attempt fails is reported and dropped,
//!     together with everything it would have declared.
//! 4.  **Record** the destination, then read the dependency file and resolve
//!     each declared line with this reference as parent.
//!
//! References live in a [`ReferenceArena`]; parents are arena indices so the
//! grandparent lookup used by the retry ladder is a plain index walk. The
//! visited set and the ordered path list are owned by a [`Traversal`] value, so
//! independent runs never share state.
//!
//! Per-reference failures are collected in the [`TraversalReport`] and logged;
//! none of them stops the traversal.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, error, info, warn};

use crate::error::Error;
use crate::reference::{ReferenceParser, RepositoryReference};
use crate::repository::GitOperations;
use crate::settings::Settings;

/// Meaningful lines of a dependency declaration file.
///
/// Lines are trimmed; blank lines and lines starting with `#` are dropped.
pub fn dependency_lines(content: &str) -> impl Iterator<Item = &str> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
}

/// Index of a reference in a [`ReferenceArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RefId(usize);

impl RefId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// What happened to a reference during the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Pending,
    /// Destination already resolved earlier in the run.
    Skipped,
    Updated,
    Cloned,
    Failed,
}

#[derive(Debug, Clone)]
pub struct ReferenceNode {
    pub reference: RepositoryReference,
    pub parent: Option<RefId>,
    pub destination: PathBuf,
    pub outcome: Outcome,
}

/// Every reference seen during a run, in visit order.
#[derive(Debug, Clone, Default)]
pub struct ReferenceArena {
    nodes: Vec<ReferenceNode>,
}

impl ReferenceArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(
        &mut self,
        reference: RepositoryReference,
        parent: Option<RefId>,
        destination: PathBuf,
    ) -> RefId {
        self.nodes.push(ReferenceNode {
            reference,
            parent,
            destination,
            outcome: Outcome::Pending,
        });
        RefId(self.nodes.len() - 1)
    }

    /// Panics if `id` was not handed out by this arena.
    pub fn get(&self, id: RefId) -> &ReferenceNode {
        &self.nodes[id.0]
    }

    fn get_mut(&mut self, id: RefId) -> &mut ReferenceNode {
        &mut self.nodes[id.0]
    }

    pub fn parent(&self, id: RefId) -> Option<RefId> {
        self.get(id).parent
    }

    pub fn grandparent(&self, id: RefId) -> Option<RefId> {
        self.parent(id).and_then(|parent| self.parent(parent))
    }

    pub fn children(&self, id: RefId) -> impl Iterator<Item = RefId> + '_ {
        self.iter()
            .filter(move |(_, node)| node.parent == Some(id))
            .map(|(child, _)| child)
    }

    pub fn roots(&self) -> impl Iterator<Item = RefId> + '_ {
        self.iter()
            .filter(|(_, node)| node.parent.is_none())
            .map(|(id, _)| id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (RefId, &ReferenceNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (RefId(index), node))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Ordered, append-only list of resolved repository paths.
///
/// Each path appears at most once. Later entries take lower precedence in
/// Odoo's module lookup, so callers append the built-in addons directory last.
#[derive(Debug, Clone, Default)]
pub struct AddonsPath {
    paths: Vec<PathBuf>,
    visited: HashSet<PathBuf>,
}

impl AddonsPath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.visited.contains(path)
    }

    /// Appends `path`; returns false if it was already present.
    pub fn record(&mut self, path: PathBuf) -> bool {
        if !self.visited.insert(path.clone()) {
            return false;
        }
        self.paths.push(path);
        true
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn into_paths(self) -> Vec<PathBuf> {
        self.paths
    }
}

/// One rung of the clone retry ladder.
///
/// ```text
/// Initial ──fail──> RetryWithGrandparentBranch ──fail──> RetryWithDefaultBranch ──fail──> failed
///    └──fail, no grandparent──────────────────────────────────┘
/// ```
///
/// The grandparent rung uses the branch of the reference that declared this
/// reference's parent, skipping the parent's own branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloneAttempt {
    Initial,
    RetryWithGrandparentBranch,
    RetryWithDefaultBranch,
}

impl CloneAttempt {
    pub fn is_retry(self) -> bool {
        self != CloneAttempt::Initial
    }

    /// The rung to try after this one failed, or `None` once exhausted.
    pub fn next(self, has_grandparent: bool) -> Option<Self> {
        match self {
            CloneAttempt::Initial if has_grandparent => {
                Some(CloneAttempt::RetryWithGrandparentBranch)
            }
            CloneAttempt::Initial => Some(CloneAttempt::RetryWithDefaultBranch),
            CloneAttempt::RetryWithGrandparentBranch => Some(CloneAttempt::RetryWithDefaultBranch),
            CloneAttempt::RetryWithDefaultBranch => None,
        }
    }
}

/// The reference to clone for `attempt`, derived from the declared one.
pub fn plan_attempt(
    reference: &RepositoryReference,
    attempt: CloneAttempt,
    grandparent_branch: Option<&str>,
) -> RepositoryReference {
    match attempt {
        CloneAttempt::Initial => reference.clone(),
        CloneAttempt::RetryWithGrandparentBranch => {
            reference.with_branch(grandparent_branch.map(str::to_string))
        }
        CloneAttempt::RetryWithDefaultBranch => reference.with_branch(None),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraversalOptions {
    /// Follow `oca_dependencies.txt` files. Propagated to every reference.
    pub fetch_dependencies: bool,
    /// Pull repositories that already exist on disk.
    pub pull_existing: bool,
}

impl Default for TraversalOptions {
    fn default() -> Self {
        Self {
            fetch_dependencies: true,
            pull_existing: true,
        }
    }
}

/// A per-reference failure, reported and then skipped over.
#[derive(Debug)]
pub struct ReportedError {
    pub source_text: String,
    pub destination: Option<PathBuf>,
    pub error: Error,
}

/// Everything a finished run produced.
#[derive(Debug)]
pub struct TraversalReport {
    /// Resolved paths in pre-order.
    pub paths: Vec<PathBuf>,
    pub arena: ReferenceArena,
    pub errors: Vec<ReportedError>,
}

/// State of one traversal run.
pub struct Traversal<'a> {
    git: &'a dyn GitOperations,
    settings: &'a Settings,
    parser: ReferenceParser,
    options: TraversalOptions,
    arena: ReferenceArena,
    addons_path: AddonsPath,
    errors: Vec<ReportedError>,
}

impl<'a> Traversal<'a> {
    pub fn new(
        git: &'a dyn GitOperations,
        settings: &'a Settings,
        options: TraversalOptions,
    ) -> Self {
        Self {
            git,
            settings,
            parser: ReferenceParser::new(settings),
            options,
            arena: ReferenceArena::new(),
            addons_path: AddonsPath::new(),
            errors: Vec::new(),
        }
    }

    /// Resolves one root reference line and everything it depends on.
    pub fn resolve_root(&mut self, line: &str) {
        match self.parser.parse(line, None) {
            Ok(reference) => {
                let reference = reference.with_fetch_dependencies(self.options.fetch_dependencies);
                self.visit(reference, None);
            }
            Err(e) => self.report_line(line, e),
        }
    }

    /// Resolves every reference line of a dependency file's content.
    pub fn resolve_roots(&mut self, content: &str) {
        for line in dependency_lines(content) {
            self.resolve_root(line);
        }
    }

    pub fn paths(&self) -> &[PathBuf] {
        self.addons_path.paths()
    }

    pub fn errors(&self) -> &[ReportedError] {
        &self.errors
    }

    pub fn finish(self) -> TraversalReport {
        TraversalReport {
            paths: self.addons_path.into_paths(),
            arena: self.arena,
            errors: self.errors,
        }
    }

    fn resolve_child(&mut self, line: &str, parent: RefId) {
        let declaring = &self.arena.get(parent).reference;
        let fetch_dependencies = declaring.fetch_dependencies;
        match self.parser.parse(line, declaring.branch.as_deref()) {
            Ok(reference) => {
                self.visit(reference.with_fetch_dependencies(fetch_dependencies), Some(parent));
            }
            Err(e) => self.report_line(line, e),
        }
    }

    fn visit(&mut self, reference: RepositoryReference, parent: Option<RefId>) {
        let destination = reference.destination(&self.settings.base_path);
        let id = self.arena.push(reference, parent, destination.clone());

        // No need to fetch a repository twice, this also breaks cycles
        if self.addons_path.contains(&destination) {
            debug!("Skipping {}: already resolved", destination.display());
            self.arena.get_mut(id).outcome = Outcome::Skipped;
            return;
        }

        let outcome = if destination.exists() {
            self.update(id);
            Outcome::Updated
        } else if self.clone_with_retries(id) {
            Outcome::Cloned
        } else {
            Outcome::Failed
        };
        self.arena.get_mut(id).outcome = outcome;
        if outcome == Outcome::Failed {
            return;
        }

        self.addons_path.record(destination);
        self.download_dependencies(id);
    }

    fn update(&mut self, id: RefId) {
        // The branch is needed both for the pull and for the children
        self.discover_branch(id);

        if !self.options.pull_existing {
            return;
        }
        let node = self.arena.get(id);
        info!("Pulling: {}", node.reference.source_text);
        let result = self
            .git
            .pull(&node.destination, node.reference.branch.as_deref());
        if let Err(e) = result {
            self.report(id, e);
        }
    }

    fn clone_with_retries(&mut self, id: RefId) -> bool {
        let node = self.arena.get(id);
        let declared = node.reference.clone();
        let destination = node.destination.clone();
        let grandparent_branch = self
            .arena
            .grandparent(id)
            .map(|grandparent| self.arena.get(grandparent).reference.branch.clone());

        let mut attempt = CloneAttempt::Initial;
        loop {
            let candidate = plan_attempt(
                &declared,
                attempt,
                grandparent_branch.as_ref().and_then(|branch| branch.as_deref()),
            );
            if attempt.is_retry() {
                info!(
                    "Retrying: {} (branch: {})",
                    declared.source_text,
                    candidate.branch.as_deref().unwrap_or("default")
                );
            } else {
                info!("Cloning: {}", declared.source_text);
            }

            let result = self.git.clone_repo(
                &candidate.resolve_url(),
                candidate.branch.as_deref(),
                &destination,
            );
            match result {
                Ok(()) => {
                    self.arena.get_mut(id).reference = candidate;
                    self.discover_branch(id);
                    return true;
                }
                Err(e) => match attempt.next(grandparent_branch.is_some()) {
                    Some(next) => {
                        warn!("{}", e);
                        attempt = next;
                    }
                    None => {
                        self.report(id, e);
                        return false;
                    }
                },
            }
        }
    }

    /// Replaces the reference's branch with the checked-out one, keeping the
    /// previous value when it cannot be determined.
    fn discover_branch(&mut self, id: RefId) {
        let result = self.git.current_branch(&self.arena.get(id).destination);
        match result {
            Ok(branch) => {
                debug!("{} is on branch {}", self.arena.get(id).destination.display(), branch);
                self.arena.get_mut(id).reference.branch = Some(branch);
            }
            Err(e) => self.report(id, e),
        }
    }

    fn download_dependencies(&mut self, id: RefId) {
        let node = self.arena.get(id);
        if !node.reference.fetch_dependencies {
            return;
        }
        let filename = self.settings.dependencies_file_in(&node.destination);
        if !filename.is_file() {
            return;
        }

        let content = match fs::read_to_string(&filename) {
            Ok(content) => content,
            Err(e) => {
                self.report(id, e.into());
                return;
            }
        };
        debug!("Reading dependencies from {}", filename.display());
        for line in dependency_lines(&content) {
            self.resolve_child(line, id);
        }
    }

    fn report(&mut self, id: RefId, error: Error) {
        let node = self.arena.get(id);
        error!(
            "{} ({}): {}",
            node.reference.source_text,
            node.destination.display(),
            error
        );
        self.errors.push(ReportedError {
            source_text: node.reference.source_text.clone(),
            destination: Some(node.destination.clone()),
            error,
        });
    }

    fn report_line(&mut self, line: &str, error: Error) {
        error!("{}", error);
        self.errors.push(ReportedError {
            source_text: line.to_string(),
            destination: None,
            error,
        });
    }
}
