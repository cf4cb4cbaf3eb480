//! # Repository References
//!
//! This module turns one line of an `oca_dependencies.txt` file (or a
//! command-line argument) into a structured [`RepositoryReference`], and
//! derives from it the canonical clone URL and the local destination.
//!
//! ## Accepted Lines
//!
//! Tokens are separated by runs of whitespace:
//!
//! | Tokens | Shape                    | Example                                          |
//! |--------|--------------------------|--------------------------------------------------|
//! | 1      | `repo`                   | `connector`                                      |
//! | 1      | `org/repo`               | `Elico-Corp/odoo`                                |
//! | 1      | `url`                    | `https://github.com/OCA/connector`                |
//! | 2      | `folder url`             | `connector_rename https://github.com/OCA/connector` |
//! | 2      | `repo branch`            | `connector 8.0`                                  |
//! | 3      | `folder repo branch`     | `connector_rename OCA/connector 8.0`             |
//!
//! A URL is either `scheme://host/organization/repo[.git]` (HTTP or HTTPS) or
//! the Git SSH form `user@host:organization/repo[.git]`. Anything else is a
//! [`Error::ReferenceParse`].

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::defaults::{DEFAULT_GIT_HOSTING_SERVICE, DEFAULT_ORGANIZATION};
use crate::error::{Error, Result};
use crate::settings::Settings;

static HTTP_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://.+").expect("valid HTTP URL pattern"));

// user@host.tld:path, the host must contain at least one dot
static GIT_SSH_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[\w.-]+@[\w-]+(\.[\w-]+)+:.+").expect("valid SSH URL pattern")
});

const EXPECTED_REPO: &str = "'public-repo' or 'organization/public-repo'";
const EXPECTED_HTTP: &str = "'https://github.com/organization/public-repo'";
const EXPECTED_SSH: &str = "'git@github.com:organization/private-repo'";
const EXPECTED_PATH: &str = "'organization/repo'";
const EXPECTED_LINE: &str = "'repo', 'repo branch', 'folder url' or 'folder repo branch'";
const EXPECTED_FOLDER: &str = "a plain directory name";
const EXPECTED_BRANCH: &str = "a branch name not starting with '-'";

/// Transport used to reach a repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    Http,
    #[default]
    Https,
    Ssh,
}

impl Scheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
            Scheme::Ssh => "ssh",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scheme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "http" => Ok(Scheme::Http),
            "https" => Ok(Scheme::Https),
            "ssh" => Ok(Scheme::Ssh),
            other => Err(Error::Settings {
                message: format!("unsupported scheme '{}', expected http, https or ssh", other),
            }),
        }
    }
}

/// A parsed description of one repository to fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositoryReference {
    /// The raw line this reference was parsed from.
    pub source_text: String,
    pub scheme: Scheme,
    /// Hosting service, including `user@` for SSH references.
    pub host: String,
    pub organization: String,
    /// Repository name without any `.git` suffix. Never empty.
    pub repository_name: String,
    /// Branch to clone; `None` means the remote's default branch.
    pub branch: Option<String>,
    /// Directory name under the base path.
    pub local_folder: String,
    /// Whether dependencies declared inside this repository are followed.
    pub fetch_dependencies: bool,
}

impl RepositoryReference {
    /// Canonical clone URL: `scheme://host/organization/repository.git`.
    pub fn resolve_url(&self) -> String {
        format!(
            "{}://{}/{}/{}.git",
            self.scheme, self.host, self.organization, self.repository_name
        )
    }

    /// Local destination of this reference under `base_path`.
    pub fn destination(&self, base_path: &Path) -> PathBuf {
        base_path.join(&self.local_folder)
    }

    /// Returns a copy of this reference that clones `branch` instead.
    pub fn with_branch(&self, branch: Option<String>) -> Self {
        Self {
            branch,
            ..self.clone()
        }
    }

    pub fn with_fetch_dependencies(mut self, fetch_dependencies: bool) -> Self {
        self.fetch_dependencies = fetch_dependencies;
        self
    }
}

impl fmt::Display for RepositoryReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.resolve_url())?;
        if let Some(branch) = &self.branch {
            write!(f, "@{}", branch)?;
        }
        if self.local_folder != self.repository_name {
            write!(f, " -> {}", self.local_folder)?;
        }
        Ok(())
    }
}

/// Returns true for `http://` and `https://` URLs.
pub fn is_http(token: &str) -> bool {
    HTTP_URL.is_match(token)
}

/// Returns true for Git SSH URLs such as `git@github.com:org/repo`.
pub fn is_git_ssh(token: &str) -> bool {
    GIT_SSH_URL.is_match(token)
}

pub fn is_url(token: &str) -> bool {
    is_http(token) || is_git_ssh(token)
}

/// Parses reference lines, filling in the configured defaults.
#[derive(Debug, Clone)]
pub struct ReferenceParser {
    scheme: Scheme,
    host: String,
    organization: String,
}

impl Default for ReferenceParser {
    fn default() -> Self {
        Self {
            scheme: Scheme::default(),
            host: DEFAULT_GIT_HOSTING_SERVICE.to_string(),
            organization: DEFAULT_ORGANIZATION.to_string(),
        }
    }
}

/// The pieces a single repository token resolves to.
struct Location {
    scheme: Scheme,
    host: String,
    organization: String,
    repository_name: String,
}

impl ReferenceParser {
    pub fn new(settings: &Settings) -> Self {
        Self {
            scheme: settings.default_scheme,
            host: settings.default_host.clone(),
            organization: settings.default_organization.clone(),
        }
    }

    /// Parses one reference line.
    ///
    /// `parent_branch` is used when the line does not name a branch itself.
    /// The returned reference follows dependencies by default.
    pub fn parse(&self, line: &str, parent_branch: Option<&str>) -> Result<RepositoryReference> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let source_text = tokens.join(" ");
        let inherited = parent_branch.map(str::to_string);

        let (folder, location, branch) = match tokens.as_slice() {
            [repo] => (None, self.parse_repo(&source_text, repo)?, inherited),
            [folder, url] if is_url(url) => {
                (Some(*folder), self.parse_url(&source_text, url)?, inherited)
            }
            [repo, branch] => (
                None,
                self.parse_repo(&source_text, repo)?,
                Some(validate_branch(&source_text, branch)?),
            ),
            [folder, repo, branch] => (
                Some(*folder),
                self.parse_repo(&source_text, repo)?,
                Some(validate_branch(&source_text, branch)?),
            ),
            _ => return Err(Error::reference(&source_text, EXPECTED_LINE, &source_text)),
        };

        let local_folder = match folder {
            Some(folder) => validate_folder(&source_text, folder)?.to_string(),
            None => location.repository_name.clone(),
        };

        Ok(RepositoryReference {
            source_text,
            scheme: location.scheme,
            host: location.host,
            organization: location.organization,
            repository_name: location.repository_name,
            branch,
            local_folder,
            fetch_dependencies: true,
        })
    }

    fn parse_repo(&self, input: &str, token: &str) -> Result<Location> {
        if is_url(token) {
            return self.parse_url(input, token);
        }

        match token.split('/').collect::<Vec<_>>().as_slice() {
            [repo] if is_path_segment(repo) => {
                Ok(self.location(self.scheme, &self.host, &self.organization, repo))
            }
            [org, repo] if is_path_segment(org) && is_path_segment(repo) => {
                Ok(self.location(self.scheme, &self.host, org, repo))
            }
            _ => Err(Error::reference(input, EXPECTED_REPO, token)),
        }
    }

    fn parse_url(&self, input: &str, token: &str) -> Result<Location> {
        let (scheme, host, path) = if is_http(token) {
            let url =
                Url::parse(token).map_err(|_| Error::reference(input, EXPECTED_HTTP, token))?;
            let scheme = if url.scheme() == "http" {
                Scheme::Http
            } else {
                Scheme::Https
            };
            // Host and path are taken verbatim, `Url` would normalize them
            let rest = &token[url.scheme().len() + "://".len()..];
            match rest.split_once('/') {
                Some((netloc, path)) if !netloc.is_empty() && !path.is_empty() => {
                    (scheme, netloc.to_string(), path.to_string())
                }
                _ => return Err(Error::reference(input, EXPECTED_HTTP, token)),
            }
        } else {
            match token.split(':').collect::<Vec<_>>().as_slice() {
                [host, path] => (Scheme::Ssh, host.to_string(), path.to_string()),
                _ => return Err(Error::reference(input, EXPECTED_SSH, token)),
            }
        };

        match path.split('/').collect::<Vec<_>>().as_slice() {
            [org, repo] => {
                let repo = repo.strip_suffix(".git").unwrap_or(repo);
                if !is_path_segment(org) || !is_path_segment(repo) {
                    return Err(Error::reference(input, EXPECTED_PATH, &path));
                }
                Ok(self.location(scheme, &host, org, repo))
            }
            _ => Err(Error::reference(input, EXPECTED_PATH, &path)),
        }
    }

    fn location(&self, scheme: Scheme, host: &str, organization: &str, repo: &str) -> Location {
        Location {
            scheme,
            host: host.to_string(),
            organization: organization.to_string(),
            repository_name: repo.to_string(),
        }
    }
}

// The repository name doubles as the default folder, so it must not walk
// out of the base path either.
fn is_path_segment(segment: &str) -> bool {
    !segment.is_empty() && segment != "." && segment != ".."
}

// The folder is joined onto the base path, so it must stay inside it.
fn validate_folder<'a>(input: &str, folder: &'a str) -> Result<&'a str> {
    if folder == "." || folder == ".." || folder.contains(['/', '\\']) {
        return Err(Error::reference(input, EXPECTED_FOLDER, folder));
    }
    Ok(folder)
}

// Branches end up as `git` arguments, where a leading dash reads as an option.
fn validate_branch(input: &str, branch: &str) -> Result<String> {
    if branch.starts_with('-') {
        return Err(Error::reference(input, EXPECTED_BRANCH, branch));
    }
    Ok(branch.to_string())
}
