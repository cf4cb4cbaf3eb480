use std::ffi::OsString;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use log::debug;

use crate::error::{Error, Result};

/// Arguments for `git clone [-b <branch>] <url> <target_dir>`.
pub fn clone_args(url: &str, branch: Option<&str>, target_dir: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec!["clone".into()];
    if let Some(branch) = branch {
        args.push("-b".into());
        args.push(branch.into());
    }
    args.push(url.into());
    args.push(target_dir.into());
    args
}

/// Arguments for `git -C <target_dir> pull origin <branch>`.
///
/// Without a known branch the current branch's upstream is pulled.
pub fn pull_args(target_dir: &Path, branch: Option<&str>) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec!["-C".into(), target_dir.into(), "pull".into()];
    if let Some(branch) = branch {
        args.push("origin".into());
        args.push(branch.into());
    }
    args
}

/// Renders a git invocation the way an operator would type it.
pub fn display_command(args: &[OsString]) -> String {
    let mut command = String::from("git");
    for arg in args {
        command.push(' ');
        command.push_str(&arg.to_string_lossy());
    }
    command
}

fn run(args: &[OsString]) -> std::io::Result<Output> {
    debug!("Running: {}", display_command(args));
    Command::new("git").args(args).output()
}

fn failure_message(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr = stderr.trim();
    if stderr.is_empty() {
        output.status.to_string()
    } else {
        format!("{} ({})", output.status, stderr)
    }
}

/// Clone a repository, optionally at a specific branch
///
/// This uses the system git command, so SSH keys, credential helpers and any
/// authentication configured in ~/.gitconfig apply.
pub fn clone(url: &str, branch: Option<&str>, target_dir: &Path) -> Result<()> {
    let clone_error = |message: String| Error::GitClone {
        url: url.to_string(),
        branch: branch.map(str::to_string),
        message,
    };

    if let Some(parent) = target_dir.parent() {
        fs::create_dir_all(parent).map_err(|e| clone_error(e.to_string()))?;
    }

    let output =
        run(&clone_args(url, branch, target_dir)).map_err(|e| clone_error(e.to_string()))?;
    if !output.status.success() {
        return Err(clone_error(failure_message(&output)));
    }
    Ok(())
}

/// Pull the latest changes into an existing working tree.
pub fn pull(target_dir: &Path, branch: Option<&str>) -> Result<()> {
    let pull_error = |message: String| Error::GitPull {
        path: target_dir.to_path_buf(),
        message,
    };

    let output = run(&pull_args(target_dir, branch)).map_err(|e| pull_error(e.to_string()))?;
    if !output.status.success() {
        return Err(pull_error(failure_message(&output)));
    }
    Ok(())
}

/// Raw output of `git -C <target_dir> branch`.
pub fn list_branches(target_dir: &Path) -> Result<String> {
    let args: Vec<OsString> = vec!["-C".into(), target_dir.into(), "branch".into()];
    let output = run(&args).map_err(|e| Error::GitCommand {
        command: "branch".to_string(),
        path: target_dir.to_path_buf(),
        stderr: e.to_string(),
    })?;

    if !output.status.success() {
        return Err(Error::GitCommand {
            command: "branch".to_string(),
            path: target_dir.to_path_buf(),
            stderr: failure_message(&output),
        });
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Extract the checked-out branch from `git branch` output
///
/// ```text
///   7.0
/// * 8.0
///   9.0
/// ```
///
/// Returns `None` when no line carries the `* ` marker or when the marked
/// line is a detached HEAD such as `* (HEAD detached at 1a2b3c)`.
pub fn parse_current_branch(output: &str) -> Option<String> {
    output
        .lines()
        .find_map(|line| line.strip_prefix("* "))
        .map(str::trim)
        .filter(|branch| !branch.is_empty() && !branch.starts_with('('))
        .map(str::to_string)
}

/// Determine the branch checked out in `target_dir`.
pub fn current_branch(target_dir: &Path) -> Result<String> {
    let discovery_error = |message: String| Error::BranchDiscovery {
        path: target_dir.to_path_buf(),
        message,
    };

    let output = list_branches(target_dir).map_err(|e| discovery_error(e.to_string()))?;
    parse_current_branch(&output)
        .ok_or_else(|| discovery_error("no checked-out branch in `git branch` output".to_string()))
}
