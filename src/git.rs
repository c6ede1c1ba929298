//! Git repository precondition.
//!
//! Delegated agents read (and in implementation mode edit) the repository
//! they are started in, so runs are refused outside a git work tree.

use crate::error::{DelegateError, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Captured output of a git command.
#[derive(Debug, Clone)]
pub struct GitOutput {
    /// Standard output (trimmed).
    pub stdout: String,
    /// Standard error (trimmed).
    pub stderr: String,
}

impl GitOutput {
    fn from_output(output: &Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }
    }
}

/// Run `git <args>` in `cwd`; a non-zero exit is an error carrying stderr.
pub fn run_git<P: AsRef<Path>>(cwd: P, args: &[&str]) -> Result<GitOutput> {
    let output = Command::new("git")
        .current_dir(cwd.as_ref())
        .args(args)
        .output()
        .map_err(|e| {
            DelegateError::Validation(format!("failed to execute git: {} (is git installed?)", e))
        })?;

    let git_output = GitOutput::from_output(&output);
    if output.status.success() {
        return Ok(git_output);
    }

    let message = if git_output.stderr.is_empty() {
        git_output.stdout
    } else {
        git_output.stderr
    };
    Err(DelegateError::Validation(format!(
        "git {} failed (exit code {}): {}",
        args.first().unwrap_or(&""),
        output.status.code().unwrap_or(-1),
        message
    )))
}

/// The repository's git directory, as reported by `git rev-parse --git-dir`.
pub fn git_dir<P: AsRef<Path>>(cwd: P) -> Result<PathBuf> {
    let cwd = cwd.as_ref();
    let output = run_git(cwd, &["rev-parse", "--git-dir"]).map_err(|_| {
        DelegateError::Validation(
            "not inside a git repository. Run this command from within a git repository."
                .to_string(),
        )
    })?;
    Ok(cwd.join(output.stdout))
}

/// Fail with a validation error unless `cwd` is inside a git repository.
pub fn ensure_inside_repository<P: AsRef<Path>>(cwd: P) -> Result<()> {
    git_dir(cwd).map(|_| ())
}
