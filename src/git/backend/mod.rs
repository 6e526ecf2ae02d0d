// forkswap: openpilot Fork Swap Manager
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git backend abstraction layer.
//!
//! ```text
//! GitQuery (read)     --> GixBackend (pure Rust gix)
//! GitMutation (write) --> ShellBackend (git CLI)
//! ```

use crate::error::{GitError, GixError, SwapResult};
use std::path::Path;

// --- Query Trait (Read-only operations) ---

/// Read-only git query operations.
///
/// Implementors provide methods to inspect repository state without
/// modification.
pub trait GitQuery {
    /// Check if path is inside a git work tree.
    fn is_git_repo(path: &Path) -> bool;

    /// Get current branch name (None if HEAD is detached).
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if repository discovery or head resolution fails.
    fn current_branch(path: &Path) -> SwapResult<Option<String>>;

    /// Check for uncommitted changes (staged, unstaged, or untracked files).
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if repository discovery or status check fails.
    fn has_uncommitted_changes(path: &Path) -> SwapResult<bool>;
}

// --- Mutation Trait (Write operations) ---

/// Git mutation operations that modify repository state.
///
/// These operations use shell git for full CLI compatibility (credentials,
/// transports, submodules) on the device.
pub trait GitMutation {
    /// Clone a repository.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the clone operation fails or the destination
    /// path is invalid.
    fn clone(url: &str, dest: &Path, branch: Option<&str>, shallow: bool) -> SwapResult<()>;

    /// Fetch from remote without merging.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the fetch operation fails.
    fn fetch(repo_path: &Path, remote: &str) -> SwapResult<()>;

    /// Fast-forward pull from remote.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the pull operation fails or cannot
    /// fast-forward.
    fn pull_ff(repo_path: &Path, remote: &str) -> SwapResult<()>;
}

// --- GixBackend Implementation (Pure Rust) ---

/// Pure Rust git backend using gix.
///
/// Provides efficient read-only operations without spawning subprocesses.
pub struct GixBackend;

impl GitQuery for GixBackend {
    fn is_git_repo(path: &Path) -> bool {
        gix::discover(path).is_ok()
    }

    fn current_branch(path: &Path) -> SwapResult<Option<String>> {
        let repo =
            gix::discover(path).map_err(|e| GitError::Gix(GixError::Discover(Box::new(e))))?;
        let head = repo
            .head_name()
            .map_err(|e| GitError::Gix(GixError::Head(e)))?;
        Ok(head.map(|name| name.shorten().to_string()))
    }

    fn has_uncommitted_changes(path: &Path) -> SwapResult<bool> {
        use gix::status::UntrackedFiles;

        let repo =
            gix::discover(path).map_err(|e| GitError::Gix(GixError::Discover(Box::new(e))))?;

        let has_changes = repo
            .status(gix::progress::Discard)
            .map_err(|_| GitError::CommandFailed {
                command: "status".to_string(),
                message: "failed to prepare status check".to_string(),
            })?
            .untracked_files(UntrackedFiles::Files)
            .into_iter(None)
            .map_err(|_| GitError::CommandFailed {
                command: "status".to_string(),
                message: "failed to check repository status".to_string(),
            })?
            .next()
            .is_some();

        Ok(has_changes)
    }
}

// --- ShellBackend Implementation (Git CLI) ---

/// Shell-based git backend using git CLI.
///
/// Required for network operations (clone, fetch, pull) and for revision
/// queries that follow the upstream tracking configuration.
pub struct ShellBackend;

impl ShellBackend {
    /// Execute a git command. Sets `GCM_INTERACTIVE=never` and `GIT_TERMINAL_PROMPT=0`.
    pub(crate) fn git_command(args: &[&str], cwd: &Path) -> SwapResult<String> {
        use std::process::Command;

        let output = Command::new("git")
            .args(args)
            .current_dir(cwd)
            .env("GCM_INTERACTIVE", "never")
            .env("GIT_TERMINAL_PROMPT", "0")
            .output()
            .map_err(|e| std::io::Error::new(e.kind(), format!("failed to execute git: {e}")))?;

        if !output.status.success() {
            return Err(GitError::CommandFailed {
                command: format!("git {}", args.join(" ")),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into());
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

impl GitMutation for ShellBackend {
    fn clone(url: &str, dest: &Path, branch: Option<&str>, shallow: bool) -> SwapResult<()> {
        let mut args = vec!["clone", "--recurse-submodules", "--quiet"];
        args.extend(&["-c", "advice.detachedHead=false"]);
        if shallow {
            args.extend(&["--depth", "1"]);
        }
        if let Some(b) = branch {
            args.extend(&["--branch", b]);
        }
        args.push(url);
        let dest_str = dest.to_str().ok_or_else(|| GitError::CloneFailed {
            url: url.to_string(),
            message: "invalid destination path".to_string(),
        })?;
        args.push(dest_str);

        let parent = dest.parent().unwrap_or_else(|| Path::new("."));
        Self::git_command(&args, parent)?;
        Ok(())
    }

    fn fetch(repo_path: &Path, remote: &str) -> SwapResult<()> {
        Self::git_command(&["fetch", "--quiet", remote], repo_path)?;
        Ok(())
    }

    fn pull_ff(repo_path: &Path, remote: &str) -> SwapResult<()> {
        Self::git_command(
            &["pull", "--ff-only", "--recurse-submodules", "--quiet", remote],
            repo_path,
        )?;
        Ok(())
    }
}

impl GitQuery for ShellBackend {
    fn is_git_repo(path: &Path) -> bool {
        Self::git_command(&["rev-parse", "--is-inside-work-tree"], path).is_ok()
    }

    fn current_branch(path: &Path) -> SwapResult<Option<String>> {
        Self::git_command(&["symbolic-ref", "--short", "HEAD"], path)
            .map_or_else(|_| Ok(None), |branch| Ok(Some(branch)))
    }

    fn has_uncommitted_changes(path: &Path) -> SwapResult<bool> {
        let output = Self::git_command(&["status", "--porcelain"], path)?;
        Ok(!output.is_empty())
    }
}
