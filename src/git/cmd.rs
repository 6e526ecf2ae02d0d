// forkswap: openpilot Fork Swap Manager
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git command operations using shell backend.
//!
//! ```text
//! cmd.rs --> ShellBackend --> git (clone, fetch, pull, rev-parse)
//! ```

use crate::error::{GitError, SwapResult};
use std::path::Path;

use super::backend::{GitMutation, ShellBackend};

/// Clone a repository.
///
/// # Errors
///
/// Returns a `GitError` if the clone operation fails or the destination path
/// is invalid.
pub fn clone(url: &str, dest: &Path, branch: Option<&str>, shallow: bool) -> SwapResult<()> {
    ShellBackend::clone(url, dest, branch, shallow)
}

/// Fetch from remote without merging.
///
/// # Errors
///
/// Returns a `GitError` if the fetch operation fails.
pub fn fetch(repo_path: &Path, remote: &str) -> SwapResult<()> {
    ShellBackend::fetch(repo_path, remote)
}

/// Fast-forward pull from remote.
///
/// # Errors
///
/// Returns a `GitError` if the pull operation fails or cannot fast-forward.
pub fn pull_ff(repo_path: &Path, remote: &str) -> SwapResult<()> {
    ShellBackend::pull_ff(repo_path, remote)
}

/// Resolve a revision to a commit id.
///
/// # Errors
///
/// Returns a `GitError` if the revision cannot be resolved.
pub fn rev_parse(repo_path: &Path, rev: &str) -> SwapResult<String> {
    ShellBackend::git_command(&["rev-parse", rev], repo_path)
}

/// Commit id of the local HEAD.
///
/// # Errors
///
/// Returns a `GitError` if HEAD cannot be resolved.
pub fn head_commit(repo_path: &Path) -> SwapResult<String> {
    rev_parse(repo_path, "HEAD")
}

/// Commit id of the upstream tracking branch, or None when the current
/// branch has no upstream configured.
///
/// # Errors
///
/// Returns a `GitError` only for repository-level failures; a missing
/// upstream is reported as `Ok(None)`.
pub fn upstream_commit(repo_path: &Path) -> SwapResult<Option<String>> {
    match rev_parse(repo_path, "@{u}") {
        Ok(commit) => Ok(Some(commit)),
        Err(e) => {
            // rev-parse fails both for "no upstream" and for a broken repo;
            // distinguish by whether HEAD itself resolves.
            if head_commit(repo_path).is_ok() {
                tracing::debug!(repo = %repo_path.display(), "no upstream tracking ref");
                Ok(None)
            } else {
                Err(e)
            }
        }
    }
}

/// Check whether a repository exists at `path`, as an error for callers
/// that require one.
///
/// # Errors
///
/// Returns `GitError::RepoNotFound` when the path is not a git work tree.
pub fn require_repo(path: &Path) -> SwapResult<()> {
    if super::query::is_git_repo(path) {
        Ok(())
    } else {
        Err(GitError::RepoNotFound {
            path: path.display().to_string(),
        }
        .into())
    }
}
