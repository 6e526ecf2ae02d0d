// forkswap: openpilot Fork Swap Manager
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration tests for fork update checks against real local
//! repositories. No network access is required: the "remote" is another
//! temp directory.

use std::path::Path;
use std::process::Command;
use std::sync::Arc;

use forkswap::config::Config;
use forkswap::fork::ForkName;
use forkswap::fork::swap::SwapManager;
use tempfile::TempDir;

fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("failed to create temp dir")
}

fn name(s: &str) -> ForkName {
    ForkName::parse(s).expect("valid fork name")
}

/// Helper to run git commands in a directory.
fn run_git(args: &[&str], cwd: &Path) {
    let output = Command::new("git")
        .args(args)
        .current_dir(cwd)
        .env("GIT_AUTHOR_NAME", "Test")
        .env("GIT_AUTHOR_EMAIL", "test@test.com")
        .env("GIT_COMMITTER_NAME", "Test")
        .env("GIT_COMMITTER_EMAIL", "test@test.com")
        .output()
        .expect("failed to run git");
    assert!(
        output.status.success(),
        "git {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

fn init_upstream_with_commit(dir: &Path) {
    run_git(&["init", "--quiet"], dir);
    run_git(&["config", "user.email", "test@test.com"], dir);
    run_git(&["config", "user.name", "Test"], dir);
    std::fs::write(dir.join("README.md"), "# upstream").unwrap();
    run_git(&["add", "."], dir);
    run_git(&["commit", "--quiet", "-m", "Initial commit"], dir);
}

fn commit_upstream_change(dir: &Path, file: &str) {
    std::fs::write(dir.join(file), "change").unwrap();
    run_git(&["add", "."], dir);
    run_git(&["commit", "--quiet", "-m", "Upstream change"], dir);
}

fn test_config(data_root: &Path) -> Arc<Config> {
    let mut config = Config::default();
    config.paths.data_root = data_root.to_path_buf();
    config.device.require_root = false;
    config.device.reboot = false;
    config.resolve_and_validate().expect("resolvable paths");
    Arc::new(config)
}

/// Archive a clone of `upstream` as fork `name` and return the manager.
fn setup_archived_clone(config: &Arc<Config>, upstream: &Path, fork: &str) -> SwapManager {
    let manager = SwapManager::new(Arc::clone(config)).expect("manager");
    let snapshot = manager.archive().snapshot_dir(&name(fork));
    std::fs::create_dir_all(snapshot.parent().unwrap()).unwrap();
    run_git(
        &[
            "clone",
            "--quiet",
            upstream.to_str().unwrap(),
            snapshot.to_str().unwrap(),
        ],
        config.paths.data_root.as_path(),
    );
    manager
}

#[test]
fn check_update_false_after_fresh_clone() {
    let data = temp_dir();
    let remote = temp_dir();
    init_upstream_with_commit(remote.path());

    let config = test_config(data.path());
    let manager = setup_archived_clone(&config, remote.path(), "testfork");

    assert!(!manager.check_fork_update(&name("testfork")).unwrap());
}

#[test]
fn check_update_true_after_upstream_commit() {
    let data = temp_dir();
    let remote = temp_dir();
    init_upstream_with_commit(remote.path());

    let config = test_config(data.path());
    let manager = setup_archived_clone(&config, remote.path(), "testfork");

    commit_upstream_change(remote.path(), "new-feature.py");

    assert!(manager.check_fork_update(&name("testfork")).unwrap());
}

#[test]
fn update_fork_pulls_and_clears_the_difference() {
    let data = temp_dir();
    let remote = temp_dir();
    init_upstream_with_commit(remote.path());

    let config = test_config(data.path());
    let manager = setup_archived_clone(&config, remote.path(), "testfork");

    commit_upstream_change(remote.path(), "new-feature.py");
    assert!(manager.check_fork_update(&name("testfork")).unwrap());

    manager.update_fork(&name("testfork")).unwrap();

    assert!(!manager.check_fork_update(&name("testfork")).unwrap());
    let pulled = manager
        .archive()
        .snapshot_dir(&name("testfork"))
        .join("new-feature.py");
    assert!(pulled.exists());
}

#[test]
fn check_update_resolves_active_fork_to_live_path() {
    let data = temp_dir();
    let remote = temp_dir();
    init_upstream_with_commit(remote.path());

    let config = test_config(data.path());
    let manager = setup_archived_clone(&config, remote.path(), "testfork");

    // Make it the active fork: snapshot becomes the live copy.
    let snapshot = manager.archive().snapshot_dir(&name("testfork"));
    std::fs::rename(&snapshot, config.paths.live().unwrap()).unwrap();
    manager.store().set(&name("testfork")).unwrap();

    assert!(!manager.check_fork_update(&name("testfork")).unwrap());

    commit_upstream_change(remote.path(), "live-change.py");
    assert!(manager.check_fork_update(&name("testfork")).unwrap());
}

#[test]
fn check_update_unknown_fork_is_an_error() {
    let data = temp_dir();
    let config = test_config(data.path());
    let manager = SwapManager::new(Arc::clone(&config)).expect("manager");

    assert!(manager.check_fork_update(&name("ghost")).is_err());
}

#[test]
fn check_update_non_repo_directory_is_an_error() {
    let data = temp_dir();
    let config = test_config(data.path());
    let manager = SwapManager::new(Arc::clone(&config)).expect("manager");

    std::fs::create_dir_all(manager.archive().snapshot_dir(&name("notgit"))).unwrap();
    let err = manager.check_fork_update(&name("notgit")).unwrap_err();
    assert!(err.to_string().contains("repository not found"));
}
