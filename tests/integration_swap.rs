// forkswap: openpilot Fork Swap Manager
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration tests for the fork swap state machine.
//!
//! Drives `SwapManager` against a temp-dir data partition; reboots are
//! disabled through config so the process survives a completed switch.

use std::path::Path;
use std::sync::Arc;

use forkswap::config::Config;
use forkswap::error::SwapError;
use forkswap::fork::journal::SwapJournal;
use forkswap::fork::swap::SwapManager;
use forkswap::fork::{ForkName, RepoUrl, rollback};
use tempfile::TempDir;

fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("failed to create temp dir")
}

fn name(s: &str) -> ForkName {
    ForkName::parse(s).expect("valid fork name")
}

fn test_config(data_root: &Path) -> Arc<Config> {
    let mut config = Config::default();
    config.global.assume_yes = true;
    config.global.menu_update_checks = false;
    config.paths.data_root = data_root.to_path_buf();
    config.device.require_root = false;
    config.device.reboot = false;
    config.git.clone_retries = 2;
    config.git.retry_delay_secs = 0;
    config.resolve_and_validate().expect("resolvable paths");
    Arc::new(config)
}

fn manager(config: &Arc<Config>) -> SwapManager {
    SwapManager::new(Arc::clone(config)).expect("manager")
}

/// Lay out an active fork (live copy + params) and one archived fork.
fn seed_two_forks(config: &Config) {
    let live = config.paths.live().unwrap();
    let params = config.paths.params().unwrap();
    let forks = config.paths.forks_root().unwrap();

    std::fs::create_dir_all(live).unwrap();
    std::fs::write(live.join("marker.txt"), "fork-a").unwrap();
    std::fs::create_dir_all(params).unwrap();
    std::fs::write(params.join("DongleId"), "live-dongle").unwrap();

    std::fs::create_dir_all(forks.join("fork-b/openpilot")).unwrap();
    std::fs::write(forks.join("fork-b/openpilot/marker.txt"), "fork-b").unwrap();
    std::fs::create_dir_all(forks.join("fork-b/params")).unwrap();
    std::fs::write(forks.join("fork-b/params/GithubUsername"), "b-user").unwrap();
}

#[test]
fn switch_swaps_live_and_archive() {
    let temp = temp_dir();
    let config = test_config(temp.path());
    let m = manager(&config);

    seed_two_forks(&config);
    m.store().set(&name("fork-a")).unwrap();

    m.switch(&name("fork-b")).unwrap();

    let live = config.paths.live().unwrap();
    let params = config.paths.params().unwrap();
    let forks = config.paths.forks_root().unwrap();

    // Pointer moved.
    assert_eq!(m.active().unwrap(), Some(name("fork-b")));

    // Live content is what fork-b had archived.
    assert_eq!(
        std::fs::read_to_string(live.join("marker.txt")).unwrap(),
        "fork-b"
    );
    // fork-b's snapshot slot is now empty (it is live).
    assert!(!forks.join("fork-b/openpilot").exists());

    // fork-a got archived with what was live before.
    assert_eq!(
        std::fs::read_to_string(forks.join("fork-a/openpilot/marker.txt")).unwrap(),
        "fork-a"
    );
    // ...and its config snapshot holds the pre-switch live params.
    assert_eq!(
        std::fs::read_to_string(forks.join("fork-a/params/DongleId")).unwrap(),
        "live-dongle"
    );

    // fork-b's config snapshot was restored over the live params (merge:
    // pre-existing live keys survive).
    assert_eq!(
        std::fs::read_to_string(params.join("GithubUsername")).unwrap(),
        "b-user"
    );
    assert_eq!(
        std::fs::read_to_string(params.join("DongleId")).unwrap(),
        "live-dongle"
    );

    // A finished operation leaves no journal behind.
    assert!(!config.paths.journal_file().unwrap().exists());
}

#[test]
fn switch_rejects_fork_without_snapshot() {
    let temp = temp_dir();
    let config = test_config(temp.path());
    let m = manager(&config);

    seed_two_forks(&config);
    m.store().set(&name("fork-a")).unwrap();

    // Archive dir without a working copy.
    let forks = config.paths.forks_root().unwrap();
    std::fs::create_dir_all(forks.join("empty-fork/params")).unwrap();

    let err = m.switch(&name("empty-fork")).unwrap_err();
    assert!(err.to_string().contains("no archived working copy"));

    // Nothing moved.
    assert_eq!(m.active().unwrap(), Some(name("fork-a")));
    assert!(config.paths.live().unwrap().join("marker.txt").exists());
}

#[test]
fn switch_rejects_unknown_fork() {
    let temp = temp_dir();
    let config = test_config(temp.path());
    let m = manager(&config);

    seed_two_forks(&config);

    let err = m.switch(&name("nope")).unwrap_err();
    assert!(err.to_string().contains("does not exist"));
}

#[test]
fn switch_without_active_fork_still_materializes_target() {
    let temp = temp_dir();
    let config = test_config(temp.path());
    let m = manager(&config);

    // Only an archived fork, no live copy, no pointer.
    let forks = config.paths.forks_root().unwrap();
    std::fs::create_dir_all(forks.join("fork-b/openpilot")).unwrap();
    std::fs::write(forks.join("fork-b/openpilot/marker.txt"), "fork-b").unwrap();

    m.switch(&name("fork-b")).unwrap();

    assert_eq!(m.active().unwrap(), Some(name("fork-b")));
    assert_eq!(
        std::fs::read_to_string(config.paths.live().unwrap().join("marker.txt")).unwrap(),
        "fork-b"
    );
}

#[test]
fn delete_removes_archive_and_keeps_pointer() {
    let temp = temp_dir();
    let config = test_config(temp.path());
    let m = manager(&config);

    seed_two_forks(&config);
    m.store().set(&name("fork-a")).unwrap();

    m.delete(&name("fork-b")).unwrap();

    assert!(
        !config
            .paths
            .forks_root()
            .unwrap()
            .join("fork-b")
            .exists()
    );
    assert_eq!(m.active().unwrap(), Some(name("fork-a")));
}

#[test]
fn delete_unknown_fork_reports_and_changes_nothing() {
    let temp = temp_dir();
    let config = test_config(temp.path());
    let m = manager(&config);

    seed_two_forks(&config);
    m.store().set(&name("fork-a")).unwrap();

    let err = m.delete(&name("ghost")).unwrap_err();
    assert!(err.to_string().contains("does not exist"));

    assert_eq!(m.active().unwrap(), Some(name("fork-a")));
    assert!(config.paths.live().unwrap().join("marker.txt").exists());
    assert!(
        config
            .paths
            .forks_root()
            .unwrap()
            .join("fork-b/openpilot")
            .exists()
    );
}

#[test]
fn delete_active_fork_archive_keeps_live_data() {
    let temp = temp_dir();
    let config = test_config(temp.path());
    let m = manager(&config);

    seed_two_forks(&config);
    m.store().set(&name("fork-a")).unwrap();
    // Give the active fork an archive entry (params only, per invariant).
    let forks = config.paths.forks_root().unwrap();
    std::fs::create_dir_all(forks.join("fork-a/params")).unwrap();

    m.delete(&name("fork-a")).unwrap();

    assert!(!forks.join("fork-a").exists());
    // Pointer and live copy are untouched.
    assert_eq!(m.active().unwrap(), Some(name("fork-a")));
    assert!(config.paths.live().unwrap().join("marker.txt").exists());
}

#[tokio::test]
async fn clone_retry_exhaustion_rolls_back() {
    let temp = temp_dir();
    let config = test_config(temp.path());
    let m = manager(&config);

    seed_two_forks(&config);
    m.store().set(&name("fork-a")).unwrap();

    // A repository that cannot be cloned (unresolvable or missing).
    let url = RepoUrl::parse(
        "https://github.com/forkswap-test/does-not-exist-0000.git",
        "github.com",
    )
    .unwrap();

    let err = m
        .clone_fork(&name("broken"), &url, None)
        .await
        .unwrap_err();
    assert!(
        err.downcast_ref::<SwapError>()
            .is_some_and(SwapError::is_fatal)
    );

    // Pointer unchanged, live copy unchanged, no partial archive left.
    assert_eq!(m.active().unwrap(), Some(name("fork-a")));
    assert!(config.paths.live().unwrap().join("marker.txt").exists());
    let forks = config.paths.forks_root().unwrap();
    assert!(!forks.join("broken").exists());
    assert!(!config.paths.journal_file().unwrap().exists());
}

#[test]
fn recovery_restores_missing_live_copy() {
    let temp = temp_dir();
    let config = test_config(temp.path());
    let m = manager(&config);

    // Crash state: pointer says fork-a, live copy is gone, fork-a archived.
    let forks = config.paths.forks_root().unwrap();
    std::fs::create_dir_all(forks.join("fork-a/openpilot")).unwrap();
    std::fs::write(forks.join("fork-a/openpilot/marker.txt"), "fork-a").unwrap();
    std::fs::create_dir_all(forks.join("fork-a/params")).unwrap();
    std::fs::write(forks.join("fork-a/params/DongleId"), "archived").unwrap();
    m.store().set(&name("fork-a")).unwrap();

    let journal = SwapJournal::new(
        forkswap::fork::journal::Operation::Switch,
        Some(name("fork-a")),
        name("fork-b"),
    );
    journal
        .persist(&config.paths.journal_file().unwrap())
        .unwrap();

    rollback::recover_if_needed(&config).unwrap();

    // Live copy and params are back, journal is gone.
    assert_eq!(
        std::fs::read_to_string(config.paths.live().unwrap().join("marker.txt")).unwrap(),
        "fork-a"
    );
    assert_eq!(
        std::fs::read_to_string(config.paths.params().unwrap().join("DongleId")).unwrap(),
        "archived"
    );
    assert!(!config.paths.journal_file().unwrap().exists());
    assert!(!forks.join("fork-a/openpilot").exists());
}

#[test]
fn recovery_without_journal_is_a_no_op() {
    let temp = temp_dir();
    let config = test_config(temp.path());

    rollback::recover_if_needed(&config).unwrap();
    assert!(!config.paths.live().unwrap().exists());
}

#[test]
fn dry_run_switch_mutates_nothing() {
    let temp = temp_dir();
    let mut config = Config::default();
    config.global.dry = true;
    config.paths.data_root = temp.path().to_path_buf();
    config.device.require_root = false;
    config.device.reboot = false;
    config.resolve_and_validate().unwrap();
    let config = Arc::new(config);

    let m = manager(&config);
    seed_two_forks(&config);
    m.store().set(&name("fork-a")).unwrap();

    m.switch(&name("fork-b")).unwrap();

    // Everything is exactly where it was.
    assert_eq!(m.active().unwrap(), Some(name("fork-a")));
    assert!(config.paths.live().unwrap().join("marker.txt").exists());
    assert!(
        config
            .paths
            .forks_root()
            .unwrap()
            .join("fork-b/openpilot")
            .exists()
    );
}
