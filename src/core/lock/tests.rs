// forkswap: openpilot Fork Swap Manager
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::InstanceLock;
use tempfile::TempDir;

fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("failed to create temp dir")
}

#[test]
fn test_acquire_and_release() {
    let temp = temp_dir();
    let path = temp.path().join(".forkswap.lock");

    {
        let lock = InstanceLock::acquire(&path).unwrap();
        assert!(path.exists());
        assert_eq!(
            std::fs::read_to_string(lock.path()).unwrap(),
            std::process::id().to_string()
        );
    }
    // Dropped -> released.
    assert!(!path.exists());
}

#[test]
fn test_second_acquire_fails_while_held() {
    let temp = temp_dir();
    let path = temp.path().join(".forkswap.lock");

    let _lock = InstanceLock::acquire(&path).unwrap();
    let err = InstanceLock::acquire(&path).unwrap_err();
    assert!(err.to_string().contains("another instance is running"));
}

#[cfg(target_os = "linux")]
#[test]
fn test_stale_lock_is_reclaimed() {
    let temp = temp_dir();
    let path = temp.path().join(".forkswap.lock");

    // No process has pid 0 in /proc.
    std::fs::write(&path, "0").unwrap();

    let lock = InstanceLock::acquire(&path).unwrap();
    assert_eq!(
        std::fs::read_to_string(lock.path()).unwrap(),
        std::process::id().to_string()
    );
}

#[test]
fn test_corrupt_lock_reported() {
    let temp = temp_dir();
    let path = temp.path().join(".forkswap.lock");

    std::fs::write(&path, "not a pid").unwrap();

    let err = InstanceLock::acquire(&path).unwrap_err();
    assert!(err.to_string().contains("corrupt"));
}
