// forkswap: openpilot Fork Swap Manager
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{copy_dir_contents, move_dir, remove_dir_all_if_exists};
use tempfile::TempDir;

fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("failed to create temp dir")
}

#[test]
fn test_copy_dir_contents_recursive() {
    let temp = temp_dir();
    let src = temp.path().join("src");
    let dst = temp.path().join("dst");

    std::fs::create_dir_all(src.join("nested")).unwrap();
    std::fs::write(src.join("a.txt"), "a").unwrap();
    std::fs::write(src.join("nested/b.txt"), "b").unwrap();

    copy_dir_contents(&src, &dst).unwrap();

    assert_eq!(std::fs::read_to_string(dst.join("a.txt")).unwrap(), "a");
    assert_eq!(
        std::fs::read_to_string(dst.join("nested/b.txt")).unwrap(),
        "b"
    );
    // Source is untouched.
    assert!(src.join("a.txt").exists());
}

#[test]
fn test_copy_dir_contents_merges_without_clearing() {
    let temp = temp_dir();
    let src = temp.path().join("src");
    let dst = temp.path().join("dst");

    std::fs::create_dir_all(&src).unwrap();
    std::fs::create_dir_all(&dst).unwrap();
    std::fs::write(src.join("shared.txt"), "new").unwrap();
    std::fs::write(dst.join("shared.txt"), "old").unwrap();
    std::fs::write(dst.join("keep.txt"), "keep").unwrap();

    copy_dir_contents(&src, &dst).unwrap();

    // Same-named files are overwritten, unrelated files survive.
    assert_eq!(
        std::fs::read_to_string(dst.join("shared.txt")).unwrap(),
        "new"
    );
    assert_eq!(std::fs::read_to_string(dst.join("keep.txt")).unwrap(), "keep");
}

#[test]
fn test_move_dir() {
    let temp = temp_dir();
    let src = temp.path().join("src");
    let dst = temp.path().join("archive/dst");

    std::fs::create_dir_all(&src).unwrap();
    std::fs::write(src.join("f.txt"), "f").unwrap();

    move_dir(&src, &dst).unwrap();

    assert!(!src.exists());
    assert_eq!(std::fs::read_to_string(dst.join("f.txt")).unwrap(), "f");
}

#[test]
fn test_move_dir_refuses_existing_destination() {
    let temp = temp_dir();
    let src = temp.path().join("src");
    let dst = temp.path().join("dst");

    std::fs::create_dir_all(&src).unwrap();
    std::fs::create_dir_all(&dst).unwrap();

    let err = move_dir(&src, &dst).unwrap_err();
    assert!(err.to_string().contains("already exists"));
    assert!(src.exists());
}

#[test]
fn test_move_dir_missing_source() {
    let temp = temp_dir();
    let err = move_dir(&temp.path().join("nope"), &temp.path().join("dst")).unwrap_err();
    assert!(err.to_string().contains("not found"));
}

#[test]
fn test_remove_dir_all_if_exists() {
    let temp = temp_dir();
    let dir = temp.path().join("gone");
    std::fs::create_dir_all(dir.join("deep")).unwrap();

    remove_dir_all_if_exists(&dir).unwrap();
    assert!(!dir.exists());

    // Missing directory is fine.
    remove_dir_all_if_exists(&dir).unwrap();
}
