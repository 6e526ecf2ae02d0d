// forkswap: openpilot Fork Swap Manager
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use crate::error::{FsError, Result};
use anyhow::Context;
use std::fs;
use std::path::Path;

/// Recursively copies all contents from src directory to dst directory.
///
/// Creates dst if it doesn't exist and never clears it first: files already
/// present in dst are overwritten when src has a same-named file, everything
/// else in dst is left alone (merge/overwrite semantics).
///
/// # Errors
///
/// Returns an error if any IO operation fails (creating directory, reading,
/// copying).
pub fn copy_dir_contents(src: &Path, dst: &Path) -> Result<()> {
    fs::create_dir_all(dst)
        .with_context(|| format!("failed to create directory {}", dst.display()))?;

    let entries =
        fs::read_dir(src).with_context(|| format!("failed to read directory {}", src.display()))?;

    for entry in entries {
        let entry =
            entry.with_context(|| format!("failed to read entry from {}", src.display()))?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            copy_dir_contents(&src_path, &dst_path)?;
        } else {
            fs::copy(&src_path, &dst_path).with_context(|| {
                format!(
                    "failed to copy {} to {}",
                    src_path.display(),
                    dst_path.display()
                )
            })?;
        }
    }

    Ok(())
}

/// Moves a directory to a destination that must not yet exist.
///
/// The caller is responsible for clearing a stale destination first; a
/// pre-existing destination fails the move rather than merging into it.
///
/// # Errors
///
/// Returns [`FsError::NotFound`] if `src` is missing,
/// [`FsError::AlreadyExists`] if `dst` is present, and [`FsError::IoError`]
/// if the rename itself fails.
pub fn move_dir(src: &Path, dst: &Path) -> Result<()> {
    if !src.exists() {
        return Err(FsError::NotFound(src.display().to_string()).into());
    }
    if dst.exists() {
        return Err(FsError::AlreadyExists(dst.display().to_string()).into());
    }
    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }
    fs::rename(src, dst).map_err(|e| {
        FsError::IoError {
            path: format!("{} -> {}", src.display(), dst.display()),
            source: e,
        }
        .into()
    })
}

/// Recursively removes a directory if it exists; missing is not an error.
///
/// # Errors
///
/// Returns an error if the directory exists but cannot be removed.
pub fn remove_dir_all_if_exists(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_dir_all(path)
            .with_context(|| format!("failed to remove directory {}", path.display()))?;
    }
    Ok(())
}
