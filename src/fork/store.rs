// forkswap: openpilot Fork Swap Manager
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Persisted active-fork pointer.
//!
//! ```text
//! current_fork.txt  (one line: active fork name)
//!
//! get()  missing/empty file -> None
//! set()  write, re-read, compare -- a mismatch is an error,
//!        the write is not trusted on its own
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context;

use super::ForkName;
use crate::error::{FsError, Result};

/// Store for the single persisted scalar naming the active fork.
#[derive(Debug, Clone)]
pub struct ActiveForkStore {
    path: PathBuf,
}

impl ActiveForkStore {
    /// Create a store over the given pointer file.
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// The pointer file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the active fork name.
    ///
    /// A missing or empty file means no fork is active.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or holds an invalid
    /// fork name.
    pub fn get(&self) -> Result<Option<ForkName>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        let content = content.trim();
        if content.is_empty() {
            return Ok(None);
        }
        let name = ForkName::parse(content)
            .with_context(|| format!("corrupt pointer file {}", self.path.display()))?;
        Ok(Some(name))
    }

    /// Write the active fork name and verify the write by reading it back.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails, or if the re-read content does
    /// not match what was written.
    pub fn set(&self, name: &ForkName) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        std::fs::write(&self.path, format!("{name}\n"))
            .with_context(|| format!("failed to write {}", self.path.display()))?;

        let actual = std::fs::read_to_string(&self.path)
            .with_context(|| format!("failed to re-read {}", self.path.display()))?;
        let actual = actual.trim();
        if actual != name.as_str() {
            return Err(FsError::VerifyMismatch {
                path: self.path.display().to_string(),
                expected: name.as_str().to_string(),
                actual: actual.to_string(),
            }
            .into());
        }
        Ok(())
    }
}
