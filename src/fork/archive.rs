// forkswap: openpilot Fork Swap Manager
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Archive layout under the forks root.
//!
//! ```text
//! forks/
//!   <name>/
//!     openpilot/   working-copy snapshot (absent while active)
//!     params/      config snapshot (optional)
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context;

use super::{Fork, ForkName};
use crate::error::Result;

/// Directory name of a fork's archived working copy.
pub const SNAPSHOT_DIR: &str = "openpilot";

/// Directory name of a fork's archived config snapshot.
pub const PARAMS_DIR: &str = "params";

/// Resolves archive paths for named forks and enumerates what is on disk.
#[derive(Debug, Clone)]
pub struct ArchiveLayout {
    root: PathBuf,
}

impl ArchiveLayout {
    /// Create a layout rooted at the forks directory.
    #[must_use]
    pub const fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// The forks root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// A fork's archive directory.
    #[must_use]
    pub fn fork_dir(&self, name: &ForkName) -> PathBuf {
        self.root.join(name.as_str())
    }

    /// A fork's archived working-copy snapshot.
    #[must_use]
    pub fn snapshot_dir(&self, name: &ForkName) -> PathBuf {
        self.fork_dir(name).join(SNAPSHOT_DIR)
    }

    /// A fork's archived config snapshot.
    #[must_use]
    pub fn params_dir(&self, name: &ForkName) -> PathBuf {
        self.fork_dir(name).join(PARAMS_DIR)
    }

    /// Whether a fork has an archive directory at all.
    #[must_use]
    pub fn contains(&self, name: &ForkName) -> bool {
        self.fork_dir(name).is_dir()
    }

    /// Enumerate archived forks, sorted by name.
    ///
    /// Entries whose directory name is not a valid fork name (the pointer
    /// file, the lock, the journal) are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the forks root exists but cannot be read. A
    /// missing root yields an empty list.
    pub fn list(&self) -> Result<Vec<Fork>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }

        let entries = std::fs::read_dir(&self.root)
            .with_context(|| format!("failed to read forks root {}", self.root.display()))?;

        let mut forks = Vec::new();
        for entry in entries {
            let entry = entry
                .with_context(|| format!("failed to read entry from {}", self.root.display()))?;
            if !entry.path().is_dir() {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(String::from) else {
                continue;
            };
            let Ok(name) = ForkName::parse(name) else {
                continue;
            };

            forks.push(Fork {
                has_snapshot: self.snapshot_dir(&name).is_dir(),
                has_params: self.params_dir(&name).is_dir(),
                name,
            });
        }

        forks.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(forks)
    }
}
