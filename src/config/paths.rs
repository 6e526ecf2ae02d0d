// forkswap: openpilot Fork Swap Manager
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Path configuration.
//!
//! ```text
//! data_root/                    (/data)
//!   openpilot/                  live working copy
//!   params/                     live config
//!   forks/
//!     current_fork.txt          active fork pointer
//!     .forkswap.lock            instance lock
//!     .journal.json             in-flight operation journal
//!     <name>/
//!       openpilot/              archived working copy
//!       params/                 archived config snapshot
//! ```
//!
//! All paths are optional and resolved from `data_root` if not set.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};

/// Name of the one-line file holding the active fork name.
pub const CURRENT_FORK_FILE: &str = "current_fork.txt";

/// Name of the instance lock file under the forks root.
pub const LOCK_FILE: &str = ".forkswap.lock";

/// Name of the operation journal under the forks root.
pub const JOURNAL_FILE: &str = ".journal.json";

/// Filesystem layout configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    /// Device data partition (all other paths relative to this).
    pub data_root: PathBuf,
    /// Live working copy (default: `data_root/openpilot`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub live: Option<PathBuf>,
    /// Live config directory (default: `data_root/params`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<PathBuf>,
    /// Archived forks root (default: `data_root/forks`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forks_root: Option<PathBuf>,
    /// Installed manager binary (default: the running executable).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manager: Option<PathBuf>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            data_root: PathBuf::from("/data"),
            live: None,
            params: None,
            forks_root: None,
            manager: None,
        }
    }
}

impl PathsConfig {
    /// Resolve all relative paths against `data_root` and fill in defaults.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError::MissingKey` if `data_root` is empty.
    pub fn resolve(&mut self) -> Result<()> {
        if self.data_root.as_os_str().is_empty() {
            return Err(ConfigError::MissingKey {
                section: "paths".to_string(),
                key: "data_root".to_string(),
            }
            .into());
        }
        let root = self.data_root.clone();

        let resolve = |path: &mut Option<PathBuf>, parent: &Path, default: &str| match path {
            Some(p) if p.is_relative() => {
                *path = Some(parent.join(p.clone()));
            }
            None => {
                *path = Some(parent.join(default));
            }
            _ => {}
        };

        resolve(&mut self.live, &root, "openpilot");
        resolve(&mut self.params, &root, "params");
        resolve(&mut self.forks_root, &root, "forks");

        if let Some(manager) = &self.manager
            && manager.is_relative()
        {
            self.manager = Some(root.join(manager));
        }

        Ok(())
    }

    fn resolved<'a>(path: Option<&'a Path>, key: &str) -> Result<&'a Path> {
        path.ok_or_else(|| {
            ConfigError::MissingKey {
                section: "paths".to_string(),
                key: key.to_string(),
            }
            .into()
        })
    }

    /// Live working copy path.
    ///
    /// # Errors
    ///
    /// Returns an error if called before [`resolve`](Self::resolve).
    pub fn live(&self) -> Result<&Path> {
        Self::resolved(self.live.as_deref(), "live")
    }

    /// Live config directory.
    ///
    /// # Errors
    ///
    /// Returns an error if called before [`resolve`](Self::resolve).
    pub fn params(&self) -> Result<&Path> {
        Self::resolved(self.params.as_deref(), "params")
    }

    /// Archived forks root.
    ///
    /// # Errors
    ///
    /// Returns an error if called before [`resolve`](Self::resolve).
    pub fn forks_root(&self) -> Result<&Path> {
        Self::resolved(self.forks_root.as_deref(), "forks_root")
    }

    /// File holding the active fork name.
    ///
    /// # Errors
    ///
    /// Returns an error if called before [`resolve`](Self::resolve).
    pub fn current_fork_file(&self) -> Result<PathBuf> {
        Ok(self.forks_root()?.join(CURRENT_FORK_FILE))
    }

    /// Instance lock file.
    ///
    /// # Errors
    ///
    /// Returns an error if called before [`resolve`](Self::resolve).
    pub fn lock_file(&self) -> Result<PathBuf> {
        Ok(self.forks_root()?.join(LOCK_FILE))
    }

    /// In-flight operation journal.
    ///
    /// # Errors
    ///
    /// Returns an error if called before [`resolve`](Self::resolve).
    pub fn journal_file(&self) -> Result<PathBuf> {
        Ok(self.forks_root()?.join(JOURNAL_FILE))
    }

    /// Installed manager binary, falling back to the running executable.
    ///
    /// # Errors
    ///
    /// Returns an error if no path is configured and the running executable
    /// cannot be determined.
    pub fn manager(&self) -> Result<PathBuf> {
        match &self.manager {
            Some(p) => Ok(p.clone()),
            None => std::env::current_exe().map_err(Into::into),
        }
    }
}
