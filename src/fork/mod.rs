// forkswap: openpilot Fork Swap Manager
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Fork identity, archive layout, and the swap state machine.
//!
//! ```text
//! ForkName / RepoUrl      validated newtypes
//! ArchiveLayout           forks/<name>/{openpilot,params}
//! ActiveForkStore         current_fork.txt, verified writes
//! SwapJournal             per-step outcome record
//! SwapManager             Switch | Clone | Delete | Update
//! rollback                best-effort recovery
//! ```

pub mod archive;
pub mod journal;
pub mod rollback;
pub mod store;
pub mod swap;


use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^[A-Za-z0-9_-]+$").expect("fork name pattern is valid"));

/// A validated fork name.
///
/// Names are restricted to `[A-Za-z0-9_-]+` so they can never contain path
/// separators or whitespace; construction is the only validation point.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ForkName(String);

impl ForkName {
    /// Validate and wrap a fork name.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidForkName` if the name contains any
    /// character outside `[A-Za-z0-9_-]` or is empty.
    pub fn parse(name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();
        if NAME_RE.is_match(&name) {
            Ok(Self(name))
        } else {
            Err(ValidationError::InvalidForkName(name))
        }
    }

    /// The name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ForkName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ForkName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for ForkName {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ForkName {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<ForkName> for String {
    fn from(name: ForkName) -> Self {
        name.0
    }
}

/// A validated fork repository URL.
///
/// Must match `https://<host>/<owner>/<repo>.git` where owner and repo use
/// the fork-name alphabet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoUrl {
    url: String,
    owner: String,
    repo: String,
}

impl RepoUrl {
    /// Validate a repository URL against the configured host.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidRepoUrl` if the URL is not of the
    /// form `https://<host>/<owner>/<repo>.git`.
    pub fn parse(url: impl Into<String>, host: &str) -> Result<Self, ValidationError> {
        let url = url.into();
        let invalid = || ValidationError::InvalidRepoUrl {
            url: url.clone(),
            host: host.to_string(),
        };

        let rest = url
            .strip_prefix("https://")
            .and_then(|r| r.strip_prefix(host))
            .and_then(|r| r.strip_prefix('/'))
            .ok_or_else(invalid)?;
        let rest = rest.strip_suffix(".git").ok_or_else(invalid)?;
        let (owner, repo) = rest.split_once('/').ok_or_else(invalid)?;

        if !NAME_RE.is_match(owner) || !NAME_RE.is_match(repo) {
            return Err(invalid());
        }

        Ok(Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
            url,
        })
    }

    /// The full URL.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.url
    }

    /// Repository owner (user or organization).
    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Repository name without the `.git` suffix.
    #[must_use]
    pub fn repo(&self) -> &str {
        &self.repo
    }
}

impl fmt::Display for RepoUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

/// One archived fork as found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fork {
    /// Fork name (the archive directory name).
    pub name: ForkName,
    /// Whether the archive holds a working-copy snapshot.
    pub has_snapshot: bool,
    /// Whether the archive holds a config snapshot.
    pub has_params: bool,
}
