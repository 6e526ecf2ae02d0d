// forkswap: openpilot Fork Swap Manager
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Per-step journal for multi-step operations.
//!
//! ```text
//! SwapJournal                   .journal.json
//!   operation  switch | clone
//!   source     previously active fork
//!   target     fork being switched to / cloned
//!   steps      [{step, ok, error?}]   every outcome, in order
//!   bits       StepFlags mask of completed steps
//!
//! written before the first mutation, updated after every step,
//! removed after the last -- a leftover journal marks a crashed run
//! ```
//!
//! Switch and Clone are not transactions: a failed step is recorded and the
//! sequence continues. The journal is what makes that policy inspectable
//! and lets recovery decide what is safe to undo.

use std::path::Path;

use anyhow::Context;
use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use super::ForkName;
use crate::error::Result;

bitflags! {
    /// Completed-step mask of a multi-step operation.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct StepFlags: u32 {
        const CONFIG_BACKED_UP    = 1 << 0;
        const LIVE_ARCHIVED       = 1 << 1;
        const CLONE_COMPLETED     = 1 << 2;
        const OWNERSHIP_SET       = 1 << 3;
        const LIVE_MATERIALIZED   = 1 << 4;
        const POINTER_WRITTEN     = 1 << 5;
        const CONFIG_RESTORED     = 1 << 6;
        const PERMISSIONS_APPLIED = 1 << 7;
    }
}

/// One sub-step of a Switch or Clone sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Back up live config into the outgoing fork's archive.
    BackupConfig,
    /// Archive the live working copy under the outgoing fork's name.
    ArchiveLive,
    /// Clone the new fork's repository into its archive slot.
    CloneRepo,
    /// Set ownership on the freshly cloned working copy.
    SetOwnership,
    /// Move the target's working copy into the live path.
    MaterializeLive,
    /// Point `current_fork.txt` at the target.
    WritePointer,
    /// Restore the target's config snapshot into the live config path.
    RestoreConfig,
    /// Re-apply ownership and execute permissions.
    ApplyPermissions,
}

impl Step {
    /// The flag bit recording completion of this step.
    #[must_use]
    pub const fn flag(self) -> StepFlags {
        match self {
            Self::BackupConfig => StepFlags::CONFIG_BACKED_UP,
            Self::ArchiveLive => StepFlags::LIVE_ARCHIVED,
            Self::CloneRepo => StepFlags::CLONE_COMPLETED,
            Self::SetOwnership => StepFlags::OWNERSHIP_SET,
            Self::MaterializeLive => StepFlags::LIVE_MATERIALIZED,
            Self::WritePointer => StepFlags::POINTER_WRITTEN,
            Self::RestoreConfig => StepFlags::CONFIG_RESTORED,
            Self::ApplyPermissions => StepFlags::PERMISSIONS_APPLIED,
        }
    }

    /// Stable identifier used in the journal and in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BackupConfig => "backup_config",
            Self::ArchiveLive => "archive_live",
            Self::CloneRepo => "clone_repo",
            Self::SetOwnership => "set_ownership",
            Self::MaterializeLive => "materialize_live",
            Self::WritePointer => "write_pointer",
            Self::RestoreConfig => "restore_config",
            Self::ApplyPermissions => "apply_permissions",
        }
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which multi-step operation the journal belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Switch,
    Clone,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Switch => f.write_str("switch"),
            Self::Clone => f.write_str("clone"),
        }
    }
}

/// Recorded outcome of a single step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepRecord {
    /// Step identifier ([`Step::as_str`]).
    pub step: String,
    /// Whether the step succeeded.
    pub ok: bool,
    /// Error message for a failed step.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Journal of one Switch or Clone run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwapJournal {
    /// Operation kind.
    pub operation: Operation,
    /// Previously active fork, if any.
    pub source: Option<ForkName>,
    /// Fork being switched to or cloned.
    pub target: ForkName,
    /// Completed-step mask ([`StepFlags`] bits).
    bits: u32,
    /// Every step outcome, in execution order.
    pub steps: Vec<StepRecord>,
}

impl SwapJournal {
    /// Start a new journal for an operation.
    #[must_use]
    pub const fn new(operation: Operation, source: Option<ForkName>, target: ForkName) -> Self {
        Self {
            operation,
            source,
            target,
            bits: 0,
            steps: Vec::new(),
        }
    }

    /// Record a successful step.
    pub fn record_ok(&mut self, step: Step) {
        self.bits |= step.flag().bits();
        self.steps.push(StepRecord {
            step: step.as_str().to_string(),
            ok: true,
            error: None,
        });
    }

    /// Record a failed step.
    pub fn record_failure(&mut self, step: Step, error: &anyhow::Error) {
        self.steps.push(StepRecord {
            step: step.as_str().to_string(),
            ok: false,
            error: Some(format!("{error:#}")),
        });
    }

    /// Completed steps as flags.
    #[must_use]
    pub const fn completed(&self) -> StepFlags {
        StepFlags::from_bits_truncate(self.bits)
    }

    /// Whether a given step completed successfully.
    #[must_use]
    pub const fn is_completed(&self, step: Step) -> bool {
        self.completed().contains(step.flag())
    }

    /// Number of failed steps recorded so far.
    #[must_use]
    pub fn failed_steps(&self) -> usize {
        self.steps.iter().filter(|s| !s.ok).count()
    }

    /// Write the journal to disk, replacing any previous content.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn persist(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize journal")?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write journal {}", path.display()))?;
        Ok(())
    }

    /// Load a journal if one exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read journal {}", path.display()))?;
        let journal = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse journal {}", path.display()))?;
        Ok(Some(journal))
    }

    /// Remove the journal file; missing is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be removed.
    pub fn remove(path: &Path) -> Result<()> {
        if path.exists() {
            std::fs::remove_file(path)
                .with_context(|| format!("failed to remove journal {}", path.display()))?;
        }
        Ok(())
    }
}
