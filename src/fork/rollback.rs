// forkswap: openpilot Fork Swap Manager
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Best-effort cleanup and crash recovery.
//!
//! ```text
//! cleanup(config)           interrupt / clone-exhaustion path
//! recover_if_needed(config) startup path, leftover journal
//!
//! both:
//!   partial clone? remove the target's staging snapshot
//!   live copy missing? restore the active fork's snapshot + config
//! ```
//!
//! Cleanup is not a transaction rollback: it restores the previously
//! active fork only when the live copy is gone, and it never reverses a
//! pointer that was already rewritten. Every action is logged, no failure
//! propagates.

use tracing::{error, info, warn};

use super::archive::ArchiveLayout;
use super::journal::{Operation, Step, SwapJournal};
use super::store::ActiveForkStore;
use crate::config::Config;
use crate::error::Result;
use crate::utility::fs::{copy_dir_contents, move_dir};

/// Run recovery at startup when a previous run left its journal behind.
///
/// # Errors
///
/// Returns an error if the journal exists but cannot be read, or cannot be
/// removed after recovery.
pub fn recover_if_needed(config: &Config) -> Result<()> {
    let journal_path = config.paths.journal_file()?;
    let Some(journal) = SwapJournal::load(&journal_path)? else {
        return Ok(());
    };

    warn!(
        operation = %journal.operation,
        target = %journal.target,
        completed = ?journal.completed(),
        "found journal of an unfinished operation; running recovery"
    );
    run_cleanup(config, Some(&journal));
    SwapJournal::remove(&journal_path)?;
    info!("recovery finished");
    Ok(())
}

/// Best-effort cleanup on interrupt or clone-retry exhaustion.
///
/// Never fails; every problem is logged and skipped.
pub fn cleanup(config: &Config) {
    let journal = config
        .paths
        .journal_file()
        .ok()
        .and_then(|p| SwapJournal::load(&p).unwrap_or(None));
    run_cleanup(config, journal.as_ref());
    if let Ok(path) = config.paths.journal_file() {
        let _ = std::fs::remove_file(path);
    }
}

fn run_cleanup(config: &Config, journal: Option<&SwapJournal>) {
    let (Ok(live), Ok(params), Ok(forks_root), Ok(pointer)) = (
        config.paths.live(),
        config.paths.params(),
        config.paths.forks_root(),
        config.paths.current_fork_file(),
    ) else {
        error!("paths not resolved; skipping cleanup");
        return;
    };
    let archive = ArchiveLayout::new(forks_root.to_path_buf());
    let store = ActiveForkStore::new(pointer);

    // A clone that never completed leaves a partial snapshot in the
    // target's archive slot.
    if let Some(j) = journal
        && j.operation == Operation::Clone
        && !j.is_completed(Step::CloneRepo)
    {
        let staging = archive.snapshot_dir(&j.target);
        if staging.exists() {
            warn!(path = %staging.display(), "removing partial clone");
            if let Err(e) = std::fs::remove_dir_all(&staging) {
                error!(path = %staging.display(), error = %e, "failed to remove partial clone");
            }
        }
        // Drop the empty archive slot; a populated one (params of a fork
        // being overwritten) is kept.
        let _ = std::fs::remove_dir(archive.fork_dir(&j.target));
    }

    // An interrupted switch between archive_live and materialize_live
    // leaves no live copy at all; put the recorded active fork back.
    if !live.exists()
        && let Ok(Some(active)) = store.get()
    {
        let snapshot = archive.snapshot_dir(&active);
        if snapshot.is_dir() {
            warn!(fork = %active, "live working copy missing; restoring from archive");
            if let Err(e) = move_dir(&snapshot, live) {
                error!(fork = %active, error = %format!("{e:#}"), "failed to restore working copy");
            }

            let archived_params = archive.params_dir(&active);
            if archived_params.is_dir()
                && let Err(e) = copy_dir_contents(&archived_params, params)
            {
                error!(fork = %active, error = %format!("{e:#}"), "failed to restore config");
            }
        } else {
            warn!(fork = %active, "live working copy missing and no snapshot to restore");
        }
    }
}
