// forkswap: openpilot Fork Swap Manager
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Self-update command implementation.
//!
//! ```text
//! clone upstream into a temp dir
//!   candidate == installed?  "up to date"
//!   differs + confirmed:
//!     write <manager>.new beside the installed copy
//!     atomic rename over the installed copy
//!     exec() the new binary   (process replacement, not a child)
//! ```
//!
//! The running image is never mutated in place; the rename swaps the
//! directory entry and the old inode stays valid until the exec hands off.

use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use crate::config::Config;
use crate::core::device;
use crate::error::{Result, bail_out};
use crate::git::cmd as git;
use crate::ui;

/// Main handler for the self-update command.
///
/// On an applied update this function does not return: the process image is
/// replaced by the freshly installed manager.
///
/// # Errors
///
/// Returns an error if the upstream clone fails, the upstream copy is
/// missing the manager binary, or the replacement cannot be applied.
pub fn run_self_update_command(config: &Arc<Config>) -> Result<()> {
    let installed = config.paths.manager()?;

    let staging = tempfile::tempdir().context("failed to create staging directory")?;
    let checkout = staging.path().join("upstream");

    info!(url = %config.git.upstream_url, branch = %config.git.upstream_branch, "fetching upstream manager");
    git::clone(
        &config.git.upstream_url,
        &checkout,
        Some(config.git.upstream_branch.as_str()),
        true,
    )?;

    let candidate = checkout.join(&config.git.upstream_bin);
    if !candidate.is_file() {
        return Err(bail_out(format!(
            "upstream repository has no manager at {}",
            config.git.upstream_bin
        ))
        .into());
    }

    let candidate_bytes = std::fs::read(&candidate)
        .with_context(|| format!("failed to read {}", candidate.display()))?;
    let installed_bytes = std::fs::read(&installed)
        .with_context(|| format!("failed to read {}", installed.display()))?;

    if candidate_bytes == installed_bytes {
        println!("forkswap is up to date.");
        return Ok(());
    }

    info!(
        installed = installed_bytes.len(),
        upstream = candidate_bytes.len(),
        "upstream manager differs"
    );

    if config.global.dry {
        info!("dry run: would replace {} and re-execute", installed.display());
        return Ok(());
    }

    let question = "A new manager version is available. Install and restart it?";
    if !ui::confirm(question, config.global.assume_yes)? {
        info!("self-update cancelled");
        return Ok(());
    }

    // Stage next to the installed copy so the rename stays on one
    // filesystem and is atomic.
    let staged = installed.with_file_name(format!(
        "{}.new",
        installed
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("forkswap")
    ));
    std::fs::write(&staged, &candidate_bytes)
        .with_context(|| format!("failed to write {}", staged.display()))?;
    device::make_executable(&staged, false)?;
    std::fs::rename(&staged, &installed).with_context(|| {
        format!(
            "failed to replace {} with {}",
            installed.display(),
            staged.display()
        )
    })?;

    info!(path = %installed.display(), "manager replaced; handing off to the new copy");
    reexec(&installed)
}

/// Replace this process with the freshly installed manager.
#[cfg(unix)]
fn reexec(installed: &std::path::Path) -> Result<()> {
    use std::os::unix::process::CommandExt;

    let err = std::process::Command::new(installed).exec();
    // exec only returns on failure.
    Err(anyhow::Error::new(err))
        .with_context(|| format!("failed to re-execute {}", installed.display()))
}

/// Off unix there is no process replacement; ask for a manual restart.
#[cfg(not(unix))]
fn reexec(installed: &std::path::Path) -> Result<()> {
    tracing::warn!(path = %installed.display(), "process replacement unavailable; restart manually");
    Ok(())
}
