// forkswap: openpilot Fork Swap Manager
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Switch command implementation.

use std::sync::Arc;

use tracing::info;

use crate::config::Config;
use crate::error::Result;
use crate::fork::ForkName;
use crate::fork::swap::SwapManager;
use crate::ui;

/// Main handler for the switch command.
///
/// # Errors
///
/// Returns an error if the target name is invalid, the precondition fails,
/// or the pointer cannot be read.
pub fn run_switch_command(name: &str, config: &Arc<Config>) -> Result<()> {
    let target = ForkName::parse(name)?;
    let manager = SwapManager::new(Arc::clone(config))?;

    if manager.active()?.as_ref() == Some(&target) {
        println!("Fork '{target}' is already active.");
        return Ok(());
    }

    // Fails early, before the confirmation, when the fork is unknown or has
    // no archived working copy.
    manager.resolve_fork_dir(&target)?;

    let question = format!("Switch to '{target}'? The device will reboot.");
    if !ui::confirm(&question, config.global.assume_yes)? {
        info!("switch cancelled");
        return Ok(());
    }

    manager.switch(&target)
}
