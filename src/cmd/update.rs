// forkswap: openpilot Fork Swap Manager
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Fork update command implementation.

use std::sync::Arc;

use tracing::info;

use crate::config::Config;
use crate::error::Result;
use crate::fork::ForkName;
use crate::fork::swap::SwapManager;
use crate::ui;

/// Main handler for the update command: check first, pull only on a
/// confirmed difference.
///
/// # Errors
///
/// Returns an error if the name is invalid, the fork cannot be resolved,
/// or the fetch/pull fails.
pub fn run_update_command(name: &str, config: &Arc<Config>) -> Result<()> {
    let name = ForkName::parse(name)?;
    let manager = SwapManager::new(Arc::clone(config))?;

    if !manager.check_fork_update(&name)? {
        println!("Fork '{name}' is up to date.");
        return Ok(());
    }

    let question = format!("Updates are available for '{name}'. Pull them now?");
    if !ui::confirm(&question, config.global.assume_yes)? {
        info!("update cancelled");
        return Ok(());
    }

    manager.update_fork(&name)?;
    println!("Fork '{name}' updated.");
    Ok(())
}
