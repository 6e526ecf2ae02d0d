// forkswap: openpilot Fork Swap Manager
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Delete command implementation.

use std::sync::Arc;

use tracing::info;

use crate::config::Config;
use crate::error::Result;
use crate::fork::ForkName;
use crate::fork::swap::SwapManager;
use crate::ui;

/// Main handler for the delete command.
///
/// # Errors
///
/// Returns an error if the name is invalid, the fork does not exist, or
/// removal fails.
pub fn run_delete_command(name: &str, config: &Arc<Config>) -> Result<()> {
    let name = ForkName::parse(name)?;
    let manager = SwapManager::new(Arc::clone(config))?;

    if !manager.archive().contains(&name) {
        // Reported without mutating anything.
        return manager.delete(&name);
    }

    let question = format!("Delete fork '{name}' and its archived snapshots?");
    if !ui::confirm(&question, config.global.assume_yes)? {
        info!("delete cancelled");
        return Ok(());
    }

    manager.delete(&name)
}
