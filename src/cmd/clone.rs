// forkswap: openpilot Fork Swap Manager
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Clone command implementation.

use std::sync::Arc;

use tracing::info;

use crate::config::Config;
use crate::error::Result;
use crate::fork::swap::SwapManager;
use crate::fork::{ForkName, RepoUrl};
use crate::ui;

/// Main handler for the clone command.
///
/// # Errors
///
/// Returns an error if name or URL fail validation, or fatally if the clone
/// exhausts its retry budget.
pub async fn run_clone_command(
    name: &str,
    url: &str,
    branch: Option<&str>,
    config: &Arc<Config>,
) -> Result<()> {
    let name = ForkName::parse(name)?;
    let url = RepoUrl::parse(url, &config.git.host)?;
    let manager = SwapManager::new(Arc::clone(config))?;

    if manager.archive().contains(&name) {
        let question = format!("Fork '{name}' already exists. Overwrite its archive?");
        if !ui::confirm(&question, config.global.assume_yes)? {
            info!("clone cancelled");
            return Ok(());
        }
    }

    let question = format!("Clone '{url}' as '{name}'? The device will reboot.");
    if !ui::confirm(&question, config.global.assume_yes)? {
        info!("clone cancelled");
        return Ok(());
    }

    manager.clone_fork(&name, &url, branch).await
}
