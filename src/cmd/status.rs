// forkswap: openpilot Fork Swap Manager
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Status screen command.

use tracing::debug;

use crate::config::Config;
use crate::core::device;
use crate::error::Result;
use crate::fork::swap::SwapManager;
use crate::ui::{ForkRow, StatusView, render_status};

/// Build the status view: active fork, disk space, and the fork list with
/// update annotations.
///
/// Update checks hit the network once per fork; failures degrade to "no
/// update shown" instead of breaking the screen.
///
/// # Errors
///
/// Returns an error if the pointer file or the forks root cannot be read.
pub fn build_status_view(manager: &SwapManager, check_updates: bool) -> Result<StatusView> {
    let active = manager.active()?;
    let mut forks = Vec::new();

    for fork in manager.list()? {
        let is_active = active.as_ref() == Some(&fork.name);
        let update_available = if check_updates {
            manager.check_fork_update(&fork.name).unwrap_or_else(|e| {
                debug!(fork = %fork.name, error = %format!("{e:#}"), "update check failed");
                false
            })
        } else {
            false
        };
        forks.push(ForkRow {
            name: fork.name.to_string(),
            active: is_active,
            has_snapshot: fork.has_snapshot,
            update_available,
        });
    }

    let disk = match device::disk_usage(manager.data_root()) {
        Ok(disk) => Some(disk),
        Err(e) => {
            debug!(error = %format!("{e:#}"), "disk usage query failed");
            None
        }
    };

    Ok(StatusView {
        active: active.map(|n| n.to_string()),
        disk,
        forks,
    })
}

/// Print the status screen once.
///
/// # Errors
///
/// Returns an error if the fork state cannot be read.
pub fn run_status_command(config: &Config) -> Result<()> {
    let manager = SwapManager::new(std::sync::Arc::new(config.clone()))?;
    let view = build_status_view(&manager, config.global.menu_update_checks)?;
    print!("{}", render_status(&view));
    Ok(())
}
