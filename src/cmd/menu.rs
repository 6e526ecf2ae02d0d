// forkswap: openpilot Fork Swap Manager
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Interactive menu loop.
//!
//! ```text
//! loop:
//!   render status screen
//!   read one line
//!   dispatch: switch | clone | delete | update | self-update | exit
//!   errors -> printed + logged, back to the menu
//!   fatal errors (clone retry exhaustion) -> propagate, process exits
//! ```

use std::sync::Arc;

use tracing::error;

use crate::config::Config;
use crate::error::{Result, SwapError};
use crate::ui::{self, MenuChoice};

use super::clone::run_clone_command;
use super::delete::run_delete_command;
use super::self_update::run_self_update_command;
use super::status::build_status_view;
use super::switch::run_switch_command;
use super::update::run_update_command;

/// Run the interactive read-eval loop until `Exit` or a fatal error.
///
/// # Errors
///
/// Returns an error only for fatal conditions; per-operation errors are
/// reported to the console and the loop continues.
pub async fn run_menu_command(config: &Arc<Config>) -> Result<()> {
    loop {
        let manager = crate::fork::swap::SwapManager::new(Arc::clone(config))?;
        let view = build_status_view(&manager, config.global.menu_update_checks)?;
        let fork_names: Vec<String> = view.forks.iter().map(|f| f.name.clone()).collect();

        print!("{}", ui::render_status(&view));
        let input = ui::prompt("\n> ")?;

        let Some(choice) = ui::parse_choice(&input, &fork_names) else {
            println!("Invalid choice: {input:?}");
            continue;
        };

        let result = match choice {
            MenuChoice::Exit => return Ok(()),
            MenuChoice::Switch(name) => run_switch_command(&name, config),
            MenuChoice::CloneNew => run_clone_dialog(config).await,
            MenuChoice::Delete => run_delete_dialog(config),
            MenuChoice::Update(name) => run_update_command(&name, config),
            MenuChoice::UpdateScript => run_self_update_command(config),
        };

        if let Err(e) = result {
            if is_fatal(&e) {
                return Err(e);
            }
            error!(error = %format!("{e:#}"), "operation failed");
            println!("Error: {e:#}");
        }
    }
}

async fn run_clone_dialog(config: &Arc<Config>) -> Result<()> {
    let name = ui::prompt("New fork name: ")?;
    let url = ui::prompt("Repository URL: ")?;
    let branch = ui::prompt("Branch (empty for default): ")?;
    let branch = if branch.is_empty() {
        None
    } else {
        Some(branch.as_str())
    };
    run_clone_command(&name, &url, branch, config).await
}

fn run_delete_dialog(config: &Arc<Config>) -> Result<()> {
    let name = ui::prompt("Fork to delete: ")?;
    run_delete_command(&name, config)
}

fn is_fatal(error: &anyhow::Error) -> bool {
    error
        .downcast_ref::<SwapError>()
        .is_some_and(SwapError::is_fatal)
}
