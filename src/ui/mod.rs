// forkswap: openpilot Fork Swap Manager
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Interactive console protocol.
//!
//! ```text
//! render_status(view) --> status screen (active fork, disk, fork list, menu)
//! read_choice()       --> one line of input
//! parse_choice()      --> MenuChoice
//!
//! recognized tokens:
//!   <fork name>        switch
//!   Clone a new fork
//!   Delete a fork
//!   Update <fork>      (prefix match)
//!   Update script
//!   Exit
//! anything else -> invalid choice, loop continues
//! ```

use std::io::Write;

use crate::core::device::DiskUsage;
use crate::error::Result;


/// Menu token for cloning.
pub const TOKEN_CLONE: &str = "Clone a new fork";
/// Menu token for deleting.
pub const TOKEN_DELETE: &str = "Delete a fork";
/// Menu token for self-update.
pub const TOKEN_UPDATE_SCRIPT: &str = "Update script";
/// Menu token for leaving the loop.
pub const TOKEN_EXIT: &str = "Exit";
/// Prefix of the per-fork update token.
pub const TOKEN_UPDATE_PREFIX: &str = "Update ";

/// One fork row on the status screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForkRow {
    pub name: String,
    pub active: bool,
    pub has_snapshot: bool,
    pub update_available: bool,
}

/// Everything the status screen shows.
#[derive(Debug, Clone, Default)]
pub struct StatusView {
    pub active: Option<String>,
    pub disk: Option<DiskUsage>,
    pub forks: Vec<ForkRow>,
}

/// A parsed menu choice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuChoice {
    /// Switch to the named fork.
    Switch(String),
    /// Start the clone dialog.
    CloneNew,
    /// Start the delete dialog.
    Delete,
    /// Update the named fork.
    Update(String),
    /// Self-update the manager.
    UpdateScript,
    /// Leave the menu loop.
    Exit,
}

/// Render the status screen.
#[must_use]
pub fn render_status(view: &StatusView) -> String {
    use std::fmt::Write as _;

    let mut out = String::new();
    out.push_str("========================================\n");
    out.push_str("  openpilot fork swap\n");
    out.push_str("========================================\n");

    let active = view.active.as_deref().unwrap_or("<none>");
    let _ = writeln!(out, "Current fork: {active}");
    if let Some(disk) = &view.disk {
        let _ = writeln!(out, "Disk:         {disk}");
    }

    out.push_str("\nForks:\n");
    if view.forks.is_empty() {
        out.push_str("  (none yet - clone one to get started)\n");
    }
    for (i, fork) in view.forks.iter().enumerate() {
        let mut notes = Vec::new();
        if fork.active {
            notes.push("active");
        }
        if !fork.active && !fork.has_snapshot {
            notes.push("no working copy");
        }
        if fork.update_available {
            notes.push("update available");
        }
        let notes = if notes.is_empty() {
            String::new()
        } else {
            format!(" ({})", notes.join(", "))
        };
        let _ = writeln!(out, "  {}. {}{notes}", i + 1, fork.name);
    }

    out.push_str("\nOptions:\n");
    out.push_str("  - type a fork name to switch to it\n");
    let _ = writeln!(out, "  - {TOKEN_CLONE}");
    let _ = writeln!(out, "  - {TOKEN_DELETE}");
    let _ = writeln!(out, "  - {TOKEN_UPDATE_PREFIX}<fork-name>");
    let _ = writeln!(out, "  - {TOKEN_UPDATE_SCRIPT}");
    let _ = writeln!(out, "  - {TOKEN_EXIT}");
    out
}

/// Parse one line of menu input against the known fork names.
///
/// Returns `None` for anything unrecognized; the caller reports an invalid
/// choice and loops.
#[must_use]
pub fn parse_choice(input: &str, fork_names: &[String]) -> Option<MenuChoice> {
    let input = input.trim();

    match input {
        TOKEN_EXIT => return Some(MenuChoice::Exit),
        TOKEN_CLONE => return Some(MenuChoice::CloneNew),
        TOKEN_DELETE => return Some(MenuChoice::Delete),
        TOKEN_UPDATE_SCRIPT => return Some(MenuChoice::UpdateScript),
        _ => {}
    }

    if let Some(rest) = input.strip_prefix(TOKEN_UPDATE_PREFIX) {
        let rest = rest.trim();
        if !rest.is_empty() {
            return Some(MenuChoice::Update(rest.to_string()));
        }
    }

    if fork_names.iter().any(|n| n == input) {
        return Some(MenuChoice::Switch(input.to_string()));
    }

    None
}

/// Print a prompt and read one trimmed line from stdin.
///
/// # Errors
///
/// Returns an error if stdin is closed or unreadable.
pub fn prompt(question: &str) -> Result<String> {
    print!("{question}");
    std::io::stdout().flush()?;

    let mut line = String::new();
    let read = std::io::stdin().read_line(&mut line)?;
    if read == 0 {
        anyhow::bail!("stdin closed");
    }
    Ok(line.trim().to_string())
}

/// Ask a yes/no question; only an explicit `y`/`yes` confirms.
///
/// With `assume_yes` the question is logged and confirmed without asking.
///
/// # Errors
///
/// Returns an error if stdin is closed or unreadable.
pub fn confirm(question: &str, assume_yes: bool) -> Result<bool> {
    if assume_yes {
        tracing::debug!(question, "confirmation skipped (assume yes)");
        return Ok(true);
    }
    let answer = prompt(&format!("{question} [y/N] "))?;
    Ok(matches!(answer.to_lowercase().as_str(), "y" | "yes"))
}
