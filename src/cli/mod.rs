// forkswap: openpilot Fork Swap Manager
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI module for forkswap using clap derive.
//!
//! # Command Structure
//!
//! ```text
//! forkswap [global options]            interactive menu
//! status                               one-shot status screen
//! switch <name>
//! clone <name> <url> [--branch B]
//! delete <name>
//! update <name>
//! self-update
//! options | inis | version
//! ```

pub mod global;

#[cfg(test)]
mod tests;

use crate::cli::global::GlobalOptions;
use clap::{Args, Parser, Subcommand};

/// openpilot Fork Swap Manager
///
/// Switches between, clones, and deletes local openpilot forks on a comma
/// device, keeping per-fork config snapshots.
#[derive(Debug, Parser)]
#[command(
    name = "forkswap",
    author,
    version,
    about = "openpilot Fork Swap Manager",
    long_about = "forkswap Copyright (C) 2026 Romeo Ahmed\n\
                  This program comes with ABSOLUTELY NO WARRANTY\n\
                  This is free software, and you are welcome to redistribute it\n\
                  under certain conditions; see LICENSE for details.\n\n\
                  Manages named forks of openpilot on a comma device: one fork\n\
                  is live at /data/openpilot, the rest are archived under\n\
                  /data/forks together with their params snapshots. Run with no\n\
                  command for the interactive menu; every menu action is also\n\
                  available as a subcommand. Switching and cloning reboot the\n\
                  device.",
    after_help = "CONFIG FILES:\n\n\
                  forkswap reads /data/forkswap.toml, then forkswap.toml in the\n\
                  current directory, then any --ini files, with later files\n\
                  overriding earlier ones. FORKSWAP_* environment variables and\n\
                  command-line flags override them all. Use --no-default-inis\n\
                  to disable auto detection and only use --ini."
)]
pub struct Cli {
    /// Global options shared by all commands
    #[command(flatten)]
    pub global: GlobalOptions,

    /// Command to execute; the interactive menu runs when omitted
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Shows the version.
    #[command(visible_alias = "-v")]
    Version,

    /// Lists all options and their values from the config files.
    Options,

    /// Lists the config files used by forkswap.
    Inis,

    /// Prints the status screen once and exits.
    Status,

    /// Switches the live working copy to an archived fork (reboots).
    Switch(SwitchArgs),

    /// Clones a new fork and makes it live (reboots).
    Clone(CloneArgs),

    /// Deletes a fork's archive.
    Delete(DeleteArgs),

    /// Checks a fork for upstream updates and offers to pull.
    Update(UpdateArgs),

    /// Replaces this manager with the upstream copy and re-executes.
    #[command(name = "self-update")]
    SelfUpdate,
}

/// Arguments for the switch command.
#[derive(Debug, Args)]
pub struct SwitchArgs {
    /// Fork to switch to.
    pub name: String,
}

/// Arguments for the clone command.
#[derive(Debug, Args)]
pub struct CloneArgs {
    /// Name for the new fork.
    pub name: String,

    /// Repository URL (https://<host>/<owner>/<repo>.git).
    pub url: String,

    /// Branch to clone instead of the default branch.
    #[arg(short = 'b', long = "branch", value_name = "BRANCH")]
    pub branch: Option<String>,
}

/// Arguments for the delete command.
#[derive(Debug, Args)]
pub struct DeleteArgs {
    /// Fork whose archive is removed.
    pub name: String,
}

/// Arguments for the update command.
#[derive(Debug, Args)]
pub struct UpdateArgs {
    /// Fork to check and update.
    pub name: String,
}

/// Parses command-line arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}

/// Parses command-line arguments from an iterator.
pub fn parse_from<I, T>(iter: I) -> Cli
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::parse_from(iter)
}

/// Tries to parse command-line arguments, returning an error on failure.
///
/// # Errors
///
/// Returns a `clap::Error` if the arguments are invalid or if help/version
/// information was requested.
pub fn try_parse() -> Result<Cli, clap::Error> {
    Cli::try_parse()
}
