// forkswap: openpilot Fork Swap Manager
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Global CLI options available for all commands.
//!
//! ```text
//! --ini FILE        ← Additional config files (can repeat)
//! --dry             ← Simulate filesystem ops
//! --yes             ← Assume yes on confirmations
//! --log-level N     ← Console verbosity (0-6)
//! --file-log-level  ← File verbosity (overrides --log-level)
//! --data-root DIR   ← paths.data_root override
//!
//! Precedence: CLI flags > env > --ini > defaults
//! ```

use clap::Args;
use std::path::PathBuf;

/// Global options available for all commands.
#[derive(Debug, Clone, Default, Args)]
pub struct GlobalOptions {
    /// Path to additional TOML configuration file(s).
    /// Can be specified multiple times.
    #[arg(short = 'i', long = "ini", value_name = "FILE", action = clap::ArgAction::Append)]
    pub inis: Vec<PathBuf>,

    /// Simulates filesystem operations. No fork state is mutated and the
    /// device is not rebooted; mostly useful to preview a switch or clone.
    #[arg(long)]
    pub dry: bool,

    /// Answers yes to every confirmation prompt (for scripting).
    #[arg(short = 'y', long = "yes")]
    pub yes: bool,

    /// Console log level (0=silent, 1=errors, 2=warnings, 3=info, 4=debug, 5=trace, 6=dump).
    #[arg(short = 'l', long = "log-level", value_name = "LEVEL", value_parser = clap::value_parser!(u8).range(0..=6)
    )]
    pub log_level: Option<u8>,

    /// File log level, overrides --log-level for the log file.
    #[arg(long = "file-log-level", value_name = "LEVEL", value_parser = clap::value_parser!(u8).range(0..=6)
    )]
    pub file_log_level: Option<u8>,

    /// Path to log file.
    #[arg(long = "log-file", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Device data partition (will contain openpilot/, params/, forks/).
    #[arg(short = 'd', long = "data-root", value_name = "DIR")]
    pub data_root: Option<PathBuf>,

    /// Disables auto loading of config files, only uses --ini.
    #[arg(long = "no-default-inis")]
    pub no_default_inis: bool,
}

impl GlobalOptions {
    /// Converts command-line options to configuration overrides as dotted
    /// `(key, value)` pairs.
    #[must_use]
    pub fn to_config_overrides(&self) -> Vec<(String, String)> {
        let mut overrides = Vec::new();

        if let Some(level) = self.log_level {
            overrides.push(("global.output_log_level".to_string(), level.to_string()));
        }

        // file_log_level falls back to log_level if not specified
        if let Some(level) = self.file_log_level.or(self.log_level) {
            overrides.push(("global.file_log_level".to_string(), level.to_string()));
        }

        if let Some(path) = &self.log_file {
            overrides.push(("global.log_file".to_string(), path.display().to_string()));
        }

        if self.dry {
            overrides.push(("global.dry".to_string(), "true".to_string()));
        }

        if self.yes {
            overrides.push(("global.assume_yes".to_string(), "true".to_string()));
        }

        if let Some(root) = &self.data_root {
            overrides.push(("paths.data_root".to_string(), root.display().to_string()));
        }

        overrides
    }
}
