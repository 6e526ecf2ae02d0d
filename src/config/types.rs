// forkswap: openpilot Fork Swap Manager
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration types for forkswap.
//!
//! ```text
//! Config: GlobalConfig, GitConfig, DeviceConfig, PathsConfig
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::logging::{DEFAULT_MAX_LOG_BYTES, LogLevel};

/// Global configuration options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalConfig {
    /// Simulate filesystem operations without making changes.
    pub dry: bool,
    /// Answer yes to every confirmation prompt.
    pub assume_yes: bool,
    /// Log level for stdout output (0-6).
    pub output_log_level: LogLevel,
    /// Log level for file output (0-6).
    pub file_log_level: LogLevel,
    /// Path to log file.
    pub log_file: PathBuf,
    /// Rotate the log file once it reaches this many bytes.
    pub log_max_bytes: u64,
    /// Fetch every fork while rendering the menu to annotate
    /// "(update available)". Costs one network round-trip per fork.
    pub menu_update_checks: bool,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            dry: false,
            assume_yes: false,
            output_log_level: LogLevel::INFO,
            file_log_level: LogLevel::TRACE,
            log_file: PathBuf::from("/data/forkswap.log"),
            log_max_bytes: DEFAULT_MAX_LOG_BYTES,
            menu_update_checks: true,
        }
    }
}

/// Git settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GitConfig {
    /// Host every fork URL must live on.
    pub host: String,
    /// Remote name used for fetch/pull.
    pub remote: String,
    /// Use shallow clones (--depth 1).
    pub shallow: bool,
    /// Number of clone attempts before giving up.
    pub clone_retries: u32,
    /// Seconds to wait between clone attempts.
    pub retry_delay_secs: u64,
    /// Repository that hosts this manager, for self-update.
    pub upstream_url: String,
    /// Branch of the upstream manager repository.
    pub upstream_branch: String,
    /// Path of the manager binary inside the upstream repository.
    pub upstream_bin: String,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            host: "github.com".to_string(),
            remote: "origin".to_string(),
            shallow: false,
            clone_retries: 3,
            retry_delay_secs: 2,
            upstream_url: "https://github.com/romeoahmed/forkswap.git".to_string(),
            upstream_branch: "master".to_string(),
            upstream_bin: "bin/forkswap".to_string(),
        }
    }
}

/// Device integration settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeviceConfig {
    /// User that must own the live working copy.
    pub owner: String,
    /// Group that must own the live working copy.
    pub group: String,
    /// Refuse to run without root privileges.
    pub require_root: bool,
    /// Reboot after a completed switch or clone.
    pub reboot: bool,
    /// Command used to reboot the device.
    pub reboot_command: String,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            owner: "comma".to_string(),
            group: "comma".to_string(),
            require_root: true,
            reboot: true,
            reboot_command: "reboot".to_string(),
        }
    }
}
