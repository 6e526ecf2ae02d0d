// forkswap: openpilot Fork Swap Manager
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration management for forkswap.
//!
//! # Configuration Hierarchy
//!
//! ```text
//! Priority (low → high)
//! 1. defaults
//! 2. /data/forkswap.toml (device)
//! 3. forkswap.toml (cwd)
//! 4. --ini
//! 5. FORKSWAP_* env vars
//! 6. CLI overrides
//! ```
//!
//! # Environment Variable Mapping
//!
//! ```text
//! FORKSWAP_GLOBAL_DRY=true      → global.dry = true
//! FORKSWAP_GIT_HOST=github.com  → git.host = "github.com"
//! FORKSWAP_GIT_REMOTE=origin    → git.remote = "origin"
//! ```

pub mod loader;
pub mod paths;
pub mod types;

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::Result;

use loader::ConfigLoader;
use paths::PathsConfig;
use types::{DeviceConfig, GitConfig, GlobalConfig};

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Global options.
    pub global: GlobalConfig,
    /// Git settings.
    pub git: GitConfig,
    /// Device integration settings.
    pub device: DeviceConfig,
    /// Paths configuration.
    pub paths: PathsConfig,
}

impl Config {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use forkswap::config::Config;
    ///
    /// let config = Config::builder()
    ///     .add_toml_file_optional("/data/forkswap.toml")
    ///     .with_env_prefix("FORKSWAP")
    ///     .build()?;
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    #[must_use]
    pub fn builder() -> ConfigLoader {
        ConfigLoader::new()
    }

    /// Load configuration from a single TOML file (simple API).
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, contains invalid TOML, or
    /// does not match the `Config` structure.
    pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        Self::builder().add_toml_file(path).build()
    }

    /// Load configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not valid TOML or does not match the
    /// `Config` structure.
    pub fn parse(content: &str) -> Result<Self> {
        Self::builder().add_toml_str(content).build()
    }

    /// Resolve all paths and validate configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if path resolution fails (e.g. empty `data_root`).
    pub fn resolve_and_validate(&mut self) -> Result<()> {
        self.paths.resolve()?;
        Ok(())
    }

    /// Format configuration options for display.
    ///
    /// Returns a vector of formatted strings representing all configuration
    /// options, deterministically ordered using `BTreeMap`.
    #[must_use]
    pub fn format_options(&self) -> Vec<String> {
        let mut options = BTreeMap::new();
        self.format_global_options(&mut options);
        self.format_git_options(&mut options);
        self.format_device_options(&mut options);
        self.format_paths_options(&mut options);

        let max_key_len = options.keys().map(String::len).max().unwrap_or(0);

        options
            .into_iter()
            .map(|(key, value)| format!("{key:<max_key_len$} = {value}"))
            .collect()
    }

    fn format_global_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert("global.dry".into(), self.global.dry.to_string());
        options.insert(
            "global.assume_yes".into(),
            self.global.assume_yes.to_string(),
        );
        options.insert(
            "global.output_log_level".into(),
            self.global.output_log_level.as_u8().to_string(),
        );
        options.insert(
            "global.file_log_level".into(),
            self.global.file_log_level.as_u8().to_string(),
        );
        options.insert(
            "global.log_file".into(),
            self.global.log_file.display().to_string(),
        );
        options.insert(
            "global.log_max_bytes".into(),
            self.global.log_max_bytes.to_string(),
        );
        options.insert(
            "global.menu_update_checks".into(),
            self.global.menu_update_checks.to_string(),
        );
    }

    fn format_git_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert("git.host".into(), self.git.host.clone());
        options.insert("git.remote".into(), self.git.remote.clone());
        options.insert("git.shallow".into(), self.git.shallow.to_string());
        options.insert(
            "git.clone_retries".into(),
            self.git.clone_retries.to_string(),
        );
        options.insert(
            "git.retry_delay_secs".into(),
            self.git.retry_delay_secs.to_string(),
        );
        options.insert("git.upstream_url".into(), self.git.upstream_url.clone());
        options.insert(
            "git.upstream_branch".into(),
            self.git.upstream_branch.clone(),
        );
        options.insert("git.upstream_bin".into(), self.git.upstream_bin.clone());
    }

    fn format_device_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert("device.owner".into(), self.device.owner.clone());
        options.insert("device.group".into(), self.device.group.clone());
        options.insert(
            "device.require_root".into(),
            self.device.require_root.to_string(),
        );
        options.insert("device.reboot".into(), self.device.reboot.to_string());
        options.insert(
            "device.reboot_command".into(),
            self.device.reboot_command.clone(),
        );
    }

    fn format_paths_options(&self, options: &mut BTreeMap<String, String>) {
        let fmt = |p: &Option<std::path::PathBuf>| {
            p.as_ref()
                .map_or_else(String::new, |p| p.display().to_string())
        };

        options.insert(
            "paths.data_root".into(),
            self.paths.data_root.display().to_string(),
        );
        options.insert("paths.live".into(), fmt(&self.paths.live));
        options.insert("paths.params".into(), fmt(&self.paths.params));
        options.insert("paths.forks_root".into(), fmt(&self.paths.forks_root));
        options.insert("paths.manager".into(), fmt(&self.paths.manager));
    }
}
