// forkswap: openpilot Fork Swap Manager
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Device integration: privileges, ownership, disk space, reboot.
//!
//! ```text
//! is_root()         id -u == 0
//! chown_recursive() chown -R owner:group
//! make_executable() mode 0755 (unix)
//! disk_usage()      df -h <path>
//! reboot()          OS reboot command, ends the process
//! ```
//!
//! Everything here shells out to the commands the device ships; the manager
//! itself never talks to the kernel directly for these concerns.

use std::path::Path;
use std::process::Command;

use tracing::{debug, info, warn};

use crate::config::types::DeviceConfig;
use crate::error::{ProcessError, Result, SwapResult};

fn run_command(program: &str, args: &[&str]) -> SwapResult<String> {
    let output = Command::new(program)
        .args(args)
        .output()
        .map_err(|e| ProcessError::SpawnFailed {
            command: program.to_string(),
            source: e,
        })?;

    if !output.status.success() {
        return Err(ProcessError::NonZeroExit {
            command: format!("{program} {}", args.join(" ")),
            code: output.status.code().unwrap_or(-1),
        }
        .into());
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Whether the process runs with root privileges.
///
/// Probed through `id -u`; a probe failure counts as not-root.
#[must_use]
pub fn is_root() -> bool {
    run_command("id", &["-u"]).map(|uid| uid == "0").unwrap_or(false)
}

/// Recursively chown a path to the device user.
///
/// # Errors
///
/// Returns an error if the chown command fails.
pub fn chown_recursive(path: &Path, device: &DeviceConfig, dry: bool) -> Result<()> {
    let spec = format!("{}:{}", device.owner, device.group);
    if dry {
        debug!(path = %path.display(), owner = %spec, "would chown");
        return Ok(());
    }
    let path_str = path.to_str().ok_or_else(|| ProcessError::OutputError {
        command: "chown".to_string(),
        message: "invalid path".to_string(),
    })?;
    run_command("chown", &["-R", &spec, path_str])?;
    debug!(path = %path.display(), owner = %spec, "ownership applied");
    Ok(())
}

/// Set the execute bit on a file (mode 0755).
///
/// # Errors
///
/// Returns an error if the file metadata cannot be read or changed.
#[cfg(unix)]
pub fn make_executable(path: &Path, dry: bool) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    if dry {
        debug!(path = %path.display(), "would set execute permission");
        return Ok(());
    }
    let mut perms = std::fs::metadata(path)?.permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(path, perms)?;
    debug!(path = %path.display(), "execute permission applied");
    Ok(())
}

/// Set the execute bit on a file (no-op off unix).
///
/// # Errors
///
/// Never fails on this platform.
#[cfg(not(unix))]
pub fn make_executable(path: &Path, _dry: bool) -> Result<()> {
    debug!(path = %path.display(), "execute permission not applicable");
    Ok(())
}

/// Free-space summary of the filesystem holding `path`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiskUsage {
    pub size: String,
    pub used: String,
    pub available: String,
    pub use_percent: String,
}

impl std::fmt::Display for DiskUsage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} used / {} ({}), {} free",
            self.used, self.size, self.use_percent, self.available
        )
    }
}

/// Query disk usage for the filesystem holding `path` via `df -h`.
///
/// # Errors
///
/// Returns an error if `df` fails or prints something unparseable.
pub fn disk_usage(path: &Path) -> Result<DiskUsage> {
    let path_str = path.to_str().ok_or_else(|| ProcessError::OutputError {
        command: "df".to_string(),
        message: "invalid path".to_string(),
    })?;
    let output = run_command("df", &["-h", path_str])?;

    // Header line, then one line per filesystem:
    // Filesystem  Size  Used  Avail  Use%  Mounted on
    let line = output.lines().nth(1).ok_or_else(|| ProcessError::OutputError {
        command: "df".to_string(),
        message: "missing data line".to_string(),
    })?;
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < 5 {
        return Err(ProcessError::OutputError {
            command: "df".to_string(),
            message: format!("unexpected output: {line}"),
        }
        .into());
    }

    Ok(DiskUsage {
        size: fields[1].to_string(),
        used: fields[2].to_string(),
        available: fields[3].to_string(),
        use_percent: fields[4].to_string(),
    })
}

/// Reboot the device. On success this does not return control to the menu.
///
/// # Errors
///
/// Returns an error if the reboot command cannot be spawned or exits
/// non-zero.
pub fn reboot(device: &DeviceConfig, dry: bool) -> Result<()> {
    if dry {
        info!(command = %device.reboot_command, "dry run: skipping reboot");
        return Ok(());
    }
    if !device.reboot {
        warn!("reboot disabled by config; changes take effect after a manual restart");
        return Ok(());
    }
    info!(command = %device.reboot_command, "rebooting device");
    run_command(&device.reboot_command, &[])?;
    Ok(())
}
