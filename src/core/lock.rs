// forkswap: openpilot Fork Swap Manager
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Single-instance lock.
//!
//! ```text
//! InstanceLock::acquire(path)
//!   create_new + pid
//!     exists? read pid
//!       pid dead  -> reclaim stale lock, retry
//!       pid alive -> LockError::Held
//! Drop -> remove lock file
//! ```
//!
//! Concurrent managers racing over the live working copy and the archive
//! tree would corrupt both; the lock is acquired before any mutation and
//! released on every exit path through `Drop`. A crash leaves the file
//! behind, which the next run reclaims once the recorded pid is gone.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{LockError, SwapResult};

/// Held instance lock; the file is removed when this is dropped.
#[derive(Debug)]
pub struct InstanceLock {
    path: PathBuf,
}

impl InstanceLock {
    /// Acquire the lock, reclaiming it if the previous holder is dead.
    ///
    /// # Errors
    ///
    /// Returns [`LockError::Held`] when another live process holds the lock,
    /// [`LockError::Corrupt`] when the lock file content is not a pid, and
    /// [`LockError::Io`] for filesystem failures.
    pub fn acquire(path: &Path) -> SwapResult<Self> {
        let io_err = |source: std::io::Error| LockError::Io {
            path: path.display().to_string(),
            source,
        };

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }

        // One reclaim attempt: if the holder pid is dead, remove and retry.
        for reclaimed in [false, true] {
            match std::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(path)
            {
                Ok(file) => {
                    use std::io::Write;
                    let mut file = file;
                    write!(file, "{}", std::process::id()).map_err(io_err)?;
                    debug!(path = %path.display(), "instance lock acquired");
                    return Ok(Self {
                        path: path.to_path_buf(),
                    });
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists && !reclaimed => {
                    let content = std::fs::read_to_string(path).map_err(io_err)?;
                    let pid: u32 =
                        content
                            .trim()
                            .parse()
                            .map_err(|_| LockError::Corrupt {
                                path: path.display().to_string(),
                                content: content.clone(),
                            })?;

                    if process_alive(pid) {
                        return Err(LockError::Held {
                            pid,
                            path: path.display().to_string(),
                        }
                        .into());
                    }

                    warn!(pid, path = %path.display(), "reclaiming stale instance lock");
                    std::fs::remove_file(path).map_err(io_err)?;
                }
                Err(e) => return Err(io_err(e).into()),
            }
        }

        // Lost the reclaim race to another starting instance.
        Err(LockError::Held {
            pid: 0,
            path: path.display().to_string(),
        }
        .into())
    }

    /// The lock file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for InstanceLock {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            warn!(path = %self.path.display(), error = %e, "failed to remove instance lock");
        } else {
            debug!(path = %self.path.display(), "instance lock released");
        }
    }
}

/// Whether a process with the given pid is currently running.
#[cfg(target_os = "linux")]
fn process_alive(pid: u32) -> bool {
    Path::new("/proc").join(pid.to_string()).exists()
}

/// Without procfs the holder cannot be probed; assume it is alive.
#[cfg(not(target_os = "linux"))]
fn process_alive(_pid: u32) -> bool {
    true
}

#[cfg(test)]
mod tests;
