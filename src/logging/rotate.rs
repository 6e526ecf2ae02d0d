// forkswap: openpilot Fork Swap Manager
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Size-based log rotation.
//!
//! ```text
//! RotatingFileWriter::open(path, max)
//!        |
//!        v
//!   write() ... written >= max?
//!        |            |
//!        |            v
//!        |     forkswap.log --> forkswap.log.old (replaces previous .old)
//!        |     fresh forkswap.log, first line = ROTATION_MARKER
//!        v
//!   append entry
//! ```

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Default rotation threshold: 1 MiB.
pub const DEFAULT_MAX_LOG_BYTES: u64 = 1024 * 1024;

/// First line of every freshly rotated log file.
pub const ROTATION_MARKER: &str = "---- log rotated, previous log moved to .old ----";

/// An append-only log file that renames itself to a `.old` sibling and
/// starts over once it reaches `max_bytes`.
///
/// Rotation happens before the write that would exceed the threshold, so a
/// single entry is never split across files. A previous `.old` sibling is
/// replaced, not appended to.
pub struct RotatingFileWriter {
    path: PathBuf,
    old_path: PathBuf,
    max_bytes: u64,
    file: File,
    written: u64,
}

impl RotatingFileWriter {
    /// Open (or create) the log file at `path`, rotating at `max_bytes`.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be created or the
    /// file cannot be opened for appending.
    pub fn open(path: impl AsRef<Path>, max_bytes: u64) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let written = file.metadata()?.len();

        let mut old_path = path.clone().into_os_string();
        old_path.push(".old");

        Ok(Self {
            path,
            old_path: PathBuf::from(old_path),
            max_bytes,
            file,
            written,
        })
    }

    /// Current size of the active log file in bytes.
    #[must_use]
    pub const fn written(&self) -> u64 {
        self.written
    }

    /// Path of the `.old` sibling the active file rotates to.
    #[must_use]
    pub fn old_path(&self) -> &Path {
        &self.old_path
    }

    fn rotate(&mut self) -> io::Result<()> {
        self.file.flush()?;

        if self.old_path.exists() {
            std::fs::remove_file(&self.old_path)?;
        }
        std::fs::rename(&self.path, &self.old_path)?;

        self.file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        self.written = 0;

        let marker = format!("{ROTATION_MARKER}\n");
        self.file.write_all(marker.as_bytes())?;
        self.written += marker.len() as u64;
        Ok(())
    }
}

impl Write for RotatingFileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.written >= self.max_bytes {
            self.rotate()?;
        }
        let n = self.file.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}
