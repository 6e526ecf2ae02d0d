// forkswap: openpilot Fork Swap Manager
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Filesystem utilities.
//!
//! ```text
//! copy:  copy_dir_contents()        recursive merge/overwrite copy
//! move:  move_dir()                 rename, destination must not exist
//! clean: remove_dir_all_if_exists() tolerant recursive delete
//! ```

pub mod copy;

pub use copy::{copy_dir_contents, move_dir, remove_dir_all_if_exists};

#[cfg(test)]
mod tests;
