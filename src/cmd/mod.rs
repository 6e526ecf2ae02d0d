// forkswap: openpilot Fork Swap Manager
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Command implementations.
//!
//! ```text
//! CLI args --> cmd::run_* handlers
//!   menu, status, switch, clone, delete, update, self_update, config
//! ```

pub mod clone;
pub mod config;
pub mod delete;
pub mod menu;
pub mod self_update;
pub mod status;
pub mod switch;
pub mod update;
