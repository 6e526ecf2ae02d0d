// forkswap: openpilot Fork Swap Manager
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Shared utility modules.

pub mod fs;
