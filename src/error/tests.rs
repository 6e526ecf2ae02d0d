// forkswap: openpilot Fork Swap Manager
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{ConfigError, SwapError, SwapResult, ValidationError, bail_out};

#[test]
fn test_config_error_display() {
    let err = ConfigError::MissingKey {
        section: "paths".to_string(),
        key: "data_root".to_string(),
    };
    insta::assert_snapshot!(
        err.to_string(),
        @"missing required config key 'data_root' in section '[paths]'"
    );
}

#[test]
fn test_validation_error_display() {
    let err = ValidationError::UnknownFork("dragonpilot".to_string());
    insta::assert_snapshot!(err.to_string(), @"fork 'dragonpilot' does not exist");
}

#[test]
fn test_swap_error_size() {
    // Box<str> variants (Bailed, Other) are 16 bytes (fat pointer: ptr + len)
    // With discriminant + alignment = 24 bytes
    let size = std::mem::size_of::<SwapError>();
    assert!(size <= 24, "SwapError is {size} bytes, expected <= 24");
}

#[test]
fn test_swap_result_size() {
    let size = std::mem::size_of::<SwapResult<()>>();
    assert!(size <= 24, "SwapResult<()> is {size} bytes, expected <= 24");
}

#[test]
fn test_bailed_is_fatal() {
    assert!(bail_out("no privileges").is_fatal());
    let err: SwapError = ValidationError::UnknownFork("x".to_string()).into();
    assert!(!err.is_fatal());
}
