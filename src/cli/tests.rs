// forkswap: openpilot Fork Swap Manager
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use crate::cli::{Cli, Command};
use clap::Parser;

#[test]
fn test_parse_no_command_is_menu() {
    let cli = Cli::try_parse_from(["forkswap"]).unwrap();
    assert!(cli.command.is_none());
}

#[test]
fn test_parse_version() {
    let cli = Cli::try_parse_from(["forkswap", "version"]).unwrap();
    assert!(matches!(cli.command, Some(Command::Version)));
}

#[test]
fn test_parse_global_options() {
    let cli =
        Cli::try_parse_from(["forkswap", "-l", "5", "-d", "/tmp/data", "--dry", "status"]).unwrap();
    assert_eq!(cli.global.log_level, Some(5));
    assert_eq!(
        cli.global.data_root.as_deref(),
        Some(std::path::Path::new("/tmp/data"))
    );
    assert!(cli.global.dry);
    assert!(matches!(cli.command, Some(Command::Status)));
}

#[test]
fn test_parse_switch() {
    let cli = Cli::try_parse_from(["forkswap", "switch", "dragonpilot"]).unwrap();
    match cli.command {
        Some(Command::Switch(args)) => assert_eq!(args.name, "dragonpilot"),
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn test_parse_clone_with_branch() {
    let cli = Cli::try_parse_from([
        "forkswap",
        "clone",
        "sunnypilot",
        "https://github.com/sunnyhaibin/sunnypilot.git",
        "-b",
        "staging",
    ])
    .unwrap();
    match cli.command {
        Some(Command::Clone(args)) => {
            assert_eq!(args.name, "sunnypilot");
            assert_eq!(args.url, "https://github.com/sunnyhaibin/sunnypilot.git");
            assert_eq!(args.branch.as_deref(), Some("staging"));
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn test_parse_self_update() {
    let cli = Cli::try_parse_from(["forkswap", "self-update"]).unwrap();
    assert!(matches!(cli.command, Some(Command::SelfUpdate)));
}

#[test]
fn test_config_overrides_from_flags() {
    let cli = Cli::try_parse_from(["forkswap", "-l", "4", "--yes", "status"]).unwrap();
    let overrides = cli.global.to_config_overrides();

    assert!(overrides.contains(&("global.output_log_level".to_string(), "4".to_string())));
    // file_log_level falls back to log_level
    assert!(overrides.contains(&("global.file_log_level".to_string(), "4".to_string())));
    assert!(overrides.contains(&("global.assume_yes".to_string(), "true".to_string())));
}
