// forkswap: openpilot Fork Swap Manager
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration tests for CLI parsing and the CLI-to-config bridge.

use clap::Parser;
use forkswap::cli::{Cli, Command};
use forkswap::config::Config;
use forkswap::logging::LogLevel;

#[test]
fn cli_overrides_reach_the_config() {
    let cli = Cli::try_parse_from([
        "forkswap",
        "--dry",
        "--yes",
        "-l",
        "5",
        "-d",
        "/tmp/somewhere",
        "status",
    ])
    .unwrap();

    let mut loader = Config::builder();
    for (key, value) in cli.global.to_config_overrides() {
        loader = loader.set(&key, value).unwrap();
    }
    let config = loader.build().unwrap();

    assert!(config.global.dry);
    assert!(config.global.assume_yes);
    assert_eq!(config.global.output_log_level, LogLevel::TRACE);
    assert_eq!(config.global.file_log_level, LogLevel::TRACE);
    assert_eq!(
        config.paths.data_root,
        std::path::PathBuf::from("/tmp/somewhere")
    );
    assert_eq!(
        config.paths.live().unwrap(),
        std::path::Path::new("/tmp/somewhere/openpilot")
    );
}

#[test]
fn ini_file_layers_under_cli_flags() {
    let temp = tempfile::tempdir().unwrap();
    let ini = temp.path().join("forkswap.toml");
    std::fs::write(
        &ini,
        "[global]\noutput_log_level = 1\n\n[git]\nhost = \"example.com\"\n",
    )
    .unwrap();

    let cli = Cli::try_parse_from([
        "forkswap",
        "--ini",
        ini.to_str().unwrap(),
        "-l",
        "4",
        "status",
    ])
    .unwrap();

    let mut loader = Config::builder();
    for path in &cli.global.inis {
        loader = loader.add_toml_file(path);
    }
    for (key, value) in cli.global.to_config_overrides() {
        loader = loader.set(&key, value).unwrap();
    }
    let config = loader.build().unwrap();

    // CLI flag beats the ini file; untouched ini values survive.
    assert_eq!(config.global.output_log_level, LogLevel::DEBUG);
    assert_eq!(config.git.host, "example.com");
}

#[test]
fn every_menu_operation_has_a_subcommand() {
    for args in [
        vec!["forkswap", "status"],
        vec!["forkswap", "switch", "x"],
        vec!["forkswap", "clone", "x", "https://github.com/a/b.git"],
        vec!["forkswap", "delete", "x"],
        vec!["forkswap", "update", "x"],
        vec!["forkswap", "self-update"],
        vec!["forkswap", "options"],
        vec!["forkswap", "inis"],
        vec!["forkswap", "version"],
    ] {
        assert!(
            Cli::try_parse_from(args.iter().copied()).is_ok(),
            "failed to parse {args:?}"
        );
    }
}

#[test]
fn bare_invocation_is_the_menu() {
    let cli = Cli::try_parse_from(["forkswap"]).unwrap();
    assert!(cli.command.is_none());
}

#[test]
fn unknown_subcommand_is_rejected() {
    assert!(Cli::try_parse_from(["forkswap", "frobnicate"]).is_err());
}

#[test]
fn clone_requires_name_and_url() {
    assert!(Cli::try_parse_from(["forkswap", "clone", "only-name"]).is_err());
}

#[test]
fn version_alias_matches() {
    let cli = Cli::try_parse_from(["forkswap", "version"]).unwrap();
    assert!(matches!(cli.command, Some(Command::Version)));
}
