// forkswap: openpilot Fork Swap Manager
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{Config, PathsConfig};
use crate::logging::LogLevel;
use std::path::{Path, PathBuf};

#[test]
fn test_default_config() {
    let config = Config::default();
    assert!(!config.global.dry);
    assert_eq!(config.global.output_log_level, LogLevel::INFO);
    assert_eq!(config.git.host, "github.com");
    assert_eq!(config.git.clone_retries, 3);
    assert_eq!(config.git.retry_delay_secs, 2);
    assert_eq!(config.device.owner, "comma");
    assert_eq!(config.paths.data_root, PathBuf::from("/data"));
}

#[test]
fn test_paths_resolve_defaults() {
    let mut paths = PathsConfig {
        data_root: PathBuf::from("/test/data"),
        ..Default::default()
    };

    paths.resolve().unwrap();

    assert_eq!(paths.live().unwrap(), Path::new("/test/data/openpilot"));
    assert_eq!(paths.params().unwrap(), Path::new("/test/data/params"));
    assert_eq!(paths.forks_root().unwrap(), Path::new("/test/data/forks"));
    assert_eq!(
        paths.current_fork_file().unwrap(),
        PathBuf::from("/test/data/forks/current_fork.txt")
    );
    assert_eq!(
        paths.journal_file().unwrap(),
        PathBuf::from("/test/data/forks/.journal.json")
    );
}

#[test]
fn test_paths_resolve_relative_against_root() {
    let mut paths = PathsConfig {
        data_root: PathBuf::from("/d"),
        live: Some(PathBuf::from("op")),
        forks_root: Some(PathBuf::from("/elsewhere/forks")),
        ..Default::default()
    };

    paths.resolve().unwrap();

    assert_eq!(paths.live().unwrap(), Path::new("/d/op"));
    assert_eq!(paths.forks_root().unwrap(), Path::new("/elsewhere/forks"));
}

#[test]
fn test_paths_empty_data_root_rejected() {
    let mut paths = PathsConfig {
        data_root: PathBuf::new(),
        ..Default::default()
    };
    assert!(paths.resolve().is_err());
}

#[test]
fn test_config_parse() {
    let toml = r#"
[global]
dry = true
output_log_level = 4

[git]
host = "gitlab.com"
clone_retries = 5

[paths]
data_root = "/tmp/dev"
"#;

    let config = Config::parse(toml).unwrap();
    assert!(config.global.dry);
    assert_eq!(config.global.output_log_level, LogLevel::DEBUG);
    assert_eq!(config.git.host, "gitlab.com");
    assert_eq!(config.git.clone_retries, 5);
    // parse() resolves paths as part of build()
    assert_eq!(config.paths.live().unwrap(), Path::new("/tmp/dev/openpilot"));
}

#[test]
fn test_config_rejects_unknown_keys() {
    let toml = r#"
[git]
hots = "typo"
"#;
    assert!(Config::parse(toml).is_err());
}

#[test]
fn test_config_layering_later_wins() {
    let config = Config::builder()
        .add_toml_str("[global]\ndry = false\n[git]\nremote = \"origin\"")
        .add_toml_str("[global]\ndry = true")
        .build()
        .unwrap();

    assert!(config.global.dry);
    assert_eq!(config.git.remote, "origin");
}

#[test]
fn test_format_options_sorted_and_complete() {
    let mut config = Config::default();
    config.resolve_and_validate().unwrap();

    let options = config.format_options();
    assert!(options.iter().any(|o| o.starts_with("git.host")));
    assert!(options.iter().any(|o| o.starts_with("paths.live")));

    let mut sorted = options.clone();
    sorted.sort();
    assert_eq!(options, sorted);
}
