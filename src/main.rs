// forkswap: openpilot Fork Swap Manager
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Entry point.
//!
//! ```text
//! cli::parse() --> Config --> Logging --> Command Dispatch
//!   Menu | Status | Switch | Clone | Delete | Update | SelfUpdate
//!   mutating commands: git check -> root check -> instance lock
//!                      -> journal recovery -> ctrl-c cleanup hook
//! ```

use std::process::ExitCode;
use std::sync::Arc;

use forkswap::cli::global::GlobalOptions;
use forkswap::cli::{self, Command};
use forkswap::cmd::clone::run_clone_command;
use forkswap::cmd::config::{run_inis_command, run_options_command};
use forkswap::cmd::delete::run_delete_command;
use forkswap::cmd::menu::run_menu_command;
use forkswap::cmd::self_update::run_self_update_command;
use forkswap::cmd::status::run_status_command;
use forkswap::cmd::switch::run_switch_command;
use forkswap::cmd::update::run_update_command;
use forkswap::config::Config;
use forkswap::config::loader::ConfigLoader;
use forkswap::core::device;
use forkswap::core::lock::InstanceLock;
use forkswap::error::{Result, bail_out};
use forkswap::fork::rollback;
use forkswap::logging::{LogConfig, init_logging};

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::parse();

    let config = match load_config(&cli.global) {
        Ok(config) => Arc::new(config),
        Err(_) => return ExitCode::FAILURE,
    };

    let log_config = build_log_config(&config);
    let _log_guard = match init_logging(&log_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            return ExitCode::FAILURE;
        }
    };

    dispatch_command(&cli, &config).await
}

fn build_log_config(config: &Config) -> LogConfig {
    LogConfig::builder()
        .with_console_level(config.global.output_log_level)
        .with_file_level(config.global.file_log_level)
        .with_log_file(config.global.log_file.display().to_string())
        .with_max_log_bytes(config.global.log_max_bytes)
        .build()
}

async fn dispatch_command(cli: &cli::Cli, config: &Arc<Config>) -> ExitCode {
    let result = match &cli.command {
        Some(Command::Version) => {
            handle_version_command();
            Ok(())
        }
        Some(Command::Options) => {
            run_options_command(config);
            Ok(())
        }
        Some(Command::Inis) => {
            let loader = build_config_loader(&cli.global);
            run_inis_command(&loader.format_loaded_files());
            Ok(())
        }
        Some(Command::Status) => run_status_command(config),
        Some(Command::Switch(args)) => match preflight(config) {
            Ok(_lock) => run_switch_command(&args.name, config),
            Err(e) => Err(e),
        },
        Some(Command::Clone(args)) => match preflight(config) {
            Ok(_lock) => run_clone_command(&args.name, &args.url, args.branch.as_deref(), config)
                .await,
            Err(e) => Err(e),
        },
        Some(Command::Delete(args)) => match preflight(config) {
            Ok(_lock) => run_delete_command(&args.name, config),
            Err(e) => Err(e),
        },
        Some(Command::Update(args)) => match preflight(config) {
            Ok(_lock) => run_update_command(&args.name, config),
            Err(e) => Err(e),
        },
        Some(Command::SelfUpdate) => match preflight(config) {
            Ok(_lock) => run_self_update_command(config),
            Err(e) => Err(e),
        },
        None => match preflight(config) {
            Ok(_lock) => run_menu_command(config).await,
            Err(e) => Err(e),
        },
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn handle_version_command() {
    println!("{}", env!("CARGO_PKG_VERSION"));
}

/// Checks and acquisitions every mutating command needs: git on PATH, root
/// privileges, the instance lock, recovery of an interrupted run, and the
/// ctrl-c cleanup hook.
///
/// The returned lock must be held for the duration of the command.
fn preflight(config: &Arc<Config>) -> Result<InstanceLock> {
    which::which("git").map_err(|_| bail_out("git not found in PATH"))?;

    if config.device.require_root && !device::is_root() {
        return Err(bail_out("forkswap must run as root (set device.require_root = false to override)").into());
    }

    let lock = InstanceLock::acquire(&config.paths.lock_file()?)?;

    rollback::recover_if_needed(config)?;

    spawn_interrupt_handler(Arc::clone(config), lock.path().to_path_buf());

    Ok(lock)
}

/// Runs the cleanup procedure and exits when the user interrupts a run.
///
/// The lock file is removed here because `Drop` does not run across
/// `process::exit`.
fn spawn_interrupt_handler(config: Arc<Config>, lock_path: std::path::PathBuf) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupt received; running cleanup");
            rollback::cleanup(&config);
            let _ = std::fs::remove_file(&lock_path);
            std::process::exit(130);
        }
    });
}

fn build_config_loader(global: &GlobalOptions) -> ConfigLoader {
    let mut loader = ConfigLoader::new();
    if !global.no_default_inis {
        loader = loader
            .add_toml_file_optional("/data/forkswap.toml")
            .add_toml_file_optional("forkswap.toml");
    }
    for ini_path in &global.inis {
        loader = loader.add_toml_file(ini_path);
    }
    loader.with_env_prefix("FORKSWAP")
}

fn load_config(global: &GlobalOptions) -> Result<Config> {
    let mut loader = build_config_loader(global);
    for (key, value) in global.to_config_overrides() {
        loader = loader.set(&key, value)?;
    }
    loader.build().map_err(|e| {
        eprintln!("Failed to load config: {e}");
        e
    })
}
