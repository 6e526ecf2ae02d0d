// forkswap: openpilot Fork Swap Manager
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! The fork swap state machine.
//!
//! ```text
//! State = (active fork, archived forks, live copy, live config)
//!
//! Switch(target)                  Clone(name, url)
//!   backup_config                   clone_repo (3 attempts, 2 s apart)
//!   archive_live                    set_ownership
//!   materialize_live                backup_config
//!   write_pointer                   archive_live
//!   restore_config                  materialize_live
//!   apply_permissions               write_pointer
//!   reboot                          apply_permissions
//!                                   reboot
//! ```
//!
//! Steps are sequential and individually fault-logged, not atomic: a failed
//! step is recorded in the journal and the sequence continues. Only clone
//! retry exhaustion aborts, after invoking the rollback procedure.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, info, warn};

use super::archive::ArchiveLayout;
use super::journal::{Operation, Step, SwapJournal};
use super::rollback;
use super::store::ActiveForkStore;
use super::{Fork, ForkName, RepoUrl};
use crate::config::Config;
use crate::core::device;
use crate::error::{Result, ValidationError, bail_out};
use crate::git::cmd as git;
use crate::utility::fs::{copy_dir_contents, move_dir, remove_dir_all_if_exists};

/// Owns the live working copy, the archive tree, and the active-fork
/// pointer, and drives every state transition between them.
pub struct SwapManager {
    config: Arc<Config>,
    store: ActiveForkStore,
    archive: ArchiveLayout,
    live: PathBuf,
    params: PathBuf,
    journal_path: PathBuf,
    dry: bool,
}

impl SwapManager {
    /// Build a manager from resolved configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration paths are not resolved.
    pub fn new(config: Arc<Config>) -> Result<Self> {
        let store = ActiveForkStore::new(config.paths.current_fork_file()?);
        let archive = ArchiveLayout::new(config.paths.forks_root()?.to_path_buf());
        let live = config.paths.live()?.to_path_buf();
        let params = config.paths.params()?.to_path_buf();
        let journal_path = config.paths.journal_file()?;
        let dry = config.global.dry;
        Ok(Self {
            config,
            store,
            archive,
            live,
            params,
            journal_path,
            dry,
        })
    }

    /// The active-fork pointer store.
    #[must_use]
    pub const fn store(&self) -> &ActiveForkStore {
        &self.store
    }

    /// The archive layout.
    #[must_use]
    pub const fn archive(&self) -> &ArchiveLayout {
        &self.archive
    }

    /// The device data partition root.
    #[must_use]
    pub fn data_root(&self) -> &std::path::Path {
        &self.config.paths.data_root
    }

    /// Name of the currently active fork.
    ///
    /// # Errors
    ///
    /// Returns an error if the pointer file cannot be read.
    pub fn active(&self) -> Result<Option<ForkName>> {
        self.store.get()
    }

    /// Archived forks, sorted by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the forks root cannot be read.
    pub fn list(&self) -> Result<Vec<Fork>> {
        self.archive.list()
    }

    /// Directory holding a fork's working copy: the live path when active,
    /// its archive snapshot otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if the fork is unknown or has no working copy.
    pub fn resolve_fork_dir(&self, name: &ForkName) -> Result<PathBuf> {
        if self.store.get()?.as_ref() == Some(name) {
            return Ok(self.live.clone());
        }
        let snapshot = self.archive.snapshot_dir(name);
        if snapshot.is_dir() {
            Ok(snapshot)
        } else if self.archive.contains(name) {
            Err(ValidationError::NoWorkingCopy(name.to_string()).into())
        } else {
            Err(ValidationError::UnknownFork(name.to_string()).into())
        }
    }

    // --- Switch ---

    /// Switch the live working copy to an archived fork, then reboot.
    ///
    /// # Errors
    ///
    /// Returns an error if the precondition fails (target has no archived
    /// working copy) or the pointer cannot be read; step failures after the
    /// first mutation are logged and journaled, not returned.
    pub fn switch(&self, target: &ForkName) -> Result<()> {
        let active = self.store.get()?;

        if !self.archive.snapshot_dir(target).is_dir() {
            return Err(if self.archive.contains(target) {
                ValidationError::NoWorkingCopy(target.to_string()).into()
            } else {
                ValidationError::UnknownFork(target.to_string()).into()
            });
        }

        info!(
            from = active.as_ref().map_or("<none>", ForkName::as_str),
            to = %target,
            "switching fork"
        );

        let mut journal = SwapJournal::new(Operation::Switch, active.clone(), target.clone());
        self.persist_journal(&journal);

        if let Some(active) = &active {
            self.run_step(&mut journal, Step::BackupConfig, || {
                self.backup_config(active)
            });
            self.run_step(&mut journal, Step::ArchiveLive, || {
                move_dir(&self.live, &self.archive.snapshot_dir(active))
            });
        } else {
            warn!("no active fork recorded; nothing to archive");
        }

        self.run_step(&mut journal, Step::MaterializeLive, || {
            move_dir(&self.archive.snapshot_dir(target), &self.live)
        });
        self.run_step(&mut journal, Step::WritePointer, || self.store.set(target));
        self.run_step(&mut journal, Step::RestoreConfig, || {
            self.restore_config(target)
        });
        self.run_step(&mut journal, Step::ApplyPermissions, || {
            self.apply_permissions()
        });

        self.finish(&journal)
    }

    // --- Clone ---

    /// Clone a new fork into its archive slot, make it live, then reboot.
    ///
    /// # Errors
    ///
    /// Returns a fatal error when the clone fails after all retry attempts
    /// (rollback has run by then); later step failures are logged and
    /// journaled, not returned.
    pub async fn clone_fork(
        &self,
        name: &ForkName,
        url: &RepoUrl,
        branch: Option<&str>,
    ) -> Result<()> {
        let active = self.store.get()?;
        let dest = self.archive.snapshot_dir(name);

        info!(fork = %name, url = %url, branch = branch.unwrap_or("<default>"), "cloning fork");

        let mut journal = SwapJournal::new(Operation::Clone, active.clone(), name.clone());
        self.persist_journal(&journal);

        if self.dry {
            info!(dest = %dest.display(), "dry run: would clone and switch");
            return Ok(());
        }

        // The clone destination must not exist; a stale snapshot from an
        // earlier overwrite is cleared first.
        remove_dir_all_if_exists(&dest)?;
        std::fs::create_dir_all(self.archive.fork_dir(name))
            .with_context(|| format!("failed to create {}", self.archive.fork_dir(name).display()))?;

        if let Err(e) = self.clone_with_retries(url, &dest, branch).await {
            journal.record_failure(Step::CloneRepo, &e);
            self.persist_journal(&journal);
            rollback::cleanup(&self.config);
            return Err(bail_out(format!(
                "clone of {url} failed after {} attempts: {e:#}",
                self.config.git.clone_retries
            ))
            .into());
        }
        journal.record_ok(Step::CloneRepo);
        self.persist_journal(&journal);

        self.run_step(&mut journal, Step::SetOwnership, || {
            device::chown_recursive(&dest, &self.config.device, self.dry)
        });

        if let Some(active) = &active {
            self.run_step(&mut journal, Step::BackupConfig, || {
                self.backup_config(active)
            });
            self.run_step(&mut journal, Step::ArchiveLive, || {
                move_dir(&self.live, &self.archive.snapshot_dir(active))
            });
        } else {
            warn!("no active fork recorded; nothing to archive");
        }

        self.run_step(&mut journal, Step::MaterializeLive, || {
            move_dir(&dest, &self.live)
        });
        self.run_step(&mut journal, Step::WritePointer, || self.store.set(name));
        self.run_step(&mut journal, Step::ApplyPermissions, || {
            self.apply_permissions()
        });

        self.finish(&journal)
    }

    async fn clone_with_retries(
        &self,
        url: &RepoUrl,
        dest: &std::path::Path,
        branch: Option<&str>,
    ) -> Result<()> {
        let retries = self.config.git.clone_retries.max(1);
        let delay = Duration::from_secs(self.config.git.retry_delay_secs);
        let mut attempt = 0;

        loop {
            attempt += 1;
            let spinner = clone_spinner(url, attempt, retries);
            let result = git::clone(url.as_str(), dest, branch, self.config.git.shallow);
            spinner.finish_and_clear();

            match result {
                Ok(()) => {
                    info!(url = %url, attempt, "clone succeeded");
                    return Ok(());
                }
                Err(e) => {
                    if attempt >= retries {
                        error!(url = %url, attempt, error = %e, "clone failed; giving up");
                        return Err(e.into());
                    }
                    warn!(url = %url, attempt, error = %e, "clone attempt failed; retrying");
                    // A half-written clone must not poison the next attempt.
                    let _ = remove_dir_all_if_exists(dest);
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    // --- Delete ---

    /// Remove a fork's archive directory. The pointer is never touched.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::UnknownFork` if the fork has no archive
    /// directory, or an error if removal fails.
    pub fn delete(&self, name: &ForkName) -> Result<()> {
        let dir = self.archive.fork_dir(name);
        if !dir.is_dir() {
            return Err(ValidationError::UnknownFork(name.to_string()).into());
        }

        if self.store.get()?.as_ref() == Some(name) {
            // The active fork's live copy is not under its archive path, so
            // this only discards its archived snapshots.
            warn!(fork = %name, "deleting archive entry of the active fork; live data is kept");
        }

        if self.dry {
            info!(fork = %name, dir = %dir.display(), "dry run: would delete");
            return Ok(());
        }

        remove_dir_all_if_exists(&dir)?;
        info!(fork = %name, "fork deleted");
        Ok(())
    }

    // --- Update ---

    /// Whether a fork's upstream has commits its local copy lacks.
    ///
    /// Fetches without merging and compares HEAD to the upstream tracking
    /// commit. A branch without an upstream reports `false`.
    ///
    /// # Errors
    ///
    /// Returns an error if the fork cannot be resolved, is not a git
    /// repository, or the fetch fails.
    pub fn check_fork_update(&self, name: &ForkName) -> Result<bool> {
        let dir = self.resolve_fork_dir(name)?;
        git::require_repo(&dir)?;
        git::fetch(&dir, &self.config.git.remote)?;

        let head = git::head_commit(&dir)?;
        match git::upstream_commit(&dir)? {
            Some(upstream) => {
                debug!(fork = %name, %head, %upstream, "compared to upstream");
                Ok(head != upstream)
            }
            None => Ok(false),
        }
    }

    /// Fast-forward pull a fork's working copy from its upstream.
    ///
    /// # Errors
    ///
    /// Returns an error if the fork cannot be resolved or the pull fails.
    pub fn update_fork(&self, name: &ForkName) -> Result<()> {
        let dir = self.resolve_fork_dir(name)?;
        git::require_repo(&dir)?;

        if self.dry {
            info!(fork = %name, dir = %dir.display(), "dry run: would pull");
            return Ok(());
        }

        git::pull_ff(&dir, &self.config.git.remote)?;
        info!(fork = %name, "fork updated");
        Ok(())
    }

    // --- Step plumbing ---

    /// Run one sub-step: log, record the outcome, and continue regardless.
    fn run_step<F>(&self, journal: &mut SwapJournal, step: Step, f: F) -> bool
    where
        F: FnOnce() -> Result<()>,
    {
        if self.dry {
            info!(step = %step, "dry run: skipping step");
            return true;
        }

        debug!(step = %step, "running step");
        let ok = match f() {
            Ok(()) => {
                journal.record_ok(step);
                true
            }
            Err(e) => {
                error!(step = %step, error = %format!("{e:#}"), "step failed; continuing");
                journal.record_failure(step, &e);
                false
            }
        };
        self.persist_journal(journal);
        ok
    }

    fn persist_journal(&self, journal: &SwapJournal) {
        if self.dry {
            return;
        }
        if let Err(e) = journal.persist(&self.journal_path) {
            warn!(error = %format!("{e:#}"), "failed to persist journal");
        }
    }

    fn finish(&self, journal: &SwapJournal) -> Result<()> {
        let failed = journal.failed_steps();
        if failed > 0 {
            warn!(
                operation = %journal.operation,
                failed,
                "operation finished with failed steps; see log for details"
            );
        } else {
            info!(operation = %journal.operation, target = %journal.target, "operation complete");
        }

        if !self.dry && let Err(e) = SwapJournal::remove(&self.journal_path) {
            warn!(error = %format!("{e:#}"), "failed to remove journal");
        }

        device::reboot(&self.config.device, self.dry)
    }

    fn backup_config(&self, fork: &ForkName) -> Result<()> {
        if !self.params.is_dir() {
            debug!(params = %self.params.display(), "no live config to back up");
            return Ok(());
        }
        copy_dir_contents(&self.params, &self.archive.params_dir(fork))
    }

    fn restore_config(&self, fork: &ForkName) -> Result<()> {
        let snapshot = self.archive.params_dir(fork);
        if !snapshot.is_dir() {
            debug!(fork = %fork, "no config snapshot to restore");
            return Ok(());
        }
        copy_dir_contents(&snapshot, &self.params)
    }

    fn apply_permissions(&self) -> Result<()> {
        device::chown_recursive(&self.live, &self.config.device, self.dry)?;
        let manager = self.config.paths.manager()?;
        device::make_executable(&manager, self.dry)
    }
}

fn clone_spinner(url: &RepoUrl, attempt: u32, retries: u32) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg} [{elapsed_precise}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(format!("cloning {url} (attempt {attempt}/{retries})"));
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}
