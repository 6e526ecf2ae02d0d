// forkswap: openpilot Fork Swap Manager
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error handling module.
//!
//! ```text
//!              SwapError (~24 bytes)
//!                     |
//!   +------+-----+----+----+------+------+
//!   |      |     |    |    |      |      |
//!   v      v     v    v    v      v      v
//! Bail   Git   Cfg  Vald  Fs   Lock  Proc  Io/Other
//!        Box   Box  Box   Box  Box   Box   Box<str>
//!
//! Sub-errors (unboxed internally):
//!   Git        Gix, CommandFailed, CloneFailed, RepoNotFound
//!   Config     ParseError, MissingKey, InvalidValue
//!   Validation InvalidForkName, InvalidRepoUrl, UnknownFork
//!   Fs         NotFound, AlreadyExists, IoError
//!   Lock       Held, Corrupt, Io
//!   Process    ExecutableNotFound, SpawnFailed, NonZeroExit
//!
//! All variants boxed => SwapError fits in 24 bytes.
//! ```

use thiserror::Error;

/// Convenience alias for `anyhow::Result`.
pub type Result<T> = anyhow::Result<T>;

/// Result type using [`SwapError`].
pub type SwapResult<T> = std::result::Result<T, SwapError>;

/// Top-level application error type.
///
/// All sub-errors are boxed to keep this enum at ~24 bytes on the stack.
#[derive(Debug, Error)]
pub enum SwapError {
    /// Fatal error that should terminate the application.
    #[error("fatal error: {0}")]
    Bailed(Box<str>),

    /// Git operation failed.
    #[error("git error: {0}")]
    Git(#[from] Box<GitError>),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] Box<ConfigError>),

    /// User-input validation error.
    #[error("{0}")]
    Validation(#[from] Box<ValidationError>),

    /// Filesystem error.
    #[error("filesystem error: {0}")]
    Fs(#[from] Box<FsError>),

    /// Instance lock error.
    #[error("lock error: {0}")]
    Lock(#[from] Box<LockError>),

    /// Process execution error.
    #[error("process error: {0}")]
    Process(#[from] Box<ProcessError>),

    /// I/O error.
    #[error("io error: {0}")]
    Io(Box<std::io::Error>),

    /// Generic error with message.
    #[error("{0}")]
    Other(Box<str>),
}

/// Create a fatal [`SwapError::Bailed`] that terminates the application.
pub fn bail_out(message: impl Into<String>) -> SwapError {
    SwapError::Bailed(message.into().into_boxed_str())
}

impl SwapError {
    /// Whether this error must terminate the process instead of returning
    /// to the interactive menu.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Bailed(_))
    }
}

// --- From implementations for boxing ---

/// Macro to generate `From` implementations that box the source error.
macro_rules! impl_from_boxed {
    ($($error:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$error> for SwapError {
                fn from(err: $error) -> Self {
                    SwapError::$variant(Box::new(err))
                }
            }
        )+
    };
}

impl_from_boxed! {
    GitError => Git,
    ConfigError => Config,
    ValidationError => Validation,
    FsError => Fs,
    LockError => Lock,
    ProcessError => Process,
    std::io::Error => Io,
}

// --- Gix Errors ---

/// Wrapper for gix-specific errors.
///
/// gix has multiple error types that are converted through this enum.
/// Large error types are boxed to keep enum size manageable.
#[derive(Debug, Error)]
pub enum GixError {
    /// Failed to discover repository from path.
    #[error("failed to discover repository: {0}")]
    Discover(#[from] Box<gix::discover::Error>),

    /// Failed to get HEAD reference.
    #[error("failed to get head reference: {0}")]
    Head(#[from] gix::reference::find::existing::Error),
}

// --- Git Errors ---

/// Git operation errors.
#[derive(Debug, Error)]
pub enum GitError {
    /// Repository not found at the specified path.
    #[error("repository not found: {path}")]
    RepoNotFound { path: String },

    /// Git command execution failed.
    #[error("git command failed: {command} - {message}")]
    CommandFailed { command: String, message: String },

    /// Error from gix library.
    #[error("gix error: {0}")]
    Gix(#[from] GixError),

    /// Clone operation failed.
    #[error("failed to clone {url}: {message}")]
    CloneFailed { url: String, message: String },

    /// Branch has no upstream tracking ref.
    #[error("no upstream configured for {path}")]
    NoUpstream { path: String },
}

// --- Config Errors ---

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse configuration file.
    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: String, message: String },

    /// Missing required configuration key.
    #[error("missing required config key '{key}' in section '[{section}]'")]
    MissingKey { section: String, key: String },

    /// Invalid configuration value.
    #[error("invalid value for '{key}' in section '[{section}]': {message}")]
    InvalidValue {
        section: String,
        key: String,
        message: String,
    },
}

// --- Validation Errors ---

/// User-input validation errors. These never mutate state.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Fork name contains characters outside `[A-Za-z0-9_-]`.
    #[error("invalid fork name '{0}': only letters, digits, '_' and '-' are allowed")]
    InvalidForkName(String),

    /// Repository URL does not match the required host pattern.
    #[error("invalid repository url '{url}': expected https://{host}/<owner>/<repo>.git")]
    InvalidRepoUrl { url: String, host: String },

    /// Named fork has no archive directory.
    #[error("fork '{0}' does not exist")]
    UnknownFork(String),

    /// Named fork has no archived working copy to switch to.
    #[error("fork '{0}' has no archived working copy")]
    NoWorkingCopy(String),
}

// --- Filesystem Errors ---

/// Filesystem operation errors.
#[derive(Debug, Error)]
pub enum FsError {
    /// Path not found.
    #[error("path not found: {0}")]
    NotFound(String),

    /// Move destination already exists; the caller must clear it first.
    #[error("destination already exists: {0}")]
    AlreadyExists(String),

    /// A read-after-write verification found different content than written.
    #[error("verification failed on '{path}': wrote {expected:?}, read back {actual:?}")]
    VerifyMismatch {
        path: String,
        expected: String,
        actual: String,
    },

    /// General I/O error.
    #[error("I/O error on '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

// --- Lock Errors ---

/// Single-instance lock errors.
#[derive(Debug, Error)]
pub enum LockError {
    /// Another live instance holds the lock.
    #[error("another instance is running (pid {pid}, lock {path})")]
    Held { pid: u32, path: String },

    /// Lock file exists but its contents are not a pid.
    #[error("lock file {path} is corrupt: {content:?}")]
    Corrupt { path: String, content: String },

    /// I/O error while acquiring or releasing the lock.
    #[error("lock I/O error on '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

// --- Process Errors ---

/// Process execution errors.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// Executable not found in PATH.
    #[error("executable not found: '{name}' (not in PATH)")]
    ExecutableNotFound { name: String },

    /// Failed to spawn process.
    #[error("failed to spawn process '{command}': {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Process exited with non-zero status.
    #[error("process '{command}' exited with code {code}")]
    NonZeroExit { command: String, code: i32 },

    /// Failed to read process output.
    #[error("failed to read output from process '{command}': {message}")]
    OutputError { command: String, message: String },
}

#[cfg(test)]
mod tests;
