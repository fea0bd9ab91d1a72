//! Domain-specific error types for the bootstrapper.
//!
//! Internal modules return typed errors while tasks and command handlers
//! convert them to [`anyhow::Error`] via the standard `?` operator:
//!
//! - [`ConfigError`]: TOML parsing, root resolution
//! - [`PlatformError`]: distribution detection
//! - [`ExecError`]: subprocess spawn, exit status, timeout
//! - [`TaskError`]: task failure, aborted phases

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Errors that arise from configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// An I/O error occurred while reading a config file.
    #[error("IO error reading config file {path}: {source}")]
    Io {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The TOML file is malformed or does not match the expected shape.
    #[error("Invalid TOML in {path}: {source}")]
    Parse {
        /// Path to the malformed file.
        path: PathBuf,
        /// Underlying deserialization error.
        source: toml::de::Error,
    },

    /// The repository root could not be located.
    #[error("cannot determine repository root; use --root or set BRAINBASH_ROOT")]
    RootNotFound,
}

/// Errors that arise from distribution detection.
#[derive(Error, Debug)]
pub enum PlatformError {
    /// `/etc/os-release` names a distribution outside the supported families.
    #[error("unsupported distribution (supported: debian, ubuntu, alpine, fedora)")]
    UnsupportedDistro,

    /// The probe file could not be read.
    #[error("distribution detection failed: {path}: {source}")]
    DetectionFailed {
        /// Path of the probe file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Errors that arise from running external processes.
#[derive(Error, Debug)]
pub enum ExecError {
    /// The program could not be started at all.
    #[error("failed to execute {program}: {source}")]
    Spawn {
        /// Program that was invoked.
        program: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The program ran but exited unsuccessfully.
    #[error("{program} failed (exit {}): {stderr}", code.unwrap_or(-1))]
    NonZeroExit {
        /// Program that was invoked.
        program: String,
        /// Exit code, `None` when terminated by a signal.
        code: Option<i32>,
        /// Trimmed standard error output.
        stderr: String,
    },

    /// The program exceeded its deadline and was killed.
    #[error("{program} timed out after {}s", after.as_secs())]
    TimedOut {
        /// Program that was invoked.
        program: String,
        /// Deadline that was exceeded.
        after: Duration,
    },
}

/// Errors that arise during task execution.
#[derive(Error, Debug)]
pub enum TaskError {
    /// A task failed to execute.
    #[error("Task '{task}' failed: {reason}")]
    ExecutionFailed {
        /// Name of the task that failed.
        task: String,
        /// Human-readable reason for the failure.
        reason: String,
    },

    /// A task with an abort policy failed; the remaining tasks were not run.
    #[error("'{task}' failed; remaining steps were aborted")]
    PhaseAborted {
        /// Name of the task that aborted the run.
        task: String,
    },

    /// One or more tasks failed while the run continued.
    #[error("{0} task(s) failed")]
    Failures(usize),
}
