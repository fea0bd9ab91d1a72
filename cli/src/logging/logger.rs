//! Structured logger with dry-run awareness and summary collection.
use std::path::PathBuf;
use std::sync::Mutex;

use super::subscriber::{DRY_RUN_TARGET, STAGE_TARGET};
use super::types::{Log, TaskEntry, TaskStatus};
use super::utils::log_file_path;

/// Implement the display methods of [`Log`] by delegating to inherent methods
/// of the same name on the implementing type.
///
/// The `record_task` method is **not** included because its signature differs
/// from the `fn(&self, &str)` pattern shared by the display methods.
macro_rules! forward_log_methods {
    ($($method:ident),+ $(,)?) => {
        $(
            fn $method(&self, msg: &str) {
                self.$method(msg);
            }
        )+
    };
}

/// Structured logger with dry-run awareness and summary collection.
///
/// All messages are also written to a persistent log file at
/// `$XDG_CACHE_HOME/brainbash/<command>.log` (default
/// `~/.cache/brainbash/<command>.log`) by the subscriber's file layer.
#[derive(Debug)]
pub struct Logger {
    tasks: Mutex<Vec<TaskEntry>>,
    log_file: Option<PathBuf>,
}

impl Logger {
    /// Create a new logger for `command`.
    ///
    /// Stores the log file path for display in the run summary.  The file
    /// itself is created by [`init_subscriber`](super::subscriber::init_subscriber).
    #[must_use]
    pub fn new(command: &str) -> Self {
        Self::with_log_file(log_file_path(command))
    }

    /// Create a logger that reports `log_file` in its summary.
    #[must_use]
    pub const fn with_log_file(log_file: Option<PathBuf>) -> Self {
        Self {
            tasks: Mutex::new(Vec::new()),
            log_file,
        }
    }

    /// Return the log file path, if available.
    #[cfg(test)]
    pub const fn log_path(&self) -> Option<&PathBuf> {
        self.log_file.as_ref()
    }

    /// Return a clone of all recorded task entries.
    #[must_use]
    pub fn task_entries(&self) -> Vec<TaskEntry> {
        self.tasks.lock().map_or_else(|_| vec![], |g| g.clone())
    }

    /// Log an error message.
    pub fn error(&self, msg: &str) {
        tracing::error!("{msg}");
    }

    /// Log a warning message.
    pub fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
    }

    /// Log a stage header (major section).
    pub fn stage(&self, msg: &str) {
        tracing::info!(target: STAGE_TARGET, "{msg}");
    }

    /// Log an informational message.
    pub fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    /// Log a debug message (suppressed on console unless verbose; always
    /// written to the log file).
    pub fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }

    /// Log a dry-run action message.
    pub fn dry_run(&self, msg: &str) {
        tracing::info!(target: DRY_RUN_TARGET, "{msg}");
    }

    /// Record a task result for the summary.
    pub fn record_task(&self, name: &str, status: TaskStatus, message: Option<&str>) {
        if let Ok(mut guard) = self.tasks.lock() {
            guard.push(TaskEntry {
                name: name.to_string(),
                status,
                message: message.map(String::from),
            });
        }
    }

    /// Count the number of failed tasks.
    ///
    /// Aborted tasks are not failures of their own; the task that caused the
    /// abort is already counted.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.count(TaskStatus::Failed)
    }

    /// Count the tasks recorded with `status`.
    #[must_use]
    pub fn count(&self, status: TaskStatus) -> usize {
        self.tasks
            .lock()
            .map_or(0, |guard| guard.iter().filter(|t| t.status == status).count())
    }

    /// Print the summary of all recorded tasks.
    pub fn print_summary(&self) {
        let tasks = self.task_entries();
        if tasks.is_empty() {
            return;
        }

        self.stage("Summary");

        for task in &tasks {
            let (icon, color) = match task.status {
                TaskStatus::Ok => ("✓", "\x1b[32m"),
                TaskStatus::NotApplicable => ("·", "\x1b[2m"),
                TaskStatus::Skipped => ("○", "\x1b[33m"),
                TaskStatus::DryRun => ("~", "\x1b[37m"),
                TaskStatus::Failed => ("✗", "\x1b[31m"),
                TaskStatus::Aborted => ("-", "\x1b[2;31m"),
            };

            let suffix = task
                .message
                .as_ref()
                .map_or_else(String::new, |msg| format!(" ({msg})"));

            self.info(&format!("{color}{icon} {}{suffix}\x1b[0m", task.name));
        }

        println!();
        self.info(&format!(
            "{} tasks: \x1b[32m{} ok\x1b[0m, \x1b[2m{} n/a\x1b[0m, \x1b[33m{} skipped\x1b[0m, \x1b[37m{} dry-run\x1b[0m, \x1b[31m{} failed\x1b[0m, \x1b[2;31m{} aborted\x1b[0m",
            tasks.len(),
            self.count(TaskStatus::Ok),
            self.count(TaskStatus::NotApplicable),
            self.count(TaskStatus::Skipped),
            self.count(TaskStatus::DryRun),
            self.count(TaskStatus::Failed),
            self.count(TaskStatus::Aborted),
        ));

        if let Some(path) = &self.log_file {
            self.info(&format!("\x1b[2mlog: {}\x1b[0m", path.display()));
        }
    }
}

impl Log for Logger {
    forward_log_methods!(stage, info, debug, warn, error, dry_run);

    fn record_task(&self, name: &str, status: TaskStatus, message: Option<&str>) {
        self.record_task(name, status, message);
    }
}
