//! Core logging types: task entries, status, theme, and the [`Log`] trait.

/// Task execution result for summary reporting.
#[derive(Debug, Clone)]
pub struct TaskEntry {
    /// Human-readable task name.
    pub name: String,
    /// Final status of the task.
    pub status: TaskStatus,
    /// Optional detail message (e.g., skip reason or error description).
    pub message: Option<String>,
}

/// Status of a completed task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    /// Task completed successfully.
    Ok,
    /// Task does not apply to the current selection.
    NotApplicable,
    /// Task was explicitly skipped (e.g., nothing selected, tool not found).
    Skipped,
    /// Task ran in dry-run mode; no changes were applied.
    DryRun,
    /// Task encountered an error and could not complete.
    Failed,
    /// Task never ran because an earlier phase failed.
    Aborted,
}

/// Accent colour for stage headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Theme {
    /// Bold blue.
    #[default]
    Blue,
    /// Bold green.
    Green,
    /// Bold magenta.
    Magenta,
    /// Bold red.
    Red,
}

impl Theme {
    /// SGR escape sequence that starts this colour.
    #[must_use]
    pub const fn ansi(self) -> &'static str {
        match self {
            Self::Blue => "\x1b[1;34m",
            Self::Green => "\x1b[1;32m",
            Self::Magenta => "\x1b[1;35m",
            Self::Red => "\x1b[1;31m",
        }
    }
}

/// Abstraction over logging backends.
///
/// Task code logs through `&dyn Log` so tests can substitute a recording
/// implementation for the real [`Logger`](super::logger::Logger).
pub trait Log: Send + Sync {
    /// Log a stage header (major section).
    fn stage(&self, msg: &str);
    /// Log an informational message.
    fn info(&self, msg: &str);
    /// Log a debug message (may be suppressed on console).
    fn debug(&self, msg: &str);
    /// Log a warning message.
    fn warn(&self, msg: &str);
    /// Log an error message.
    fn error(&self, msg: &str);
    /// Log a dry-run action message.
    fn dry_run(&self, msg: &str);
    /// Record a task result for the summary.
    fn record_task(&self, name: &str, status: TaskStatus, message: Option<&str>);
}
