//! Named, ordered tasks that orchestrate resource changes.
pub mod cloud_ai;
mod context;
pub mod dotfiles;
pub mod local_ai;
pub mod packages;
pub mod shell;
pub mod update;

pub use context::Context;

use anyhow::Result;

use crate::logging::TaskStatus;

/// Result of a single task execution.
///
/// # Examples
///
/// ```
/// use brainbash_cli::tasks::TaskResult;
///
/// let ok = TaskResult::Ok;
/// let skipped = TaskResult::Skipped("nothing selected".into());
/// let dry = TaskResult::DryRun;
///
/// assert!(matches!(ok, TaskResult::Ok));
/// assert!(matches!(skipped, TaskResult::Skipped(_)));
/// assert!(matches!(dry, TaskResult::DryRun));
/// ```
#[derive(Debug, Clone)]
pub enum TaskResult {
    /// Task completed successfully.
    Ok,
    /// Task was skipped, with the reason.
    Skipped(String),
    /// Task ran in dry-run mode.
    DryRun,
}

/// What happens to the rest of the run when a task fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Stop the run; later tasks are recorded as aborted.
    Abort,
    /// Record the failure and carry on with the next task.
    Continue,
}

/// Counters for batch tasks that process many items.
///
/// # Examples
///
/// ```
/// use brainbash_cli::tasks::TaskStats;
///
/// let stats = TaskStats { changed: 1, already_ok: 2, skipped: 3 };
/// assert_eq!(stats.summary(false), "1 changed, 2 already ok, 3 skipped");
/// assert_eq!(stats.summary(true), "1 would change, 2 already ok, 3 skipped");
/// ```
#[derive(Debug, Default)]
pub struct TaskStats {
    /// Number of items changed or applied.
    pub changed: u32,
    /// Number of items already in the correct state.
    pub already_ok: u32,
    /// Number of items skipped.
    pub skipped: u32,
}

impl TaskStats {
    /// Create a new empty stats counter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Format the summary string (e.g. "3 changed, 10 already ok").
    #[must_use]
    pub fn summary(&self, dry_run: bool) -> String {
        let verb = if dry_run { "would change" } else { "changed" };
        if self.skipped > 0 {
            format!(
                "{} {verb}, {} already ok, {} skipped",
                self.changed, self.already_ok, self.skipped
            )
        } else {
            format!("{} {verb}, {} already ok", self.changed, self.already_ok)
        }
    }

    /// Log the summary and return the appropriate `TaskResult`.
    #[must_use]
    pub fn finish(self, ctx: &Context) -> TaskResult {
        ctx.log.info(&self.summary(ctx.dry_run));
        if ctx.dry_run {
            TaskResult::DryRun
        } else {
            TaskResult::Ok
        }
    }
}

/// A named, executable task.
pub trait Task: Send + Sync {
    /// Human-readable task name.
    fn name(&self) -> &str;

    /// Effect of a failure of this task on the rest of the run.
    fn policy(&self) -> FailurePolicy {
        FailurePolicy::Continue
    }

    /// Whether this task applies to the current selection.
    fn should_run(&self, ctx: &Context) -> bool;

    /// Execute the task.
    ///
    /// # Errors
    ///
    /// Returns an error if the task fails to execute, such as when an
    /// installer exits non-zero or a link cannot be created.
    fn run(&self, ctx: &Context) -> Result<TaskResult>;
}

/// The complete, ordered set of tasks run by the install command.
#[must_use]
pub fn all_install_tasks() -> Vec<Box<dyn Task>> {
    vec![
        Box::new(update::UpdateSystem),
        Box::new(packages::InstallPackages),
        Box::new(shell::InstallOhMyZsh),
        Box::new(dotfiles::LinkDotfiles),
        Box::new(local_ai::InstallLocalAi),
        Box::new(cloud_ai::ConfigureCloudAi),
    ]
}

/// Execute a task, recording and returning its final status.
pub fn execute(task: &dyn Task, ctx: &Context) -> TaskStatus {
    if !task.should_run(ctx) {
        ctx.log
            .debug(&format!("skipping task: {} (not selected)", task.name()));
        ctx.log
            .record_task(task.name(), TaskStatus::NotApplicable, None);
        return TaskStatus::NotApplicable;
    }

    ctx.log.stage(task.name());

    match task.run(ctx) {
        Ok(TaskResult::Ok) => {
            ctx.log.record_task(task.name(), TaskStatus::Ok, None);
            TaskStatus::Ok
        }
        Ok(TaskResult::Skipped(reason)) => {
            ctx.log.info(&format!("skipped: {reason}"));
            ctx.log
                .record_task(task.name(), TaskStatus::Skipped, Some(&reason));
            TaskStatus::Skipped
        }
        Ok(TaskResult::DryRun) => {
            ctx.log.record_task(task.name(), TaskStatus::DryRun, None);
            TaskStatus::DryRun
        }
        Err(e) => {
            ctx.log.error(&format!("{}: {e:#}", task.name()));
            ctx.log
                .record_task(task.name(), TaskStatus::Failed, Some(&format!("{e:#}")));
            TaskStatus::Failed
        }
    }
}
