pub mod install;
pub mod menu;

use anyhow::Result;

use crate::cli::GlobalOpts;
use crate::config::Config;
use crate::error::TaskError;
use crate::logging::{Logger, TaskStatus};
use crate::platform::Distro;
use crate::tasks::{self, Context, FailurePolicy, Task};

/// Shared state produced by the common setup sequence.
///
/// Distribution detection runs first so an unsupported system fails before
/// anything else is touched.
#[derive(Debug)]
pub struct CommandSetup {
    pub distro: Distro,
    pub config: Config,
}

impl CommandSetup {
    /// Detect the distribution, resolve the repository root and load all
    /// configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the distribution is unsupported, the root cannot
    /// be determined, or any configuration file fails to parse.
    pub fn init(global: &GlobalOpts, log: &Logger) -> Result<Self> {
        log.stage("Detecting distribution");
        let distro = Distro::detect()?;
        log.info(&format!(
            "distribution: {} ({})",
            distro.id(),
            distro.package_manager()
        ));

        let root = install::resolve_root(global)?;
        log.debug(&format!("repository root: {}", root.display()));

        log.stage("Loading configuration");
        let config = Config::load(&root)?;

        log.debug(&format!("{} package aliases", config.aliases.len()));
        log.info(&format!(
            "loaded {} base packages, {} extra packages, {} dotfiles, {} models",
            config.groups.base.len(),
            config.groups.extra.len(),
            config.dotfiles.len(),
            config.models.len()
        ));

        let warnings = config.validate();
        if !warnings.is_empty() {
            log.warn(&format!(
                "found {} configuration warning(s):",
                warnings.len()
            ));
            for warning in &warnings {
                log.warn(&format!(
                    "  {} [{}]: {}",
                    warning.source, warning.item, warning.message
                ));
            }
        }

        Ok(Self { distro, config })
    }
}

/// Execute every task in order, print the summary, and fail if any task
/// failed.
///
/// A failed task with [`FailurePolicy::Abort`] stops the run: every later
/// task is recorded as [`TaskStatus::Aborted`].
///
/// # Errors
///
/// Returns [`TaskError::PhaseAborted`] when an aborting task fails, or
/// [`TaskError::Failures`] when one or more continuing tasks failed.
pub fn run_tasks_to_completion(tasks: &[Box<dyn Task>], ctx: &Context, log: &Logger) -> Result<()> {
    for (i, task) in tasks.iter().enumerate() {
        let status = tasks::execute(task.as_ref(), ctx);
        if status == TaskStatus::Failed && task.policy() == FailurePolicy::Abort {
            let err = TaskError::PhaseAborted {
                task: task.name().to_string(),
            };
            log.error(&err.to_string());
            for rest in tasks.iter().skip(i + 1) {
                log.record_task(rest.name(), TaskStatus::Aborted, None);
            }
            log.print_summary();
            return Err(err.into());
        }
    }

    log.print_summary();

    let count = log.failure_count();
    if count > 0 {
        return Err(TaskError::Failures(count).into());
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::config::selection::Selection;
    use crate::exec::Executor;
    use crate::resources::test_helpers::RecordingExecutor;
    use crate::tasks::TaskResult;
    use crate::tasks::test_helpers::{empty_config, make_context};
    use std::path::PathBuf;
    use std::sync::Arc;

    #[derive(Debug)]
    struct Scripted {
        name: &'static str,
        policy: FailurePolicy,
        fail: bool,
    }

    impl Task for Scripted {
        fn name(&self) -> &'static str {
            self.name
        }

        fn policy(&self) -> FailurePolicy {
            self.policy
        }

        fn should_run(&self, _: &Context) -> bool {
            true
        }

        fn run(&self, _: &Context) -> Result<TaskResult> {
            if self.fail {
                anyhow::bail!("boom");
            }
            Ok(TaskResult::Ok)
        }
    }

    fn task(name: &'static str, policy: FailurePolicy, fail: bool) -> Box<dyn Task> {
        Box::new(Scripted { name, policy, fail })
    }

    fn run(tasks: &[Box<dyn Task>]) -> (Result<()>, Arc<Logger>) {
        let (ctx, log) = make_context(
            empty_config(PathBuf::from("/repo")),
            Selection::dotfiles_only(),
            PathBuf::from("/home/test"),
            Arc::new(RecordingExecutor::new()) as Arc<dyn Executor>,
        );
        (run_tasks_to_completion(tasks, &ctx, &log), log)
    }

    #[test]
    fn all_ok_is_success() {
        let (result, log) = run(&[
            task("a", FailurePolicy::Abort, false),
            task("b", FailurePolicy::Continue, false),
        ]);
        assert!(result.is_ok());
        assert_eq!(log.count(TaskStatus::Ok), 2);
    }

    #[test]
    fn abort_policy_stops_the_run() {
        let (result, log) = run(&[
            task("update", FailurePolicy::Abort, true),
            task("packages", FailurePolicy::Abort, false),
            task("dotfiles", FailurePolicy::Continue, false),
        ]);
        let err = result.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<TaskError>(),
            Some(TaskError::PhaseAborted { task }) if task == "update"
        ));

        let entries = log.task_entries();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].status, TaskStatus::Failed);
        assert_eq!(entries[1].status, TaskStatus::Aborted);
        assert_eq!(entries[2].status, TaskStatus::Aborted);
        assert_eq!(log.failure_count(), 1);
    }

    #[test]
    fn continue_policy_runs_later_tasks() {
        let (result, log) = run(&[
            task("shell", FailurePolicy::Continue, true),
            task("dotfiles", FailurePolicy::Continue, false),
            task("models", FailurePolicy::Continue, true),
        ]);
        let err = result.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<TaskError>(),
            Some(TaskError::Failures(2))
        ));
        assert_eq!(log.count(TaskStatus::Ok), 1);
        assert_eq!(log.count(TaskStatus::Aborted), 0);
    }

    #[test]
    fn failure_in_last_abort_task_aborts_nothing_else() {
        let (result, log) = run(&[
            task("dotfiles", FailurePolicy::Continue, false),
            task("packages", FailurePolicy::Abort, true),
        ]);
        assert!(result.is_err());
        assert_eq!(log.count(TaskStatus::Aborted), 0);
    }
}
