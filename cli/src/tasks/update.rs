use anyhow::{Context as _, Result};

use super::{Context, FailurePolicy, Task, TaskResult};

/// Refresh the package manager's indexes.
#[derive(Debug)]
pub struct UpdateSystem;

impl Task for UpdateSystem {
    fn name(&self) -> &'static str {
        "Update system"
    }

    fn policy(&self) -> FailurePolicy {
        FailurePolicy::Abort
    }

    fn should_run(&self, ctx: &Context) -> bool {
        ctx.selection.update_system
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let manager = ctx.distro.package_manager();
        if ctx.dry_run {
            ctx.log.dry_run(&format!("refresh {manager} package indexes"));
            return Ok(TaskResult::DryRun);
        }

        ctx.log.debug(&format!("refreshing {manager} indexes"));
        manager
            .update(&*ctx.executor)
            .with_context(|| format!("{manager} index refresh failed"))?;
        ctx.log.info("package indexes refreshed");
        Ok(TaskResult::Ok)
    }
}
