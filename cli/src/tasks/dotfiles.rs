use anyhow::Result;

use super::{Context, Task, TaskResult, TaskStats};
use crate::error::TaskError;
use crate::resources::symlink::{DotfileLinker, LinkOutcome};

/// Symlink every declared dotfile into `$HOME`, backing up real files.
///
/// Entries are independent: a missing source is a warning, a failed entry is
/// reported and the remaining entries still run. The task fails at the end
/// if any entry failed.
#[derive(Debug)]
pub struct LinkDotfiles;

impl Task for LinkDotfiles {
    fn name(&self) -> &'static str {
        "Link dotfiles"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        ctx.selection.dotfiles
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        if ctx.config.dotfiles.is_empty() {
            return Ok(TaskResult::Skipped("no dotfiles declared".to_string()));
        }

        let linker = DotfileLinker::new(&ctx.config.dotfiles_dir(), &ctx.home);
        let mut stats = TaskStats::new();
        let mut failed = 0usize;

        for link in &ctx.config.dotfiles {
            let dest = linker.resolve_destination(&link.destination);
            let outcome = if ctx.dry_run {
                linker.preview(&link.source, &link.destination)
            } else {
                linker.link(&link.source, &link.destination)
            };

            let line = format!("{}: {outcome}", dest.display());
            match &outcome {
                LinkOutcome::AlreadyCorrect => {
                    stats.already_ok += 1;
                    ctx.log.info(&line);
                }
                LinkOutcome::SourceMissing => {
                    stats.skipped += 1;
                    ctx.log.warn(&format!(
                        "{}: source {} missing, skipped",
                        dest.display(),
                        linker.resolve_source(&link.source).display()
                    ));
                }
                LinkOutcome::Failed(_) => {
                    failed += 1;
                    ctx.log.error(&line);
                }
                LinkOutcome::Created
                | LinkOutcome::Updated
                | LinkOutcome::BackedUpAndCreated { .. } => {
                    stats.changed += 1;
                    if ctx.dry_run {
                        ctx.log.dry_run(&format!("{}: would be {outcome}", dest.display()));
                    } else {
                        ctx.log.info(&line);
                    }
                }
            }
        }

        if failed > 0 {
            ctx.log.info(&stats.summary(ctx.dry_run));
            return Err(TaskError::ExecutionFailed {
                task: self.name().to_string(),
                reason: format!("{failed} of {} links failed", ctx.config.dotfiles.len()),
            }
            .into());
        }
        Ok(stats.finish(ctx))
    }
}
