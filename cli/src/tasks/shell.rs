use anyhow::Result;

use super::{Context, Task, TaskResult};
use crate::resources::shell::OhMyZshResource;
use crate::resources::{Applicable as _, Resource as _, ResourceChange, ensure};

/// Install Oh My Zsh when zsh is part of the selection.
#[derive(Debug)]
pub struct InstallOhMyZsh;

impl Task for InstallOhMyZsh {
    fn name(&self) -> &'static str {
        "Install Oh My Zsh"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        ctx.selection.wants_zsh()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let omz = OhMyZshResource::new(&ctx.home, &*ctx.executor);

        if ctx.dry_run {
            if omz.needs_change()? {
                ctx.log.dry_run(&format!("install {}", omz.description()));
                return Ok(TaskResult::DryRun);
            }
            ctx.log.info("oh-my-zsh already installed");
            return Ok(TaskResult::Ok);
        }

        match ensure(&omz)? {
            ResourceChange::Applied => {
                ctx.log.info(&format!("installed {}", omz.description()));
                Ok(TaskResult::Ok)
            }
            ResourceChange::AlreadyCorrect => {
                ctx.log.info("oh-my-zsh already installed");
                Ok(TaskResult::Ok)
            }
            ResourceChange::Skipped { reason } => Ok(TaskResult::Skipped(reason)),
        }
    }
}
