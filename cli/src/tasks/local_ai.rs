use anyhow::{Context as _, Result};

use super::{Context, Task, TaskResult, TaskStats};
use crate::error::TaskError;
use crate::resources::ai::{OllamaModel, OllamaRuntime, installed_models};
use crate::resources::{Applicable as _, Resource as _, ResourceChange, ensure};

/// Install the Ollama runtime and pull the selected models.
///
/// The runtime is installed only when at least one model is selected. A
/// failed pull is reported and the next model still runs.
#[derive(Debug)]
pub struct InstallLocalAi;

impl Task for InstallLocalAi {
    fn name(&self) -> &'static str {
        "Install local AI"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        !ctx.selection.models.is_empty()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let tags: Vec<&str> = ctx
            .selection
            .models
            .iter()
            .filter_map(|id| {
                let model = ctx.config.model(id);
                if model.is_none() {
                    ctx.log.warn(&format!("unknown model '{id}', skipped"));
                }
                model.map(|m| m.tag.as_str())
            })
            .collect();
        if tags.is_empty() {
            return Ok(TaskResult::Skipped("no known models selected".to_string()));
        }

        let executor = &*ctx.executor;
        let runtime = OllamaRuntime::new(executor);
        if ctx.dry_run {
            if runtime.needs_change()? {
                ctx.log.dry_run("install ollama runtime");
            }
        } else if ensure(&runtime).context("ollama installation failed")?
            == ResourceChange::Applied
        {
            ctx.log.info("installed ollama runtime");
        }

        let installed = installed_models(executor);
        ctx.log
            .debug(&format!("{} models already present", installed.len()));

        let mut stats = TaskStats::new();
        let mut failed = 0usize;
        for tag in &tags {
            let model = OllamaModel::new(tag, &installed, executor);
            if !model.needs_change()? {
                stats.already_ok += 1;
                ctx.log.info(&format!("{} already present", model.description()));
                continue;
            }
            if ctx.dry_run {
                stats.changed += 1;
                ctx.log.dry_run(&format!("ollama pull {tag}"));
                continue;
            }
            ctx.log.info(&format!("pulling {tag}"));
            match model.apply() {
                Ok(_) => stats.changed += 1,
                Err(e) => {
                    failed += 1;
                    ctx.log.error(&format!("pull {tag} failed: {e:#}"));
                }
            }
        }

        if failed > 0 {
            ctx.log.info(&stats.summary(ctx.dry_run));
            return Err(TaskError::ExecutionFailed {
                task: self.name().to_string(),
                reason: format!("{failed} of {} models failed to download", tags.len()),
            }
            .into());
        }
        Ok(stats.finish(ctx))
    }
}
