use anyhow::Result;

use super::{Context, Task, TaskResult};
use crate::resources::cloud_ai::{CloudAiLayout, PipPackage, SDK_PACKAGE, VirtualEnv, WrapperScript};
use crate::resources::{Applicable as _, Resource as _, ResourceChange, ensure};

/// Where to get an API key for the wrapper.
const API_KEY_HINT: &str =
    "get an API key at aistudio.google.com and add `export GEMINI_API_KEY=...` to ~/.zshrc";

/// Set up the Gemini command-line wrapper in `~/.gemini-cli`.
#[derive(Debug)]
pub struct ConfigureCloudAi;

impl Task for ConfigureCloudAi {
    fn name(&self) -> &'static str {
        "Configure cloud AI"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        ctx.selection.cloud_ai
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let layout = CloudAiLayout::new(&ctx.home);
        let executor = &*ctx.executor;
        let venv = VirtualEnv::new(&layout.venv, executor);
        let pip = PipPackage::new(&layout.pip(), SDK_PACKAGE, executor);
        let script = WrapperScript::new(&layout.script);

        if ctx.dry_run {
            if venv.needs_change()? {
                ctx.log.dry_run(&format!("create {}", venv.description()));
            }
            ctx.log.dry_run(&format!("install {}", pip.description()));
            if script.needs_change()? {
                ctx.log.dry_run(&format!("write {}", script.description()));
            }
            return Ok(TaskResult::DryRun);
        }

        if ensure(&venv)? == ResourceChange::Applied {
            ctx.log.info(&format!("created {}", venv.description()));
        }
        ctx.log.info(&format!("installing {SDK_PACKAGE}"));
        pip.apply()?;
        if ensure(&script)? == ResourceChange::Applied {
            ctx.log.info(&format!("wrote {}", script.description()));
        } else {
            ctx.log.debug("wrapper script already present");
        }

        ctx.log.info(&format!(
            "cloud AI configured in {}",
            layout.venv.parent().unwrap_or(&layout.venv).display()
        ));
        ctx.log.info(API_KEY_HINT);
        Ok(TaskResult::Ok)
    }
}
