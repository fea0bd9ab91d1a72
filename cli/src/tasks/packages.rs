use anyhow::{Context as _, Result};

use super::{Context, FailurePolicy, Task, TaskResult};
use crate::platform::Distro;
use crate::resources::package::BatcatAlias;
use crate::resources::{Applicable as _, Resource as _, ResourceChange, ensure};

/// Install the selected base and extra packages.
///
/// Generic names are translated for the detected distribution, packages the
/// local database already reports as installed are dropped, and the rest are
/// installed in a single package manager invocation.
#[derive(Debug)]
pub struct InstallPackages;

impl Task for InstallPackages {
    fn name(&self) -> &'static str {
        "Install packages"
    }

    fn policy(&self) -> FailurePolicy {
        FailurePolicy::Abort
    }

    fn should_run(&self, ctx: &Context) -> bool {
        !ctx.selection.base.is_empty() || !ctx.selection.extra.is_empty()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let generics = ctx.selection.packages();
        let names = ctx.config.aliases.resolve_all(&generics, ctx.distro.id());
        for (generic, name) in generics.iter().zip(&names) {
            if generic != name {
                ctx.log.debug(&format!("{generic} -> {name}"));
            }
        }

        let manager = ctx.distro.package_manager();
        let missing = manager.missing(&*ctx.executor, &names);
        ctx.log.debug(&format!(
            "{} of {} packages not installed",
            missing.len(),
            names.len()
        ));

        if missing.is_empty() {
            ctx.log.info("all selected packages already installed");
        } else if ctx.dry_run {
            ctx.log
                .dry_run(&format!("{manager} install {}", missing.join(" ")));
        } else {
            ctx.log.info(&format!("installing {}", missing.join(" ")));
            manager
                .install(&*ctx.executor, &missing)
                .with_context(|| format!("{manager} install failed"))?;
        }

        if ctx.distro == Distro::Debian {
            link_batcat(ctx);
        }

        if ctx.dry_run && !missing.is_empty() {
            Ok(TaskResult::DryRun)
        } else {
            Ok(TaskResult::Ok)
        }
    }
}

/// Expose Debian's `batcat` as `bat`. Problems are reported, not fatal.
fn link_batcat(ctx: &Context) {
    let alias = BatcatAlias::new(&ctx.home);
    if ctx.dry_run {
        if alias.needs_change().unwrap_or(false) {
            ctx.log.dry_run(&format!("link {}", alias.description()));
        }
        return;
    }
    match ensure(&alias) {
        Ok(ResourceChange::Applied) => ctx.log.info(&format!("linked {}", alias.description())),
        Ok(ResourceChange::AlreadyCorrect) => ctx.log.debug("bat already available"),
        Ok(ResourceChange::Skipped { reason }) => ctx.log.debug(&format!("bat alias: {reason}")),
        Err(e) => ctx.log.warn(&format!("bat alias: {e:#}")),
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::config::packages::{PackageAlias, PackageEntry};
    use crate::config::selection::Selection;
    use crate::exec::Executor;
    use crate::resources::test_helpers::RecordingExecutor;
    use crate::tasks::test_helpers::{empty_config, make_context};
    use std::path::PathBuf;
    use std::sync::Arc;

    fn config() -> Config {
        let mut config = empty_config(PathBuf::from("/repo"));
        config.groups.base = vec![PackageEntry::named("git"), PackageEntry::named("python-dev")];
        config.groups.extra = vec![PackageEntry::named("eza")];
        config.aliases = [(
            "python-dev".to_string(),
            PackageAlias::with_default("python-dev").with_override("debian", "python3-dev"),
        )]
        .into_iter()
        .collect();
        config
    }

    fn context(exec: &Arc<RecordingExecutor>, distro: Distro) -> (Context, tempfile::TempDir) {
        let home = tempfile::tempdir().unwrap();
        let config = config();
        let selection = Selection::packages_only(&config);
        let (mut ctx, _) = make_context(
            config,
            selection,
            home.path().to_path_buf(),
            Arc::clone(exec) as Arc<dyn Executor>,
        );
        ctx.distro = distro;
        (ctx, home)
    }

    #[test]
    fn skipped_when_nothing_selected() {
        let exec = Arc::new(RecordingExecutor::new());
        let (mut ctx, _home) = context(&exec, Distro::Debian);
        ctx.selection = Selection::dotfiles_only();
        assert!(!InstallPackages.should_run(&ctx));
    }

    #[test]
    fn installs_only_missing_translated_names() {
        let exec = Arc::new(
            RecordingExecutor::new()
                .failing("dpkg -s python3-dev")
                .failing("dpkg -s eza"),
        );
        let (ctx, _home) = context(&exec, Distro::Debian);
        assert!(matches!(InstallPackages.run(&ctx).unwrap(), TaskResult::Ok));

        let commands = exec.commands();
        assert!(commands.contains(&"dpkg -s git".to_string()));
        assert!(commands.contains(&"sudo apt install -y python3-dev eza".to_string()));
    }

    #[test]
    fn alpine_uses_default_alias() {
        let exec = Arc::new(RecordingExecutor::new().failing("apk info"));
        let (ctx, _home) = context(&exec, Distro::Alpine);
        InstallPackages.run(&ctx).unwrap();
        assert!(
            exec.commands()
                .contains(&"sudo apk add --no-cache git python-dev eza".to_string())
        );
    }

    #[test]
    fn nothing_missing_installs_nothing() {
        let exec = Arc::new(RecordingExecutor::new());
        let (ctx, _home) = context(&exec, Distro::Fedora);
        assert!(matches!(InstallPackages.run(&ctx).unwrap(), TaskResult::Ok));
        assert!(!exec.commands().iter().any(|c| c.starts_with("sudo")));
    }

    #[test]
    fn dry_run_reports_without_installing() {
        let exec = Arc::new(RecordingExecutor::new().failing("rpm -q"));
        let (mut ctx, _home) = context(&exec, Distro::Fedora);
        ctx.dry_run = true;
        assert!(matches!(InstallPackages.run(&ctx).unwrap(), TaskResult::DryRun));
        assert!(!exec.commands().iter().any(|c| c.starts_with("sudo")));
    }

    #[test]
    fn install_failure_is_an_error() {
        let exec = Arc::new(RecordingExecutor::new().failing("rpm -q").failing("sudo dnf"));
        let (ctx, _home) = context(&exec, Distro::Fedora);
        let err = InstallPackages.run(&ctx).unwrap_err();
        assert!(format!("{err:#}").contains("dnf install failed"));
    }
}
