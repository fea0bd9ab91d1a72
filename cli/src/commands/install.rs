use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;

use super::menu::Menu;
use super::{CommandSetup, run_tasks_to_completion};
use crate::cli::{Cli, GlobalOpts, Mode, SelectionOpts};
use crate::config::Config;
use crate::config::selection::{Selection, toggle};
use crate::error::ConfigError;
use crate::exec::{Executor, SystemExecutor};
use crate::logging::{Log, Logger};
use crate::signal;
use crate::tasks::{self, Context};

/// Environment variable naming the repository root.
pub const ROOT_ENV: &str = "BRAINBASH_ROOT";

/// Run the bootstrapper: build a selection from flags or the menu, then
/// execute every install task.
///
/// # Errors
///
/// Returns an error if setup fails, the menu cannot read its input, or any
/// task fails.
pub fn run(cli: &Cli, log: &Arc<Logger>) -> Result<()> {
    log.info(&format!("brainbash {}", crate::VERSION));

    let CommandSetup { distro, config } = CommandSetup::init(&cli.global, log)?;

    let mode = cli.mode.mode();
    let initial = initial_selection(mode, &cli.selection, &config, log);
    let selection = if mode == Mode::Menu {
        let stdin = io::stdin();
        match Menu::new(&config, stdin.lock(), io::stdout()).run(initial)? {
            Some(selection) => selection,
            None => {
                log.info("nothing installed");
                return Ok(());
            }
        }
    } else {
        initial
    };

    if cli.global.dry_run {
        log.info("dry run: no changes will be made");
    }

    signal::set_installing(true);
    let executor: Arc<dyn Executor> = Arc::new(SystemExecutor::with_timeout(Duration::from_secs(
        cli.global.timeout,
    )));
    let ctx = Context::new(
        Arc::new(config),
        selection,
        distro,
        Arc::clone(log) as Arc<dyn Log>,
        cli.global.dry_run,
        executor,
    )?;

    let result = run_tasks_to_completion(&tasks::all_install_tasks(), &ctx, log);
    signal::set_installing(false);
    result
}

/// Starting selection for `mode`, adjusted by the selection flags.
///
/// `--update` applies to every mode that installs packages. `--models` and
/// `--no-cloud-ai` apply to the full run and the menu. Model ids missing
/// from the catalogue are reported and dropped.
pub fn initial_selection(
    mode: Mode,
    opts: &SelectionOpts,
    config: &Config,
    log: &Logger,
) -> Selection {
    let mut selection = match mode {
        Mode::All | Mode::Menu => Selection::defaults(config),
        Mode::Packages => Selection::packages_only(config),
        Mode::Dotfiles => return Selection::dotfiles_only(),
    };

    selection.update_system |= opts.update;
    if mode == Mode::Packages {
        return selection;
    }

    let catalogue: Vec<&str> = config.models.iter().map(|m| m.id.as_str()).collect();
    for id in &opts.models {
        if !catalogue.contains(&id.as_str()) {
            log.warn(&format!("unknown model '{id}', ignored"));
        } else if !selection.models.contains(id) {
            toggle(&mut selection.models, id, &catalogue);
        }
    }
    if opts.no_cloud_ai {
        selection.cloud_ai = false;
    }
    selection
}

/// Resolve the repository root directory.
///
/// Order: `--root`, then `$BRAINBASH_ROOT`, then the binary's location
/// (`target/<profile>/`, `cli/target/<profile>/` or `bin/` inside the
/// repository), then the current directory when it contains `conf/`.
///
/// # Errors
///
/// Returns [`ConfigError::RootNotFound`] if no candidate applies, or
/// [`ConfigError::Io`] if the chosen root cannot be canonicalised.
pub fn resolve_root(global: &GlobalOpts) -> Result<PathBuf, ConfigError> {
    let env_root = std::env::var_os(ROOT_ENV).map(PathBuf::from);
    let exe = std::env::current_exe().ok();
    let cwd = std::env::current_dir().ok();
    locate_root(
        global.root.as_deref(),
        env_root.as_deref(),
        exe.as_deref(),
        cwd.as_deref(),
    )
}

fn locate_root(
    explicit: Option<&Path>,
    env_root: Option<&Path>,
    exe: Option<&Path>,
    cwd: Option<&Path>,
) -> Result<PathBuf, ConfigError> {
    if let Some(root) = explicit.or(env_root) {
        return canonical(root);
    }

    if let Some(parent) = exe.and_then(Path::parent) {
        // target/<profile>/, cli/target/<profile>/ or bin/
        for candidate in [
            parent.join("../.."),
            parent.join("../../.."),
            parent.join(".."),
        ] {
            if candidate.join("conf").is_dir() {
                return canonical(&candidate);
            }
        }
    }

    if let Some(cwd) = cwd
        && cwd.join("conf").is_dir()
    {
        return canonical(cwd);
    }

    Err(ConfigError::RootNotFound)
}

fn canonical(path: &Path) -> Result<PathBuf, ConfigError> {
    dunce::canonicalize(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}
