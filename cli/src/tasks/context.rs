use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;

use crate::config::Config;
use crate::config::selection::Selection;
use crate::exec::Executor;
use crate::logging::Log;
use crate::platform::Distro;

/// Shared context for task execution.
pub struct Context {
    /// Configuration loaded from `conf/`.
    pub config: Arc<Config>,
    /// What this run installs.
    pub selection: Selection,
    /// Detected distribution family.
    pub distro: Distro,
    /// Logger for output and task recording.
    pub log: Arc<dyn Log>,
    /// Whether to perform a dry run (preview changes without applying).
    pub dry_run: bool,
    /// User's home directory path.
    pub home: PathBuf,
    /// Command executor (for testing or real system calls).
    pub executor: Arc<dyn Executor>,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("config", &"<Config>")
            .field("selection", &self.selection)
            .field("distro", &self.distro)
            .field("log", &"<dyn Log>")
            .field("dry_run", &self.dry_run)
            .field("home", &self.home)
            .field("executor", &"<dyn Executor>")
            .finish()
    }
}

impl Context {
    /// Creates a new context for task execution.
    ///
    /// # Errors
    ///
    /// Returns an error if the HOME environment variable is not set.
    pub fn new(
        config: Arc<Config>,
        selection: Selection,
        distro: Distro,
        log: Arc<dyn Log>,
        dry_run: bool,
        executor: Arc<dyn Executor>,
    ) -> Result<Self> {
        let home = std::env::var("HOME")
            .map_err(|_| anyhow::anyhow!("HOME environment variable is not set"))?;

        Ok(Self {
            config,
            selection,
            distro,
            log,
            dry_run,
            home: PathBuf::from(home),
            executor,
        })
    }
}
