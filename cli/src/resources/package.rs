//! Native package managers and package-related fixups.
use anyhow::{Context as _, Result};
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

use super::fs::{ensure_parent_dir, entry_exists};
use super::{Applicable, Resource, ResourceChange, ResourceState};
use crate::error::ExecError;
use crate::exec::Executor;

/// Supported package managers, one per distribution family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    /// Debian/Ubuntu (`apt`, queried through `dpkg`).
    Apt,
    /// Alpine (`apk`).
    Apk,
    /// Fedora/RHEL (`dnf`, queried through `rpm`).
    Dnf,
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Apt => write!(f, "apt"),
            Self::Apk => write!(f, "apk"),
            Self::Dnf => write!(f, "dnf"),
        }
    }
}

impl PackageManager {
    /// Arguments (after `sudo`) that refresh the package indexes.
    const fn update_args(self) -> &'static [&'static str] {
        match self {
            Self::Apt => &["apt", "update", "-qq"],
            Self::Apk => &["apk", "update"],
            Self::Dnf => &["dnf", "makecache"],
        }
    }

    /// Arguments (after `sudo`, before package names) that install packages
    /// non-interactively.
    const fn install_args(self) -> &'static [&'static str] {
        match self {
            Self::Apt => &["apt", "install", "-y"],
            Self::Apk => &["apk", "add", "--no-cache"],
            Self::Dnf => &["dnf", "install", "-y"],
        }
    }

    /// Local query (program, flags) that succeeds only when a package is
    /// installed.
    const fn query(self) -> (&'static str, &'static [&'static str]) {
        match self {
            Self::Apt => ("dpkg", &["-s"]),
            Self::Apk => ("apk", &["info", "-e"]),
            Self::Dnf => ("rpm", &["-q"]),
        }
    }

    /// Refresh the package indexes.
    ///
    /// # Errors
    ///
    /// Returns an error if the package manager cannot be run or exits
    /// non-zero.
    pub fn update(self, executor: &dyn Executor) -> Result<(), ExecError> {
        executor.run("sudo", self.update_args()).map(drop)
    }

    /// Whether `name` is already installed, according to the local
    /// package database.
    #[must_use]
    pub fn is_installed(self, executor: &dyn Executor, name: &str) -> bool {
        let (program, flags) = self.query();
        let mut args = flags.to_vec();
        args.push(name);
        executor
            .run_unchecked(program, &args)
            .is_ok_and(|r| r.success)
    }

    /// Names from `names` not yet installed, in order and without duplicates.
    #[must_use]
    pub fn missing<'a>(self, executor: &dyn Executor, names: &[&'a str]) -> Vec<&'a str> {
        let mut seen = HashSet::new();
        names
            .iter()
            .copied()
            .filter(|name| seen.insert(*name))
            .filter(|name| !self.is_installed(executor, name))
            .collect()
    }

    /// Install already-translated package names in one invocation.
    ///
    /// # Errors
    ///
    /// Returns an error if the package manager cannot be run or exits
    /// non-zero.
    pub fn install(self, executor: &dyn Executor, names: &[&str]) -> Result<(), ExecError> {
        if names.is_empty() {
            return Ok(());
        }
        let args: Vec<&str> = self
            .install_args()
            .iter()
            .copied()
            .chain(names.iter().copied())
            .collect();
        executor.run("sudo", &args).map(drop)
    }
}

/// Default location of Debian's renamed `bat` binary.
pub const BATCAT_BIN: &str = "/usr/bin/batcat";

/// `~/.local/bin/bat` → `/usr/bin/batcat`, for Debian where the `bat`
/// package ships its binary as `batcat`.
#[derive(Debug, Clone)]
pub struct BatcatAlias {
    batcat: PathBuf,
    link: PathBuf,
}

impl BatcatAlias {
    /// Alias inside `home` pointing at [`BATCAT_BIN`].
    #[must_use]
    pub fn new(home: &Path) -> Self {
        Self::at(Path::new(BATCAT_BIN), &home.join(".local/bin/bat"))
    }

    /// Alias with explicit paths.
    #[must_use]
    pub fn at(batcat: &Path, link: &Path) -> Self {
        Self {
            batcat: batcat.to_path_buf(),
            link: link.to_path_buf(),
        }
    }
}

impl Applicable for BatcatAlias {
    fn description(&self) -> String {
        format!("{} -> {}", self.link.display(), self.batcat.display())
    }

    fn apply(&self) -> Result<ResourceChange> {
        ensure_parent_dir(&self.link)
            .with_context(|| format!("create parent: {}", self.link.display()))?;
        std::os::unix::fs::symlink(&self.batcat, &self.link)
            .with_context(|| format!("create link: {}", self.link.display()))?;
        Ok(ResourceChange::Applied)
    }
}

impl Resource for BatcatAlias {
    fn current_state(&self) -> Result<ResourceState> {
        if !self.batcat.exists() {
            return Ok(ResourceState::Invalid {
                reason: format!("{} not installed", self.batcat.display()),
            });
        }
        // Anything already named `bat` is left alone.
        if entry_exists(&self.link) {
            Ok(ResourceState::Correct)
        } else {
            Ok(ResourceState::Missing)
        }
    }
}
