// Shared helpers for integration tests.
//
// Provides a temporary repository plus home directory, a fluent builder for
// its `conf/` and `config/` contents, and a recording executor so whole runs
// can be driven without touching the host system.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use brainbash_cli::config::Config;
use brainbash_cli::config::selection::Selection;
use brainbash_cli::error::ExecError;
use brainbash_cli::exec::{ExecResult, Executor};
use brainbash_cli::logging::{Log, Logger};
use brainbash_cli::platform::Distro;
use brainbash_cli::tasks::Context;

/// Packages, dotfiles and models matching the shipped configuration layout.
pub const PACKAGES_TOML: &str = r#"
[groups]
base = [
    { name = "git", description = "Version control" },
    { name = "zsh", description = "Z shell" },
    "python-dev",
]
extra = ["bat", "fzf"]

[aliases.python-dev]
debian = "python3-dev"
fedora = "python3-devel"
default = "python3-dev"
"#;

pub const DOTFILES_TOML: &str = r#"
[[links]]
source = "zshrc"
destination = ".zshrc"

[[links]]
source = "kitty.conf"
destination = ".config/kitty/kitty.conf"
"#;

pub const MODELS_TOML: &str = r#"
[[models]]
id = "qwen"
tag = "qwen3:0.6b"
description = "Qwen 3, 0.6B"

[[models]]
id = "gemma"
tag = "gemma3:1b"
"#;

/// An isolated repository and home directory backed by a [`tempfile::TempDir`].
pub struct TestRepo {
    dir: tempfile::TempDir,
}

impl TestRepo {
    /// Repository with empty `conf/` and `config/` directories.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        std::fs::create_dir_all(dir.path().join("repo/conf")).expect("create conf dir");
        std::fs::create_dir_all(dir.path().join("repo/config")).expect("create config dir");
        std::fs::create_dir_all(dir.path().join("home")).expect("create home dir");
        Self { dir }
    }

    /// Repository with the standard packages, dotfiles and models files and
    /// every dotfile source present.
    pub fn standard() -> Self {
        Self::new()
            .with_config_file("packages.toml", PACKAGES_TOML)
            .with_config_file("dotfiles.toml", DOTFILES_TOML)
            .with_config_file("models.toml", MODELS_TOML)
            .with_source("zshrc", "# zshrc\n")
            .with_source("kitty.conf", "# kitty\n")
    }

    /// Write `content` to `conf/<filename>`.
    pub fn with_config_file(self, filename: &str, content: &str) -> Self {
        std::fs::write(self.root().join("conf").join(filename), content)
            .expect("write config file");
        self
    }

    /// Write a dotfile source under `config/`.
    pub fn with_source(self, source: &str, content: &str) -> Self {
        let path = self.root().join("config").join(source);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create source parent");
        }
        std::fs::write(&path, content).expect("write dotfile source");
        self
    }

    pub fn root(&self) -> PathBuf {
        self.dir.path().join("repo")
    }

    pub fn home(&self) -> PathBuf {
        self.dir.path().join("home")
    }

    pub fn load_config(&self) -> Config {
        Config::load(&self.root()).expect("load config")
    }

    /// Task context on `distro` for `selection`, with a logger that writes
    /// no file.
    pub fn context(
        &self,
        distro: Distro,
        selection: Selection,
        executor: Arc<dyn Executor>,
    ) -> (Context, Arc<Logger>) {
        let log = Arc::new(Logger::with_log_file(None));
        let ctx = Context {
            config: Arc::new(self.load_config()),
            selection,
            distro,
            log: Arc::clone(&log) as Arc<dyn Log>,
            dry_run: false,
            home: self.home(),
            executor,
        };
        (ctx, log)
    }
}

/// Records every command line; commands starting with a failing prefix
/// exit 1, everything else exits 0 with empty output.
#[derive(Debug, Default)]
pub struct ScriptedExecutor {
    calls: Mutex<Vec<String>>,
    failing: Vec<String>,
    on_path: Vec<String>,
}

impl ScriptedExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Command lines starting with `prefix` fail.
    pub fn failing(mut self, prefix: &str) -> Self {
        self.failing.push(prefix.to_string());
        self
    }

    /// Programs reported as present on `PATH`.
    pub fn with_which(mut self, programs: &[&str]) -> Self {
        self.on_path = programs.iter().map(ToString::to_string).collect();
        self
    }

    pub fn commands(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock").clone()
    }
}

impl Executor for ScriptedExecutor {
    fn run_unchecked(&self, program: &str, args: &[&str]) -> Result<ExecResult, ExecError> {
        let line = std::iter::once(program)
            .chain(args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ");
        let success = !self.failing.iter().any(|p| line.starts_with(p.as_str()));
        self.calls.lock().expect("calls lock").push(line);
        Ok(ExecResult {
            stdout: String::new(),
            stderr: if success { String::new() } else { "scripted failure".to_string() },
            success,
            code: Some(i32::from(!success)),
        })
    }

    fn which(&self, program: &str) -> bool {
        self.on_path.iter().any(|p| p == program)
    }
}

/// Whether `path` is a symlink pointing exactly at `target`.
pub fn links_to(path: &Path, target: &Path) -> bool {
    std::fs::read_link(path).is_ok_and(|t| t == target)
}
