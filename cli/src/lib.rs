//! Personal Linux environment bootstrapper.
//!
//! Detects the distribution family, installs packages through its package
//! manager, sets up Oh My Zsh, symlinks dotfiles from the repository into
//! `$HOME` and optionally provisions local (Ollama) and cloud (Gemini) AI
//! tooling. Everything is driven by TOML files in `conf/`.
//!
//! The public API is organised into four layers:
//!
//! - **[`config`]**: parse and validate the TOML files, build a selection
//! - **[`resources`]**: idempotent `check + apply` primitives (symlinks, packages, …)
//! - **[`tasks`]**: named, ordered units of work wired to resources
//! - **[`commands`]**: setup, the interactive menu and task orchestration
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod exec;
pub mod logging;
pub mod platform;
pub mod resources;
pub mod signal;
pub mod tasks;

/// Version reported in the banner and the log header.
pub const VERSION: &str = match option_env!("BRAINBASH_VERSION") {
    Some(version) => version,
    None => env!("CARGO_PKG_VERSION"),
};
