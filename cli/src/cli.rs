use clap::{Args, Parser};

use crate::logging::Theme;

/// Default per-command timeout, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 900;

/// Top-level CLI entry point for the brainbash bootstrapper.
#[derive(Parser, Debug)]
#[command(
    name = "brainbash",
    about = "Personal Linux environment bootstrapper",
    long_about = "Installs packages, Oh My Zsh, dotfiles and optional AI tooling. \
                  Without --all, --packages or --dotfiles an interactive menu is shown.",
    disable_version_flag = true
)]
pub struct Cli {
    #[command(flatten)]
    pub mode: ModeOpts,

    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(flatten)]
    pub selection: SelectionOpts,

    /// Print shell completions and exit
    #[arg(long, value_name = "SHELL")]
    pub completions: Option<clap_complete::Shell>,

    /// Print version information and exit
    #[arg(long)]
    pub version: bool,
}

/// Non-interactive run modes. At most one may be given.
#[derive(Args, Debug, Clone, Default)]
#[group(multiple = false)]
pub struct ModeOpts {
    /// Install everything with default choices
    #[arg(long)]
    pub all: bool,

    /// Install packages (and Oh My Zsh) only
    #[arg(long)]
    pub packages: bool,

    /// Link dotfiles only
    #[arg(long)]
    pub dotfiles: bool,
}

/// How the run was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Everything, with default choices.
    All,
    /// Packages and shell framework.
    Packages,
    /// Dotfiles only.
    Dotfiles,
    /// Interactive menu.
    Menu,
}

impl ModeOpts {
    /// The selected mode; the menu when no mode flag is given.
    #[must_use]
    pub const fn mode(&self) -> Mode {
        if self.all {
            Mode::All
        } else if self.packages {
            Mode::Packages
        } else if self.dotfiles {
            Mode::Dotfiles
        } else {
            Mode::Menu
        }
    }
}

/// Options shared by every mode.
#[derive(Args, Debug, Clone)]
pub struct GlobalOpts {
    /// Accent colour for stage headers
    #[arg(long, value_enum, default_value_t = Theme::Blue)]
    pub theme: Theme,

    /// Preview changes without applying
    #[arg(short = 'd', long)]
    pub dry_run: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Override repository root directory
    #[arg(long)]
    pub root: Option<std::path::PathBuf>,

    /// Kill any external command still running after this many seconds
    #[arg(long, value_name = "SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,
}

/// Adjustments to the default selection.
#[derive(Args, Debug, Clone, Default)]
pub struct SelectionOpts {
    /// Refresh package indexes before installing
    #[arg(long)]
    pub update: bool,

    /// Local models to download (ids from conf/models.toml)
    #[arg(long, value_delimiter = ',', value_name = "ID")]
    pub models: Vec<String>,

    /// Skip the cloud AI wrapper
    #[arg(long)]
    pub no_cloud_ai: bool,
}
