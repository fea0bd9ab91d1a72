//! What a run should install, built from flags or the interactive menu.
use super::Config;

/// The user's choices for a single run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// Refresh package indexes before installing.
    pub update_system: bool,
    /// Selected generic names from the base group.
    pub base: Vec<String>,
    /// Selected generic names from the extra group.
    pub extra: Vec<String>,
    /// Link dotfiles into `$HOME`.
    pub dotfiles: bool,
    /// Selected model ids.
    pub models: Vec<String>,
    /// Set up the cloud AI wrapper.
    pub cloud_ai: bool,
}

impl Selection {
    /// Initial state: every package, dotfiles and cloud AI on; no system
    /// update and no local models.
    #[must_use]
    pub fn defaults(config: &Config) -> Self {
        Self {
            update_system: false,
            base: config.groups.base.iter().map(|p| p.name.clone()).collect(),
            extra: config.groups.extra.iter().map(|p| p.name.clone()).collect(),
            dotfiles: true,
            models: Vec::new(),
            cloud_ai: true,
        }
    }

    /// Packages (and the shell framework that follows them) without
    /// dotfiles or AI tooling.
    #[must_use]
    pub fn packages_only(config: &Config) -> Self {
        Self {
            dotfiles: false,
            cloud_ai: false,
            ..Self::defaults(config)
        }
    }

    /// Only link dotfiles.
    #[must_use]
    pub const fn dotfiles_only() -> Self {
        Self {
            update_system: false,
            base: Vec::new(),
            extra: Vec::new(),
            dotfiles: true,
            models: Vec::new(),
            cloud_ai: false,
        }
    }

    /// Selected generic package names, base group first.
    #[must_use]
    pub fn packages(&self) -> Vec<String> {
        self.base.iter().chain(&self.extra).cloned().collect()
    }

    /// Whether the shell framework should be installed.
    #[must_use]
    pub fn wants_zsh(&self) -> bool {
        self.base.iter().any(|p| p == "zsh")
    }
}

/// Flip `name` in `selected`, keeping the result in `catalogue` order.
///
/// Names not present in `catalogue` are ignored.
pub fn toggle(selected: &mut Vec<String>, name: &str, catalogue: &[&str]) {
    if !catalogue.contains(&name) {
        return;
    }
    let was_selected = selected.iter().any(|s| s == name);
    *selected = catalogue
        .iter()
        .filter(|&&item| {
            let on = selected.iter().any(|s| s == item);
            if item == name { !was_selected } else { on }
        })
        .map(|item| (*item).to_string())
        .collect();
}
