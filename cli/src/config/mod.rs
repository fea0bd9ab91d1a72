//! Configuration loaded from the repository's `conf/` directory.
pub mod dotfiles;
pub mod models;
pub mod packages;
pub mod selection;
pub mod toml_loader;
pub mod validation;

use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// All configuration for one run.
///
/// Loaded once at startup and shared read-only by every task.
#[derive(Debug, Clone)]
pub struct Config {
    /// Repository root.
    pub root: PathBuf,
    /// Selectable package groups.
    pub groups: packages::PackageGroups,
    /// Generic-to-distro package name table.
    pub aliases: packages::PackageTable,
    /// Dotfile link declarations, in order.
    pub dotfiles: Vec<dotfiles::DotfileLink>,
    /// Local model catalogue, in order.
    pub models: Vec<models::Model>,
}

impl Config {
    /// Load all configuration from `<root>/conf/`.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration file exists but cannot be read
    /// or parsed.
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let conf = root.join("conf");

        let packages = packages::load(&conf.join("packages.toml"))?;
        let dotfiles = dotfiles::load(&conf.join("dotfiles.toml"))?;
        let models = models::load(&conf.join("models.toml"))?;

        Ok(Self {
            root: root.to_path_buf(),
            groups: packages.groups,
            aliases: packages.aliases,
            dotfiles,
            models,
        })
    }

    /// Directory holding dotfile sources.
    #[must_use]
    pub fn dotfiles_dir(&self) -> PathBuf {
        self.root.join("config")
    }

    /// Look up a model by its menu id.
    #[must_use]
    pub fn model(&self, id: &str) -> Option<&models::Model> {
        self.models.iter().find(|m| m.id == id)
    }

    /// Validate the loaded configuration.
    #[must_use]
    pub fn validate(&self) -> Vec<validation::ValidationWarning> {
        use validation::{DotfileValidator, ModelValidator, PackageValidator};

        validation::validate_all(
            &self.root,
            &[
                &DotfileValidator::new(&self.dotfiles),
                &PackageValidator::new(&self.groups, &self.aliases),
                &ModelValidator::new(&self.models),
            ],
        )
    }
}
