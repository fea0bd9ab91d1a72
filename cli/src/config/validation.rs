//! Non-fatal configuration checks reported as warnings before a run.
use std::collections::HashSet;
use std::path::Path;

use super::dotfiles::DotfileLink;
use super::models::Model;
use super::packages::{PackageGroups, PackageTable};

/// A validation warning detected during configuration loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// The configuration source (e.g., "dotfiles.toml", "packages.toml").
    pub source: String,
    /// The specific item or section that triggered the warning.
    pub item: String,
    /// Human-readable warning message.
    pub message: String,
}

impl ValidationWarning {
    /// Build a warning.
    #[must_use]
    pub fn new(
        source: impl Into<String>,
        item: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            item: item.into(),
            message: message.into(),
        }
    }
}

/// Trait for configuration validators.
pub trait ConfigValidator {
    /// Validate the configuration and return any warnings found.
    fn validate(&self, root: &Path) -> Vec<ValidationWarning>;

    /// Short name of the validated area (e.g., "dotfiles").
    fn name(&self) -> &'static str;
}

/// Validator for dotfile link declarations.
#[derive(Debug)]
pub struct DotfileValidator<'a> {
    links: &'a [DotfileLink],
}

impl<'a> DotfileValidator<'a> {
    /// Validate `links`.
    #[must_use]
    pub const fn new(links: &'a [DotfileLink]) -> Self {
        Self { links }
    }
}

impl ConfigValidator for DotfileValidator<'_> {
    fn validate(&self, root: &Path) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();
        let config_dir = root.join("config");

        for link in self.links {
            if Path::new(&link.source).is_absolute() {
                warnings.push(ValidationWarning::new(
                    "dotfiles.toml",
                    &link.source,
                    "source path should be relative to config/ directory",
                ));
            } else if !config_dir.join(&link.source).exists() {
                warnings.push(ValidationWarning::new(
                    "dotfiles.toml",
                    &link.source,
                    format!(
                        "source file does not exist: {}",
                        config_dir.join(&link.source).display()
                    ),
                ));
            }

            if Path::new(&link.destination).is_absolute() {
                warnings.push(ValidationWarning::new(
                    "dotfiles.toml",
                    &link.destination,
                    "destination should be relative to the home directory",
                ));
            }
        }

        warnings
    }

    fn name(&self) -> &'static str {
        "dotfiles"
    }
}

/// Validator for package groups and the alias table.
#[derive(Debug)]
pub struct PackageValidator<'a> {
    groups: &'a PackageGroups,
    aliases: &'a PackageTable,
}

impl<'a> PackageValidator<'a> {
    /// Validate `groups` and `aliases`.
    #[must_use]
    pub const fn new(groups: &'a PackageGroups, aliases: &'a PackageTable) -> Self {
        Self { groups, aliases }
    }
}

impl ConfigValidator for PackageValidator<'_> {
    fn validate(&self, _root: &Path) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();
        let mut seen = HashSet::new();

        for entry in self.groups.base.iter().chain(&self.groups.extra) {
            if entry.name.trim().is_empty() {
                warnings.push(ValidationWarning::new(
                    "packages.toml",
                    &entry.name,
                    "package name is empty",
                ));
            } else if !seen.insert(entry.name.as_str()) {
                warnings.push(ValidationWarning::new(
                    "packages.toml",
                    &entry.name,
                    "package listed in more than one group entry",
                ));
            }
        }

        for (generic, alias) in self.aliases.entries() {
            let empty = alias
                .overrides
                .iter()
                .filter(|(_, name)| name.trim().is_empty())
                .map(|(distro, _)| distro.as_str())
                .chain(
                    alias
                        .default
                        .as_deref()
                        .filter(|d| d.trim().is_empty())
                        .map(|_| "default"),
                );
            for key in empty {
                warnings.push(ValidationWarning::new(
                    "packages.toml",
                    format!("aliases.{generic}.{key}"),
                    "alias resolves to an empty package name",
                ));
            }
        }

        warnings
    }

    fn name(&self) -> &'static str {
        "packages"
    }
}

/// Validator for the model catalogue.
#[derive(Debug)]
pub struct ModelValidator<'a> {
    models: &'a [Model],
}

impl<'a> ModelValidator<'a> {
    /// Validate `models`.
    #[must_use]
    pub const fn new(models: &'a [Model]) -> Self {
        Self { models }
    }
}

impl ConfigValidator for ModelValidator<'_> {
    fn validate(&self, _root: &Path) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();
        let mut seen = HashSet::new();

        for model in self.models {
            if !seen.insert(model.id.as_str()) {
                warnings.push(ValidationWarning::new(
                    "models.toml",
                    &model.id,
                    "duplicate model id",
                ));
            }
            if model.tag.trim().is_empty() {
                warnings.push(ValidationWarning::new(
                    "models.toml",
                    &model.id,
                    "model tag is empty",
                ));
            }
        }

        warnings
    }

    fn name(&self) -> &'static str {
        "models"
    }
}

/// Run every validator against `root` and collect the warnings.
#[must_use]
pub fn validate_all(root: &Path, validators: &[&dyn ConfigValidator]) -> Vec<ValidationWarning> {
    validators.iter().flat_map(|v| v.validate(root)).collect()
}
