//! Package groups and the generic-to-distro name table.
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

use super::toml_loader;
use crate::error::ConfigError;

/// Distro-specific spellings of one generic package name.
///
/// ```toml
/// [aliases.python-dev]
/// fedora = "python3-devel"
/// default = "python3-dev"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PackageAlias {
    /// Name used when no per-distro override matches.
    #[serde(default)]
    pub default: Option<String>,
    /// Distro id → concrete package name.
    #[serde(flatten)]
    pub overrides: BTreeMap<String, String>,
}

impl PackageAlias {
    /// Build an alias with only a shared default.
    #[must_use]
    pub fn with_default(default: &str) -> Self {
        Self {
            default: Some(default.to_string()),
            overrides: BTreeMap::new(),
        }
    }

    /// Add a per-distro override.
    #[must_use]
    pub fn with_override(mut self, distro_id: &str, name: &str) -> Self {
        self.overrides
            .insert(distro_id.to_string(), name.to_string());
        self
    }
}

/// Immutable lookup table from generic package names to [`PackageAlias`]es.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct PackageTable {
    aliases: BTreeMap<String, PackageAlias>,
}

impl PackageTable {
    /// Translate `generic` into the package name used by `distro_id`.
    ///
    /// A per-distro override wins, then the alias `default`, then the generic
    /// name itself. Unknown names are never an error.
    ///
    /// # Examples
    ///
    /// ```
    /// use brainbash_cli::config::packages::{PackageAlias, PackageTable};
    ///
    /// let table: PackageTable = [(
    ///     "python-dev".to_string(),
    ///     PackageAlias::with_default("python-dev").with_override("debian", "python3-dev"),
    /// )]
    /// .into_iter()
    /// .collect();
    ///
    /// assert_eq!(table.resolve("python-dev", "debian"), "python3-dev");
    /// assert_eq!(table.resolve("python-dev", "alpine"), "python-dev");
    /// assert_eq!(table.resolve("ripgrep", "fedora"), "ripgrep");
    /// ```
    #[must_use]
    pub fn resolve<'a>(&'a self, generic: &'a str, distro_id: &str) -> &'a str {
        self.aliases
            .get(generic)
            .and_then(|alias| alias.overrides.get(distro_id).or(alias.default.as_ref()))
            .map_or(generic, String::as_str)
    }

    /// Translate every name in `generics`, preserving order.
    #[must_use]
    pub fn resolve_all<'a>(&'a self, generics: &'a [String], distro_id: &str) -> Vec<&'a str> {
        generics
            .iter()
            .map(|generic| self.resolve(generic, distro_id))
            .collect()
    }

    /// Iterate over `(generic, alias)` pairs in name order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &PackageAlias)> {
        self.aliases.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of generic names with an alias entry.
    #[must_use]
    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    /// Whether the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}

impl FromIterator<(String, PackageAlias)> for PackageTable {
    fn from_iter<I: IntoIterator<Item = (String, PackageAlias)>>(iter: I) -> Self {
        Self {
            aliases: iter.into_iter().collect(),
        }
    }
}

/// A selectable package with an optional menu description.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "PackageEntryRaw")]
pub struct PackageEntry {
    /// Generic package name.
    pub name: String,
    /// Short description shown in the interactive menu.
    pub description: Option<String>,
}

impl PackageEntry {
    /// Entry without a description.
    #[must_use]
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            description: None,
        }
    }
}

/// A group entry is either a plain name or a `{ name, description }` table.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PackageEntryRaw {
    Simple(String),
    Detailed {
        name: String,
        #[serde(default)]
        description: Option<String>,
    },
}

impl From<PackageEntryRaw> for PackageEntry {
    fn from(raw: PackageEntryRaw) -> Self {
        match raw {
            PackageEntryRaw::Simple(name) => Self {
                name,
                description: None,
            },
            PackageEntryRaw::Detailed { name, description } => Self { name, description },
        }
    }
}

/// The two selectable package groups.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PackageGroups {
    /// Core tooling, selected by default.
    #[serde(default)]
    pub base: Vec<PackageEntry>,
    /// Optional modern CLI tools, selected by default.
    #[serde(default)]
    pub extra: Vec<PackageEntry>,
}

/// Contents of `packages.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PackagesConfig {
    /// Selectable groups.
    #[serde(default)]
    pub groups: PackageGroups,
    /// Name translation table.
    #[serde(default)]
    pub aliases: PackageTable,
}

/// Load `packages.toml`.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load(path: &Path) -> Result<PackagesConfig, ConfigError> {
    toml_loader::load_config(path)
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn python_dev_table() -> PackageTable {
        [(
            "python-dev".to_string(),
            PackageAlias::with_default("python-dev").with_override("debian", "python3-dev"),
        )]
        .into_iter()
        .collect()
    }

    // -----------------------------------------------------------------------
    // resolve
    // -----------------------------------------------------------------------

    #[test]
    fn table_counts_entries() {
        let table = python_dev_table();
        assert_eq!(table.len(), 1);
        assert!(!table.is_empty());
        assert!(PackageTable::default().is_empty());
    }

    #[test]
    fn override_wins_for_matching_distro() {
        assert_eq!(python_dev_table().resolve("python-dev", "debian"), "python3-dev");
    }

    #[test]
    fn default_used_for_other_distro() {
        assert_eq!(python_dev_table().resolve("python-dev", "alpine"), "python-dev");
    }

    #[test]
    fn unknown_name_returned_unchanged() {
        let table = python_dev_table();
        assert_eq!(table.resolve("zoxide", "debian"), "zoxide");
        assert_eq!(PackageTable::default().resolve("git", "fedora"), "git");
    }

    #[test]
    fn alias_without_default_falls_back_to_generic() {
        let table: PackageTable = [(
            "docker".to_string(),
            PackageAlias::default().with_override("fedora", "moby-engine"),
        )]
        .into_iter()
        .collect();
        assert_eq!(table.resolve("docker", "fedora"), "moby-engine");
        assert_eq!(table.resolve("docker", "alpine"), "docker");
    }

    #[test]
    fn resolve_all_preserves_order() {
        let names = vec!["git".to_string(), "python-dev".to_string()];
        assert_eq!(
            python_dev_table().resolve_all(&names, "debian"),
            vec!["git", "python3-dev"]
        );
    }

    // -----------------------------------------------------------------------
    // load
    // -----------------------------------------------------------------------

    #[test]
    fn load_groups_and_aliases() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("packages.toml");
        std::fs::write(
            &path,
            r#"
[groups]
base = ["git", { name = "zsh", description = "Z shell" }]
extra = ["bat"]

[aliases.python-dev]
fedora = "python3-devel"
default = "python3-dev"
"#,
        )
        .unwrap();

        let cfg = load(&path).unwrap();
        assert_eq!(cfg.groups.base.len(), 2);
        assert_eq!(cfg.groups.base[0], PackageEntry::named("git"));
        assert_eq!(cfg.groups.base[1].description.as_deref(), Some("Z shell"));
        assert_eq!(cfg.groups.extra[0].name, "bat");
        assert_eq!(cfg.aliases.resolve("python-dev", "fedora"), "python3-devel");
        assert_eq!(cfg.aliases.resolve("python-dev", "debian"), "python3-dev");
    }

    #[test]
    fn load_missing_file_returns_empty() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load(&dir.path().join("nonexistent.toml")).unwrap();
        assert!(cfg.groups.base.is_empty());
        assert!(cfg.aliases.is_empty());
    }

    #[test]
    fn load_rejects_non_string_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("packages.toml");
        std::fs::write(&path, "[aliases.git]\ndebian = 3\n").unwrap();
        assert!(load(&path).is_err());
    }
}
