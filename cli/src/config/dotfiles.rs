//! Dotfile link declarations loaded from `dotfiles.toml`.
use serde::Deserialize;
use std::path::Path;

use super::toml_loader;
use crate::error::ConfigError;

/// A dotfile to link: `source` (under `config/`) → `destination` (under `$HOME`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DotfileLink {
    /// Path relative to the repository's `config/` directory.
    pub source: String,
    /// Path relative to the user's home directory.
    pub destination: String,
}

impl DotfileLink {
    /// Build a link declaration.
    #[must_use]
    pub fn new(source: &str, destination: &str) -> Self {
        Self {
            source: source.to_string(),
            destination: destination.to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct DotfilesFile {
    #[serde(default)]
    links: Vec<DotfileLink>,
}

/// Load `dotfiles.toml`, preserving declaration order.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load(path: &Path) -> Result<Vec<DotfileLink>, ConfigError> {
    let file: DotfilesFile = toml_loader::load_config(path)?;
    Ok(file.links)
}
