//! Local model catalogue loaded from `models.toml`.
use serde::Deserialize;
use std::path::Path;

use super::toml_loader;
use crate::error::ConfigError;

/// A downloadable local model.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Model {
    /// Short menu identifier (e.g. `qwen`).
    pub id: String,
    /// Tag passed to `ollama pull` (e.g. `qwen3:0.6b`).
    pub tag: String,
    /// Menu description.
    #[serde(default)]
    pub description: Option<String>,
}

impl Model {
    /// Build a catalogue entry without a description.
    #[must_use]
    pub fn new(id: &str, tag: &str) -> Self {
        Self {
            id: id.to_string(),
            tag: tag.to_string(),
            description: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ModelsFile {
    #[serde(default)]
    models: Vec<Model>,
}

/// Load `models.toml`, preserving declaration order.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load(path: &Path) -> Result<Vec<Model>, ConfigError> {
    let file: ModelsFile = toml_loader::load_config(path)?;
    Ok(file.models)
}
