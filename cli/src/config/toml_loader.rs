//! TOML configuration file loading.
use serde::de::DeserializeOwned;
use std::path::Path;

use crate::error::ConfigError;

/// Deserialize a TOML config file into `T`.
///
/// A missing file deserializes as an empty document, so every section type
/// must tolerate absent keys (`#[serde(default)]`).
///
/// # Errors
///
/// Returns [`ConfigError::Io`] if the file exists but cannot be read and
/// [`ConfigError::Parse`] if it is not valid TOML for `T`.
pub fn load_config<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = if path.exists() {
        std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?
    } else {
        String::new()
    };

    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Default, Deserialize)]
    struct Sample {
        #[serde(default)]
        names: Vec<String>,
    }

    #[test]
    fn missing_file_yields_empty_config() {
        let dir = tempfile::tempdir().unwrap();
        let sample: Sample = load_config(&dir.path().join("absent.toml")).unwrap();
        assert!(sample.names.is_empty());
    }

    #[test]
    fn parses_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.toml");
        std::fs::write(&path, "names = [\"a\", \"b\"]\n").unwrap();
        let sample: Sample = load_config(&path).unwrap();
        assert_eq!(sample.names, vec!["a", "b"]);
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "names = [\"a\"\n").unwrap();
        let err = load_config::<Sample>(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }), "got: {err}");
        assert!(err.to_string().contains("broken.toml"));
    }
}
