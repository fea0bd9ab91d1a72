//! Local AI runtime (Ollama) and its models.
use anyhow::Result;
use std::collections::HashSet;

use super::{Applicable, Resource, ResourceChange, ResourceState};
use crate::exec::Executor;

/// Upstream runtime installer.
const OLLAMA_INSTALL: &str = "curl -fsSL https://ollama.com/install.sh | sh";

/// The `ollama` binary, installed by its upstream script when absent.
#[derive(Debug)]
pub struct OllamaRuntime<'a> {
    executor: &'a dyn Executor,
}

impl<'a> OllamaRuntime<'a> {
    /// Runtime resource backed by `executor`.
    #[must_use]
    pub const fn new(executor: &'a dyn Executor) -> Self {
        Self { executor }
    }
}

impl Applicable for OllamaRuntime<'_> {
    fn description(&self) -> String {
        "ollama runtime".to_string()
    }

    fn apply(&self) -> Result<ResourceChange> {
        self.executor.run_shell(OLLAMA_INSTALL)?;
        Ok(ResourceChange::Applied)
    }
}

impl Resource for OllamaRuntime<'_> {
    fn current_state(&self) -> Result<ResourceState> {
        if self.executor.which("ollama") {
            Ok(ResourceState::Correct)
        } else {
            Ok(ResourceState::Missing)
        }
    }
}

/// Model tags already pulled, as listed by `ollama list`.
///
/// The first line of the listing is a header; the tag is the first
/// whitespace-separated column of each remaining line. A listing that
/// cannot be obtained yields an empty set, so every model is pulled.
#[must_use]
pub fn installed_models(executor: &dyn Executor) -> HashSet<String> {
    let Ok(result) = executor.run("ollama", &["list"]) else {
        return HashSet::new();
    };
    parse_model_list(&result.stdout)
}

fn parse_model_list(stdout: &str) -> HashSet<String> {
    stdout
        .lines()
        .skip(1)
        .filter_map(|line| line.split_whitespace().next())
        .map(str::to_string)
        .collect()
}

/// A model tag pulled into the local Ollama store.
#[derive(Debug)]
pub struct OllamaModel<'a> {
    tag: String,
    installed: &'a HashSet<String>,
    executor: &'a dyn Executor,
}

impl<'a> OllamaModel<'a> {
    /// Model `tag`, checked against a previously fetched `installed` set.
    #[must_use]
    pub fn new(tag: &str, installed: &'a HashSet<String>, executor: &'a dyn Executor) -> Self {
        Self {
            tag: tag.to_string(),
            installed,
            executor,
        }
    }

    /// Whether the tag appears in `installed`.
    ///
    /// Ollama lists untagged models with an explicit `:latest` suffix.
    #[must_use]
    pub fn state_from_installed(tag: &str, installed: &HashSet<String>) -> ResourceState {
        let present = installed.contains(tag)
            || (!tag.contains(':') && installed.contains(&format!("{tag}:latest")));
        if present {
            ResourceState::Correct
        } else {
            ResourceState::Missing
        }
    }
}

impl Applicable for OllamaModel<'_> {
    fn description(&self) -> String {
        format!("model {}", self.tag)
    }

    fn apply(&self) -> Result<ResourceChange> {
        self.executor.run("ollama", &["pull", &self.tag])?;
        Ok(ResourceChange::Applied)
    }
}

impl Resource for OllamaModel<'_> {
    fn current_state(&self) -> Result<ResourceState> {
        Ok(Self::state_from_installed(&self.tag, self.installed))
    }
}
