//! Oh My Zsh shell framework.
use anyhow::Result;
use std::path::{Path, PathBuf};

use super::{Applicable, Resource, ResourceChange, ResourceState};
use crate::exec::Executor;

/// Upstream unattended installer invocation.
const OH_MY_ZSH_INSTALL: &str = "sh -c \"$(curl -fsSL https://raw.githubusercontent.com/ohmyzsh/ohmyzsh/master/tools/install.sh)\" \"\" --unattended";

/// Oh My Zsh, installed into `~/.oh-my-zsh` by the upstream script.
#[derive(Debug)]
pub struct OhMyZshResource<'a> {
    /// Installation directory.
    dir: PathBuf,
    /// Executor for running the installer.
    executor: &'a dyn Executor,
}

impl<'a> OhMyZshResource<'a> {
    /// Oh My Zsh for the user whose home directory is `home`.
    #[must_use]
    pub fn new(home: &Path, executor: &'a dyn Executor) -> Self {
        Self {
            dir: home.join(".oh-my-zsh"),
            executor,
        }
    }
}

impl Applicable for OhMyZshResource<'_> {
    fn description(&self) -> String {
        format!("oh-my-zsh → {}", self.dir.display())
    }

    fn apply(&self) -> Result<ResourceChange> {
        if !self.executor.which("curl") {
            return Ok(ResourceChange::Skipped {
                reason: "curl not found".to_string(),
            });
        }
        self.executor.run_shell(OH_MY_ZSH_INSTALL)?;
        Ok(ResourceChange::Applied)
    }
}

impl Resource for OhMyZshResource<'_> {
    fn current_state(&self) -> Result<ResourceState> {
        if self.dir.exists() {
            Ok(ResourceState::Correct)
        } else {
            Ok(ResourceState::Missing)
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::resources::test_helpers::RecordingExecutor;

    #[test]
    fn description_includes_install_dir() {
        let exec = RecordingExecutor::new();
        let resource = OhMyZshResource::new(Path::new("/home/test"), &exec);
        assert_eq!(resource.description(), "oh-my-zsh → /home/test/.oh-my-zsh");
    }

    #[test]
    fn correct_when_directory_exists() {
        let home = tempfile::tempdir().unwrap();
        std::fs::create_dir(home.path().join(".oh-my-zsh")).unwrap();
        let exec = RecordingExecutor::new();
        let resource = OhMyZshResource::new(home.path(), &exec);
        assert_eq!(resource.current_state().unwrap(), ResourceState::Correct);
    }

    #[test]
    fn apply_runs_unattended_installer() {
        let home = tempfile::tempdir().unwrap();
        let exec = RecordingExecutor::new().with_which(&["curl"]);
        let resource = OhMyZshResource::new(home.path(), &exec);
        assert_eq!(resource.current_state().unwrap(), ResourceState::Missing);
        assert_eq!(resource.apply().unwrap(), ResourceChange::Applied);

        let commands = exec.commands();
        assert_eq!(commands.len(), 1);
        assert!(commands[0].starts_with("sh -c sh -c"));
        assert!(commands[0].ends_with("--unattended"));
    }

    #[test]
    fn apply_skips_without_curl() {
        let home = tempfile::tempdir().unwrap();
        let exec = RecordingExecutor::new();
        let resource = OhMyZshResource::new(home.path(), &exec);
        assert!(matches!(
            resource.apply().unwrap(),
            ResourceChange::Skipped { .. }
        ));
        assert!(exec.commands().is_empty());
    }

    #[test]
    fn apply_propagates_installer_failure() {
        let home = tempfile::tempdir().unwrap();
        let exec = RecordingExecutor::new().with_which(&["curl"]).failing("sh");
        let resource = OhMyZshResource::new(home.path(), &exec);
        assert!(resource.apply().is_err());
    }
}
