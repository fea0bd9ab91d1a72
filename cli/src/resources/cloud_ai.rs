//! Cloud AI command-line wrapper (Gemini) in a private Python venv.
use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};

use super::fs::ensure_parent_dir;
use super::{Applicable, Resource, ResourceChange, ResourceState};
use crate::exec::Executor;

/// Python SDK installed into the venv.
pub const SDK_PACKAGE: &str = "google-generativeai";

/// Wrapper script written next to the venv.
const WRAPPER_SCRIPT: &str = r#"import os
import sys

import google.generativeai as genai

api_key = os.getenv("GEMINI_API_KEY")
if not api_key:
    print("Error: GEMINI_API_KEY is not set.")
    print("Add it to ~/.zshrc: export GEMINI_API_KEY='your_key'")
    sys.exit(1)

genai.configure(api_key=api_key)
model = genai.GenerativeModel("gemini-pro")

if len(sys.argv) < 2:
    print("Usage: gemini <question>")
    sys.exit(0)

prompt = " ".join(sys.argv[1:])
try:
    response = model.generate_content(prompt)
    print(response.text)
except Exception as e:
    print(f"API error: {e}")
"#;

/// Paths making up the cloud AI installation under `~/.gemini-cli`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloudAiLayout {
    /// Virtual environment directory.
    pub venv: PathBuf,
    /// Wrapper script path.
    pub script: PathBuf,
}

impl CloudAiLayout {
    /// Layout inside `home`.
    #[must_use]
    pub fn new(home: &Path) -> Self {
        let base = home.join(".gemini-cli");
        Self {
            venv: base.join("venv"),
            script: base.join("gemini_tool.py"),
        }
    }

    /// The venv's `pip` binary.
    #[must_use]
    pub fn pip(&self) -> PathBuf {
        self.venv.join("bin").join("pip")
    }
}

/// A Python virtual environment created with `python3 -m venv`.
#[derive(Debug)]
pub struct VirtualEnv<'a> {
    path: PathBuf,
    executor: &'a dyn Executor,
}

impl<'a> VirtualEnv<'a> {
    /// Venv at `path`.
    #[must_use]
    pub fn new(path: &Path, executor: &'a dyn Executor) -> Self {
        Self {
            path: path.to_path_buf(),
            executor,
        }
    }
}

impl Applicable for VirtualEnv<'_> {
    fn description(&self) -> String {
        format!("venv {}", self.path.display())
    }

    fn apply(&self) -> Result<ResourceChange> {
        let path = self.path.to_string_lossy();
        self.executor
            .run("python3", &["-m", "venv", &path])
            .context("cannot create venv (is python3-venv installed?)")?;
        Ok(ResourceChange::Applied)
    }
}

impl Resource for VirtualEnv<'_> {
    fn current_state(&self) -> Result<ResourceState> {
        if self.path.exists() {
            Ok(ResourceState::Correct)
        } else {
            Ok(ResourceState::Missing)
        }
    }
}

/// A package installed with a venv's `pip`.
///
/// Always applied; `pip install` is itself idempotent.
#[derive(Debug)]
pub struct PipPackage<'a> {
    pip: PathBuf,
    package: String,
    executor: &'a dyn Executor,
}

impl<'a> PipPackage<'a> {
    /// `package` installed through the `pip` binary at `pip`.
    #[must_use]
    pub fn new(pip: &Path, package: &str, executor: &'a dyn Executor) -> Self {
        Self {
            pip: pip.to_path_buf(),
            package: package.to_string(),
            executor,
        }
    }
}

impl Applicable for PipPackage<'_> {
    fn description(&self) -> String {
        format!("pip {}", self.package)
    }

    fn apply(&self) -> Result<ResourceChange> {
        let pip = self.pip.to_string_lossy();
        self.executor
            .run(&pip, &["install", "-q", &self.package])
            .with_context(|| format!("pip install {} failed", self.package))?;
        Ok(ResourceChange::Applied)
    }
}

/// The Gemini wrapper script. An existing file is never overwritten.
#[derive(Debug, Clone)]
pub struct WrapperScript {
    path: PathBuf,
}

impl WrapperScript {
    /// Script at `path`.
    #[must_use]
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }
}

impl Applicable for WrapperScript {
    fn description(&self) -> String {
        format!("wrapper {}", self.path.display())
    }

    fn apply(&self) -> Result<ResourceChange> {
        ensure_parent_dir(&self.path)
            .with_context(|| format!("create parent: {}", self.path.display()))?;
        std::fs::write(&self.path, WRAPPER_SCRIPT)
            .with_context(|| format!("write {}", self.path.display()))?;
        Ok(ResourceChange::Applied)
    }
}

impl Resource for WrapperScript {
    fn current_state(&self) -> Result<ResourceState> {
        if self.path.exists() {
            Ok(ResourceState::Correct)
        } else {
            Ok(ResourceState::Missing)
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::resources::ensure;
    use crate::resources::test_helpers::RecordingExecutor;

    #[test]
    fn layout_under_gemini_cli() {
        let layout = CloudAiLayout::new(Path::new("/home/u"));
        assert_eq!(layout.venv, Path::new("/home/u/.gemini-cli/venv"));
        assert_eq!(layout.script, Path::new("/home/u/.gemini-cli/gemini_tool.py"));
        assert_eq!(layout.pip(), Path::new("/home/u/.gemini-cli/venv/bin/pip"));
    }

    #[test]
    fn venv_created_when_missing() {
        let home = tempfile::tempdir().unwrap();
        let layout = CloudAiLayout::new(home.path());
        let exec = RecordingExecutor::new();
        let venv = VirtualEnv::new(&layout.venv, &exec);
        assert_eq!(ensure(&venv).unwrap(), ResourceChange::Applied);
        assert_eq!(
            exec.commands(),
            vec![format!("python3 -m venv {}", layout.venv.display())]
        );
    }

    #[test]
    fn existing_venv_left_alone() {
        let home = tempfile::tempdir().unwrap();
        let layout = CloudAiLayout::new(home.path());
        std::fs::create_dir_all(&layout.venv).unwrap();
        let exec = RecordingExecutor::new();
        let venv = VirtualEnv::new(&layout.venv, &exec);
        assert_eq!(ensure(&venv).unwrap(), ResourceChange::AlreadyCorrect);
        assert!(exec.commands().is_empty());
    }

    #[test]
    fn venv_failure_mentions_python3_venv() {
        let exec = RecordingExecutor::new().failing("python3");
        let venv = VirtualEnv::new(Path::new("/nonexistent/venv"), &exec);
        let err = venv.apply().unwrap_err();
        assert!(format!("{err:#}").contains("python3-venv"));
    }

    #[test]
    fn pip_installs_quietly() {
        let exec = RecordingExecutor::new();
        let pip = PipPackage::new(Path::new("/v/bin/pip"), SDK_PACKAGE, &exec);
        assert_eq!(pip.apply().unwrap(), ResourceChange::Applied);
        assert_eq!(
            exec.commands(),
            vec!["/v/bin/pip install -q google-generativeai"]
        );
    }

    #[test]
    fn wrapper_written_once() {
        let home = tempfile::tempdir().unwrap();
        let layout = CloudAiLayout::new(home.path());
        let script = WrapperScript::new(&layout.script);

        assert_eq!(ensure(&script).unwrap(), ResourceChange::Applied);
        let written = std::fs::read_to_string(&layout.script).unwrap();
        assert!(written.contains("GEMINI_API_KEY"));

        std::fs::write(&layout.script, "# customised").unwrap();
        assert_eq!(ensure(&script).unwrap(), ResourceChange::AlreadyCorrect);
        assert_eq!(
            std::fs::read_to_string(&layout.script).unwrap(),
            "# customised"
        );
    }
}
