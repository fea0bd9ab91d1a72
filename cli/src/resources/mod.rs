//! Idempotent resource primitives (check + apply pattern).
pub mod ai;
pub mod cloud_ai;
pub mod fs;
pub mod package;
pub mod shell;
pub mod symlink;

use anyhow::Result;

/// Minimal interface for resources that can be described and applied.
///
/// Resources whose state cannot be observed cheaply (e.g. a pip package
/// inside a virtual environment) implement only this trait. Resources that
/// can determine their own state implement the richer [`Resource`]
/// super-trait.
pub trait Applicable {
    /// Human-readable description of this resource.
    fn description(&self) -> String;

    /// Apply the resource change.
    ///
    /// # Errors
    ///
    /// Returns an error if the resource cannot be applied due to I/O failures,
    /// a failing installer, or other system errors.
    fn apply(&self) -> Result<ResourceChange>;
}

/// State of a resource (file, package, model, etc.).
///
/// # Examples
///
/// ```
/// use brainbash_cli::resources::ResourceState;
///
/// let missing = ResourceState::Missing;
/// let correct = ResourceState::Correct;
/// let skip = ResourceState::Invalid { reason: "batcat not installed".into() };
///
/// assert_ne!(missing, correct);
/// assert_eq!(correct, ResourceState::Correct);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceState {
    /// Resource does not exist or is not present.
    Missing,
    /// Resource exists and matches the desired state.
    Correct,
    /// Resource cannot be applied (e.g., a prerequisite is absent).
    Invalid {
        /// Reason why the resource cannot be applied.
        reason: String,
    },
}

/// Result of applying a resource change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceChange {
    /// Resource was created or updated.
    Applied,
    /// Resource was already correct (no change needed).
    AlreadyCorrect,
    /// Resource was skipped.
    Skipped {
        /// Reason why the resource was skipped.
        reason: String,
    },
}

/// Unified interface for resources that can be checked and applied.
pub trait Resource: Applicable {
    /// Check the current state of the resource.
    ///
    /// # Errors
    ///
    /// Returns an error if the resource state cannot be determined.
    fn current_state(&self) -> Result<ResourceState>;

    /// Determine if the resource needs to be changed.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`Resource::current_state`].
    fn needs_change(&self) -> Result<bool> {
        Ok(self.current_state()? == ResourceState::Missing)
    }
}

/// Check a resource and apply it when needed.
///
/// Returns `AlreadyCorrect` without applying when the resource is in place
/// and `Skipped` when it reports itself as invalid.
///
/// # Errors
///
/// Propagates errors from checking or applying the resource.
pub fn ensure(resource: &dyn Resource) -> Result<ResourceChange> {
    match resource.current_state()? {
        ResourceState::Correct => Ok(ResourceChange::AlreadyCorrect),
        ResourceState::Invalid { reason } => Ok(ResourceChange::Skipped { reason }),
        ResourceState::Missing => resource.apply(),
    }
}
