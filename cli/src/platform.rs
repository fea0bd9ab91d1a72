//! Linux distribution detection.
use std::fmt;
use std::path::Path;

use crate::error::PlatformError;
use crate::resources::package::PackageManager;

/// Default location of the distribution probe file.
pub const OS_RELEASE: &str = "/etc/os-release";

/// Supported distribution families.
///
/// Closed set: each family selects exactly one [`PackageManager`] and one
/// key into the package alias table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Distro {
    /// Debian, Ubuntu and derivatives (`apt`).
    Debian,
    /// Alpine Linux (`apk`).
    Alpine,
    /// Fedora and RHEL-like systems (`dnf`).
    Fedora,
}

impl Distro {
    /// Identifier used as the per-distro key in `packages.toml`.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Debian => "debian",
            Self::Alpine => "alpine",
            Self::Fedora => "fedora",
        }
    }

    /// Package manager for this family.
    #[must_use]
    pub const fn package_manager(self) -> PackageManager {
        match self {
            Self::Debian => PackageManager::Apt,
            Self::Alpine => PackageManager::Apk,
            Self::Fedora => PackageManager::Dnf,
        }
    }

    /// Classify the contents of an `os-release` file.
    ///
    /// Matching is a case-insensitive substring search checked in the order
    /// alpine, fedora, debian/ubuntu; the first hit wins.
    ///
    /// # Examples
    ///
    /// ```
    /// use brainbash_cli::platform::Distro;
    ///
    /// assert_eq!(Distro::classify("ID=ubuntu\n"), Some(Distro::Debian));
    /// assert_eq!(Distro::classify("ID=arch\n"), None);
    /// ```
    #[must_use]
    pub fn classify(os_release: &str) -> Option<Self> {
        let content = os_release.to_lowercase();
        if content.contains("alpine") {
            Some(Self::Alpine)
        } else if content.contains("fedora") {
            Some(Self::Fedora)
        } else if content.contains("debian") || content.contains("ubuntu") {
            Some(Self::Debian)
        } else {
            None
        }
    }

    /// Detect the running distribution from [`OS_RELEASE`].
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::DetectionFailed`] if the file cannot be read
    /// and [`PlatformError::UnsupportedDistro`] if no family matches.
    pub fn detect() -> Result<Self, PlatformError> {
        Self::detect_from(Path::new(OS_RELEASE))
    }

    /// Detect the distribution from an explicit probe file.
    ///
    /// # Errors
    ///
    /// See [`Distro::detect`].
    pub fn detect_from(path: &Path) -> Result<Self, PlatformError> {
        let content =
            std::fs::read_to_string(path).map_err(|source| PlatformError::DetectionFailed {
                path: path.to_path_buf(),
                source,
            })?;
        Self::classify(&content).ok_or(PlatformError::UnsupportedDistro)
    }
}

impl fmt::Display for Distro {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}
