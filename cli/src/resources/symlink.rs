//! Idempotent dotfile symlinking with backup of pre-existing files.
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use super::fs::{backup_path, ensure_parent_dir};

/// What currently occupies a link destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkState {
    /// Nothing exists at the destination.
    Missing,
    /// A symlink pointing exactly at the resolved source.
    SymlinkCorrect,
    /// A symlink pointing somewhere else (possibly dangling).
    SymlinkStale {
        /// Where the existing link points.
        current: PathBuf,
    },
    /// A regular file or directory that is not a symlink.
    RegularFile,
}

/// Result of linking one dotfile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkOutcome {
    /// The destination was empty and the link was created.
    Created,
    /// The destination already linked to the source; nothing was touched.
    AlreadyCorrect,
    /// A stale link was replaced.
    Updated,
    /// A real file was moved aside and the link was created.
    BackedUpAndCreated {
        /// Where the original file now lives.
        backup: PathBuf,
    },
    /// The source does not exist; the destination was left untouched.
    SourceMissing,
    /// An OS-level operation failed.
    Failed(String),
}

impl fmt::Display for LinkOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created => f.write_str("created"),
            Self::AlreadyCorrect => f.write_str("already linked"),
            Self::Updated => f.write_str("updated stale link"),
            Self::BackedUpAndCreated { backup } => {
                write!(f, "backed up to {} and linked", backup.display())
            }
            Self::SourceMissing => f.write_str("source missing, skipped"),
            Self::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

/// Current Unix time in seconds, used to name backups.
fn unix_now() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Links repository-relative sources to home-relative destinations.
///
/// Every call to [`link`](Self::link) is independent: an error on one entry
/// is returned as [`LinkOutcome::Failed`] and never prevents the caller from
/// processing the next one.
#[derive(Debug, Clone)]
pub struct DotfileLinker {
    source_root: PathBuf,
    home: PathBuf,
    clock: fn() -> i64,
}

impl DotfileLinker {
    /// Create a linker resolving sources under `source_root` and
    /// destinations under `home`.
    ///
    /// `source_root` is made absolute so created links never depend on the
    /// working directory.
    #[must_use]
    pub fn new(source_root: &Path, home: &Path) -> Self {
        Self {
            source_root: std::path::absolute(source_root)
                .unwrap_or_else(|_| source_root.to_path_buf()),
            home: home.to_path_buf(),
            clock: unix_now,
        }
    }

    /// Replace the clock used for backup timestamps.
    #[must_use]
    pub const fn with_clock(mut self, clock: fn() -> i64) -> Self {
        self.clock = clock;
        self
    }

    /// Absolute path a link for `source_rel` must point to.
    #[must_use]
    pub fn resolve_source(&self, source_rel: &str) -> PathBuf {
        self.source_root.join(source_rel)
    }

    /// Absolute path of the link for `dest_rel`.
    #[must_use]
    pub fn resolve_destination(&self, dest_rel: &str) -> PathBuf {
        self.home.join(dest_rel)
    }

    /// Classify what occupies `dest` relative to the expected `source`.
    ///
    /// # Errors
    ///
    /// Returns an error if the destination metadata or link target cannot
    /// be read for a reason other than absence.
    pub fn inspect(dest: &Path, source: &Path) -> io::Result<LinkState> {
        let meta = match dest.symlink_metadata() {
            Ok(meta) => meta,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(LinkState::Missing),
            Err(e) => return Err(e),
        };

        if !meta.file_type().is_symlink() {
            return Ok(LinkState::RegularFile);
        }

        let current = std::fs::read_link(dest)?;
        if current == source {
            Ok(LinkState::SymlinkCorrect)
        } else {
            Ok(LinkState::SymlinkStale { current })
        }
    }

    /// Report what [`link`](Self::link) would do without touching anything.
    #[must_use]
    pub fn preview(&self, source_rel: &str, dest_rel: &str) -> LinkOutcome {
        let source = self.resolve_source(source_rel);
        if !source.exists() {
            return LinkOutcome::SourceMissing;
        }
        let dest = self.resolve_destination(dest_rel);
        match Self::inspect(&dest, &source) {
            Ok(LinkState::Missing) => LinkOutcome::Created,
            Ok(LinkState::SymlinkCorrect) => LinkOutcome::AlreadyCorrect,
            Ok(LinkState::SymlinkStale { .. }) => LinkOutcome::Updated,
            Ok(LinkState::RegularFile) => LinkOutcome::BackedUpAndCreated {
                backup: backup_path(&dest, (self.clock)()),
            },
            Err(e) => LinkOutcome::Failed(format!("inspect {}: {e}", dest.display())),
        }
    }

    /// Link `$HOME/<dest_rel>` to `<source_root>/<source_rel>`.
    ///
    /// Steps, in order: a missing source yields `SourceMissing`; the
    /// destination's parent directories are created; a correct link is left
    /// alone; a stale link is removed; a real file or directory is renamed
    /// to `<dest>.bak.<unix-seconds>`; finally the link is created.
    #[must_use]
    pub fn link(&self, source_rel: &str, dest_rel: &str) -> LinkOutcome {
        let source = self.resolve_source(source_rel);
        if !source.exists() {
            return LinkOutcome::SourceMissing;
        }

        let dest = self.resolve_destination(dest_rel);
        if let Err(e) = ensure_parent_dir(&dest) {
            return LinkOutcome::Failed(format!("create parent of {}: {e}", dest.display()));
        }

        let outcome = match Self::inspect(&dest, &source) {
            Ok(LinkState::SymlinkCorrect) => return LinkOutcome::AlreadyCorrect,
            Ok(LinkState::Missing) => LinkOutcome::Created,
            Ok(LinkState::SymlinkStale { .. }) => {
                if let Err(e) = std::fs::remove_file(&dest) {
                    return LinkOutcome::Failed(format!(
                        "remove stale link {}: {e}",
                        dest.display()
                    ));
                }
                LinkOutcome::Updated
            }
            Ok(LinkState::RegularFile) => {
                let backup = backup_path(&dest, (self.clock)());
                if let Err(e) = std::fs::rename(&dest, &backup) {
                    return LinkOutcome::Failed(format!(
                        "back up {} to {}: {e}",
                        dest.display(),
                        backup.display()
                    ));
                }
                LinkOutcome::BackedUpAndCreated { backup }
            }
            Err(e) => return LinkOutcome::Failed(format!("inspect {}: {e}", dest.display())),
        };

        match create_symlink(&source, &dest) {
            Ok(()) => outcome,
            Err(e) => LinkOutcome::Failed(format!(
                "link {} -> {}: {e}",
                dest.display(),
                source.display()
            )),
        }
    }
}

/// Create a symlink at `link` pointing to `target`.
#[cfg(unix)]
fn create_symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(not(unix))]
fn create_symlink(_target: &Path, _link: &Path) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "symlinks are only supported on Unix",
    ))
}
