//! File-system resource helpers.
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

/// Ensure the parent directory of `path` exists, creating it (and any
/// ancestors) if necessary.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn ensure_parent_dir(path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent),
        _ => Ok(()),
    }
}

/// Whether anything (including a dangling symlink) exists at `path`.
#[must_use]
pub fn entry_exists(path: &Path) -> bool {
    path.symlink_metadata().is_ok()
}

/// Free backup name for `path`: `<path>.bak.<timestamp>`.
///
/// When that name is already taken (two backups within the same second) a
/// `.N` counter is appended so an earlier backup is never overwritten.
#[must_use]
pub fn backup_path(path: &Path, timestamp: i64) -> PathBuf {
    let mut base = OsString::from(path.as_os_str());
    base.push(format!(".bak.{timestamp}"));
    let candidate = PathBuf::from(&base);
    if !entry_exists(&candidate) {
        return candidate;
    }

    (1u32..)
        .map(|n| {
            let mut name = base.clone();
            name.push(format!(".{n}"));
            PathBuf::from(name)
        })
        .find(|p| !entry_exists(p))
        .unwrap_or(candidate)
}
