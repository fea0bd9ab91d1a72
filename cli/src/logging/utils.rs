//! Utility functions for path resolution, ANSI stripping, and time formatting.
use std::fs;
use std::path::{Path, PathBuf};

/// Strip ANSI escape sequences from a string.
///
/// Handles SGR sequences (ending in `m`) and other CSI sequences (ending
/// in any letter in the `@`..`~` range), so cursor movement and erase
/// sequences are stripped without consuming unrelated text.
pub(super) fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            if let Some(next) = chars.next()
                && next == '['
            {
                for inner in chars.by_ref() {
                    if ('@'..='~').contains(&inner) {
                        break;
                    }
                }
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Cache base directory: `$XDG_CACHE_HOME`, else `$HOME/.cache`.
fn cache_base(xdg_cache_home: Option<&str>, home: Option<&str>) -> PathBuf {
    xdg_cache_home
        .filter(|v| !v.is_empty())
        .map_or_else(
            || home.map_or_else(|| PathBuf::from("."), PathBuf::from).join(".cache"),
            PathBuf::from,
        )
}

/// Return the `brainbash` cache directory, creating it if needed.
pub(super) fn cache_dir() -> Option<PathBuf> {
    let xdg = std::env::var("XDG_CACHE_HOME").ok();
    let home = std::env::var("HOME").ok();
    let dir = cache_base(xdg.as_deref(), home.as_deref()).join("brainbash");
    fs::create_dir_all(&dir).ok()?;
    Some(dir)
}

/// Return the log file path for `command` inside `dir`.
pub(super) fn log_file_in(dir: &Path, command: &str) -> PathBuf {
    dir.join(format!("{command}.log"))
}

/// Return the log file path under `$XDG_CACHE_HOME/brainbash/` (or `~/.cache/brainbash/`).
pub(super) fn log_file_path(command: &str) -> Option<PathBuf> {
    Some(log_file_in(&cache_dir()?, command))
}

/// Format the current UTC time as `YYYY-MM-DD HH:MM:SS`.
pub(super) fn format_utc_datetime() -> String {
    chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Format the current UTC time as `HH:MM:SS`.
pub(super) fn format_utc_time() -> String {
    chrono::Utc::now().format("%H:%M:%S").to_string()
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn strip_ansi_removes_colors() {
        assert_eq!(strip_ansi("\x1b[31mERROR\x1b[0m hello"), "ERROR hello");
        assert_eq!(strip_ansi("no codes here"), "no codes here");
        assert_eq!(
            strip_ansi("\x1b[1;35m➜ stage\x1b[0m"),
            "➜ stage"
        );
    }

    #[test]
    fn strip_ansi_handles_csi_sequences() {
        assert_eq!(strip_ansi("\x1b[2Jhello"), "hello");
        assert_eq!(strip_ansi("\x1b[Kworld"), "world");
        assert_eq!(strip_ansi("\x1b7text"), "text");
        assert_eq!(strip_ansi(""), "");
    }

    #[test]
    fn cache_base_prefers_xdg() {
        assert_eq!(
            cache_base(Some("/xdg"), Some("/home/u")),
            PathBuf::from("/xdg")
        );
    }

    #[test]
    fn cache_base_falls_back_to_home() {
        assert_eq!(
            cache_base(None, Some("/home/u")),
            PathBuf::from("/home/u/.cache")
        );
        assert_eq!(
            cache_base(Some(""), Some("/home/u")),
            PathBuf::from("/home/u/.cache")
        );
        assert_eq!(cache_base(None, None), PathBuf::from("./.cache"));
    }

    #[test]
    fn log_file_named_after_command() {
        assert_eq!(
            log_file_in(Path::new("/c/brainbash"), "install"),
            PathBuf::from("/c/brainbash/install.log")
        );
    }

    #[test]
    fn format_utc_time_has_correct_format() {
        let s = format_utc_time();
        assert_eq!(s.len(), 8, "HH:MM:SS should be 8 chars");
        assert_eq!(&s[2..3], ":");
        assert_eq!(&s[5..6], ":");
    }

    #[test]
    fn format_utc_datetime_has_correct_format() {
        let s = format_utc_datetime();
        assert_eq!(s.len(), 19, "YYYY-MM-DD HH:MM:SS should be 19 chars");
        assert_eq!(&s[4..5], "-");
        assert_eq!(&s[10..11], " ");
    }
}
