//! Ctrl-C handling.
//!
//! An interrupt always ends the whole run. While the menu is open it is a
//! clean exit (status 0); once installation has started it exits with 130.
use std::sync::atomic::{AtomicBool, Ordering};

/// Exit status for an interrupted installation (128 + SIGINT).
pub const INTERRUPTED_EXIT_CODE: i32 = 130;

static INSTALLING: AtomicBool = AtomicBool::new(false);

/// Mark that installation phases have started (or finished).
pub fn set_installing(installing: bool) {
    INSTALLING.store(installing, Ordering::SeqCst);
}

/// Exit status an interrupt maps to right now.
#[must_use]
pub fn interrupt_exit_code() -> i32 {
    if INSTALLING.load(Ordering::SeqCst) {
        INTERRUPTED_EXIT_CODE
    } else {
        0
    }
}

/// Install the process-wide Ctrl-C handler.
///
/// # Errors
///
/// Returns an error if a handler is already installed or the signal cannot
/// be hooked.
pub fn install_handler() -> Result<(), ctrlc::Error> {
    ctrlc::set_handler(|| {
        let code = interrupt_exit_code();
        if code == 0 {
            eprintln!();
        } else {
            tracing::error!("interrupted, aborting installation");
        }
        std::process::exit(code);
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_code_follows_phase() {
        set_installing(false);
        assert_eq!(interrupt_exit_code(), 0);
        set_installing(true);
        assert_eq!(interrupt_exit_code(), INTERRUPTED_EXIT_CODE);
        set_installing(false);
    }
}
