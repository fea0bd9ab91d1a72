//! Scoped external process execution with captured output and deadlines.
use std::io::{BufRead, BufReader, Read};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use crate::error::ExecError;

/// How often a running child is polled while a deadline is active.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Result of a command execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecResult {
    /// Captured standard output (lossy UTF-8).
    pub stdout: String,
    /// Captured standard error (lossy UTF-8).
    pub stderr: String,
    /// Whether the process exited with status zero.
    pub success: bool,
    /// Exit code, `None` when the process was terminated by a signal.
    pub code: Option<i32>,
}

impl ExecResult {
    fn from_parts(status: ExitStatus, stdout: &[u8], stderr: &[u8]) -> Self {
        Self {
            stdout: String::from_utf8_lossy(stdout).to_string(),
            stderr: String::from_utf8_lossy(stderr).to_string(),
            success: status.success(),
            code: status.code(),
        }
    }
}

/// Abstraction over running external programs.
///
/// Tasks and resources receive an `&dyn Executor` so that tests can
/// substitute recorded or scripted responses for real subprocesses.
pub trait Executor: Send + Sync + std::fmt::Debug {
    /// Run a program and fail unless it exits with status zero.
    ///
    /// # Errors
    ///
    /// Returns [`ExecError::Spawn`] if the program cannot be started,
    /// [`ExecError::TimedOut`] if it exceeds the deadline, and
    /// [`ExecError::NonZeroExit`] if it exits unsuccessfully.
    fn run(&self, program: &str, args: &[&str]) -> Result<ExecResult, ExecError> {
        let result = self.run_unchecked(program, args)?;
        if !result.success {
            return Err(ExecError::NonZeroExit {
                program: program.to_string(),
                code: result.code,
                stderr: result.stderr.trim().to_string(),
            });
        }
        Ok(result)
    }

    /// Run a program and return its result regardless of exit status.
    ///
    /// # Errors
    ///
    /// Returns [`ExecError::Spawn`] if the program cannot be started and
    /// [`ExecError::TimedOut`] if it exceeds the deadline.
    fn run_unchecked(&self, program: &str, args: &[&str]) -> Result<ExecResult, ExecError>;

    /// Run a script through `sh -c`, failing on non-zero exit.
    ///
    /// # Errors
    ///
    /// Same as [`Executor::run`].
    fn run_shell(&self, script: &str) -> Result<ExecResult, ExecError> {
        self.run("sh", &["-c", script])
    }

    /// Check whether a program is available on `PATH`.
    fn which(&self, program: &str) -> bool;
}

/// Executor that spawns real processes.
///
/// Standard output and error are captured; standard input is closed so an
/// installer can never block waiting on the terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemExecutor {
    timeout: Option<Duration>,
}

impl SystemExecutor {
    /// Create an executor that kills any child still running after `timeout`.
    #[must_use]
    pub const fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
        }
    }

    /// Wait for `child`, killing it once the deadline passes.
    fn wait(&self, child: &mut Child, program: &str) -> Result<ExitStatus, ExecError> {
        let spawn_err = |source| ExecError::Spawn {
            program: program.to_string(),
            source,
        };

        let Some(timeout) = self.timeout else {
            return child.wait().map_err(spawn_err);
        };

        let start = Instant::now();
        loop {
            if let Some(status) = child.try_wait().map_err(spawn_err)? {
                return Ok(status);
            }
            if start.elapsed() >= timeout {
                child.kill().ok();
                child.wait().ok();
                return Err(ExecError::TimedOut {
                    program: program.to_string(),
                    after: timeout,
                });
            }
            thread::sleep(POLL_INTERVAL);
        }
    }
}

/// Drain a pipe on a background thread so the child never blocks on a full
/// pipe buffer while we poll it.
///
/// Each line is also emitted at debug level as it arrives, so long installs
/// show progress under `--verbose` and in the log file.
fn drain<R: Read + Send + 'static>(
    program: &str,
    pipe: Option<R>,
) -> Option<thread::JoinHandle<Vec<u8>>> {
    let program = program.to_string();
    pipe.map(|pipe| {
        thread::spawn(move || {
            let mut reader = BufReader::new(pipe);
            let mut buf = Vec::new();
            loop {
                let start = buf.len();
                match reader.read_until(b'\n', &mut buf) {
                    Ok(0) | Err(_) => break,
                    Ok(_) => {
                        let line = buf.get(start..).unwrap_or_default();
                        let line = String::from_utf8_lossy(line);
                        let line = line.trim_end();
                        if !line.is_empty() {
                            tracing::debug!("{program}: {line}");
                        }
                    }
                }
            }
            buf
        })
    })
}

fn collect(handle: Option<thread::JoinHandle<Vec<u8>>>) -> Vec<u8> {
    handle
        .and_then(|h| h.join().ok())
        .unwrap_or_default()
}

impl Executor for SystemExecutor {
    fn run_unchecked(&self, program: &str, args: &[&str]) -> Result<ExecResult, ExecError> {
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| ExecError::Spawn {
                program: program.to_string(),
                source,
            })?;

        let stdout = drain(program, child.stdout.take());
        let stderr = drain(program, child.stderr.take());

        // On timeout the reader threads are left detached: a grandchild may
        // still hold the pipes open.
        let status = self.wait(&mut child, program)?;

        Ok(ExecResult::from_parts(
            status,
            &collect(stdout),
            &collect(stderr),
        ))
    }

    fn which(&self, program: &str) -> bool {
        which::which(program).is_ok()
    }
}
