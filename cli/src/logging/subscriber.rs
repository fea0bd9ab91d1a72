//! Tracing subscriber setup: console formatter, file layer, and initialisation.
use std::fs;
use std::io::Write as _;
use std::path::Path;
use std::sync::Mutex;

use tracing::Level;

use super::types::Theme;
use super::utils::{format_utc_datetime, format_utc_time, log_file_path, strip_ansi};

/// Target for stage header events.
pub(super) const STAGE_TARGET: &str = "brainbash::stage";
/// Target for dry-run action events.
pub(super) const DRY_RUN_TARGET: &str = "brainbash::dry_run";

/// Extracts the `message` field from a [`tracing::Event`].
#[derive(Default)]
struct MessageExtractor {
    message: String,
}

impl tracing::field::Visit for MessageExtractor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        }
    }
}

/// A [`tracing_subscriber::Layer`] that appends all events to the persistent
/// log file with timestamps and ANSI codes stripped.
///
/// Always captures events at `DEBUG` level and above regardless of the
/// console verbosity setting.
#[derive(Debug)]
pub(super) struct FileLayer {
    file: Mutex<fs::File>,
}

impl FileLayer {
    /// Open the log file for `command` in the cache directory.
    ///
    /// Returns `None` if the cache directory cannot be created or the file
    /// cannot be opened.
    pub(super) fn new(command: &str) -> Option<Self> {
        Self::at(&log_file_path(command)?)
    }

    /// Truncate `path`, write a run header, and return a layer appending to it.
    pub(super) fn at(path: &Path) -> Option<Self> {
        let header = format!(
            "# brainbash {} started {}\n",
            crate::VERSION,
            format_utc_datetime(),
        );
        fs::write(path, header).ok()?;
        let file = fs::OpenOptions::new().append(true).open(path).ok()?;
        Some(Self {
            file: Mutex::new(file),
        })
    }
}

/// One plain-text log file line.
fn file_line(level: Level, target: &str, ts: &str, msg: &str) -> String {
    let tag = match (level, target) {
        (Level::INFO, STAGE_TARGET) => "STAGE",
        (Level::INFO, DRY_RUN_TARGET) => "PLAN ",
        (Level::INFO, _) => "INFO ",
        (Level::WARN, _) => "WARN ",
        (Level::ERROR, _) => "ERROR",
        _ => "DEBUG",
    };
    format!("{ts} {tag} {msg}")
}

/// One coloured console line (without the trailing newline).
fn console_line(theme: Theme, level: Level, target: &str, msg: &str) -> String {
    const RESET: &str = "\x1b[0m";
    match (level, target) {
        (Level::ERROR, _) => format!("\x1b[0;31m✗ {msg}{RESET}"),
        (Level::WARN, _) => format!("\x1b[0;33m! {msg}{RESET}"),
        (Level::INFO, STAGE_TARGET) => format!("\n{}➜ {msg}{RESET}", theme.ansi()),
        (Level::INFO, DRY_RUN_TARGET) => format!("  \x1b[0;36m[plan]{RESET} {msg}"),
        (Level::INFO, _) => format!("  {msg}"),
        _ => format!("  \x1b[2m{msg}{RESET}"),
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for FileLayer {
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let metadata = event.metadata();
        let mut extractor = MessageExtractor::default();
        event.record(&mut extractor);

        let line = file_line(
            *metadata.level(),
            metadata.target(),
            &format_utc_time(),
            &strip_ansi(&extractor.message),
        );
        if let Ok(mut f) = self.file.lock() {
            writeln!(f, "{line}").ok();
        }
    }
}

/// Console output with stage headers in the selected theme colour.
struct ConsoleFormatter {
    theme: Theme,
}

impl<S, N> tracing_subscriber::fmt::FormatEvent<S, N> for ConsoleFormatter
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    N: for<'a> tracing_subscriber::fmt::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &tracing_subscriber::fmt::FmtContext<'_, S, N>,
        mut writer: tracing_subscriber::fmt::format::Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        let metadata = event.metadata();
        let mut extractor = MessageExtractor::default();
        event.record(&mut extractor);
        writeln!(
            writer,
            "{}",
            console_line(self.theme, *metadata.level(), metadata.target(), &extractor.message)
        )
    }
}

/// Initialise the global [`tracing`] subscriber.
///
/// Sets up a console layer (warnings and errors on stderr, everything else
/// on stdout) and a file layer that writes all events, including `debug`,
/// to `$XDG_CACHE_HOME/brainbash/<command>.log`.
/// Must be called once at program startup, before any logging.
pub fn init_subscriber(verbose: bool, theme: Theme, command: &str) {
    use tracing_subscriber::fmt::writer::MakeWriterExt as _;
    use tracing_subscriber::{
        Layer as _, filter::LevelFilter, fmt, layer::SubscriberExt as _,
        util::SubscriberInitExt as _,
    };

    let console_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };

    let make_writer = std::io::stderr
        .with_max_level(Level::WARN)
        .and(std::io::stdout.with_min_level(Level::INFO));

    let console_layer = fmt::layer()
        .event_format(ConsoleFormatter { theme })
        .with_writer(make_writer)
        .with_filter(console_level);

    let file_layer = FileLayer::new(command).map(|l| l.with_filter(LevelFilter::DEBUG));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
}
