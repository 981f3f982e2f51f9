//! Rendering of build events on the console and in the run log.
//!
//! Both outputs are `tracing_subscriber::fmt` layers; they differ only in
//! their event format. Events are classified once by [`Kind`] from their
//! level and target.
use std::fmt;
use std::fs::File;
use std::io::Write as _;
use std::path::Path;
use std::sync::Mutex;

use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::{DefaultFields, Writer};
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

use super::utils::{log_file_path, strip_ansi};

/// Target of stage headers (`Building target "<name>"`, `Summary`).
pub(super) const STAGE_TARGET: &str = "linkbuild::stage";

/// Target of actions previewed by `--dry-run`.
pub(super) const DRY_RUN_TARGET: &str = "linkbuild::dry_run";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Stage,
    DryRun,
    Error,
    Warn,
    Info,
    Debug,
}

impl Kind {
    fn of(event: &Event<'_>) -> Self {
        let metadata = event.metadata();
        match (*metadata.level(), metadata.target()) {
            (Level::ERROR, _) => Self::Error,
            (Level::WARN, _) => Self::Warn,
            (Level::INFO, STAGE_TARGET) => Self::Stage,
            (Level::INFO, DRY_RUN_TARGET) => Self::DryRun,
            (Level::INFO, _) => Self::Info,
            _ => Self::Debug,
        }
    }

    /// ANSI decoration around the message on the console.
    const fn console_style(self) -> (&'static str, &'static str) {
        match self {
            Self::Stage => ("\x1b[1;34m==>\x1b[0m \x1b[1m", "\x1b[0m"),
            Self::DryRun => ("  \x1b[33m[dry run]\x1b[0m ", ""),
            Self::Error => ("\x1b[31m", "\x1b[0m"),
            Self::Warn => ("\x1b[33m", "\x1b[0m"),
            Self::Info => ("  ", ""),
            Self::Debug => ("  \x1b[2m", "\x1b[0m"),
        }
    }

    /// Marker written before the message in the log file.
    const fn file_tag(self) -> Option<&'static str> {
        match self {
            Self::Stage => Some("==>"),
            Self::DryRun => Some("[dry run]"),
            Self::Error => Some("[error]"),
            Self::Warn => Some("[warn]"),
            Self::Debug => Some("[debug]"),
            Self::Info => None,
        }
    }
}

/// Wall-clock UTC time of day, `HH:MM:SS`.
#[derive(Debug, Clone, Copy)]
struct UtcClock;

impl FormatTime for UtcClock {
    fn format_time(&self, w: &mut Writer<'_>) -> fmt::Result {
        write!(w, "{}", chrono::Utc::now().format("%H:%M:%S"))
    }
}

/// Console format: coloured message, no timestamp.
#[derive(Debug)]
struct ConsoleFormat;

impl<S, N> FormatEvent<S, N> for ConsoleFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let (open, close) = Kind::of(event).console_style();
        writer.write_str(open)?;
        ctx.format_fields(writer.by_ref(), event)?;
        writeln!(writer, "{close}")
    }
}

/// Log file format: `[HH:MM:SS] <tag> message`, ANSI codes removed.
#[derive(Debug)]
pub(super) struct FileFormat;

impl<S, N> FormatEvent<S, N> for FileFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let mut message = String::new();
        ctx.format_fields(Writer::new(&mut message), event)?;

        writer.write_char('[')?;
        UtcClock.format_time(&mut writer)?;
        writer.write_str("] ")?;
        if let Some(tag) = Kind::of(event).file_tag() {
            write!(writer, "{tag} ")?;
        }
        writeln!(writer, "{}", strip_ansi(&message))
    }
}

/// Layer writing a fresh run log at `path`.
pub(super) type FileLayer<S> =
    tracing_subscriber::fmt::Layer<S, DefaultFields, FileFormat, Mutex<File>>;

/// Truncate `path`, write the run header, and return a layer logging to it.
///
/// Returns `None` if the file cannot be written.
pub(super) fn file_layer<S>(path: &Path) -> Option<FileLayer<S>>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    let mut file = File::create(path).ok()?;
    writeln!(
        file,
        "# linkbuild {} run at {} UTC",
        crate::cli::VERSION,
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S")
    )
    .ok()?;
    Some(
        tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .event_format(FileFormat)
            .with_writer(Mutex::new(file)),
    )
}

/// Install the global subscriber.
///
/// The console shows `info` and above (`debug` too when `verbose`), with
/// warnings and errors on stderr. Every event down to `debug` also goes to
/// `$XDG_CACHE_HOME/linkbuild/<command>.log` when that file can be created.
/// Call once, before anything logs.
pub fn init_subscriber(verbose: bool, command: &str) {
    use tracing_subscriber::fmt::writer::MakeWriterExt as _;
    use tracing_subscriber::{
        Layer as _, filter::LevelFilter, layer::SubscriberExt as _, util::SubscriberInitExt as _,
    };

    let console_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    let console = tracing_subscriber::fmt::layer()
        .event_format(ConsoleFormat)
        .with_writer(
            std::io::stderr
                .with_max_level(Level::WARN)
                .or_else(std::io::stdout),
        )
        .with_filter(console_level);

    let file = log_file_path(command)
        .and_then(|path| file_layer(&path))
        .map(|layer| layer.with_filter(LevelFilter::DEBUG));

    tracing_subscriber::registry().with(console).with(file).init();
}
