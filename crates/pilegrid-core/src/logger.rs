//! Stderr logger for the command-line tools.
//!
//! Lines look like `[  0.012s  INFO pilegrid_correct] message`. Library crates
//! only talk to the `log` facade; binaries call `init_with_level` once.
//! Records from other crates are shown at `warn` and above only.

use std::fmt::Write as _;
use std::io::Write;
use std::sync::OnceLock;
use std::time::Instant;

use log::{Level, LevelFilter, Log, Metadata, Record};

#[cfg(feature = "tracing")]
use tracing_subscriber::fmt::format::FmtSpan;
#[cfg(feature = "tracing")]
use tracing_subscriber::util::SubscriberInitExt;
#[cfg(feature = "tracing")]
use tracing_subscriber::{fmt, EnvFilter};

const OWN_PREFIX: &str = "pilegrid";

struct StderrLogger {
    level: LevelFilter,
    started: Instant,
}

fn accepts(level: LevelFilter, metadata: &Metadata) -> bool {
    if metadata.level() > level {
        return false;
    }
    metadata.target().starts_with(OWN_PREFIX) || metadata.level() <= Level::Warn
}

fn format_line(elapsed_s: f64, record: &Record) -> String {
    let krate = record.target().split("::").next().unwrap_or_default();
    let mut line = String::new();
    let _ = write!(
        line,
        "[{:7.3}s {:>5} {}] {}",
        elapsed_s,
        record.level(),
        krate,
        record.args()
    );
    line
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        accepts(self.level, metadata)
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format_line(self.started.elapsed().as_secs_f64(), record);
        let _ = writeln!(std::io::stderr().lock(), "{line}");
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

static LOGGER: OnceLock<StderrLogger> = OnceLock::new();

/// Install the stderr logger with the provided level filter.
///
/// Only the first call installs anything; later calls return `Ok(())`.
pub fn init_with_level(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    if LOGGER.get().is_some() {
        return Ok(());
    }
    let logger = LOGGER.get_or_init(|| StderrLogger {
        level,
        started: Instant::now(),
    });
    log::set_logger(logger)?;
    log::set_max_level(level);
    Ok(())
}

/// Install a `tracing` subscriber on stderr that also reports span timings
/// on close. `RUST_LOG` overrides the default `info` filter.
#[cfg(feature = "tracing")]
pub fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(std::io::stderr);
    if json {
        let _ = builder.json().flatten_event(true).finish().try_init();
    } else {
        let _ = builder
            .with_timer(fmt::time::Uptime::default())
            .finish()
            .try_init();
    }
}
