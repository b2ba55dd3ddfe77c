//! Minimal stderr logger behind `-v`.
//!
//! The library only logs at debug and trace, so nothing is installed
//! unless verbosity is requested.

use log::{Level, LevelFilter, Log, Metadata, Record};

struct StderrLogger;

static LOGGER: StderrLogger = StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let level = match record.level() {
            Level::Error => "error",
            Level::Warn => "warn",
            Level::Info => "info",
            Level::Debug => "debug",
            Level::Trace => "trace",
        };
        eprintln!("[{level} {}] {}", record.target(), record.args());
    }

    fn flush(&self) {}
}

/// Install the logger for `verbosity` occurrences of `-v`.
/// Zero leaves logging disabled.
pub(crate) fn init(verbosity: u8) {
    let filter = match verbosity {
        0 => return,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(filter);
    }
}
