//! Stderr logging for binaries and tests.
//!
//! Lines look like `[   0.012s DEBUG gammon_board::calibrator] message`, with
//! the time measured from the first call to [`init_with_level`].

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::OnceLock;
use std::time::Instant;

use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};

#[cfg(feature = "tracing")]
use tracing_subscriber::{fmt, fmt::format::FmtSpan, util::SubscriberInitExt, EnvFilter};

static START: OnceLock<Instant> = OnceLock::new();
static INSTALLED: AtomicBool = AtomicBool::new(false);
static LOGGER: StderrLogger = StderrLogger;

struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let elapsed = START.get_or_init(Instant::now).elapsed().as_secs_f64();
        let _ = writeln!(
            std::io::stderr().lock(),
            "[{elapsed:>8.3}s {:<5} {}] {}",
            record.level(),
            record.target(),
            record.args()
        );
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

/// Route `log` records to stderr at `level`.
///
/// The first call installs the logger; later calls only change the level.
/// Fails if some other logger was installed first.
pub fn init_with_level(level: LevelFilter) -> Result<(), SetLoggerError> {
    START.get_or_init(Instant::now);
    if !INSTALLED.load(Ordering::Acquire) {
        log::set_logger(&LOGGER)?;
        INSTALLED.store(true, Ordering::Release);
    }
    log::set_max_level(level);
    Ok(())
}

/// Install a `tracing` subscriber that reports span timings on close.
///
/// `RUST_LOG` overrides the default `info` filter. A subscriber that is
/// already installed is left in place.
#[cfg(feature = "tracing")]
pub fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(std::io::stderr);
    let _ = if json {
        builder.json().flatten_event(true).finish().try_init()
    } else {
        builder
            .with_timer(fmt::time::Uptime::default())
            .finish()
            .try_init()
    };
}
