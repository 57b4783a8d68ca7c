// flexi_logger backend for hosts and demos. The library itself only talks to
// the `log` facade.

use flexi_logger::{DeferredNow, FlexiLoggerError, Logger, LoggerHandle};
use parking_lot::Mutex;
use std::sync::OnceLock;

static LOGGER_HANDLE: OnceLock<Mutex<LoggerHandle>> = OnceLock::new();
static INIT_LOCK: Mutex<()> = Mutex::new(());

/// Install the logger. `level` is a flexi_logger spec such as `"info"` or
/// `"thout=debug"`; `RUST_LOG` takes precedence when set.
///
/// Calling this more than once is a no-op.
pub fn init_logging(level: Option<&str>) -> Result<(), FlexiLoggerError> {
    let _init = INIT_LOCK.lock();
    if LOGGER_HANDLE.get().is_some() {
        return Ok(());
    }

    let handle = Logger::try_with_env_or_str(level.unwrap_or("info"))?
        .format(thread_format)
        .start()?;
    let _ = LOGGER_HANDLE.set(Mutex::new(handle));

    Ok(())
}

/// Replace the active log spec at runtime.
pub fn set_log_level(level: &str) -> Result<(), FlexiLoggerError> {
    match LOGGER_HANDLE.get() {
        Some(handle) => handle.lock().parse_new_spec(level),
        None => init_logging(Some(level)),
    }
}

pub fn is_initialized() -> bool {
    LOGGER_HANDLE.get().is_some()
}

// Format: "HH:MM:SS.mmm INF [thout-worker-0] message"
fn thread_format(
    w: &mut dyn std::io::Write,
    now: &mut DeferredNow,
    record: &log::Record,
) -> Result<(), std::io::Error> {
    let level_abbr = match record.level() {
        log::Level::Error => "ERR",
        log::Level::Warn => "WRN",
        log::Level::Info => "INF",
        log::Level::Debug => "DBG",
        log::Level::Trace => "TRC",
    };
    let thread = std::thread::current();

    write!(
        w,
        "{} {} [{}] {}",
        now.format("%H:%M:%S%.3f"),
        level_abbr,
        thread.name().unwrap_or("-"),
        record.args()
    )
}
