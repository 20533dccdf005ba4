//! `log` backend that writes to the kernel console.

use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};
use spin::Mutex;

use super::console::CONSOLE;
use crate::logger::{write_record, DeferredLog};

/// Logger that renders records onto the console.
///
/// Records emitted while the console is busy (including from inside a
/// console operation) or not yet installed are deferred until
/// [`flush_deferred`].
pub struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

/// Lock order: `CONSOLE` before `DEFERRED`.
static DEFERRED: Mutex<DeferredLog> = Mutex::new(DeferredLog::new());

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        match CONSOLE.get().and_then(|c| c.try_lock()) {
            Some(mut console) => {
                if let Some(mut deferred) = DEFERRED.try_lock() {
                    deferred.flush_into(&mut *console);
                }
                let _ = write_record(&mut *console, record);
            }
            None => {
                if let Some(mut deferred) = DEFERRED.try_lock() {
                    let _ = write_record(&mut *deferred, record);
                }
            }
        }
    }

    fn flush(&self) {
        flush_deferred();
    }
}

/// Writes out records that arrived while the console was unavailable.
///
/// Does nothing if the console is still busy.
pub fn flush_deferred() {
    let Some(mut console) = CONSOLE.get().and_then(|c| c.try_lock()) else {
        return;
    };
    if let Some(mut deferred) = DEFERRED.try_lock() {
        if !deferred.is_empty() {
            deferred.flush_into(&mut *console);
        }
    }
}

/// Installs the console logger with the given level filter.
pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
    log::set_logger(&LOGGER)?;
    log::set_max_level(level);
    Ok(())
}
