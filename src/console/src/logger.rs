//! Log record formatting.
//!
//! Records are rendered as `[LEVEL] target: message` lines. The backend that
//! routes them to the kernel console lives in `arch`.
//!
//! The console logs from inside its own operations, while the backend cannot
//! reach it. Those lines go to a [`DeferredLog`] and are written out once the
//! console is free again.

use core::fmt;

use log::Record;
use pc_console_hal::Platform;

use crate::console::Console;
use crate::ring::ConsoleRingBuffer;

/// Writes one record as a console line.
pub fn write_record(out: &mut impl fmt::Write, record: &Record<'_>) -> fmt::Result {
    let tag = match record.level() {
        log::Level::Error => "[ERR ]",
        log::Level::Warn => "[WARN]",
        log::Level::Info => "[INFO]",
        log::Level::Debug => "[DBG ]",
        log::Level::Trace => "[TRC ]",
    };
    writeln!(out, "{} {}: {}", tag, record.target(), record.args())
}

/// Formatted log output waiting for the console.
///
/// Holds the most recent bytes; when records pile up faster than they are
/// flushed, the oldest output is overwritten.
pub struct DeferredLog {
    pending: ConsoleRingBuffer,
}

impl DeferredLog {
    /// Creates an empty backlog.
    pub const fn new() -> Self {
        Self {
            pending: ConsoleRingBuffer::new(),
        }
    }

    /// Returns true if nothing is waiting.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Writes the backlog to every console device and empties it.
    pub fn flush_into<P: Platform>(&mut self, console: &mut Console<P>) {
        while let Some(byte) = self.pending.pop() {
            console.output(byte);
        }
    }
}

impl Default for DeferredLog {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Write for DeferredLog {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for byte in s.bytes() {
            self.pending.push(byte);
        }
        Ok(())
    }
}
